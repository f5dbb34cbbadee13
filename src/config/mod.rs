//! Configuration module for the membership backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default number of rows per admin list page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the admin endpoints (required in production)
    pub admin_key: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Rows per page for the admin member list
    pub page_size: i64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_key = env::var("NVP_ADMIN_KEY").ok();

        let db_path = env::var("NVP_DB_PATH")
            .unwrap_or_else(|_| "./data/members.sqlite".to_string())
            .into();

        let bind_addr = env::var("NVP_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid NVP_BIND_ADDR format");

        let page_size = env::var("NVP_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let log_level = env::var("NVP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_key,
            db_path,
            bind_addr,
            page_size,
            log_level,
        }
    }
}
