//! Database module for SQLite persistence.
//!
//! SQLite owns both the member table and the membership-number counter.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
///
/// The UNIQUE constraints on member_number, email, and national_id are the
/// authoritative uniqueness guard; repository pre-checks exist only to order
/// the error reporting.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            national_id TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'active',
            registered_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Single-row counter minting membership numbers; starts at 0 so the first
    // member gets NVP-000001. Values are never reused, even after deletions.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS member_counter (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            value INTEGER NOT NULL DEFAULT 0
        );

        INSERT OR IGNORE INTO member_counter (id, value) VALUES (1, 0);
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the admin list ordering and search
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_members_registered_at ON members(registered_at);
        CREATE INDEX IF NOT EXISTS idx_members_full_name ON members(full_name);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
