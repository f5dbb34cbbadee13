//! Data models for the membership registry.

mod member;

pub use member::*;
