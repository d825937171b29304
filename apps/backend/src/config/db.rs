use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Database profile enum for different environments
#[derive(Debug, Clone, PartialEq)]
pub enum DbProfile {
    /// Connection string taken from `DATABASE_URL` (Postgres or SQLite)
    Prod,
    /// Private in-memory SQLite database, one per connection pool
    InMemory,
    /// SQLite database stored in a file, created if missing
    SqliteFile { file: PathBuf },
}

impl DbProfile {
    pub fn is_in_memory(&self) -> bool {
        matches!(self, DbProfile::InMemory)
    }
}

/// Builds a database URL for the given profile.
pub fn db_url(profile: &DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("DATABASE_URL"),
        DbProfile::InMemory => Ok("sqlite::memory:".to_string()),
        DbProfile::SqliteFile { file } => Ok(format!("sqlite://{}?mode=rwc", file.display())),
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
