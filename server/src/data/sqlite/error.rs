//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_display() {
        let err = SqliteError::MigrationFailed {
            version: 1,
            name: "initial".to_string(),
            error: "no such table: user_sites".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 1 (initial) failed: no such table: user_sites"
        );
    }

    #[test]
    fn test_database_error_from() {
        let err: SqliteError = sqlx::Error::PoolClosed.into();
        assert!(err.to_string().starts_with("Database error"));
    }
}
