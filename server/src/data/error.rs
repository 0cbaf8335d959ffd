//! Unified error type for data layer
//!
//! Wraps errors from both transactional backends (SQLite, PostgreSQL).

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
        }
    }
}

impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::Postgres(e),
            crate::data::postgres::PostgresError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "postgres",
                version,
                name,
                error,
            },
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::PostgresError;
    use crate::data::sqlite::SqliteError;

    #[test]
    fn test_sqlite_migration_failure_names_backend() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 1,
            name: "initial".to_string(),
            error: "disk I/O error".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Migration 1 (initial) failed on sqlite: disk I/O error"
        );
    }

    #[test]
    fn test_backend_errors_keep_their_source() {
        let err: DataError = SqliteError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, DataError::Sqlite(sqlx::Error::PoolClosed)));

        let err: DataError = PostgresError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, DataError::Postgres(sqlx::Error::PoolTimedOut)));

        let err: DataError = PostgresError::Config("missing url".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: missing url");
    }
}
