//! Data storage layer
//!
//! - `sqlite` - Embedded transactional database (default)
//! - `postgres` - Transactional database for shared deployments
//! - `types` - Row types shared by both backends
//! - `traits` - Repository trait implemented by each backend
//! - `error` - Unified error type

pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use postgres::PostgresService;
pub use sqlite::SqliteService;

pub use error::DataError;
pub use traits::TransactionalRepository;
pub use types::{SiteRow, SiteUpdate};

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{PostgresConfig, TransactionalBackend};
use crate::core::storage::AppStorage;

/// Transactional database service
///
/// Wraps the backend-specific service. Services are stored as Arc so the
/// repository handle and background tasks can share them.
pub enum TransactionalService {
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend
    Postgres(Arc<PostgresService>),
}

impl TransactionalService {
    /// Initialize the transactional service based on configuration
    pub async fn init(
        backend: TransactionalBackend,
        storage: &AppStorage,
        postgres_config: Option<&PostgresConfig>,
    ) -> Result<Self, DataError> {
        match backend {
            TransactionalBackend::Sqlite => {
                let service = SqliteService::init(storage).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            TransactionalBackend::Postgres => {
                let config = postgres_config.ok_or_else(|| {
                    DataError::Config("PostgreSQL configuration required".to_string())
                })?;
                let service = PostgresService::init(config).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    /// Run a WAL checkpoint (SQLite only)
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => s.checkpoint().await.map_err(Into::into),
            // autovacuum handles maintenance
            Self::Postgres(_) => Ok(()),
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }

    /// Start the periodic checkpoint task (SQLite) or health check task (PostgreSQL)
    pub fn start_checkpoint_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        match self {
            Self::Sqlite(s) => Arc::clone(s).start_checkpoint_task(shutdown_rx),
            Self::Postgres(p) => Arc::clone(p).start_health_check_task(shutdown_rx),
        }
    }

    pub fn backend(&self) -> TransactionalBackend {
        match self {
            Self::Sqlite(_) => TransactionalBackend::Sqlite,
            Self::Postgres(_) => TransactionalBackend::Postgres,
        }
    }

    /// Backend-agnostic repository handle
    pub fn repository(&self) -> Arc<dyn TransactionalRepository> {
        match self {
            Self::Sqlite(s) => Arc::new(Arc::clone(s)),
            Self::Postgres(p) => Arc::new(Arc::clone(p)),
        }
    }
}
