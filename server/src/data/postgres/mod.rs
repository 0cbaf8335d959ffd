//! PostgreSQL database service
//!
//! Shared registry store for multi-instance deployments. Pool sizing falls
//! back to the built-in defaults for any value left at zero.

pub mod error;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    POSTGRES_HEALTH_CHECK_INTERVAL_SECS,
};

/// Zero means "use the default"
fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() { default } else { value }
}

pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect, size the pool and bring the schema up to date
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(PostgresError::Config("PostgreSQL URL is required".into()));
        }

        let max_connections = or_default(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        let min_connections = or_default(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS);
        let acquire_timeout =
            or_default(config.acquire_timeout_secs, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS);
        let idle_timeout = or_default(config.idle_timeout_secs, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS);
        let max_lifetime = or_default(config.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS);
        let statement_timeout = or_default(
            config.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
        );

        let options: PgConnectOptions = url
            .parse()
            .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;
        let options = options
            .log_statements(LevelFilter::Trace)
            .options([("statement_timeout", format!("{}s", statement_timeout))]);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(
            max_connections,
            min_connections,
            statement_timeout_secs = statement_timeout,
            "PostgreSQL store ready"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }

    /// Periodically verify the pool can still reach the server
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(POSTGRES_HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("Health check task stopped");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = repositories::site::ping(&db.pool).await {
                            tracing::warn!(error = %e, "PostgreSQL health check failed");
                        }
                    }
                }
            }
        })
    }
}
