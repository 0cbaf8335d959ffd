//! Report endpoints: Search Console, GA4, trends and the merged dashboard

pub mod analytics;
pub mod dashboard;
pub mod search_console;
pub mod trends;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::api::auth::Auth;
use crate::api::types::ApiError;
use crate::data::TransactionalService;
use crate::domain::ReportFetcher;

/// Shared state for report endpoints
#[derive(Clone)]
pub struct ReportsState {
    pub database: Arc<TransactionalService>,
    pub fetcher: ReportFetcher,
}

pub fn routes(database: Arc<TransactionalService>, fetcher: ReportFetcher) -> Router {
    let state = ReportsState { database, fetcher };

    Router::new()
        .route("/search-console", get(search_console::search_console))
        .route("/analytics", get(analytics::analytics))
        .route("/analytics/advanced", get(analytics::analytics_advanced))
        .route("/trends", get(trends::trends))
        .route("/dashboard", get(dashboard::dashboard))
        .with_state(state)
}

/// Register Search Console sites the user has not seen yet.
///
/// Discovery failures are logged and skipped so the page still renders
/// the sites already on file.
pub(super) async fn sync_discovered_sites(
    state: &ReportsState,
    auth: &Auth,
) -> Result<(), ApiError> {
    if auth.access_token().is_empty() {
        tracing::debug!(user_id = %auth.user_id(), "No access token, skipping site discovery");
        return Ok(());
    }

    let urls = match state.fetcher.discover_sites(auth.access_token()).await {
        Ok(urls) => urls,
        Err(e) => {
            tracing::warn!(user_id = %auth.user_id(), error = %e, "Site discovery failed");
            return Ok(());
        }
    };

    let inserted = state
        .database
        .repository()
        .insert_missing_sites(auth.user_id(), &urls)
        .await
        .map_err(ApiError::from_data)?;
    if inserted > 0 {
        tracing::info!(user_id = %auth.user_id(), inserted, "Registered new sites");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sqlx::sqlite::SqlitePoolOptions;

    use crate::data::sqlite::schema::SCHEMA;
    use crate::data::{SqliteService, TransactionalService};

    /// In-memory SQLite behind the service wrapper
    pub async fn memory_database() -> Arc<TransactionalService> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        Arc::new(TransactionalService::Sqlite(Arc::new(
            SqliteService::from_pool(pool),
        )))
    }
}
