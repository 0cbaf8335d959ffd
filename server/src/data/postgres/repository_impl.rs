//! TransactionalRepository implementation for PostgreSQL

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{SiteRow, SiteUpdate};

use super::PostgresService;
use super::repositories::site;

#[async_trait]
impl TransactionalRepository for Arc<PostgresService> {
    async fn list_sites(&self, user_id: &str) -> Result<Vec<SiteRow>, DataError> {
        site::list_sites(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_visible_sites(&self, user_id: &str) -> Result<Vec<SiteRow>, DataError> {
        site::list_visible_sites(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn insert_missing_sites(
        &self,
        user_id: &str,
        urls: &[String],
    ) -> Result<usize, DataError> {
        site::insert_missing_sites(self.pool(), user_id, urls)
            .await
            .map_err(Into::into)
    }

    async fn get_site(&self, user_id: &str, id: &str) -> Result<Option<SiteRow>, DataError> {
        site::get_site(self.pool(), user_id, id)
            .await
            .map_err(Into::into)
    }

    async fn update_site(
        &self,
        user_id: &str,
        id: &str,
        update: &SiteUpdate,
    ) -> Result<Option<SiteRow>, DataError> {
        site::update_site(self.pool(), user_id, id, update)
            .await
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<(), DataError> {
        site::ping(self.pool()).await.map_err(Into::into)
    }
}
