//! Repository traits for database backends
//!
//! SQLite and PostgreSQL implement the same trait so handlers stay
//! backend-agnostic.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{SiteRow, SiteUpdate};

// ============================================================================
// Transactional Repository Trait
// ============================================================================

/// Site registry operations
///
/// Every method is scoped by `user_id`; rows owned by another user are
/// invisible to the caller.
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    /// List all sites for a user, oldest first
    async fn list_sites(&self, user_id: &str) -> Result<Vec<SiteRow>, DataError>;

    /// List visible sites for a user, oldest first
    async fn list_visible_sites(&self, user_id: &str) -> Result<Vec<SiteRow>, DataError>;

    /// Register discovered site URLs that the user does not have yet.
    ///
    /// Returns the number of newly inserted rows.
    async fn insert_missing_sites(&self, user_id: &str, urls: &[String])
    -> Result<usize, DataError>;

    /// Get a single site owned by the user
    async fn get_site(&self, user_id: &str, id: &str) -> Result<Option<SiteRow>, DataError>;

    /// Apply a partial update. `None` when the site does not exist for this user.
    async fn update_site(
        &self,
        user_id: &str,
        id: &str,
        update: &SiteUpdate,
    ) -> Result<Option<SiteRow>, DataError>;

    /// Round-trip a trivial query to confirm the store is reachable
    async fn ping(&self) -> Result<(), DataError>;
}

/// Drop empty and repeated URLs, keeping first-seen order
pub(crate) fn dedup_urls(urls: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    urls.iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && seen.insert(*u))
        .collect()
}
