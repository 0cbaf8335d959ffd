//! Shared transactional types for all database backends (SQLite, PostgreSQL)

use serde::{Deserialize, Serialize};

// ============================================================================
// Site types
// ============================================================================

/// Registered site row from database
///
/// Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRow {
    pub id: String,
    pub user_id: String,
    pub site_url: String,
    pub display_name: String,
    pub ga4_property_id: Option<String>,
    pub is_visible: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update applied to a site
///
/// `ga4_property_id: Some(None)` unlinks the GA4 property; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteUpdate {
    pub display_name: Option<String>,
    pub is_visible: Option<bool>,
    pub ga4_property_id: Option<Option<String>>,
}

impl SiteUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.is_visible.is_none() && self.ga4_property_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_update_is_empty() {
        assert!(SiteUpdate::default().is_empty());
        let unlink = SiteUpdate {
            ga4_property_id: Some(None),
            ..Default::default()
        };
        assert!(!unlink.is_empty());
    }
}
