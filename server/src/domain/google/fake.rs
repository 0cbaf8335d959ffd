//! In-memory `ReportClient` for tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    GoogleError, ReportClient, RunReportRequest, RunReportResponse, SearchAnalyticsQuery,
    SearchAnalyticsRow, SiteEntry,
};

#[derive(Default)]
pub struct FakeReportClient {
    pub sites: Vec<String>,
    /// Rows per site URL, returned for every query
    pub search: HashMap<String, Vec<SearchAnalyticsRow>>,
    /// Response per property id, returned for every report
    pub reports: HashMap<String, RunReportResponse>,
    /// Site URLs / property ids whose calls fail with a 500
    pub failing: HashSet<String>,
    pub fail_listing: bool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<SearchAnalyticsQuery>>,
    pub report_requests: Mutex<Vec<RunReportRequest>>,
}

impl FakeReportClient {
    pub fn with_search(mut self, site_url: &str, clicks: f64, impressions: f64, position: f64) -> Self {
        let ctr = if impressions > 0.0 { clicks / impressions } else { 0.0 };
        self.search.insert(
            site_url.to_string(),
            vec![SearchAnalyticsRow {
                keys: Vec::new(),
                clicks,
                impressions,
                ctr,
                position,
            }],
        );
        self
    }

    pub fn with_report(mut self, property_id: &str, metrics: &[&str]) -> Self {
        let json = serde_json::json!({
            "rows": [{
                "metricValues": metrics.iter().map(|v| serde_json::json!({"value": v})).collect::<Vec<_>>()
            }]
        });
        self.reports.insert(
            property_id.to_string(),
            serde_json::from_value(json).unwrap(),
        );
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, token: &str, key: &str) -> Result<(), GoogleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token.is_empty() {
            return Err(GoogleError::api(401, "Invalid Credentials"));
        }
        if self.failing.contains(key) {
            return Err(GoogleError::api(500, format!("backend error for {}", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportClient for FakeReportClient {
    async fn list_search_console_sites(&self, token: &str) -> Result<Vec<SiteEntry>, GoogleError> {
        self.check(token, "")?;
        if self.fail_listing {
            return Err(GoogleError::api(503, "listing unavailable"));
        }
        Ok(self
            .sites
            .iter()
            .map(|url| SiteEntry {
                site_url: url.clone(),
                permission_level: Some("siteOwner".to_string()),
            })
            .collect())
    }

    async fn query_search_analytics(
        &self,
        token: &str,
        site_url: &str,
        query: &SearchAnalyticsQuery,
    ) -> Result<Vec<SearchAnalyticsRow>, GoogleError> {
        self.check(token, site_url)?;
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.search.get(site_url).cloned().unwrap_or_default())
    }

    async fn run_report(
        &self,
        token: &str,
        property_id: &str,
        request: &RunReportRequest,
    ) -> Result<RunReportResponse, GoogleError> {
        self.check(token, property_id)?;
        self.report_requests.lock().unwrap().push(request.clone());
        Ok(self.reports.get(property_id).cloned().unwrap_or_default())
    }
}
