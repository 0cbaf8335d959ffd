//! Report fetchers
//!
//! Totals degrade to zeros when Google fails so list views keep rendering;
//! trend queries return the first error so the caller can surface it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::date_range::DateWindow;
use super::google::{
    GoogleError, ReportClient, ReportRow, RunReportRequest, SearchAnalyticsQuery,
    SearchAnalyticsRow,
};
use crate::core::constants::{BREAKDOWN_ROW_LIMIT, COUNTRY_ROW_LIMIT, TREND_ROW_LIMIT};

/// Metrics requested for traffic totals, in response order
const TRAFFIC_TOTAL_METRICS: &[&str] = &[
    "totalUsers",
    "sessions",
    "screenPageViews",
    "newUsers",
    "bounceRate",
    "averageSessionDuration",
];

const TRAFFIC_TREND_METRICS: &[&str] = &[
    "totalUsers",
    "newUsers",
    "sessions",
    "screenPageViews",
    "bounceRate",
    "averageSessionDuration",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchTotals {
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
}

impl From<&SearchAnalyticsRow> for SearchTotals {
    fn from(row: &SearchAnalyticsRow) -> Self {
        Self {
            clicks: row.clicks.max(0.0).round() as u64,
            impressions: row.impressions.max(0.0).round() as u64,
            ctr: row.ctr,
            position: row.position,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrafficTotals {
    pub visitors: u64,
    pub sessions: u64,
    pub page_views: u64,
    pub new_users: u64,
    pub bounce_rate: f64,
    pub avg_session_duration: f64,
}

impl From<&ReportRow> for TrafficTotals {
    fn from(row: &ReportRow) -> Self {
        Self {
            visitors: row.metric_u64(0),
            sessions: row.metric_u64(1),
            page_views: row.metric_u64(2),
            new_users: row.metric_u64(3),
            bounce_rate: row.metric_f64(4),
            avg_session_duration: row.metric_f64(5),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrends {
    pub trend: Vec<SearchAnalyticsRow>,
    pub keywords: Vec<SearchAnalyticsRow>,
    pub pages: Vec<SearchAnalyticsRow>,
    pub devices: Vec<SearchAnalyticsRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrafficTrends {
    pub trend: Vec<ReportRow>,
    pub devices: Vec<ReportRow>,
    pub countries: Vec<ReportRow>,
}

fn require_token(token: &str) -> Result<&str, GoogleError> {
    if token.is_empty() {
        Err(GoogleError::MissingToken)
    } else {
        Ok(token)
    }
}

fn or_zeros<T: Default>(result: Result<T, GoogleError>, report: &str, key: &str) -> T {
    match result {
        Ok(value) => value,
        Err(GoogleError::MissingToken) => {
            tracing::debug!(report, key, "No access token, returning zeros");
            T::default()
        }
        Err(e) => {
            tracing::warn!(report, key, error = %e, "Report fetch failed, returning zeros");
            T::default()
        }
    }
}

#[derive(Clone)]
pub struct ReportFetcher {
    client: Arc<dyn ReportClient>,
}

impl ReportFetcher {
    pub fn new(client: Arc<dyn ReportClient>) -> Self {
        Self { client }
    }

    /// Site URLs registered in the user's Search Console account
    pub async fn discover_sites(&self, token: &str) -> Result<Vec<String>, GoogleError> {
        let entries = self
            .client
            .list_search_console_sites(require_token(token)?)
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| e.site_url)
            .filter(|url| !url.trim().is_empty())
            .collect())
    }

    /// Whole-window search totals; zeros on any failure
    pub async fn search_totals(&self, token: &str, site_url: &str, window: &DateWindow) -> SearchTotals {
        let result = async {
            let query = SearchAnalyticsQuery::new(window, &[], 1);
            let rows = self
                .client
                .query_search_analytics(require_token(token)?, site_url, &query)
                .await?;
            Ok::<_, GoogleError>(rows.first().map(SearchTotals::from).unwrap_or_default())
        }
        .await;
        or_zeros(result, "search_console", site_url)
    }

    /// Whole-window traffic totals; zeros on any failure
    pub async fn traffic_totals(
        &self,
        token: &str,
        property_id: &str,
        window: &DateWindow,
    ) -> TrafficTotals {
        let result = async {
            let request = RunReportRequest::new(&[*window], TRAFFIC_TOTAL_METRICS);
            let response = self
                .client
                .run_report(require_token(token)?, property_id, &request)
                .await?;
            Ok::<_, GoogleError>(response.rows.first().map(TrafficTotals::from).unwrap_or_default())
        }
        .await;
        or_zeros(result, "analytics", property_id)
    }

    /// Daily series plus keyword, page and device breakdowns
    pub async fn search_trends(
        &self,
        token: &str,
        site_url: &str,
        window: &DateWindow,
    ) -> Result<SearchTrends, GoogleError> {
        let token = require_token(token)?;
        let query = |dimension: &str, limit: u32| SearchAnalyticsQuery::new(window, &[dimension], limit);
        let (trend_q, keywords_q, pages_q, devices_q) = (
            query("date", TREND_ROW_LIMIT),
            query("query", BREAKDOWN_ROW_LIMIT),
            query("page", BREAKDOWN_ROW_LIMIT),
            query("device", BREAKDOWN_ROW_LIMIT),
        );

        let (trend, keywords, pages, devices) = tokio::try_join!(
            self.client.query_search_analytics(token, site_url, &trend_q),
            self.client.query_search_analytics(token, site_url, &keywords_q),
            self.client.query_search_analytics(token, site_url, &pages_q),
            self.client.query_search_analytics(token, site_url, &devices_q),
        )?;

        Ok(SearchTrends {
            trend,
            keywords,
            pages,
            devices,
        })
    }

    /// Daily series over the current and previous window, plus device and
    /// country breakdowns for the current window
    pub async fn traffic_trends(
        &self,
        token: &str,
        property_id: &str,
        current: &DateWindow,
        previous: &DateWindow,
    ) -> Result<TrafficTrends, GoogleError> {
        let token = require_token(token)?;

        let trend_req = RunReportRequest::new(&[*current, *previous], TRAFFIC_TREND_METRICS)
            .dimension("date")
            .order_by_dimension("date");
        let devices_req =
            RunReportRequest::new(&[*current], &["sessions", "totalUsers"]).dimension("deviceCategory");
        let countries_req = RunReportRequest::new(&[*current], &["totalUsers"])
            .dimension("country")
            .order_by_metric_desc("totalUsers")
            .limit(COUNTRY_ROW_LIMIT);

        let (trend, devices, countries) = tokio::try_join!(
            self.client.run_report(token, property_id, &trend_req),
            self.client.run_report(token, property_id, &devices_req),
            self.client.run_report(token, property_id, &countries_req),
        )?;

        Ok(TrafficTrends {
            trend: trend.rows,
            devices: devices.rows,
            countries: countries.rows,
        })
    }
}
