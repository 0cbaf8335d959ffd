//! Request and response bodies for the Search Console and GA4 Data APIs
//!
//! Field names follow Google's camelCase wire format, which is also what the
//! trend endpoints return to the browser.

use serde::{Deserialize, Serialize};

use crate::domain::date_range::DateWindow;

// ============================================================================
// Search Console
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SitesListResponse {
    #[serde(default)]
    pub site_entry: Vec<SiteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQuery {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub row_limit: u32,
}

impl SearchAnalyticsQuery {
    pub fn new(window: &DateWindow, dimensions: &[&str], row_limit: u32) -> Self {
        Self {
            start_date: window.start_date(),
            end_date: window.end_date(),
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            row_limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchAnalyticsRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub position: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchAnalyticsResponse {
    #[serde(default)]
    pub rows: Vec<SearchAnalyticsRow>,
}

// ============================================================================
// GA4 Data API
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDateRange {
    pub start_date: String,
    pub end_date: String,
}

impl From<&DateWindow> for ReportDateRange {
    fn from(window: &DateWindow) -> Self {
        Self {
            start_date: window.start_date(),
            end_date: window.end_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    Dimension {
        #[serde(rename = "dimensionName")]
        dimension_name: String,
    },
    Metric {
        #[serde(rename = "metricName")]
        metric_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOrder {
    #[serde(flatten)]
    pub by: OrderBy,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub desc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportRequest {
    pub date_ranges: Vec<ReportDateRange>,
    pub metrics: Vec<NamedField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<NamedField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_bys: Vec<ReportOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RunReportRequest {
    pub fn new(windows: &[DateWindow], metrics: &[&str]) -> Self {
        Self {
            date_ranges: windows.iter().map(ReportDateRange::from).collect(),
            metrics: metrics
                .iter()
                .map(|name| NamedField {
                    name: name.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn dimension(mut self, name: &str) -> Self {
        self.dimensions.push(NamedField {
            name: name.to_string(),
        });
        self
    }

    pub fn order_by_dimension(mut self, name: &str) -> Self {
        self.order_bys.push(ReportOrder {
            by: OrderBy::Dimension {
                dimension_name: name.to_string(),
            },
            desc: false,
        });
        self
    }

    pub fn order_by_metric_desc(mut self, name: &str) -> Self {
        self.order_bys.push(ReportOrder {
            by: OrderBy::Metric {
                metric_name: name.to_string(),
            },
            desc: true,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportValue {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimension_values: Vec<ReportValue>,
    #[serde(default)]
    pub metric_values: Vec<ReportValue>,
}

impl ReportRow {
    /// Metric at `index` as an integer; missing or unparseable values are 0
    pub fn metric_u64(&self, index: usize) -> u64 {
        self.metric_values
            .get(index)
            .and_then(|v| v.value.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }

    /// Metric at `index` as a float; missing or unparseable values are 0
    pub fn metric_f64(&self, index: usize) -> f64 {
        self.metric_values
            .get(index)
            .and_then(|v| v.value.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
}

// ============================================================================
// OAuth
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
