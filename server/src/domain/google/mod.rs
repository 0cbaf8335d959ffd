//! Google Search Console, GA4 Data API and OAuth clients

mod client;
mod error;
mod oauth;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use client::{GoogleClient, ReportClient};
pub use error::GoogleError;
pub use oauth::GoogleOAuth;
pub use types::{
    ReportRow, RunReportRequest, RunReportResponse, SearchAnalyticsQuery, SearchAnalyticsRow,
    SiteEntry, TokenResponse, UserInfo,
};
