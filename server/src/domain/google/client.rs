//! HTTP access to the Search Console and GA4 Data APIs

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::{GoogleError, error_message};
use super::types::{
    RunReportRequest, RunReportResponse, SearchAnalyticsQuery, SearchAnalyticsResponse,
    SearchAnalyticsRow, SiteEntry, SitesListResponse,
};
use crate::core::config::GoogleConfig;
use crate::core::constants::APP_NAME;

/// Read-only report queries, authorized by the caller's access token
#[async_trait]
pub trait ReportClient: Send + Sync {
    /// Properties the user can see in Search Console
    async fn list_search_console_sites(&self, token: &str) -> Result<Vec<SiteEntry>, GoogleError>;

    async fn query_search_analytics(
        &self,
        token: &str,
        site_url: &str,
        query: &SearchAnalyticsQuery,
    ) -> Result<Vec<SearchAnalyticsRow>, GoogleError>;

    async fn run_report(
        &self,
        token: &str,
        property_id: &str,
        request: &RunReportRequest,
    ) -> Result<RunReportResponse, GoogleError>;
}

#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    search_console_base: String,
    analytics_base: String,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig) -> Result<Self, GoogleError> {
        let http = build_http_client(config.request_timeout_secs)?;
        Ok(Self {
            http,
            search_console_base: config.search_console_base_url.clone(),
            analytics_base: config.analytics_base_url.clone(),
        })
    }

    fn search_analytics_url(&self, site_url: &str) -> String {
        format!(
            "{}/sites/{}/searchAnalytics/query",
            self.search_console_base,
            urlencoding::encode(site_url)
        )
    }

    fn run_report_url(&self, property_id: &str) -> String {
        format!(
            "{}/properties/{}:runReport",
            self.analytics_base,
            urlencoding::encode(property_id.trim())
        )
    }
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, GoogleError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GoogleError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Send a request and decode a JSON body, mapping non-2xx answers to `GoogleError::Api`
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, GoogleError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleError::api(
            status.as_u16(),
            error_message(status.as_u16(), &body),
        ));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| GoogleError::Decode(e.to_string()))
}

#[async_trait]
impl ReportClient for GoogleClient {
    async fn list_search_console_sites(&self, token: &str) -> Result<Vec<SiteEntry>, GoogleError> {
        let url = format!("{}/sites", self.search_console_base);
        let body: SitesListResponse = send_json(self.http.get(&url).bearer_auth(token)).await?;
        Ok(body.site_entry)
    }

    async fn query_search_analytics(
        &self,
        token: &str,
        site_url: &str,
        query: &SearchAnalyticsQuery,
    ) -> Result<Vec<SearchAnalyticsRow>, GoogleError> {
        let url = self.search_analytics_url(site_url);
        let body: SearchAnalyticsResponse =
            send_json(self.http.post(&url).bearer_auth(token).json(query)).await?;
        Ok(body.rows)
    }

    async fn run_report(
        &self,
        token: &str,
        property_id: &str,
        request: &RunReportRequest,
    ) -> Result<RunReportResponse, GoogleError> {
        let url = self.run_report_url(property_id);
        send_json(self.http.post(&url).bearer_auth(token).json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleClient {
        GoogleClient::new(&GoogleConfig {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: String::new(),
            search_console_base_url: "https://gsc.test/webmasters/v3".to_string(),
            analytics_base_url: "https://ga.test/v1beta".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_search_analytics_url_encodes_site() {
        assert_eq!(
            client().search_analytics_url("https://example.com/"),
            "https://gsc.test/webmasters/v3/sites/https%3A%2F%2Fexample.com%2F/searchAnalytics/query"
        );
        assert_eq!(
            client().search_analytics_url("sc-domain:example.com"),
            "https://gsc.test/webmasters/v3/sites/sc-domain%3Aexample.com/searchAnalytics/query"
        );
    }

    #[test]
    fn test_run_report_url() {
        assert_eq!(
            client().run_report_url(" 123456 "),
            "https://ga.test/v1beta/properties/123456:runReport"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        let client = GoogleClient::new(&GoogleConfig {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: String::new(),
            search_console_base_url: "http://127.0.0.1:1".to_string(),
            analytics_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
        })
        .unwrap();
        let err = client.list_search_console_sites("token").await.unwrap_err();
        assert!(matches!(err, GoogleError::Http(_)));
    }
}
