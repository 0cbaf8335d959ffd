//! HTTP middleware (CORS, 404 handler)

use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use reqwest::Url;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::types::ApiError;
use crate::core::config::is_all_interfaces;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        // Frontend dev server runs next to the API
        let dev_port = port.saturating_add(1);
        let is_all = is_all_interfaces(host);

        let base_hosts: Vec<&str> = if is_all || host == "127.0.0.1" || host == "localhost" {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}:{}", h, dev_port));
            origins.push(format!("http://{}", h));
        }

        if is_all && let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                origins.push(format!("http://{}:{}", ip, port));
                origins.push(format!("http://{}:{}", ip, dev_port));
            }
        }

        Self { origins }
    }

    /// Also allow the origin of an absolute URL (e.g. a separately hosted frontend).
    /// Relative paths are ignored.
    pub fn with_url_origin(mut self, url: &str) -> Self {
        if let Ok(parsed) = Url::parse(url)
            && parsed.has_host()
        {
            let origin = parsed.origin().ascii_serialization();
            if !self.is_allowed(&origin) {
                self.origins.push(origin);
            }
        }
        self
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
        ])
        .allow_credentials(true)
}

/// JSON 404 for unmatched routes
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404]");
    ApiError::not_found(
        "NOT_FOUND",
        format!("No route for {} {}", req.method(), req.uri().path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_origins() {
        let origins = AllowedOrigins::new("127.0.0.1", 5410);
        assert!(origins.is_allowed("http://localhost:5410"));
        assert!(origins.is_allowed("http://127.0.0.1:5411"));
        assert!(!origins.is_allowed("http://evil.example:5410"));
    }

    #[test]
    fn test_custom_host_only() {
        let origins = AllowedOrigins::new("dash.internal", 8080);
        assert!(origins.is_allowed("http://dash.internal:8080"));
        assert!(!origins.is_allowed("http://localhost:8080"));
    }

    #[test]
    fn test_with_url_origin() {
        let origins = AllowedOrigins::new("127.0.0.1", 5410)
            .with_url_origin("https://app.example.com/dashboard")
            .with_url_origin("/");
        assert!(origins.is_allowed("https://app.example.com"));
        assert!(!origins.is_allowed("/"));
    }

    #[tokio::test]
    async fn test_handle_404_json_body() {
        let req = Request::builder()
            .uri("/api/v1/nope")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = handle_404(req).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "not_found");
        assert!(body["message"].as_str().unwrap().contains("/api/v1/nope"));
    }
}
