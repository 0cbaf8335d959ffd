//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::reports::{analytics, dashboard, search_console, trends};
use crate::api::routes::{auth, debug, health, sites};
use crate::api::types::ErrorBody;
use crate::domain::{SearchTotals, SiteStats, SummaryStats, TrafficTotals};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SitePulse API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Search Console and GA4 dashboard backend"
    ),
    tags(
        (name = "health", description = "Health and diagnostics"),
        (name = "auth", description = "Google sign-in and sessions"),
        (name = "sites", description = "Site registry"),
        (name = "reports", description = "Search Console and GA4 reports")
    ),
    paths(
        // Health
        health::health,
        health::ping,
        debug::debug,
        // Auth
        auth::google_login,
        auth::google_callback,
        auth::auth_status,
        auth::logout,
        // Sites
        sites::list_sites,
        sites::update_site,
        // Reports
        search_console::search_console,
        analytics::analytics,
        analytics::analytics_advanced,
        trends::trends,
        dashboard::dashboard,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        health::PingResponse,
        debug::DebugResponse,
        debug::AuthCheck,
        debug::DatabaseCheck,
        debug::DebugEnv,
        auth::AuthStatusResponse,
        auth::UserDto,
        sites::SiteDto,
        sites::UpdateSiteRequest,
        search_console::SearchConsoleRow,
        analytics::AnalyticsRow,
        dashboard::DashboardResponse,
        SearchTotals,
        TrafficTotals,
        SiteStats,
        SummaryStats,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SitePulse API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/v1/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;
