//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::debug::{self, DebugEnv, DebugState};
use super::routes::{auth, health, reports, sites};
use crate::core::CoreApp;
use crate::core::constants::{AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};
use crate::data::TransactionalService;
use crate::domain::ReportFetcher;
use crate::domain::google::GoogleOAuth;

/// Everything the router needs, independent of process bootstrap
pub(crate) struct RouterDeps {
    pub auth_manager: Arc<AuthManager>,
    pub oauth: Option<Arc<GoogleOAuth>>,
    pub database: Arc<TransactionalService>,
    pub fetcher: ReportFetcher,
    pub allowed_origins: AllowedOrigins,
    pub post_login_redirect: String,
    /// Mounts `/api/v1/debug` when set
    pub debug: Option<DebugEnv>,
}

pub(crate) fn build_router(deps: RouterDeps) -> Router {
    let RouterDeps {
        auth_manager,
        oauth,
        database,
        fetcher,
        allowed_origins,
        post_login_redirect,
        debug: debug_env,
    } = deps;

    let auth_layer = axum::middleware::from_fn_with_state(
        AuthState {
            auth_manager: auth_manager.clone(),
            allowed_origins: allowed_origins.clone(),
        },
        require_auth,
    );

    let auth_routes = auth::routes(auth_manager, oauth, post_login_redirect)
        .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT));
    let sites_routes = sites::routes(database.clone()).layer(auth_layer.clone());
    let reports_routes = reports::routes(database.clone(), fetcher).layer(auth_layer.clone());

    let router = Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/v1/ping", get(health::ping))
        .route("/api/v1/openapi.json", get(openapi_json))
        .route("/api/v1/docs", get(swagger_ui_html))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/sites", sites_routes)
        .nest("/api/v1", reports_routes);

    let router = match debug_env {
        Some(env) => router.route(
            "/api/v1/debug",
            get(debug::debug)
                .with_state(DebugState { database, env })
                .layer(auth_layer),
        ),
        None => router,
    };

    router
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered; returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let allowed_origins = AllowedOrigins::new(&host, port)
            .with_url_origin(&app.config.auth.post_login_redirect);
        let debug = app
            .config
            .debug
            .then(|| DebugEnv::new(&app.config, app.secrets.backend()));

        let router = build_router(RouterDeps {
            auth_manager: app.auth.clone(),
            oauth: app.oauth.clone(),
            database: app.database.clone(),
            fetcher: app.fetcher.clone(),
            allowed_origins,
            post_login_redirect: app.config.auth.post_login_redirect.clone(),
            debug,
        });

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "HTTP listener bound");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}
