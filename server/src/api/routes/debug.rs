//! Diagnostics endpoint (only mounted with --debug)
//!
//! Reports whether each moving part is wired up. Secret values are never
//! echoed, only whether they are present.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::auth::Auth;
use crate::core::config::AppConfig;
use crate::core::secret::SecretBackend;
use crate::data::TransactionalService;

/// Which settings are present
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DebugEnv {
    pub auth_secret_from_env: bool,
    pub auth_enabled: bool,
    pub google_client_id: bool,
    pub google_client_secret: bool,
    pub google_redirect_url: bool,
    pub postgres_url: bool,
}

impl DebugEnv {
    pub fn new(config: &AppConfig, secret_backend: &SecretBackend) -> Self {
        Self {
            auth_secret_from_env: matches!(secret_backend, SecretBackend::Env),
            auth_enabled: config.auth.enabled,
            google_client_id: !config.google.client_id.is_empty(),
            google_client_secret: !config.google.client_secret.is_empty(),
            google_redirect_url: !config.google.redirect_url.is_empty(),
            postgres_url: config
                .database
                .postgres
                .as_ref()
                .is_some_and(|p| !p.url.is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct DebugState {
    pub database: Arc<TransactionalService>,
    pub env: DebugEnv,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthCheck {
    pub ok: bool,
    pub has_session: bool,
    pub user_id: String,
    pub has_access_token: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseCheck {
    pub ok: bool,
    pub backend: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebugResponse {
    pub auth: AuthCheck,
    pub database: DatabaseCheck,
    pub env: DebugEnv,
}

#[utoipa::path(
    get,
    path = "/api/v1/debug",
    tag = "health",
    responses(
        (status = 200, description = "Diagnostics", body = DebugResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn debug(State(state): State<DebugState>, auth: Auth) -> Json<DebugResponse> {
    let ping = state.database.repository().ping().await;
    let database = DatabaseCheck {
        ok: ping.is_ok(),
        backend: state.database.backend().to_string(),
        error: ping.err().map(|e| e.to_string()),
    };

    Json(DebugResponse {
        auth: AuthCheck {
            ok: true,
            has_session: auth.ctx.is_session(),
            user_id: auth.user_id().to_string(),
            has_access_token: !auth.access_token().is_empty(),
        },
        database,
        env: state.env,
    })
}
