//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::api::middleware::AllowedOrigins;
use crate::core::constants::SESSION_COOKIE_NAME;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "UNAUTHORIZED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Session has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_INVALID",
            message: "Invalid session token".to_string(),
        }
    }

    pub fn origin_not_allowed() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "ORIGIN_NOT_ALLOWED",
            message: "Request origin not allowed".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub allowed_origins: AllowedOrigins,
}

/// Origin of the request, from `Origin` or else the `Referer` URL
fn request_origin(request: &Request) -> Option<String> {
    if let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
    {
        return Some(origin.to_string());
    }

    let referer = request
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())?;
    match reqwest::Url::parse(referer) {
        Ok(u) if u.has_host() => Some(u.origin().ascii_serialization()),
        Ok(_) => {
            tracing::warn!(referer = %referer, "Referer URL has no host");
            None
        }
        Err(_) => {
            tracing::debug!(referer = %referer, "Failed to parse Referer URL");
            None
        }
    }
}

/// Authentication middleware
///
/// Injects `AuthContext` into request extensions. With auth disabled every
/// request runs as the local user; otherwise a valid session cookie is required
/// and cross-origin browser requests are rejected.
pub async fn require_auth(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.auth_manager.is_enabled() {
        request.extensions_mut().insert(AuthContext::local());
        return Ok(next.run(request).await);
    }

    if let Some(origin) = request_origin(&request)
        && !state.allowed_origins.is_allowed(&origin)
    {
        tracing::warn!(origin = %origin, "Rejected request from disallowed origin");
        return Err(AuthError::origin_not_allowed());
    }

    let session_cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(AuthError::required)?;

    let claims = state
        .auth_manager
        .validate_session(session_cookie.value())
        .map_err(|e| match e {
            JwtError::Expired => AuthError::expired(),
            _ => AuthError::invalid(),
        })?;

    request.extensions_mut().insert(AuthContext::Session {
        user_id: claims.sub,
        access_token: claims.access_token,
        email: claims.email,
        name: claims.name,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(name: header::HeaderName, value: &str) -> Request {
        Request::builder()
            .uri("/api/v1/sites")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_origin_header_preferred() {
        let req = request_with(header::ORIGIN, "http://localhost:5411");
        assert_eq!(request_origin(&req).as_deref(), Some("http://localhost:5411"));
    }

    #[test]
    fn test_origin_from_referer() {
        let req = request_with(header::REFERER, "http://127.0.0.1:5410/dashboard?range=7d");
        assert_eq!(request_origin(&req).as_deref(), Some("http://127.0.0.1:5410"));
    }

    #[test]
    fn test_no_origin() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert!(request_origin(&req).is_none());
    }
}
