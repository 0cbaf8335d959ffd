//! Authentication API endpoints (Google sign-in)

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::auth::AuthManager;
use crate::api::types::ApiError;
use crate::core::constants::{
    LOCAL_USER_ID, OAUTH_STATE_COOKIE_NAME, OAUTH_STATE_TTL_SECS, SESSION_COOKIE_NAME,
};
use crate::domain::google::GoogleOAuth;
use crate::utils::crypto;

const OAUTH_STATE_COOKIE_PATH: &str = "/api/v1/auth";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by Google when the user denies consent
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub auth_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}

#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    /// None when the OAuth client is not configured
    pub oauth: Option<Arc<GoogleOAuth>>,
    pub post_login_redirect: String,
}

pub fn routes(
    auth_manager: Arc<AuthManager>,
    oauth: Option<Arc<GoogleOAuth>>,
    post_login_redirect: String,
) -> Router {
    let state = AuthRoutesState {
        auth_manager,
        oauth,
        post_login_redirect,
    };

    Router::new()
        .route("/google/login", get(google_login))
        .route("/google/callback", get(google_callback))
        .route("/status", get(auth_status))
        .route("/logout", post(logout))
        .with_state(state)
}

fn oauth_client(state: &AuthRoutesState) -> Result<&GoogleOAuth, ApiError> {
    state
        .oauth
        .as_deref()
        .ok_or_else(|| ApiError::service_unavailable("Google sign-in is not configured"))
}

fn state_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(OAUTH_STATE_COOKIE_PATH)
        .max_age(max_age)
        .build()
}

fn session_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Redirect the browser to Google's consent screen
#[utoipa::path(
    get,
    path = "/api/v1/auth/google/login",
    tag = "auth",
    responses(
        (status = 307, description = "Redirect to Google consent"),
        (status = 503, description = "OAuth client not configured")
    )
)]
pub async fn google_login(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let oauth = oauth_client(&state)?;
    let csrf_state = crypto::generate_token(32);
    let url = oauth.authorization_url(&csrf_state);

    let cookie = state_cookie(csrf_state, time::Duration::seconds(OAUTH_STATE_TTL_SECS));
    Ok((jar.add(cookie), Redirect::temporary(&url)))
}

/// OAuth redirect target: verify state, exchange the code, start a session
#[utoipa::path(
    get,
    path = "/api/v1/auth/google/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 307, description = "Session cookie set, redirect to the dashboard"),
        (status = 400, description = "Missing code, state mismatch or consent denied"),
        (status = 500, description = "Token exchange failed")
    )
)]
pub async fn google_callback(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let oauth = oauth_client(&state)?;

    if let Some(error) = query.error {
        return Err(ApiError::bad_request("OAUTH_DENIED", error));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("MISSING_PARAM", "code param required"))?;
    let returned_state = query
        .state
        .ok_or_else(|| ApiError::bad_request("MISSING_PARAM", "state param required"))?;

    let state_matches = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .is_some_and(|c| crypto::constant_time_eq(c.value(), &returned_state));
    if !state_matches {
        tracing::warn!("OAuth state mismatch");
        return Err(ApiError::bad_request(
            "OAUTH_STATE_MISMATCH",
            "Sign-in state did not match, please try again",
        ));
    }

    let token = oauth.exchange_code(&code).await.map_err(ApiError::upstream)?;
    let user = oauth
        .user_info(&token.access_token)
        .await
        .map_err(ApiError::upstream)?;

    let (jwt, claims) = state
        .auth_manager
        .issue_session(&user, &token.access_token, token.expires_in)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session");
            ApiError::internal("Failed to create session")
        })?;
    tracing::info!(user_id = %claims.sub, "User signed in");

    let jar = jar
        .remove(state_cookie(String::new(), time::Duration::ZERO))
        .add(session_cookie(
            jwt,
            time::Duration::seconds(claims.exp - claims.iat),
        ));
    Ok((jar, Redirect::temporary(&state.post_login_redirect)).into_response())
}

/// Check authentication status
#[utoipa::path(
    get,
    path = "/api/v1/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication status", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
) -> Json<AuthStatusResponse> {
    if !state.auth_manager.is_enabled() {
        return Json(AuthStatusResponse {
            authenticated: true,
            auth_enabled: false,
            expires_at: None,
            user: Some(UserDto {
                id: LOCAL_USER_ID.to_string(),
                email: None,
                name: None,
            }),
        });
    }

    let claims = jar
        .get(SESSION_COOKIE_NAME)
        .and_then(|cookie| state.auth_manager.validate_session(cookie.value()).ok());

    Json(match claims {
        Some(claims) => AuthStatusResponse {
            authenticated: true,
            auth_enabled: true,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
            user: Some(UserDto {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
            }),
        },
        None => AuthStatusResponse {
            authenticated: false,
            auth_enabled: true,
            expires_at: None,
            user: None,
        },
    })
}

/// Logout - clear session cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out successfully")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    (
        jar.remove(session_cookie(String::new(), time::Duration::ZERO)),
        Json(serde_json::json!({
            "success": true,
            "message": "Logged out successfully"
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::core::config::GoogleConfig;
    use crate::domain::google::UserInfo;

    fn google_config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_url: "http://localhost:5410/api/v1/auth/google/callback".to_string(),
            search_console_base_url: String::new(),
            analytics_base_url: String::new(),
            request_timeout_secs: 5,
        }
    }

    fn app(auth_manager: AuthManager, with_oauth: bool) -> Router {
        let oauth = with_oauth.then(|| Arc::new(GoogleOAuth::new(&google_config()).unwrap()));
        routes(Arc::new(auth_manager), oauth, "/dashboard".to_string())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_redirects_with_state_cookie() {
        let response = app(AuthManager::for_test(true), true)
            .oneshot(
                Request::builder()
                    .uri("/google/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://accounts.google.com/"));
        assert!(location.contains("client_id=client-123"));
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(OAUTH_STATE_COOKIE_NAME));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_without_oauth_client() {
        let response = app(AuthManager::for_test(true), false)
            .oneshot(
                Request::builder()
                    .uri("/google/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_callback_rejects_state_mismatch() {
        let response = app(AuthManager::for_test(true), true)
            .oneshot(
                Request::builder()
                    .uri("/google/callback?code=abc&state=forged")
                    .header(
                        header::COOKIE,
                        format!("{}=expected", OAUTH_STATE_COOKIE_NAME),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "OAUTH_STATE_MISMATCH");
    }

    #[tokio::test]
    async fn test_callback_requires_code() {
        let response = app(AuthManager::for_test(true), true)
            .oneshot(
                Request::builder()
                    .uri("/google/callback?state=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "MISSING_PARAM");
    }

    #[tokio::test]
    async fn test_status_with_and_without_session() {
        let manager = AuthManager::for_test(true);
        let user = UserInfo {
            sub: "g-42".to_string(),
            email: Some("me@example.com".to_string()),
            name: None,
        };
        let (jwt, _) = manager.issue_session(&user, "ya29", Some(3600)).unwrap();
        let router = app(manager, true);

        let anonymous = router
            .clone()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(anonymous).await;
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["auth_enabled"], true);

        let signed_in = router
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE_NAME, jwt))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(signed_in).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["id"], "g-42");
        assert_eq!(body["user"]["email"], "me@example.com");
    }

    #[tokio::test]
    async fn test_status_when_auth_disabled() {
        let response = app(AuthManager::for_test(false), false)
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["auth_enabled"], false);
        assert_eq!(body["user"]["id"], LOCAL_USER_ID);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = app(AuthManager::for_test(true), false)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, format!("{}=x", SESSION_COOKIE_NAME))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(SESSION_COOKIE_NAME));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
