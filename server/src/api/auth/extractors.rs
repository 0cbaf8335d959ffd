//! Handler extractor for the authenticated identity

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::context::AuthContext;
use crate::api::types::ApiError;

/// Rejection when `require_auth` did not run for the route
#[derive(Debug)]
pub enum AuthRejection {
    MissingContext,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

/// Authenticated caller
///
/// ```ignore
/// async fn list_sites(auth: Auth) -> Result<Json<Vec<SiteRow>>, ApiError> {
///     let user_id = auth.user_id();
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Auth {
    pub ctx: AuthContext,
}

impl Auth {
    pub fn user_id(&self) -> &str {
        self.ctx.user_id()
    }

    pub fn access_token(&self) -> &str {
        self.ctx.access_token()
    }
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthRejection::MissingContext)?;

        Ok(Self { ctx })
    }
}
