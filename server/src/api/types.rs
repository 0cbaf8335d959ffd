//! Shared API types
//!
//! Every 4xx/5xx response carries the same `{error, code, message}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::DateRange;
use crate::domain::google::GoogleError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        tracing::error!(error = %e, "Data error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }

    /// Upstream report failure on a query path; the error text is passed through
    pub fn upstream(e: GoogleError) -> Self {
        tracing::warn!(error = %e, "Upstream report query failed");
        Self::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// `?range=` query shared by the report endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// `7d`, `28d` (default) or `90d`
    pub range: Option<String>,
}

impl RangeQuery {
    pub fn date_range(&self) -> Result<DateRange, ApiError> {
        parse_range(self.range.as_deref())
    }
}

pub fn parse_range(token: Option<&str>) -> Result<DateRange, ApiError> {
    DateRange::from_query(token).map_err(|e| ApiError::bad_request("INVALID_RANGE", e.to_string()))
}

/// Error body documented in the OpenAPI schema
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let response = ApiError::bad_request("MISSING_PARAM", "site param required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["code"], "MISSING_PARAM");
        assert_eq!(body["message"], "site param required");
    }

    #[tokio::test]
    async fn test_upstream_keeps_error_text() {
        let response = ApiError::upstream(GoogleError::api(403, "User does not have access")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL");
        assert!(body["message"].as_str().unwrap().contains("User does not have access"));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(None).unwrap(), DateRange::Last28Days);
        assert_eq!(parse_range(Some("7d")).unwrap(), DateRange::Last7Days);
        assert!(matches!(
            parse_range(Some("1y")),
            Err(ApiError::BadRequest { code, .. }) if code == "INVALID_RANGE"
        ));
    }
}
