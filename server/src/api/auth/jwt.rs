//! JWT session token handling
//!
//! The session carries the Google access token so report calls can be made
//! without storing credentials server-side.

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::constants::{AUTH_METHOD_GOOGLE, DEFAULT_SESSION_TTL_DAYS};
use crate::domain::google::UserInfo;

/// JWT validation error
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Session token has expired")]
    Expired,
    #[error("Invalid session token signature")]
    InvalidSignature,
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Google subject, used as the user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub access_token: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub auth_method: String,
}

/// Session lifetime in seconds, capped by the upstream token lifetime
pub fn session_ttl_secs(expires_in: Option<i64>) -> i64 {
    let max = Duration::days(DEFAULT_SESSION_TTL_DAYS as i64).num_seconds();
    match expires_in {
        Some(secs) if secs > 0 => secs.min(max),
        _ => max,
    }
}

impl SessionClaims {
    pub fn new(user: &UserInfo, access_token: &str, expires_in: Option<i64>) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: user.sub.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            access_token: access_token.to_string(),
            iat: now,
            exp: now + session_ttl_secs(expires_in),
            jti: Uuid::new_v4().to_string(),
            auth_method: AUTH_METHOD_GOOGLE.to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Sign session claims
pub fn create_session_token(signing_key: &[u8], claims: &SessionClaims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a JWT session token
pub fn validate_session_token(token: &str, signing_key: &[u8]) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<SessionClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}
