//! Authentication manager

use anyhow::Result;

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::SecretManager;
use crate::domain::google::UserInfo;

/// Issues and validates session tokens
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    enabled: bool,
}

impl AuthManager {
    pub fn new(secrets: &SecretManager, enabled: bool) -> Self {
        if enabled {
            tracing::debug!(key_source = secrets.backend().name(), "Authentication enabled");
        } else {
            tracing::warn!("Authentication DISABLED");
        }

        Self {
            signing_key: secrets.signing_key().to_vec(),
            enabled,
        }
    }

    #[cfg(test)]
    pub fn for_test(enabled: bool) -> Self {
        Self {
            signing_key: vec![42u8; 32],
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sign a new session for a Google user
    pub fn issue_session(
        &self,
        user: &UserInfo,
        access_token: &str,
        expires_in: Option<i64>,
    ) -> Result<(String, SessionClaims)> {
        let claims = SessionClaims::new(user, access_token, expires_in);
        let token = create_session_token(&self.signing_key, &claims)?;
        Ok((token, claims))
    }

    /// Validate a JWT session token
    pub fn validate_session(&self, jwt: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(jwt, &self.signing_key)
    }
}
