//! Per-request authentication context

use crate::core::constants::LOCAL_USER_ID;

/// Identity attached to a request by `require_auth`
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Google user with a valid session cookie
    Session {
        user_id: String,
        access_token: String,
        email: Option<String>,
        name: Option<String>,
    },
    /// Fixed local user (--no-auth mode); carries no Google token
    LocalDefault { user_id: String },
}

impl AuthContext {
    pub fn local() -> Self {
        Self::LocalDefault {
            user_id: LOCAL_USER_ID.to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Session { user_id, .. } | Self::LocalDefault { user_id } => user_id,
        }
    }

    /// Google access token; empty in local mode so fetchers fall back to zeros
    pub fn access_token(&self) -> &str {
        match self {
            Self::Session { access_token, .. } => access_token,
            Self::LocalDefault { .. } => "",
        }
    }

    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_context_has_no_token() {
        let ctx = AuthContext::local();
        assert_eq!(ctx.user_id(), LOCAL_USER_ID);
        assert_eq!(ctx.access_token(), "");
        assert!(!ctx.is_session());
    }

    #[test]
    fn test_session_context() {
        let ctx = AuthContext::Session {
            user_id: "u1".to_string(),
            access_token: "ya29".to_string(),
            email: None,
            name: None,
        };
        assert_eq!(ctx.user_id(), "u1");
        assert_eq!(ctx.access_token(), "ya29");
        assert!(ctx.is_session());
    }
}
