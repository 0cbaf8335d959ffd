//! Google OAuth 2.0 authorization-code flow

use super::client::{build_http_client, send_json};
use super::error::GoogleError;
use super::types::{TokenResponse, UserInfo};
use crate::core::config::GoogleConfig;
use crate::core::constants::{
    GOOGLE_AUTH_URL, GOOGLE_SCOPES, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL,
};

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleOAuth {
    pub fn new(config: &GoogleConfig) -> Result<Self, GoogleError> {
        if !config.has_oauth_client() {
            return Err(GoogleError::Config(
                "client_id, client_secret and redirect_url are required".to_string(),
            ));
        }
        Ok(Self {
            http: build_http_client(config.request_timeout_secs)?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
        })
    }

    /// Consent screen URL carrying the CSRF `state`
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = GOOGLE_SCOPES.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ];
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", GOOGLE_AUTH_URL, query)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];
        send_json(self.http.post(GOOGLE_TOKEN_URL).form(&form)).await
    }

    pub async fn user_info(&self, access_token: &str) -> Result<UserInfo, GoogleError> {
        send_json(self.http.get(GOOGLE_USERINFO_URL).bearer_auth(access_token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "shh".to_string(),
            redirect_url: "http://localhost:5410/api/v1/auth/google/callback".to_string(),
            search_console_base_url: String::new(),
            analytics_base_url: String::new(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_authorization_url() {
        let oauth = GoogleOAuth::new(&config()).unwrap();
        let url = oauth.authorization_url("abc123");
        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A5410%2Fapi%2Fv1%2Fauth%2Fgoogle%2Fcallback"
        ));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("webmasters.readonly"));
        assert!(url.contains("analytics.readonly"));
        assert!(!url.contains("shh"));
    }

    #[test]
    fn test_requires_client_credentials() {
        let mut config = config();
        config.client_secret.clear();
        assert!(matches!(
            GoogleOAuth::new(&config),
            Err(GoogleError::Config(_))
        ));
    }
}
