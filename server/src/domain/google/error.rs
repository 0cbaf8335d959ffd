use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("Google API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("No Google access token in session")]
    MissingToken,

    #[error("Google client configuration error: {0}")]
    Config(String),
}

impl GoogleError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// Pull a readable message out of a Google error body
///
/// API errors look like `{"error": {"code": 403, "message": "..."}}`; the OAuth
/// token endpoint answers `{"error": "invalid_grant", "error_description": "..."}`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
        if let Some(description) = value["error_description"].as_str() {
            return description.to_string();
        }
        if let Some(code) = value["error"].as_str() {
            return code.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {}", status)
    } else {
        trimmed.chars().take(200).collect()
    }
}
