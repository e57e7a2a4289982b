//! Twitch Kraken (v5) client library.
//!
//! Provides a typed REST client for the v5 API, an OAuth
//! authorization-code coordinator with a local callback server,
//! and a scripted-browser login protocol for automated token grabs.

pub mod api;
pub mod automation;
pub mod client;
pub mod config;
pub mod oauth;

use serde::{Deserialize, Serialize};

pub use client::Client;

/// Access/refresh token pair handed out by the token exchange.
///
/// The caller is responsible for persisting this if it wants to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: Vec<String>,
}

impl Credentials {
    /// Whether the token was granted the given scope.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}

/// Error body returned by the v5 API on non-200 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

/// Unified error type for the kraken-client crate.
#[derive(Debug, thiserror::Error)]
pub enum KrakenError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Twitch API error '{}' (status {}): {}", .0.error, .0.status, .0.message)]
    Api(ApiErrorBody),

    #[error("{0}")]
    Validation(&'static str),

    #[error("deprecated endpoint: {0}")]
    Deprecated(&'static str),

    #[error("insufficient scope access, '{0}' required")]
    InsufficientScope(&'static str),

    #[error("Code was not set or state invalid")]
    StateMismatch,

    #[error("OAuth is not configured on this client")]
    OauthNotConfigured,

    #[error("automation options with a username and password are required")]
    AutomationNotConfigured,

    #[error("captcha challenge present; enable `show` to solve it manually or use a proxy")]
    CaptchaBlocked,

    #[error("captcha was not solved within the allotted time")]
    CaptchaTimeout,

    #[error("automation failed: {0}")]
    Automation(String),

    #[error("cookie jar error: {0}")]
    CookieJar(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_scope_lookup() {
        let creds = Credentials {
            access_token: "abc".into(),
            refresh_token: "def".into(),
            scope: vec!["user_read".into(), "channel_read".into()],
        };

        assert!(creds.has_scope("channel_read"));
        assert!(!creds.has_scope("channel_editor"));
    }

    #[test]
    fn credentials_deserialize_without_refresh_token() {
        let creds: Credentials =
            serde_json::from_str(r#"{"access_token":"abc","scope":["user_read"]}"#).unwrap();

        assert_eq!(creds.access_token, "abc");
        assert!(creds.refresh_token.is_empty());
        assert!(creds.has_scope("user_read"));
    }

    #[test]
    fn api_error_body_display() {
        let err = KrakenError::Api(ApiErrorBody {
            error: "Not Found".into(),
            status: 404,
            message: "Channel does not exist".into(),
        });

        let text = err.to_string();
        assert!(text.contains("Not Found"));
        assert!(text.contains("404"));
    }
}
