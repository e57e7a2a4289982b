//! Client and OAuth configuration.
//!
//! Every knob can come from an explicit option or from the environment;
//! an explicit option always wins over its environment variable.

pub const ENV_CLIENT_ID: &str = "TWITCH_TOKEN";
pub const ENV_CLIENT_SECRET: &str = "TWITCH_SECRET";
pub const ENV_REDIRECT_URL: &str = "TWITCH_URL";
pub const ENV_PORT: &str = "TWITCH_PORT";
pub const ENV_SCOPE: &str = "TWITCH_SCOPE";

/// Default port for the local OAuth callback server.
pub const DEFAULT_PORT: u16 = 3156;

/// Top-level client options.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// API `Client-ID`. May differ from the OAuth client id.
    pub client_id: Option<String>,
    pub oauth: Option<OauthOptions>,
}

/// OAuth coordinator options.
#[derive(Debug, Clone, Default)]
pub struct OauthOptions {
    /// Redirect URL registered with the provider, e.g. `http://localhost:3156/token`.
    pub redirect_url: Option<String>,
    /// Local callback server port.
    pub port: Option<u16>,
    /// Space-separated scope string requested on `/auth`.
    pub scope: Option<String>,
    pub client_secret: Option<String>,
    pub automation: Option<AutomationOptions>,
}

/// Scripted-browser login options.
#[derive(Debug, Clone, Default)]
pub struct AutomationOptions {
    pub username: String,
    pub password: String,
    /// Show the browser window. Required to solve a captcha by hand.
    pub show: bool,
    /// Re-prompt the user for authorization (`force_verify`).
    pub verify: bool,
    pub proxy: Option<ProxyOptions>,
}

impl AutomationOptions {
    /// Username and password are both needed to drive the login form.
    pub fn is_usable(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Proxy settings handed to the browser-automation adapter.
#[derive(Debug, Clone, Default)]
pub struct ProxyOptions {
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// OAuth options with every fallback applied.
#[derive(Debug, Clone)]
pub struct ResolvedOauth {
    pub redirect_url: String,
    pub port: u16,
    pub scope: String,
    pub client_secret: String,
    pub automation: Option<AutomationOptions>,
}

pub(crate) fn resolve_client_id(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var(ENV_CLIENT_ID).ok())
        .unwrap_or_default()
}

impl OauthOptions {
    pub(crate) fn resolve(self) -> ResolvedOauth {
        let port = self
            .port
            .or_else(|| std::env::var(ENV_PORT).ok().and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        ResolvedOauth {
            redirect_url: self
                .redirect_url
                .or_else(|| std::env::var(ENV_REDIRECT_URL).ok())
                .unwrap_or_default(),
            port,
            scope: self
                .scope
                .or_else(|| std::env::var(ENV_SCOPE).ok())
                .unwrap_or_default(),
            client_secret: self
                .client_secret
                .or_else(|| std::env::var(ENV_CLIENT_SECRET).ok())
                .unwrap_or_default(),
            automation: self.automation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_client_id_wins() {
        let id = resolve_client_id(Some("explicit".into()));
        assert_eq!(id, "explicit");
    }

    #[test]
    fn oauth_defaults_apply() {
        let resolved = OauthOptions {
            redirect_url: Some("http://localhost:3156/token".into()),
            client_secret: Some("s3cret".into()),
            ..Default::default()
        }
        .resolve();

        assert_eq!(resolved.port, DEFAULT_PORT);
        assert_eq!(resolved.scope, "");
        assert_eq!(resolved.client_secret, "s3cret");
    }

    #[test]
    fn explicit_port_wins_over_env() {
        // SAFETY: test-only process env mutation, variable unique to this test.
        unsafe { std::env::set_var(ENV_PORT, "9999") };
        let resolved = OauthOptions {
            port: Some(4000),
            ..Default::default()
        }
        .resolve();
        unsafe { std::env::remove_var(ENV_PORT) };

        assert_eq!(resolved.port, 4000);
    }

    #[test]
    fn automation_usability_requires_both_fields() {
        let mut auto = AutomationOptions {
            username: "user".into(),
            ..Default::default()
        };
        assert!(!auto.is_usable());

        auto.password = "hunter2".into();
        assert!(auto.is_usable());
    }
}
