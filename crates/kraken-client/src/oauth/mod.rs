//! OAuth authorization-code coordinator.
//!
//! Owns the local callback server (`/auth` redirect + `/token` code
//! exchange), the single-use CSRF state token, and the session's
//! credentials. One coordinator instance serves one authorization flow
//! at a time; hitting `/auth` again invalidates the pending flow.

mod server;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::automation::{self, BrowserDriver, CookieJar, LoginContext};
use crate::config::{self, AutomationOptions, OauthOptions};
use crate::{ApiErrorBody, Credentials, KrakenError};

const OAUTH_AUTHORIZE_URL: &str = "https://api.twitch.tv/kraken/oauth2/authorize";
const OAUTH_TOKEN_URL: &str = "https://api.twitch.tv/kraken/oauth2/token";

/// Coordinates the three-legged authorization-code exchange.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

pub(crate) struct CoordinatorInner {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    port: u16,
    scope: Mutex<String>,
    automation: Option<AutomationOptions>,
    authorize_url: String,
    token_url: String,
    http: reqwest::Client,
    start_lock: tokio::sync::Mutex<()>,
    bound: Mutex<Option<SocketAddr>>,
    pending_state: Mutex<Option<String>>,
    credentials: Mutex<Option<Credentials>>,
    authenticated: AtomicBool,
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Create a coordinator against the production OAuth endpoints.
    ///
    /// `client_id` falls back to `TWITCH_TOKEN`; the remaining options
    /// fall back to their own environment variables.
    pub fn new(client_id: Option<String>, options: OauthOptions) -> Self {
        Self::with_endpoints(client_id, options, OAUTH_AUTHORIZE_URL, OAUTH_TOKEN_URL)
    }

    /// Same as [`Coordinator::new`] but against different provider endpoints.
    pub fn with_endpoints(
        client_id: Option<String>,
        options: OauthOptions,
        authorize_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        let resolved = options.resolve();
        Self {
            inner: Arc::new(CoordinatorInner {
                client_id: config::resolve_client_id(client_id),
                client_secret: resolved.client_secret,
                redirect_url: resolved.redirect_url,
                port: resolved.port,
                scope: Mutex::new(resolved.scope),
                automation: resolved.automation,
                authorize_url: authorize_url.into(),
                token_url: token_url.into(),
                http: reqwest::Client::new(),
                start_lock: tokio::sync::Mutex::new(()),
                bound: Mutex::new(None),
                pending_state: Mutex::new(None),
                credentials: Mutex::new(None),
                authenticated: AtomicBool::new(false),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Bind and serve the local callback server.
    ///
    /// Idempotent per instance: a second call is a no-op returning the
    /// address of the already-listening socket.
    pub async fn start_server(&self) -> Result<SocketAddr, KrakenError> {
        let _guard = self.inner.start_lock.lock().await;
        if let Some(addr) = *self.inner.bound.lock().unwrap() {
            return Ok(addr);
        }

        let listener =
            tokio::net::TcpListener::bind(("127.0.0.1", self.inner.port)).await?;
        let addr = listener.local_addr()?;

        let app = server::router(self.inner.clone());
        let shutdown = self.inner.shutdown.clone();
        tokio::spawn(async move {
            let serve = axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "oauth callback server terminated");
            }
        });

        *self.inner.bound.lock().unwrap() = Some(addr);
        tracing::debug!(%addr, "oauth callback server listening");
        Ok(addr)
    }

    /// Whether the callback server is up.
    pub fn is_server_up(&self) -> bool {
        self.inner.bound.lock().unwrap().is_some()
    }

    /// Address the callback server is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.inner.bound.lock().unwrap()
    }

    /// Stop the callback server, if running.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    /// Inject externally obtained credentials and mark the session
    /// authenticated, bypassing the flow entirely.
    pub fn set_credentials(&self, data: Credentials) {
        self.inner.store_credentials(data);
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.credentials.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.authenticated.load(Ordering::SeqCst)
    }

    /// Automation settings, for driver adapters that honor the proxy
    /// and visibility options.
    pub fn automation(&self) -> Option<&AutomationOptions> {
        self.inner.automation.as_ref()
    }

    /// Drive a scripted-browser login end to end and store the
    /// resulting credentials.
    pub async fn auto_authenticate<D: BrowserDriver>(
        &self,
        driver: D,
    ) -> Result<Credentials, KrakenError> {
        let automation = match &self.inner.automation {
            Some(a) if a.is_usable() => a.clone(),
            _ => return Err(KrakenError::AutomationNotConfigured),
        };

        let addr = self.start_server().await?;
        let ctx = LoginContext {
            auth_url: format!("http://localhost:{}/auth", addr.port()),
            username: automation.username,
            password: automation.password,
            show: automation.show,
            jar: CookieJar::new(CookieJar::DEFAULT_PATH),
        };

        let credentials = automation::run_login(driver, &ctx).await?;
        self.inner.store_credentials(credentials.clone());
        Ok(credentials)
    }
}

impl CoordinatorInner {
    fn store_credentials(&self, data: Credentials) {
        *self.credentials.lock().unwrap() = Some(data);
        self.authenticated.store(true, Ordering::SeqCst);
    }

    /// Mint a fresh CSRF state token, replacing (and so invalidating)
    /// any pending one.
    fn issue_state(&self) -> String {
        let state = Uuid::new_v4().to_string();
        *self.pending_state.lock().unwrap() = Some(state.clone());
        state
    }

    /// Consume the pending state token when it matches; a mismatch
    /// leaves the pending token in place.
    fn take_state_if(&self, presented: &str) -> bool {
        let mut slot = self.pending_state.lock().unwrap();
        if slot.as_deref() == Some(presented) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Build the provider authorize redirect for a fresh state token.
    ///
    /// A `scope` query on `/auth` overwrites the configured scope.
    /// Automation always re-prompts for authorization; manual flows
    /// follow the configured `verify` flag.
    fn authorize_redirect(&self, scope_override: Option<&str>) -> Result<String, KrakenError> {
        let state = self.issue_state();

        let scope = {
            let mut slot = self.scope.lock().unwrap();
            if let Some(scope) = scope_override {
                *slot = scope.to_string();
            }
            slot.clone()
        };

        let force_verify = self
            .automation
            .as_ref()
            .is_some_and(|a| a.verify || a.is_usable());

        let mut url = Url::parse(&self.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("scope", &scope)
            .append_pair("state", &state)
            .append_pair("force_verify", if force_verify { "true" } else { "false" });
        Ok(url.to_string())
    }

    /// Exchange an authorization code for credentials.
    async fn exchange_code(&self, code: &str, state: &str) -> Result<Credentials, KrakenError> {
        tracing::debug!("getting token from twitch");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_url.as_str()),
            ("code", code),
            ("state", state),
        ];

        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status != reqwest::StatusCode::OK {
            let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_else(|_| {
                ApiErrorBody {
                    error: status.canonical_reason().unwrap_or("unknown").to_string(),
                    status: status.as_u16(),
                    message: body.clone(),
                }
            });
            tracing::debug!(error = %parsed.error, message = %parsed.message, "token exchange failed");
            return Err(KrakenError::Api(parsed));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
