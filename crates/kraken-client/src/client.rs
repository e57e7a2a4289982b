//! Top-level client: the API client plus an optional OAuth coordinator.

use crate::api::ApiClient;
use crate::automation::BrowserDriver;
use crate::config::ClientOptions;
use crate::oauth::Coordinator;
use crate::{Credentials, KrakenError};

/// Twitch client entry point.
///
/// Endpoint methods live on [`Client::api`]; authentication state, when
/// OAuth options were supplied, lives on [`Client::oauth`].
pub struct Client {
    api: ApiClient,
    oauth: Option<Coordinator>,
}

impl Client {
    pub fn new(options: ClientOptions) -> Self {
        let api = ApiClient::new(options.client_id.clone());
        let oauth = options
            .oauth
            .map(|oauth| Coordinator::new(options.client_id, oauth));
        Self { api, oauth }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn oauth(&self) -> Option<&Coordinator> {
        self.oauth.as_ref()
    }

    /// Inject externally obtained credentials and mark the session
    /// authenticated.
    pub fn set_credentials(&self, data: Credentials) -> Result<(), KrakenError> {
        let oauth = self.oauth.as_ref().ok_or(KrakenError::OauthNotConfigured)?;
        oauth.set_credentials(data);
        Ok(())
    }

    /// Run the scripted-browser login via the coordinator.
    pub async fn auto_authenticate<D: BrowserDriver>(
        &self,
        driver: D,
    ) -> Result<Credentials, KrakenError> {
        let oauth = self.oauth.as_ref().ok_or(KrakenError::OauthNotConfigured)?;
        oauth.auto_authenticate(driver).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.oauth
            .as_ref()
            .is_some_and(Coordinator::is_authenticated)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.oauth.as_ref().and_then(Coordinator::credentials)
    }
}
