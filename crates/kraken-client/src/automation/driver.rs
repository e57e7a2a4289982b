use std::time::Duration;

use crate::KrakenError;

/// Capability surface of a scripted browser.
///
/// The login protocol in [`run_login`](super::run_login) is written
/// against this interface; an adapter over any headless-browser driver
/// implements it. Adapter failures are reported as
/// [`KrakenError::Automation`].
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), KrakenError>;

    /// Install previously persisted cookies into the browser session.
    async fn set_cookies(&mut self, cookies: &serde_json::Value) -> Result<(), KrakenError>;

    /// Current session cookies, as a JSON object.
    async fn cookies(&mut self) -> Result<serde_json::Value, KrakenError>;

    async fn exists(&mut self, selector: &str) -> Result<bool, KrakenError>;

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), KrakenError>;

    async fn click(&mut self, selector: &str) -> Result<(), KrakenError>;

    /// Wait until the selector appears. `false` on timeout.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, KrakenError>;

    async fn read_text(&mut self, selector: &str) -> Result<String, KrakenError>;

    /// Tear the browser session down.
    async fn end(&mut self) -> Result<(), KrakenError>;
}

/// Driver that fails every operation; for exercising paths that must
/// not reach the browser.
#[cfg(test)]
pub(crate) struct NoopDriver;

#[cfg(test)]
impl BrowserDriver for NoopDriver {
    async fn navigate(&mut self, _url: &str) -> Result<(), KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn set_cookies(&mut self, _cookies: &serde_json::Value) -> Result<(), KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn cookies(&mut self) -> Result<serde_json::Value, KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn exists(&mut self, _selector: &str) -> Result<bool, KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn fill(&mut self, _selector: &str, _value: &str) -> Result<(), KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn click(&mut self, _selector: &str) -> Result<(), KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn wait_for(
        &mut self,
        _selector: &str,
        _timeout: Duration,
    ) -> Result<bool, KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn read_text(&mut self, _selector: &str) -> Result<String, KrakenError> {
        Err(KrakenError::Automation("noop driver".into()))
    }

    async fn end(&mut self) -> Result<(), KrakenError> {
        Ok(())
    }
}
