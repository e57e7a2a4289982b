//! Scripted-browser login protocol.
//!
//! Drives a [`BrowserDriver`] through the provider's login form to
//! complete an authorization flow without a human, including the
//! captcha-detection branch and cookie persistence that skips the
//! captcha on repeat runs. The DOM specifics live in the driver
//! adapter; this module only sequences the protocol.

mod cookies;
mod driver;

use std::time::Duration;

use crate::{Credentials, KrakenError};

pub use cookies::CookieJar;
pub use driver::BrowserDriver;

#[cfg(test)]
pub(crate) use driver::NoopDriver;

const SEL_USERNAME: &str = r#"input[name="username"]"#;
const SEL_PASSWORD: &str = r#"input[name="password"]"#;
const SEL_CAPTCHA: &str = ".g-recaptcha";
const SEL_CAPTCHA_SOLVED: &str = r#"[aria-checked="true"]"#;
const SEL_SUBMIT: &str = "button";
const SEL_AUTHORIZE: &str = ".js-authorize";
const SEL_TOKEN_PAYLOAD: &str = "twitch-data";

/// Bound on the manual captcha solve.
const CAPTCHA_WAIT: Duration = Duration::from_secs(30);
/// Bound on ordinary page transitions.
const PAGE_WAIT: Duration = Duration::from_secs(30);

/// Everything the protocol needs besides the driver itself.
pub struct LoginContext {
    /// Local `/auth` URL of the coordinator's callback server.
    pub auth_url: String,
    pub username: String,
    pub password: String,
    /// Browser window is visible; required to hand a captcha to the user.
    pub show: bool,
    pub jar: CookieJar,
}

/// Run the login protocol to completion and return the parsed
/// credentials from the callback page.
pub async fn run_login<D: BrowserDriver>(
    mut driver: D,
    ctx: &LoginContext,
) -> Result<Credentials, KrakenError> {
    if let Some(cookies) = ctx.jar.load().await? {
        driver.set_cookies(&cookies).await?;
    }
    driver.navigate(&ctx.auth_url).await?;

    if driver.exists(SEL_USERNAME).await? {
        tracing::debug!("login form present, proceeding with login");
        login_through_form(&mut driver, ctx).await?;

        if driver.exists(SEL_AUTHORIZE).await? {
            tracing::debug!("authorize button present, clicking");
            driver.click(SEL_AUTHORIZE).await?;
        }
    } else {
        // No form: the provider-side session is already live.
        tracing::debug!("no login form, clicking authorize");
        if driver.wait_for(SEL_AUTHORIZE, PAGE_WAIT).await? {
            driver.click(SEL_AUTHORIZE).await?;
        }
    }

    finish(driver, ctx).await
}

/// Fill the credential fields and submit, handling the captcha branch.
async fn login_through_form<D: BrowserDriver>(
    driver: &mut D,
    ctx: &LoginContext,
) -> Result<(), KrakenError> {
    if driver.exists(SEL_CAPTCHA).await? {
        if !ctx.show {
            driver.end().await?;
            return Err(KrakenError::CaptchaBlocked);
        }

        tracing::debug!("captcha active, waiting for it to be solved");
        driver.fill(SEL_USERNAME, &ctx.username).await?;
        driver.fill(SEL_PASSWORD, &ctx.password).await?;

        if !driver.wait_for(SEL_CAPTCHA_SOLVED, CAPTCHA_WAIT).await? {
            driver.end().await?;
            return Err(KrakenError::CaptchaTimeout);
        }
    } else {
        driver.fill(SEL_USERNAME, &ctx.username).await?;
        driver.fill(SEL_PASSWORD, &ctx.password).await?;
    }

    driver.click(SEL_SUBMIT).await?;
    Ok(())
}

/// Read the token payload off the callback page, persist cookies and
/// end the session.
async fn finish<D: BrowserDriver>(
    mut driver: D,
    ctx: &LoginContext,
) -> Result<Credentials, KrakenError> {
    if !driver.wait_for(SEL_TOKEN_PAYLOAD, PAGE_WAIT).await? {
        driver.end().await?;
        return Err(KrakenError::Automation(
            "token payload did not appear on the callback page".into(),
        ));
    }

    let payload = driver.read_text(SEL_TOKEN_PAYLOAD).await?;
    let credentials: Credentials = serde_json::from_str(&payload)?;

    let cookies = driver.cookies().await?;
    ctx.jar.save(&cookies).await?;
    driver.end().await?;

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Scripted driver that records every operation.
    #[derive(Default)]
    struct MockDriver {
        present: HashSet<&'static str>,
        wait_overrides: HashMap<&'static str, bool>,
        text: HashMap<&'static str, String>,
        session_cookies: serde_json::Value,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl MockDriver {
        fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.log)
        }

        fn record(&self, entry: impl Into<String>) {
            self.log.lock().unwrap().push(entry.into());
        }
    }

    impl BrowserDriver for MockDriver {
        async fn navigate(&mut self, url: &str) -> Result<(), KrakenError> {
            self.record(format!("navigate {url}"));
            Ok(())
        }

        async fn set_cookies(&mut self, _cookies: &serde_json::Value) -> Result<(), KrakenError> {
            self.record("set_cookies");
            Ok(())
        }

        async fn cookies(&mut self) -> Result<serde_json::Value, KrakenError> {
            self.record("cookies");
            Ok(self.session_cookies.clone())
        }

        async fn exists(&mut self, selector: &str) -> Result<bool, KrakenError> {
            Ok(self.present.contains(selector))
        }

        async fn fill(&mut self, selector: &str, _value: &str) -> Result<(), KrakenError> {
            self.record(format!("fill {selector}"));
            Ok(())
        }

        async fn click(&mut self, selector: &str) -> Result<(), KrakenError> {
            self.record(format!("click {selector}"));
            Ok(())
        }

        async fn wait_for(
            &mut self,
            selector: &str,
            _timeout: Duration,
        ) -> Result<bool, KrakenError> {
            Ok(self
                .wait_overrides
                .get(selector)
                .copied()
                .unwrap_or_else(|| self.present.contains(selector)))
        }

        async fn read_text(&mut self, selector: &str) -> Result<String, KrakenError> {
            self.text
                .get(selector)
                .cloned()
                .ok_or_else(|| KrakenError::Automation(format!("no text at {selector}")))
        }

        async fn end(&mut self) -> Result<(), KrakenError> {
            self.record("end");
            Ok(())
        }
    }

    const PAYLOAD: &str = r#"{"access_token":"at","refresh_token":"rt","scope":["user_read"]}"#;

    fn test_ctx(dir: &tempfile::TempDir, show: bool) -> LoginContext {
        LoginContext {
            auth_url: "http://localhost:3156/auth".into(),
            username: "user".into(),
            password: "hunter2".into(),
            show,
            jar: CookieJar::new(dir.path().join("cookies.json")),
        }
    }

    #[tokio::test]
    async fn captcha_with_hidden_browser_aborts_before_filling() {
        let dir = tempfile::tempdir().unwrap();
        let driver = MockDriver {
            present: [SEL_USERNAME, SEL_CAPTCHA].into(),
            ..Default::default()
        };
        let log = driver.log_handle();

        let err = run_login(driver, &test_ctx(&dir, false)).await.unwrap_err();
        assert!(matches!(err, KrakenError::CaptchaBlocked));

        let log = log.lock().unwrap();
        assert!(!log.iter().any(|entry| entry.starts_with("fill")));
        assert_eq!(log.last().map(String::as_str), Some("end"));
    }

    #[tokio::test]
    async fn unsolved_captcha_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MockDriver {
            present: [SEL_USERNAME, SEL_CAPTCHA].into(),
            ..Default::default()
        };
        driver.wait_overrides.insert(SEL_CAPTCHA_SOLVED, false);
        let log = driver.log_handle();

        let err = run_login(driver, &test_ctx(&dir, true)).await.unwrap_err();
        assert!(matches!(err, KrakenError::CaptchaTimeout));

        // Credentials were pre-filled for the user before the wait.
        let log = log.lock().unwrap();
        assert!(log.contains(&format!("fill {SEL_USERNAME}")));
        assert!(log.contains(&format!("fill {SEL_PASSWORD}")));
    }

    #[tokio::test]
    async fn plain_login_submits_and_returns_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MockDriver {
            present: [SEL_USERNAME, SEL_AUTHORIZE, SEL_TOKEN_PAYLOAD].into(),
            session_cookies: serde_json::json!({"session": "abc"}),
            ..Default::default()
        };
        driver.text.insert(SEL_TOKEN_PAYLOAD, PAYLOAD.into());
        let log = driver.log_handle();

        let ctx = test_ctx(&dir, false);
        let credentials = run_login(driver, &ctx).await.unwrap();
        assert_eq!(credentials.access_token, "at");
        assert!(credentials.has_scope("user_read"));

        let log = log.lock().unwrap();
        let clicks: Vec<&str> = log
            .iter()
            .filter(|e| e.starts_with("click"))
            .map(String::as_str)
            .collect();
        assert_eq!(clicks, [format!("click {SEL_SUBMIT}"), format!("click {SEL_AUTHORIZE}")]);

        // Session cookies were persisted for the next run.
        let saved = ctx.jar.load().await.unwrap();
        assert_eq!(saved, Some(serde_json::json!({"session": "abc"})));
    }

    #[tokio::test]
    async fn live_session_skips_the_login_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MockDriver {
            present: [SEL_AUTHORIZE, SEL_TOKEN_PAYLOAD].into(),
            session_cookies: serde_json::json!({}),
            ..Default::default()
        };
        driver.text.insert(SEL_TOKEN_PAYLOAD, PAYLOAD.into());
        let log = driver.log_handle();

        let credentials = run_login(driver, &test_ctx(&dir, false)).await.unwrap();
        assert_eq!(credentials.refresh_token, "rt");

        let log = log.lock().unwrap();
        assert!(!log.iter().any(|entry| entry.starts_with("fill")));
        assert!(log.contains(&format!("click {SEL_AUTHORIZE}")));
    }

    #[tokio::test]
    async fn persisted_cookies_are_restored_before_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_ctx(&dir, false);
        ctx.jar
            .save(&serde_json::json!({"session": "prior"}))
            .await
            .unwrap();

        let mut driver = MockDriver {
            present: [SEL_AUTHORIZE, SEL_TOKEN_PAYLOAD].into(),
            session_cookies: serde_json::json!({"session": "prior"}),
            ..Default::default()
        };
        driver.text.insert(SEL_TOKEN_PAYLOAD, PAYLOAD.into());
        let log = driver.log_handle();

        run_login(driver, &ctx).await.unwrap();

        let log = log.lock().unwrap();
        let set_pos = log.iter().position(|e| e == "set_cookies").unwrap();
        let nav_pos = log.iter().position(|e| e.starts_with("navigate")).unwrap();
        assert!(set_pos < nav_pos);
    }
}
