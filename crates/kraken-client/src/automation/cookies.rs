use std::path::PathBuf;

use crate::KrakenError;

/// JSON cookie file used to skip the login captcha on repeat runs.
///
/// Read before an automated login, rewritten after a successful one.
/// The file is not locked; concurrent automated logins against the
/// same path are unsupported.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub const DEFAULT_PATH: &'static str = "cookies.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load persisted cookies.
    ///
    /// A missing file is not an error: an empty jar is written in its
    /// place and `None` is returned. An unreadable or non-object file
    /// is a [`KrakenError::CookieJar`].
    pub async fn load(&self) -> Result<Option<serde_json::Value>, KrakenError> {
        if !tokio::fs::try_exists(&self.path).await? {
            tokio::fs::write(&self.path, "{}").await?;
            tracing::debug!(path = %self.path.display(), "cookie file missing, wrote an empty one");
            return Ok(None);
        }

        let data = tokio::fs::read_to_string(&self.path).await?;
        let cookies: serde_json::Value = serde_json::from_str(&data)
            .map_err(|_| KrakenError::CookieJar("unable to parse cookies.json".into()))?;

        match cookies.as_object() {
            Some(map) if map.is_empty() => Ok(None),
            Some(_) => {
                tracing::debug!("found cookies");
                Ok(Some(cookies))
            }
            None => Err(KrakenError::CookieJar("invalid cookies".into())),
        }
    }

    /// Overwrite the jar with the current session cookies.
    pub async fn save(&self, cookies: &serde_json::Value) -> Result<(), KrakenError> {
        tracing::debug!(path = %self.path.display(), "writing cookies to file");
        tokio::fs::write(&self.path, serde_json::to_string(cookies)?).await?;
        Ok(())
    }
}
