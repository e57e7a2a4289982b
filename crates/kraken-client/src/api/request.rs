use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use url::form_urlencoded;

use super::*;
use crate::{ApiErrorBody, Credentials, KrakenError};

/// Optional query parameters for an endpoint call.
///
/// Pairs keep their insertion order so built URLs are deterministic.
/// Values are percent-encoded when serialized; the upstream API decodes
/// them back to the same bytes the original raw interpolation produced.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pairs: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, coercing the value to its string form.
    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Copy of these options with `cursor` replaced by the given token.
    ///
    /// Fetching a followers page is a pure function of the original
    /// options plus the cursor the previous page returned.
    pub fn with_cursor(&self, cursor: &str) -> Self {
        let mut pairs: Vec<(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != "cursor")
            .cloned()
            .collect();
        pairs.push(("cursor".into(), cursor.into()));
        Self { pairs }
    }

    /// Append every pair of `other` after this set's own pairs.
    pub fn extend(mut self, other: &RequestOptions) -> Self {
        self.pairs.extend(other.pairs.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `""` when empty, otherwise `?k1=v1&k2=v2` in insertion order.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        format!("?{}", serializer.finish())
    }
}

/// Join identifiers with a single comma, preserving order.
///
/// Returns `None` for an empty list so callers can omit the parameter.
pub fn comma_list<T: ToString>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }

    Some(
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    )
}

pub(super) fn query_or_empty(options: Option<&RequestOptions>) -> String {
    options.map(RequestOptions::to_query_string).unwrap_or_default()
}

impl ApiClient {
    fn headers(&self, credentials: Option<&Credentials>) -> Result<HeaderMap, KrakenError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V5));
        headers.insert(
            "Client-ID",
            HeaderValue::from_str(&self.client_id)
                .map_err(|_| KrakenError::Validation("client id is not a valid header value"))?,
        );
        if let Some(creds) = credentials {
            let value = format!("OAuth {}", creds.access_token);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value).map_err(|_| {
                    KrakenError::Validation("access token is not a valid header value")
                })?,
            );
        }
        Ok(headers)
    }

    async fn execute(
        &self,
        path: &str,
        credentials: Option<&Credentials>,
    ) -> Result<String, KrakenError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "calling api");

        let headers = self.headers(credentials)?;
        let resp = self.http.get(&url).headers(headers).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status != reqwest::StatusCode::OK {
            let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_else(|_| {
                // Body was not the documented JSON error shape; keep what we got.
                ApiErrorBody {
                    error: status.canonical_reason().unwrap_or("unknown").to_string(),
                    status: status.as_u16(),
                    message: body.clone(),
                }
            });
            tracing::debug!(error = %parsed.error, message = %parsed.message, "twitch error");
            return Err(KrakenError::Api(parsed));
        }

        Ok(body)
    }

    /// One GET against `base_url + path`, returning the raw 200 body.
    pub(super) async fn get(&self, path: &str) -> Result<String, KrakenError> {
        self.execute(path, None).await
    }

    /// Same as [`get`](Self::get) plus an `Authorization: OAuth` header.
    pub(super) async fn get_authenticated(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<String, KrakenError> {
        self.execute(path, Some(credentials)).await
    }

    /// Call the API without restrictions.
    pub async fn raw_api(
        &self,
        path: &str,
        options: Option<&RequestOptions>,
    ) -> Result<serde_json::Value, KrakenError> {
        let body = self
            .get(&format!("{}{}", path, query_or_empty(options)))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_yield_empty_query() {
        assert_eq!(RequestOptions::new().to_query_string(), "");
        assert_eq!(query_or_empty(None), "");
    }

    #[test]
    fn options_preserve_insertion_order() {
        let options = RequestOptions::new().set("a", 1).set("b", "x");
        assert_eq!(options.to_query_string(), "?a=1&b=x");
    }

    #[test]
    fn option_values_are_percent_encoded() {
        let options = RequestOptions::new().set("q", "a&b=c");
        assert_eq!(options.to_query_string(), "?q=a%26b%3Dc");
    }

    #[test]
    fn with_cursor_replaces_previous_token() {
        let original = RequestOptions::new().set("limit", 25).set("cursor", "old");
        let next = original.with_cursor("new");

        assert_eq!(next.to_query_string(), "?limit=25&cursor=new");
        // The original is untouched.
        assert_eq!(original.to_query_string(), "?limit=25&cursor=old");
    }

    #[test]
    fn comma_list_joins_in_order() {
        assert_eq!(
            comma_list(&["a", "b", "c"]).as_deref(),
            Some("a,b,c")
        );
        assert_eq!(comma_list(&[23161357u64, 27446517]).as_deref(), Some("23161357,27446517"));
    }

    #[test]
    fn comma_list_is_none_when_empty() {
        assert_eq!(comma_list::<String>(&[]), None);
    }
}
