use super::models::{FeaturedEnvelope, StreamEnvelope};
use super::request::query_or_empty;
use super::*;
use crate::KrakenError;

impl ApiClient {
    /// Get the live stream for a user id. `None` when the channel is offline.
    pub async fn get_stream_by_user(
        &self,
        user_id: u64,
        options: Option<&RequestOptions>,
    ) -> Result<Option<Stream>, KrakenError> {
        tracing::debug!(user_id, "getting stream by user id");
        let body = self
            .get(&format!("/streams/{user_id}{}", query_or_empty(options)))
            .await?;
        let envelope: StreamEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.stream)
    }

    /// Get streams for several user ids at once.
    pub async fn get_streams_by_users(
        &self,
        user_ids: &[u64],
        options: Option<&RequestOptions>,
    ) -> Result<StreamsPage, KrakenError> {
        tracing::debug!(count = user_ids.len(), "getting streams by user list");

        let mut query = RequestOptions::new();
        if let Some(list) = comma_list(user_ids) {
            query = query.set("channel", list);
        }
        if let Some(options) = options {
            query = query.extend(options);
        }

        let body = self
            .get(&format!("/streams/{}", query.to_query_string()))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get streams filtered by game, language or stream type.
    ///
    /// The upstream API requires at least one filter, so an empty set is
    /// rejected locally before any request is made.
    pub async fn get_streams(&self, filter: &RequestOptions) -> Result<StreamsPage, KrakenError> {
        tracing::debug!("getting streams");

        if filter.is_empty() {
            return Err(KrakenError::Validation(
                "need at least one parameter to filter streams by",
            ));
        }

        let body = self
            .get(&format!("/streams/{}", filter.to_query_string()))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the featured streams list.
    pub async fn get_featured_streams(
        &self,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<FeaturedStream>, KrakenError> {
        tracing::debug!("getting featured streams");
        let body = self
            .get(&format!("/streams/featured{}", query_or_empty(options)))
            .await?;
        let envelope: FeaturedEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.featured)
    }

    /// Get the viewer/channel totals, overall or for one game.
    pub async fn get_stream_summary(
        &self,
        options: Option<&RequestOptions>,
    ) -> Result<StreamSummary, KrakenError> {
        tracing::debug!("getting stream summary");
        let body = self
            .get(&format!("/streams/summary{}", query_or_empty(options)))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
