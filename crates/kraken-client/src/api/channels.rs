use super::models::{TeamsEnvelope, UsersEnvelope};
use super::request::query_or_empty;
use super::*;
use crate::{Credentials, KrakenError};

impl ApiClient {
    /// Get a channel by user id. No scope required.
    pub async fn get_channel_by_id(&self, user_id: u64) -> Result<Channel, KrakenError> {
        tracing::debug!(user_id, "getting channel by id");
        let body = self.get(&format!("/channels/{user_id}")).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get user records for the given login names.
    pub async fn get_channels_by_username(
        &self,
        users: &[&str],
    ) -> Result<UsersPage, KrakenError> {
        tracing::debug!(count = users.len(), "getting channels by username");
        let mut query = RequestOptions::new();
        if let Some(list) = comma_list(users) {
            query = query.set("login", list);
        }
        let body = self
            .get(&format!("/users{}", query.to_query_string()))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get one page of a channel's followers.
    ///
    /// Pass the page's [`FollowersPage::next_cursor`] back through
    /// [`RequestOptions::with_cursor`] to fetch the following page.
    pub async fn get_channel_followers(
        &self,
        user_id: u64,
        options: Option<&RequestOptions>,
    ) -> Result<FollowersPage, KrakenError> {
        tracing::debug!(user_id, "getting channel followers");
        let body = self
            .get(&format!(
                "/channels/{user_id}/follows{}",
                query_or_empty(options)
            ))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the teams a channel belongs to.
    pub async fn get_channel_teams(&self, user_id: u64) -> Result<Vec<Team>, KrakenError> {
        tracing::debug!(user_id, "getting channel teams");
        let body = self.get(&format!("/channels/{user_id}/teams")).await?;
        let envelope: TeamsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.teams)
    }

    /// Get a channel's videos.
    pub async fn get_channel_videos(
        &self,
        user_id: u64,
        options: Option<&RequestOptions>,
    ) -> Result<VideosPage, KrakenError> {
        tracing::debug!(user_id, "getting channel videos");
        let body = self
            .get(&format!(
                "/channels/{user_id}/videos{}",
                query_or_empty(options)
            ))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get a channel's editors. Requires the `channel_read` scope.
    pub async fn get_channel_editors(
        &self,
        user_id: u64,
        credentials: &Credentials,
    ) -> Result<Vec<User>, KrakenError> {
        tracing::debug!(user_id, "getting channel editors");

        if !credentials.has_scope("channel_read") {
            return Err(KrakenError::InsufficientScope("channel_read"));
        }

        let body = self
            .get_authenticated(&format!("/channels/{user_id}/editors"), credentials)
            .await?;
        let envelope: UsersEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.users)
    }

    /// The community endpoint was removed upstream; always rejects
    /// without touching the network.
    pub async fn get_channel_community(&self, _user_id: u64) -> Result<(), KrakenError> {
        Err(KrakenError::Deprecated("GET /channels/{id}/community"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn community_endpoint_always_rejects() {
        // Unroutable base URL: any network attempt would fail differently.
        let client = ApiClient::with_base_url(Some("cid".into()), "http://0.0.0.0:0");

        let err = client.get_channel_community(23161357).await.unwrap_err();
        assert!(matches!(err, KrakenError::Deprecated(_)));
    }

    #[test]
    fn users_envelope_unwraps() {
        let body = r#"{"users": [{"_id": "1", "name": "alice"}, {"_id": "2", "name": "bob"}]}"#;
        let envelope: UsersEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.users.len(), 2);
        assert_eq!(envelope.users[1].name, "bob");
    }

    #[tokio::test]
    async fn editors_require_channel_read_scope() {
        let client = ApiClient::with_base_url(Some("cid".into()), "http://0.0.0.0:0");
        let creds = Credentials {
            access_token: "abc".into(),
            refresh_token: String::new(),
            scope: vec!["user_read".into()],
        };

        let err = client.get_channel_editors(1, &creds).await.unwrap_err();
        assert!(matches!(err, KrakenError::InsufficientScope("channel_read")));
    }
}
