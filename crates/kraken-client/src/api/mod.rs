//! Twitch Kraken v5 REST API client.
//!
//! Provides typed access to the v5 endpoints with automatic
//! `Client-ID` + versioned `Accept` header injection. Exactly one
//! HTTP request is issued per call; there are no retries.

mod channels;
mod request;
mod streams;

pub mod models;

pub use models::{
    BroadcastType, Channel, FeaturedStream, Follower, FollowersPage, SortDirection, Stream,
    StreamSummary, StreamType, StreamsPage, Team, User, UsersPage, Video, VideosPage,
};
pub use request::{RequestOptions, comma_list};

use crate::config;

const KRAKEN_BASE: &str = "https://api.twitch.tv/kraken";

/// Versioned vendor media type selecting the v5 API.
const ACCEPT_V5: &str = "application/vnd.twitchtv.v5+json";

/// Kraken v5 API client.
pub struct ApiClient {
    http: reqwest::Client,
    client_id: String,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the given `Client-ID`, falling back to the
    /// `TWITCH_TOKEN` environment variable when `None`.
    pub fn new(client_id: Option<String>) -> Self {
        Self::with_base_url(client_id, KRAKEN_BASE)
    }

    /// Same as [`ApiClient::new`] but against a different API origin.
    pub fn with_base_url(client_id: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config::resolve_client_id(client_id),
            base_url: base_url.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}
