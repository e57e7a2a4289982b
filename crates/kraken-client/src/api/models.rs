use serde::{Deserialize, Serialize};

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Desc => "desc",
            SortDirection::Asc => "asc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stream type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    Live,
    Playlist,
    All,
}

impl StreamType {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::Live => "live",
            StreamType::Playlist => "playlist",
            StreamType::All => "all",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video broadcast type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastType {
    Archive,
    Highlight,
    Upload,
}

impl BroadcastType {
    pub fn as_str(self) -> &'static str {
        match self {
            BroadcastType::Archive => "archive",
            BroadcastType::Highlight => "highlight",
            BroadcastType::Upload => "upload",
        }
    }
}

impl std::fmt::Display for BroadcastType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel record from GET /channels/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub broadcaster_language: String,
    #[serde(default)]
    pub mature: bool,
    #[serde(default)]
    pub partner: bool,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub video_banner: Option<String>,
    #[serde(default)]
    pub profile_banner: Option<String>,
    #[serde(default)]
    pub profile_banner_background_color: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// User record from GET /users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub user_type: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Response envelope for GET /users?login=a,b,c.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    #[serde(rename = "_total", default)]
    pub total: u64,
    pub users: Vec<User>,
}

/// One follow relationship from GET /channels/{id}/follows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follower {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub notifications: bool,
    pub user: User,
}

/// One page of channel followers plus its pagination cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowersPage {
    #[serde(rename = "_total", default)]
    pub total: u64,
    #[serde(rename = "_cursor", default)]
    pub cursor: String,
    pub follows: Vec<Follower>,
}

impl FollowersPage {
    /// Cursor for the following page, if the API reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.cursor.is_empty() {
            None
        } else {
            Some(&self.cursor)
        }
    }
}

/// Team record from GET /channels/{id}/teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct TeamsEnvelope {
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct UsersEnvelope {
    pub users: Vec<User>,
}

/// Image URL set keyed by size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub template: String,
}

/// Channel stub embedded in a video record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoChannel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// Video record from GET /channels/{id}/videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub broadcast_id: serde_json::Value,
    #[serde(default)]
    pub broadcast_type: String,
    pub channel: VideoChannel,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tag_list: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub viewable: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub preview: Preview,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub published_at: String,
}

/// Response envelope for GET /channels/{id}/videos.
#[derive(Debug, Clone, Deserialize)]
pub struct VideosPage {
    #[serde(rename = "_total", default)]
    pub total: u64,
    pub videos: Vec<Video>,
}

/// Stream record from GET /streams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stream {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub community_id: String,
    #[serde(default)]
    pub viewers: u64,
    #[serde(default)]
    pub video_height: u32,
    #[serde(default)]
    pub average_fps: f64,
    #[serde(default)]
    pub delay: u32,
    #[serde(default)]
    pub is_playlist: bool,
    #[serde(default)]
    pub preview: Preview,
    pub channel: Channel,
    #[serde(default)]
    pub created_at: String,
}

/// Response envelope for GET /streams.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamsPage {
    #[serde(rename = "_total", default)]
    pub total: u64,
    pub streams: Vec<Stream>,
}

/// Envelope for GET /streams/{id}; `stream` is null when offline.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct StreamEnvelope {
    pub stream: Option<Stream>,
}

/// Featured stream entry from GET /streams/featured.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedStream {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default)]
    pub sponsored: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
    pub stream: Stream,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct FeaturedEnvelope {
    pub featured: Vec<FeaturedStream>,
}

/// Totals from GET /streams/summary.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSummary {
    #[serde(default)]
    pub channels: u64,
    #[serde(default)]
    pub viewers: u64,
}
