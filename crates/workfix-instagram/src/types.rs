//! Response types for Instagram's public `web_profile_info` endpoint.
//!
//! ## Observed shape
//!
//! ```text
//! { "data": { "user": { ...UserNode } | null }, "status": "ok" }
//! ```
//!
//! ### Throttled responses
//! When the caller is throttled or hits the login wall, Instagram may answer
//! `200` with `{"status": "fail", "message": "Please wait a few minutes...",
//! "require_login": true}` and no `data`. Those fields are modeled so the
//! client can surface them as a refused request instead of a parse failure.
//!
//! ### Counts
//! Engagement counts sit under GraphQL-style `edge_*` wrappers holding a
//! single `count`. Hidden like counts can arrive as `-1` or be missing, so
//! they are modeled as `Option<i64>`.
//!
//! ### Timeline
//! `edge_owner_to_timeline_media.edges` holds the first page (about 12) of
//! posts. Pinned posts come first regardless of age.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebProfileInfoResponse {
    #[serde(default)]
    pub data: Option<WebProfileData>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub require_login: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct WebProfileData {
    #[serde(default)]
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
pub struct UserNode {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub edge_followed_by: Option<CountEdge>,
    #[serde(default)]
    pub edge_follow: Option<CountEdge>,
    #[serde(default)]
    pub edge_owner_to_timeline_media: Option<TimelineMedia>,
}

#[derive(Debug, Deserialize)]
pub struct CountEdge {
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineMedia {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
pub struct MediaEdge {
    pub node: MediaNode,
}

#[derive(Debug, Deserialize)]
pub struct MediaNode {
    #[serde(default)]
    pub shortcode: Option<String>,
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_liked_by: Option<CountEdge>,
    #[serde(default)]
    pub edge_media_preview_like: Option<CountEdge>,
    #[serde(default)]
    pub edge_media_to_comment: Option<CountEdge>,
    #[serde(default)]
    pub edge_media_to_caption: Option<CaptionEdges>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Deserialize)]
pub struct CaptionNode {
    #[serde(default)]
    pub text: String,
}
