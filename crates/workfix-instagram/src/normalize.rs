//! Conversion from raw `web_profile_info` shapes to [`workfix_core`] types.

use chrono::DateTime;
use workfix_core::{PostSample, Profile};

use crate::types::{CountEdge, MediaNode, UserNode};

/// Missing or hidden (`-1`) counts become zero.
fn count(edge: Option<&CountEdge>) -> u64 {
    edge.and_then(|e| e.count)
        .and_then(|c| u64::try_from(c).ok())
        .unwrap_or(0)
}

#[must_use]
pub fn normalize_profile(user: &UserNode) -> Profile {
    Profile {
        username: user.username.clone(),
        full_name: user.full_name.clone().filter(|s| !s.trim().is_empty()),
        followers: count(user.edge_followed_by.as_ref()),
        following: count(user.edge_follow.as_ref()),
        post_count: user
            .edge_owner_to_timeline_media
            .as_ref()
            .and_then(|m| m.count)
            .and_then(|c| u64::try_from(c).ok())
            .unwrap_or(0),
        is_private: user.is_private,
    }
}

/// Converts one timeline node into a sample, or `None` if its timestamp is unusable.
#[must_use]
pub fn normalize_post(node: &MediaNode) -> Option<PostSample> {
    let Some(taken_at) = DateTime::from_timestamp(node.taken_at_timestamp, 0) else {
        tracing::warn!(
            shortcode = node.shortcode.as_deref().unwrap_or("-"),
            taken_at_timestamp = node.taken_at_timestamp,
            "skipping post with out-of-range timestamp"
        );
        return None;
    };

    // A hidden primary count falls back to the preview count.
    let like_count = node
        .edge_liked_by
        .as_ref()
        .filter(|e| e.count.is_some_and(|c| c >= 0))
        .or(node.edge_media_preview_like.as_ref());

    let caption = node
        .edge_media_to_caption
        .as_ref()
        .and_then(|c| c.edges.first())
        .map_or("", |edge| edge.node.text.as_str());

    Some(PostSample::new(
        taken_at.date_naive(),
        count(like_count),
        count(node.edge_media_to_comment.as_ref()),
        caption,
    ))
}

/// Timeline posts ordered most-recent-first.
///
/// Pinned posts lead the raw timeline regardless of age, so the edges are
/// re-sorted by timestamp before conversion.
#[must_use]
pub fn normalize_posts(user: UserNode) -> Vec<PostSample> {
    let Some(media) = user.edge_owner_to_timeline_media else {
        return Vec::new();
    };

    let mut nodes: Vec<MediaNode> = media.edges.into_iter().map(|e| e.node).collect();
    nodes.sort_by(|a, b| b.taken_at_timestamp.cmp(&a.taken_at_timestamp));
    nodes.iter().filter_map(normalize_post).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
