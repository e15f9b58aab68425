//! The fetch capability the audit runner consumes.

use std::future::Future;

use futures::stream::BoxStream;
use workfix_core::{Handle, PostSample, Profile};

use crate::error::SourceError;

/// Lazy, single-use sequence of recent posts, most-recent-first.
pub type PostStream<'a> = BoxStream<'a, Result<PostSample, SourceError>>;

/// Retrieval of profile and post data for one handle.
///
/// Implementations must not issue any request for posts until the returned
/// stream is first polled, and must never yield more than `limit` items.
pub trait ProfileSource: Send + Sync {
    /// # Errors
    ///
    /// - [`SourceError::NotFound`] if the handle does not exist.
    /// - [`SourceError::ConnectionRefused`] if the source rejects the request.
    /// - Any other [`SourceError`] for transport or payload failures.
    fn fetch_profile(
        &self,
        handle: &Handle,
    ) -> impl Future<Output = Result<Profile, SourceError>> + Send;

    fn fetch_recent_posts(&self, handle: &Handle, limit: usize) -> PostStream<'_>;
}
