//! In-memory [`ProfileSource`] for deterministic tests and offline demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use workfix_core::{Handle, PostSample, Profile};

use crate::error::SourceError;
use crate::source::{PostStream, ProfileSource};

#[derive(Debug, Clone)]
struct FixtureProfile {
    profile: Profile,
    posts: Vec<PostSample>,
    /// Yield this many posts, then a refused-connection error.
    fail_after: Option<usize>,
}

/// Serves canned profiles and posts keyed by handle.
///
/// Posts are yielded in the order given, which callers should keep
/// most-recent-first. Unknown handles fail with [`SourceError::NotFound`].
#[derive(Debug, Default)]
pub struct FixtureSource {
    profiles: HashMap<String, FixtureProfile>,
    refuse_reason: Option<String>,
    requests: AtomicUsize,
}

impl FixtureSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that refuses every request, like a throttled network.
    #[must_use]
    pub fn refusing(reason: &str) -> Self {
        Self {
            refuse_reason: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: Profile, posts: Vec<PostSample>) -> Self {
        self.profiles.insert(
            profile.username.clone(),
            FixtureProfile {
                profile,
                posts,
                fail_after: None,
            },
        );
        self
    }

    /// Makes the post stream for `username` fail once `count` posts were yielded.
    #[must_use]
    pub fn failing_posts_after(mut self, username: &str, count: usize) -> Self {
        if let Some(entry) = self.profiles.get_mut(username) {
            entry.fail_after = Some(count);
        }
        self
    }

    /// Number of requests served so far (profile lookups plus post streams started).
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lookup(&self, handle: &Handle) -> Result<&FixtureProfile, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.refuse_reason {
            return Err(SourceError::ConnectionRefused {
                reason: reason.clone(),
            });
        }
        self.profiles
            .get(handle.as_str())
            .ok_or_else(|| SourceError::NotFound {
                handle: handle.to_string(),
            })
    }
}

impl ProfileSource for FixtureSource {
    async fn fetch_profile(&self, handle: &Handle) -> Result<Profile, SourceError> {
        self.lookup(handle).map(|entry| entry.profile.clone())
    }

    fn fetch_recent_posts(&self, handle: &Handle, limit: usize) -> PostStream<'_> {
        let handle = handle.clone();
        stream::once(async move { self.lookup(&handle).cloned() })
            .map(|result| -> PostStream<'static> {
                match result {
                    Ok(entry) => {
                        let FixtureProfile {
                            posts, fail_after, ..
                        } = entry;
                        match fail_after {
                            Some(n) if n < posts.len() => {
                                let failure = SourceError::ConnectionRefused {
                                    reason: format!("fixture stream cut after {n} posts"),
                                };
                                stream::iter(posts.into_iter().take(n).map(Ok))
                                    .chain(stream::iter([Err(failure)]))
                                    .boxed()
                            }
                            _ => stream::iter(posts.into_iter().map(Ok)).boxed(),
                        }
                    }
                    Err(e) => stream::iter([Err(e)]).boxed(),
                }
            })
            .flatten()
            .take(limit)
            .boxed()
    }
}
