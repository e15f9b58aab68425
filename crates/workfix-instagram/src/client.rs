//! HTTP client for Instagram's public `web_profile_info` endpoint.

use std::sync::Mutex;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{redirect, Client, Url};
use tokio::time::Instant;
use workfix_core::{AppConfig, Handle, Profile};

use crate::error::SourceError;
use crate::normalize::{normalize_posts, normalize_profile};
use crate::source::{PostStream, ProfileSource};
use crate::types::{UserNode, WebProfileInfoResponse};

pub const DEFAULT_BASE_URL: &str = "https://i.instagram.com";

/// Public web app id Instagram expects on `web_profile_info` requests.
pub const DEFAULT_APP_ID: &str = "936619743392459";

const PROFILE_INFO_PATH: &str = "api/v1/users/web_profile_info/";

/// How long a fetched user node may stand in for the post request.
const USER_REUSE_WINDOW: Duration = Duration::from_secs(60);

/// Client for unauthenticated profile lookups.
///
/// Redirects are not followed: Instagram answers throttled or logged-out
/// callers with a redirect to its login page, which is surfaced as
/// [`SourceError::ConnectionRefused`]. No request is retried.
///
/// Profile and posts come from the same payload. The user node fetched by
/// [`ProfileSource::fetch_profile`] is kept once, and a post stream for the same
/// handle opened within a minute consumes it instead of requesting again, so a
/// live audit costs one upstream request.
pub struct InstagramClient {
    client: Client,
    base_url: Url,
    app_id: String,
    last_user: Mutex<Option<FetchedUser>>,
}

struct FetchedUser {
    handle: Handle,
    fetched_at: Instant,
    user: UserNode,
}

impl InstagramClient {
    /// Creates a client with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] if the underlying `reqwest::Client` cannot be built.
    /// - [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        app_id: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        // Ensure exactly one trailing slash so `join` appends rather than replaces.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            app_id: app_id.to_owned(),
            last_user: Mutex::new(None),
        })
    }

    /// # Errors
    ///
    /// See [`InstagramClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.instagram_base_url,
            &config.instagram_app_id,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
        )
    }

    /// Builds the `web_profile_info` URL for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if the path cannot be joined.
    fn profile_info_url(&self, handle: &Handle) -> Result<Url, SourceError> {
        let mut url =
            self.base_url
                .join(PROFILE_INFO_PATH)
                .map_err(|e| SourceError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("username", handle.as_str());
        Ok(url)
    }

    /// Fetches the raw user node, mapping refusals and missing profiles to typed errors.
    ///
    /// # Errors
    ///
    /// - [`SourceError::NotFound`] on 404 or a `null` user.
    /// - [`SourceError::ConnectionRefused`] on 401/403/429, a login redirect,
    ///   a `"status": "fail"` body, or a refused TCP connection.
    /// - [`SourceError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`SourceError::Deserialize`] if the body does not parse.
    /// - [`SourceError::Http`] on other transport failures.
    async fn fetch_user(&self, handle: &Handle) -> Result<UserNode, SourceError> {
        let url = self.profile_info_url(handle)?;
        tracing::debug!(handle = %handle, url = %url, "requesting web_profile_info");

        let response = self
            .client
            .get(url.clone())
            .header("x-ig-app-id", &self.app_id)
            .header(reqwest::header::ACCEPT, "application/json,*/*;q=0.8")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(
                reqwest::header::REFERER,
                format!("https://www.instagram.com/{handle}/"),
            )
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                handle: handle.to_string(),
            });
        }

        if matches!(
            status,
            reqwest::StatusCode::UNAUTHORIZED
                | reqwest::StatusCode::FORBIDDEN
                | reqwest::StatusCode::TOO_MANY_REQUESTS
        ) {
            tracing::warn!(handle = %handle, status = status.as_u16(), "data source refused request");
            return Err(SourceError::ConnectionRefused {
                reason: format!("HTTP {} from {url}", status.as_u16()),
            });
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            if location.contains("login") || location.contains("challenge") {
                tracing::warn!(handle = %handle, location = %location, "redirected to login wall");
                return Err(SourceError::ConnectionRefused {
                    reason: format!("redirected to {location}"),
                });
            }
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<WebProfileInfoResponse>(&body).map_err(|e| {
            SourceError::Deserialize {
                context: format!("web_profile_info(@{handle})"),
                source: e,
            }
        })?;

        if parsed.status.as_deref() == Some("fail") || parsed.require_login == Some(true) {
            let reason = parsed
                .message
                .unwrap_or_else(|| "login required".to_owned());
            tracing::warn!(handle = %handle, reason = %reason, "data source answered with a failure body");
            return Err(SourceError::ConnectionRefused { reason });
        }

        parsed
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| SourceError::NotFound {
                handle: handle.to_string(),
            })
    }
}

impl InstagramClient {
    fn remember(&self, handle: &Handle, user: UserNode) {
        if let Ok(mut slot) = self.last_user.lock() {
            *slot = Some(FetchedUser {
                handle: handle.clone(),
                fetched_at: Instant::now(),
                user,
            });
        }
    }

    /// Takes the remembered node if it belongs to `handle` and is still fresh.
    fn take_remembered(&self, handle: &Handle) -> Option<UserNode> {
        let mut slot = self.last_user.lock().ok()?;
        let fetched = slot.take()?;
        (fetched.handle == *handle && fetched.fetched_at.elapsed() <= USER_REUSE_WINDOW)
            .then_some(fetched.user)
    }
}

/// A refused TCP connection is a refusal, not a generic transport failure.
fn map_transport_error(err: reqwest::Error) -> SourceError {
    if err.is_connect() {
        SourceError::ConnectionRefused {
            reason: err.to_string(),
        }
    } else {
        SourceError::Http(err)
    }
}

impl ProfileSource for InstagramClient {
    async fn fetch_profile(&self, handle: &Handle) -> Result<Profile, SourceError> {
        let user = self.fetch_user(handle).await?;
        let profile = normalize_profile(&user);
        self.remember(handle, user);
        Ok(profile)
    }

    fn fetch_recent_posts(&self, handle: &Handle, limit: usize) -> PostStream<'_> {
        let handle = handle.clone();
        stream::once(async move {
            match self.take_remembered(&handle) {
                Some(user) => {
                    tracing::debug!(handle = %handle, "reusing profile payload for posts");
                    Ok(user)
                }
                None => self.fetch_user(&handle).await,
            }
        })
            .map(|result| -> PostStream<'static> {
                match result {
                    Ok(user) => stream::iter(normalize_posts(user).into_iter().map(Ok)).boxed(),
                    Err(e) => stream::iter([Err(e)]).boxed(),
                }
            })
            .flatten()
            .take(limit)
            .boxed()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
