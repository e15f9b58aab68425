//! Live audit orchestration.

use futures::StreamExt;
use workfix_core::{compute_report, AuditError, AuditRequest, AuditSession, MAX_SAMPLE_SIZE};
use workfix_instagram::{ProfileSource, Throttle};

/// Run one live audit against `source`.
///
/// 1. Acquire the throttle, then fetch the profile. Any failure aborts the
///    audit.
/// 2. Pause, then pull up to [`MAX_SAMPLE_SIZE`] recent posts, pausing before
///    every pull after the first. A stream error aborts the audit.
/// 3. Compute the report from the collected samples.
/// 4. Return a fresh live [`AuditSession`].
///
/// There is no retry and no partial result.
///
/// # Errors
///
/// - [`AuditError::NotFound`] / [`AuditError::ConnectionRefused`] /
///   [`AuditError::Upstream`] from the data source.
/// - [`AuditError::InvalidInput`] if the profile has no posts.
pub async fn run_live_audit<S, T>(
    source: &S,
    throttle: &mut T,
    request: &AuditRequest,
) -> Result<AuditSession, AuditError>
where
    S: ProfileSource,
    T: Throttle,
{
    let handle = &request.handle;
    tracing::info!(handle = %handle, offer_price = request.offer_price.get(), "starting live audit");

    throttle.acquire().await;
    let profile = source.fetch_profile(handle).await.map_err(|e| {
        tracing::warn!(handle = %handle, error = %e, "profile fetch failed");
        AuditError::from(e)
    })?;
    tracing::debug!(
        handle = %handle,
        followers = profile.followers,
        post_count = profile.post_count,
        "profile fetched"
    );

    throttle.pause().await;

    let mut posts = source.fetch_recent_posts(handle, MAX_SAMPLE_SIZE);
    let mut samples = Vec::with_capacity(MAX_SAMPLE_SIZE);
    while samples.len() < MAX_SAMPLE_SIZE {
        if !samples.is_empty() {
            throttle.pause().await;
        }
        match posts.next().await {
            Some(Ok(sample)) => samples.push(sample),
            Some(Err(e)) => {
                tracing::warn!(handle = %handle, pulled = samples.len(), error = %e, "post stream failed");
                return Err(e.into());
            }
            None => break,
        }
    }

    let report = compute_report(&samples, request.offer_price)?;
    tracing::info!(
        handle = %handle,
        samples = samples.len(),
        estimated_leads = report.estimated_leads,
        potential_revenue = report.potential_revenue,
        "live audit complete"
    );

    Ok(AuditSession::live(request.clone(), profile, samples, report))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::NaiveDate;
    use futures::stream;
    use tokio::time::Instant;
    use workfix_core::{AuditMode, Handle, PostSample, Profile};
    use workfix_instagram::{
        FixedDelay, FixtureSource, NoThrottle, PostStream, ProfileSource, SourceError, TokenBucket,
    };

    use super::*;

    /// Counts pauses instead of waiting.
    #[derive(Default)]
    struct CountingThrottle(usize);

    impl Throttle for CountingThrottle {
        async fn pause(&mut self) {
            self.0 += 1;
        }
    }

    /// Records when each request is issued: the profile fetch and every post pull.
    struct TimedSource {
        profile: Profile,
        posts: Vec<PostSample>,
        requests: Mutex<Vec<Instant>>,
    }

    impl TimedSource {
        fn new(posts: Vec<PostSample>) -> Self {
            Self {
                profile: profile("brand"),
                posts,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn record(&self) {
            self.requests.lock().unwrap().push(Instant::now());
        }

        fn request_times(&self) -> Vec<Instant> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ProfileSource for TimedSource {
        async fn fetch_profile(&self, _handle: &Handle) -> Result<Profile, SourceError> {
            self.record();
            Ok(self.profile.clone())
        }

        fn fetch_recent_posts(&self, _handle: &Handle, limit: usize) -> PostStream<'_> {
            stream::iter(self.posts.iter().take(limit))
                .then(move |post| async move {
                    self.record();
                    Ok::<_, SourceError>(post.clone())
                })
                .boxed()
        }
    }

    fn profile(name: &str) -> Profile {
        Profile {
            username: name.to_owned(),
            full_name: None,
            followers: 1_000,
            following: 10,
            post_count: 50,
            is_private: false,
        }
    }

    fn post(day: u32, likes: u64, comments: u64) -> PostSample {
        PostSample::new(
            NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            likes,
            comments,
            "caption",
        )
    }

    fn request(handle: &str, price: i64) -> AuditRequest {
        AuditRequest::from_raw(handle, price).unwrap()
    }

    #[tokio::test]
    async fn five_posts_produce_expected_report() {
        let posts = vec![
            post(10, 100, 10),
            post(9, 200, 20),
            post(8, 150, 30),
            post(7, 50, 15),
            post(6, 0, 25),
        ];
        let source = FixtureSource::new().with_profile(profile("brand"), posts);

        let session = run_live_audit(&source, &mut NoThrottle, &request("@brand", 3000))
            .await
            .unwrap();

        assert_eq!(session.mode, AuditMode::Live);
        assert_eq!(session.samples.len(), 5);
        assert_eq!(session.report.total_likes, 500);
        assert_eq!(session.report.total_comments, 100);
        assert_eq!(session.report.estimated_leads, 20);
        assert_eq!(session.report.potential_revenue, 60_000);
        assert_eq!(session.profile.as_ref().map(|p| p.username.as_str()), Some("brand"));
        assert!(session.insights.is_none());
    }

    #[tokio::test]
    async fn sample_is_capped_at_five_most_recent() {
        let posts: Vec<PostSample> = (0..8).map(|i| post(10 - i, 1, 1)).collect();
        let source = FixtureSource::new().with_profile(profile("brand"), posts);

        let session = run_live_audit(&source, &mut NoThrottle, &request("brand", 500))
            .await
            .unwrap();
        assert_eq!(session.samples.len(), 5);
        assert_eq!(session.samples[0].date, NaiveDate::from_ymd_opt(2026, 10, 10).unwrap());
        assert_eq!(session.samples[4].date, NaiveDate::from_ymd_opt(2026, 10, 6).unwrap());
    }

    #[tokio::test]
    async fn fewer_posts_are_accepted() {
        let source =
            FixtureSource::new().with_profile(profile("brand"), vec![post(10, 7, 3), post(9, 5, 4)]);
        let session = run_live_audit(&source, &mut NoThrottle, &request("brand", 1000))
            .await
            .unwrap();
        assert_eq!(session.samples.len(), 2);
        assert_eq!(session.report.estimated_leads, 1);
        assert_eq!(session.report.potential_revenue, 1000);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found_without_report() {
        let source = FixtureSource::new();
        let err = run_live_audit(&source, &mut NoThrottle, &request("doesnotexist123", 3000))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuditError::NotFound {
                handle: "doesnotexist123".into()
            }
        );
        assert_eq!(source.request_count(), 1, "no post pull after a failed profile fetch");
    }

    #[tokio::test]
    async fn refused_source_is_connection_refused() {
        let source = FixtureSource::refusing("HTTP 429");
        let err = run_live_audit(&source, &mut NoThrottle, &request("brand", 3000))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::ConnectionRefused { .. }));
    }

    #[tokio::test]
    async fn profile_without_posts_is_invalid_input() {
        let source = FixtureSource::new().with_profile(profile("empty"), Vec::new());
        let err = run_live_audit(&source, &mut NoThrottle, &request("empty", 3000))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn mid_stream_failure_aborts_audit() {
        let posts: Vec<PostSample> = (0..5).map(|i| post(10 - i, 1, 1)).collect();
        let source = FixtureSource::new()
            .with_profile(profile("brand"), posts)
            .failing_posts_after("brand", 2);
        let err = run_live_audit(&source, &mut NoThrottle, &request("brand", 3000))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::ConnectionRefused { .. }));
    }

    #[tokio::test]
    async fn pauses_after_profile_and_between_pulls() {
        let posts: Vec<PostSample> = (0..5).map(|i| post(10 - i, 1, 1)).collect();
        let source = FixtureSource::new().with_profile(profile("brand"), posts);
        let mut throttle = CountingThrottle::default();

        run_live_audit(&source, &mut throttle, &request("brand", 3000))
            .await
            .unwrap();
        // One after the profile, then one before each of pulls 2..=5.
        assert_eq!(throttle.0, 5);
    }

    #[tokio::test]
    async fn short_stream_pauses_before_the_exhausting_pull() {
        let source =
            FixtureSource::new().with_profile(profile("brand"), vec![post(10, 1, 1), post(9, 1, 1)]);
        let mut throttle = CountingThrottle::default();

        run_live_audit(&source, &mut throttle, &request("brand", 3000))
            .await
            .unwrap();
        // After profile, before pull 2, before pull 3 which ends the stream.
        assert_eq!(throttle.0, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_spaces_requests_on_paused_clock() {
        let posts: Vec<PostSample> = (0..5).map(|i| post(10 - i, 1, 1)).collect();
        let source = FixtureSource::new().with_profile(profile("brand"), posts);
        let mut throttle = FixedDelay::new(Duration::from_secs(1));

        let start = Instant::now();
        run_live_audit(&source, &mut throttle, &request("brand", 3000))
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_secs(5) && elapsed < Duration::from_millis(5_050),
            "expected ~5s of pauses, got {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn single_token_bucket_spaces_profile_and_first_pull() {
        let source = TimedSource::new(vec![post(10, 1, 1), post(9, 1, 1)]);
        let mut bucket = TokenBucket::new(1, Duration::from_secs(1));

        run_live_audit(&source, &mut bucket, &request("brand", 3000))
            .await
            .unwrap();

        let times = source.request_times();
        assert_eq!(times.len(), 3);
        for pair in times.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            assert!(gap >= Duration::from_secs(1), "requests only {gap:?} apart");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shared_token_bucket_spaces_consecutive_audits() {
        let source = TimedSource::new(vec![post(10, 1, 1)]);
        let mut bucket = TokenBucket::new(1, Duration::from_secs(1));

        run_live_audit(&source, &mut bucket, &request("brand", 3000))
            .await
            .unwrap();
        run_live_audit(&source, &mut bucket, &request("brand", 3000))
            .await
            .unwrap();

        let times = source.request_times();
        assert_eq!(times.len(), 4);
        let gap = times[2].duration_since(times[1]);
        assert!(
            gap >= Duration::from_secs(1),
            "second audit's profile request only {gap:?} after the first audit's last pull"
        );
    }
}
