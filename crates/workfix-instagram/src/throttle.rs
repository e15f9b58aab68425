//! Pause policies applied between requests to the data source.
//!
//! The audit runner calls [`Throttle::acquire`] before the profile request,
//! then [`Throttle::pause`] after it and before every further post pull. A pause waits on the current task and is
//! not cancellable by the user. All timing goes through `tokio::time`, so tests
//! can run under a paused clock instead of waiting on the wall clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use workfix_core::{AppConfig, ThrottleStrategy};

pub trait Throttle: Send {
    /// Admits the first request of an audit.
    ///
    /// Delay-based throttles let it through at once; a rate-based throttle
    /// charges it against the same budget as every later request.
    fn acquire(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Waits before the next request.
    fn pause(&mut self) -> impl Future<Output = ()> + Send;
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

impl Throttle for NoThrottle {
    async fn pause(&mut self) {}
}

/// Waits the same delay on every pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Throttle for FixedDelay {
    async fn pause(&mut self) {
        if !self.delay.is_zero() {
            tracing::debug!(delay_ms = self.delay.as_millis(), "throttling before next request");
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Allows bursts of up to `capacity` requests, then one per `interval`.
///
/// Starts full. A token is minted every `interval` up to `capacity`. Every
/// request takes a token, the first one of an audit included, so one bucket
/// can be shared across audits.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u32,
    tokens: u32,
    interval: Duration,
    last_refill: Instant,
}

impl TokenBucket {
    #[must_use]
    pub fn new(capacity: u32, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            tokens: capacity,
            interval,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self, now: Instant) {
        if self.interval.is_zero() {
            self.tokens = self.capacity;
            self.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill);
        let minted = elapsed.as_nanos() / self.interval.as_nanos();
        if minted == 0 {
            return;
        }

        let minted = u32::try_from(minted).unwrap_or(u32::MAX);
        self.tokens = self.tokens.saturating_add(minted).min(self.capacity);
        if self.tokens == self.capacity {
            self.last_refill = now;
        } else {
            self.last_refill += self.interval * minted;
        }
    }

    /// Takes a token at `now` and returns how long the caller must wait for it.
    pub(crate) fn reserve(&mut self, now: Instant) -> Duration {
        self.refill(now);
        if self.tokens > 0 {
            self.tokens -= 1;
            return Duration::ZERO;
        }

        // The next minted token is claimed by this caller.
        let ready_at = self.last_refill + self.interval;
        self.last_refill = ready_at;
        ready_at.saturating_duration_since(now)
    }

    async fn take(&mut self) {
        let wait = self.reserve(Instant::now());
        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis(), "token bucket empty; waiting");
            tokio::time::sleep(wait).await;
        }
    }
}

impl Throttle for TokenBucket {
    async fn acquire(&mut self) {
        self.take().await;
    }

    async fn pause(&mut self) {
        self.take().await;
    }
}

/// The throttle selected by configuration.
#[derive(Debug, Clone)]
pub enum ThrottlePolicy {
    None(NoThrottle),
    Fixed(FixedDelay),
    TokenBucket(TokenBucket),
}

impl ThrottlePolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let delay = Duration::from_millis(config.scraper_inter_request_delay_ms);
        match config.scraper_throttle {
            ThrottleStrategy::None => Self::None(NoThrottle),
            ThrottleStrategy::Fixed => Self::Fixed(FixedDelay::new(delay)),
            ThrottleStrategy::TokenBucket => {
                Self::TokenBucket(TokenBucket::new(config.scraper_throttle_burst, delay))
            }
        }
    }
}

impl Throttle for ThrottlePolicy {
    async fn acquire(&mut self) {
        match self {
            Self::None(t) => t.acquire().await,
            Self::Fixed(t) => t.acquire().await,
            Self::TokenBucket(t) => t.acquire().await,
        }
    }

    async fn pause(&mut self) {
        match self {
            Self::None(t) => t.pause().await,
            Self::Fixed(t) => t.pause().await,
            Self::TokenBucket(t) => t.pause().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use workfix_core::{Environment, Handle, OfferPrice};

    use super::*;

    fn config(strategy: ThrottleStrategy, delay_ms: u64, burst: u32) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            log_level: "info".to_string(),
            default_handle: Handle::parse("alexhormozi").unwrap(),
            default_offer_price: OfferPrice::new(3000).unwrap(),
            instagram_base_url: "http://127.0.0.1:1".to_string(),
            instagram_app_id: "936619743392459".to_string(),
            scraper_request_timeout_secs: 5,
            scraper_user_agent: "workfix-test/0.1".to_string(),
            scraper_throttle: strategy,
            scraper_inter_request_delay_ms: delay_ms,
            scraper_throttle_burst: burst,
            rate_limit_per_minute: 30,
        }
    }

    /// The paused clock may round a deadline up to the next millisecond tick.
    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
            "expected ~{expected:?}, got {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_waits_the_configured_delay() {
        let mut throttle = FixedDelay::new(Duration::from_secs(1));
        let start = Instant::now();
        throttle.pause().await;
        throttle.pause().await;
        assert_elapsed(start, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_fixed_delay_does_not_wait() {
        let mut throttle = FixedDelay::new(Duration::ZERO);
        let start = Instant::now();
        throttle.pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn no_throttle_never_waits() {
        let start = Instant::now();
        for _ in 0..10 {
            NoThrottle.pause().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn token_bucket_allows_burst_then_spaces_requests() {
        let mut bucket = TokenBucket::new(2, Duration::from_millis(500));
        let start = Instant::now();

        bucket.pause().await;
        bucket.pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO, "burst of two is free");

        bucket.pause().await;
        assert_elapsed(start, Duration::from_millis(500));

        bucket.pause().await;
        assert_elapsed(start, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn token_bucket_refills_while_idle() {
        let mut bucket = TokenBucket::new(1, Duration::from_secs(1));
        bucket.pause().await;

        tokio::time::advance(Duration::from_secs(5)).await;
        let start = Instant::now();
        bucket.pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO, "refilled token is ready");

        bucket.pause().await;
        assert_elapsed(start, Duration::from_secs(1));
    }

    #[test]
    fn token_bucket_reserve_reports_wait_without_sleeping() {
        let now = Instant::now();
        let mut bucket = TokenBucket {
            capacity: 1,
            tokens: 1,
            interval: Duration::from_secs(2),
            last_refill: now,
        };
        assert_eq!(bucket.reserve(now), Duration::ZERO);
        assert_eq!(bucket.reserve(now), Duration::from_secs(2));
        assert_eq!(bucket.reserve(now), Duration::from_secs(4));
        assert_eq!(
            bucket.reserve(now + Duration::from_secs(5)),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn token_bucket_charges_the_first_request() {
        let mut bucket = TokenBucket::new(1, Duration::from_secs(1));
        let start = Instant::now();
        bucket.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        bucket.pause().await;
        assert_elapsed(start, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_throttles_admit_the_first_request_at_once() {
        let start = Instant::now();
        FixedDelay::new(Duration::from_secs(3)).acquire().await;
        NoThrottle.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn policy_none_from_config() {
        let policy = ThrottlePolicy::from_config(&config(ThrottleStrategy::None, 750, 4));
        assert!(matches!(policy, ThrottlePolicy::None(NoThrottle)));
    }

    #[test]
    fn policy_fixed_carries_configured_delay() {
        let policy = ThrottlePolicy::from_config(&config(ThrottleStrategy::Fixed, 750, 4));
        let ThrottlePolicy::Fixed(fixed) = &policy else {
            panic!("expected fixed delay, got {policy:?}");
        };
        assert_eq!(fixed.delay, Duration::from_millis(750));
    }

    #[test]
    fn policy_token_bucket_carries_burst_and_interval() {
        let policy = ThrottlePolicy::from_config(&config(ThrottleStrategy::TokenBucket, 750, 4));
        let ThrottlePolicy::TokenBucket(bucket) = &policy else {
            panic!("expected token bucket, got {policy:?}");
        };
        assert_eq!(bucket.capacity, 4);
        assert_eq!(bucket.tokens, 4);
        assert_eq!(bucket.interval, Duration::from_millis(750));
    }

    #[test]
    fn token_bucket_capacity_is_at_least_one() {
        let bucket = TokenBucket::new(0, Duration::from_secs(1));
        assert_eq!(bucket.capacity, 1);
        assert_eq!(bucket.tokens, 1);
    }
}
