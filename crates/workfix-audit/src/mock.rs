//! Mock sampler: fabricates a demo audit without touching the network.
//!
//! Every draw is uniform over an inclusive range and comes from the injected
//! RNG, so a seeded RNG reproduces the same session. Missed leads and lost
//! revenue are not drawn directly; the five most recent volume days become
//! synthetic post samples and go through [`compute_report`] like a live audit.

use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use rand::Rng;
use workfix_core::{
    compute_report, AuditError, AuditRequest, AuditSession, CommentRecord, EfficiencyGrade,
    MockHeadline, MockInsights, OfferPrice, PostSample, ResponseTime, VolumePoint,
    MAX_SAMPLE_SIZE,
};

const INTENTS: &[&str] = &[
    "price?",
    "how do I join?",
    "interested",
    "sent a DM",
    "tell me more",
    "how much?",
    "sign me up",
    "what's the cost?",
    "I want this",
    "can you help me?",
    "ready to buy",
    "how does it work?",
    "pricing details",
    "where do I start?",
    "need this now",
    "sounds good",
    "what's included?",
    "best price?",
    "ready to invest",
];

const USERS: &[&str] = &[
    "mike_s", "sarah_b", "john_doe", "emma_w", "alex_r", "lisa_k", "david_m", "jessica_p",
    "ryan_t", "amy_c", "chris_l", "karen_h", "matt_j", "rachel_g", "kevin_b", "susan_f", "tom_w",
    "linda_v",
];

pub const COMMENT_COUNT: RangeInclusive<usize> = 25..=40;
pub const DAYS_IGNORED: RangeInclusive<u32> = 1..=7;
pub const VOLUME_DAYS: u64 = 7;
pub const DAILY_COMMENTS: RangeInclusive<u64> = 45..=85;
pub const DAILY_REPLIES: RangeInclusive<u64> = 2..=8;
pub const RESPONSE_HOURS: RangeInclusive<u32> = 12..=24;
pub const RESPONSE_MINUTES: RangeInclusive<u32> = 15..=59;
pub const REPLY_RATE_PERCENT: RangeInclusive<u32> = 25..=35;
pub const SYNTHETIC_LIKES: RangeInclusive<u64> = 150..=900;

const SYNTHETIC_CAPTION: &str = "Mock post";

/// Draws the pieces of a mock audit from `R`.
#[derive(Debug)]
pub struct MockSampler<R> {
    rng: R,
}

impl<R: Rng> MockSampler<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// Unanswered buying-intent comments, each worth one sale at `offer_price`.
    pub fn comments(&mut self, offer_price: OfferPrice) -> Vec<CommentRecord> {
        let count = self.rng.random_range(COMMENT_COUNT);
        (0..count)
            .map(|_| CommentRecord {
                user: (*self.pick(USERS)).to_owned(),
                text: (*self.pick(INTENTS)).to_owned(),
                days_ignored: self.rng.random_range(DAYS_IGNORED),
                potential_value: offer_price.get(),
            })
            .collect()
    }

    /// Daily comments against replies for the week ending on `today`, oldest first.
    pub fn volume(&mut self, today: NaiveDate) -> Vec<VolumePoint> {
        (0..VOLUME_DAYS)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| VolumePoint {
                date,
                comments: self.rng.random_range(DAILY_COMMENTS),
                replies: self.rng.random_range(DAILY_REPLIES),
            })
            .collect()
    }

    pub fn headline(&mut self) -> MockHeadline {
        MockHeadline {
            response_time: ResponseTime {
                hours: self.rng.random_range(RESPONSE_HOURS),
                minutes: self.rng.random_range(RESPONSE_MINUTES),
            },
            reply_rate_percent: self.rng.random_range(REPLY_RATE_PERCENT),
            efficiency_grade: *self.pick(&EfficiencyGrade::ALL),
        }
    }

    /// Turns the most recent volume days into post samples, newest first.
    pub fn samples(&mut self, volume: &[VolumePoint]) -> Vec<PostSample> {
        volume
            .iter()
            .rev()
            .take(MAX_SAMPLE_SIZE)
            .map(|point| {
                PostSample::new(
                    point.date,
                    self.rng.random_range(SYNTHETIC_LIKES),
                    point.comments,
                    SYNTHETIC_CAPTION,
                )
            })
            .collect()
    }
}

/// Build a complete mock session for `request`, dated up to `today`.
///
/// # Errors
///
/// Returns [`AuditError::InvalidInput`] only if the estimate rejects the
/// synthetic sample, which the draw ranges rule out in practice.
pub fn run_mock_audit<R: Rng>(
    rng: R,
    request: &AuditRequest,
    today: NaiveDate,
) -> Result<AuditSession, AuditError> {
    let mut sampler = MockSampler::new(rng);

    let comments = sampler.comments(request.offer_price);
    let volume = sampler.volume(today);
    let headline = sampler.headline();
    let samples = sampler.samples(&volume);

    let report = compute_report(&samples, request.offer_price)?;
    tracing::info!(
        handle = %request.handle,
        comments = comments.len(),
        estimated_leads = report.estimated_leads,
        "mock audit generated"
    );

    Ok(AuditSession::mock(
        request.clone(),
        samples,
        report,
        MockInsights {
            comments,
            volume,
            headline,
        },
    ))
}
