//! Leak estimate: turns a bounded engagement sample into leads and revenue.
//!
//! A fixed share of comments ([`LEAD_RATE_PERCENT`]) is treated as purchase
//! intent. Integer arithmetic keeps `estimated_leads` an exact floor.

use serde::{Deserialize, Serialize};

use crate::audit::OfferPrice;
use crate::error::AuditError;
use crate::types::PostSample;

/// Share of comments counted as leads.
pub const LEAD_RATE_PERCENT: u64 = 20;

/// Most recent posts considered per audit.
pub const MAX_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub total_likes: u64,
    pub total_comments: u64,
    pub estimated_leads: u64,
    pub potential_revenue: u64,
    pub average_engagement: f64,
}

/// `floor(total_comments * 0.20)`.
#[must_use]
pub fn estimated_leads(total_comments: u64) -> u64 {
    // Divide first so large counts cannot overflow; the remainder term keeps the floor exact.
    total_comments / 100 * LEAD_RATE_PERCENT + total_comments % 100 * LEAD_RATE_PERCENT / 100
}

/// Computes the report for one audit.
///
/// # Errors
///
/// Returns [`AuditError::InvalidInput`] if `samples` is empty, holds more than
/// [`MAX_SAMPLE_SIZE`] entries, or the totals overflow `u64`.
pub fn compute_report(
    samples: &[PostSample],
    offer_price: OfferPrice,
) -> Result<AuditReport, AuditError> {
    if samples.is_empty() {
        return Err(AuditError::InvalidInput(
            "sample count must be at least 1".into(),
        ));
    }
    if samples.len() > MAX_SAMPLE_SIZE {
        return Err(AuditError::InvalidInput(format!(
            "sample count {} exceeds {MAX_SAMPLE_SIZE}",
            samples.len()
        )));
    }

    let overflow = || AuditError::InvalidInput("engagement totals overflow".into());

    let total_likes = samples
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.like_count))
        .ok_or_else(overflow)?;
    let total_comments = samples
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.comment_count))
        .ok_or_else(overflow)?;

    let estimated_leads = estimated_leads(total_comments);
    let potential_revenue = estimated_leads
        .checked_mul(offer_price.get())
        .ok_or_else(overflow)?;

    let engagement = total_likes.checked_add(total_comments).ok_or_else(overflow)?;
    #[allow(clippy::cast_precision_loss)]
    let average_engagement = engagement as f64 / samples.len() as f64;

    Ok(AuditReport {
        total_likes,
        total_comments,
        estimated_leads,
        potential_revenue,
        average_engagement,
    })
}
