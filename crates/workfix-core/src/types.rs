use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum caption length kept on a [`PostSample`], in characters.
pub const CAPTION_EXCERPT_CHARS: usize = 50;

/// Public profile metadata returned by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub full_name: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub post_count: u64,
    pub is_private: bool,
}

/// Engagement counts for one recent post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSample {
    pub date: NaiveDate,
    pub like_count: u64,
    pub comment_count: u64,
    pub caption_excerpt: String,
}

impl PostSample {
    /// Builds a sample, truncating `caption` to [`CAPTION_EXCERPT_CHARS`] characters.
    #[must_use]
    pub fn new(date: NaiveDate, like_count: u64, comment_count: u64, caption: &str) -> Self {
        Self {
            date,
            like_count,
            comment_count,
            caption_excerpt: caption_excerpt(caption),
        }
    }
}

/// Truncates on a char boundary so multi-byte captions never split a code point.
#[must_use]
pub fn caption_excerpt(caption: &str) -> String {
    caption.trim().chars().take(CAPTION_EXCERPT_CHARS).collect()
}

/// A synthetic unanswered comment shown on mock audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub user: String,
    pub text: String,
    pub days_ignored: u32,
    pub potential_value: u64,
}

/// One day of comment volume against brand replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub comments: u64,
    pub replies: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTime {
    pub hours: u32,
    pub minutes: u32,
}

impl std::fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hours, {} mins", self.hours, self.minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencyGrade {
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D+")]
    DPlus,
}

impl EfficiencyGrade {
    pub const ALL: [EfficiencyGrade; 3] = [
        EfficiencyGrade::DMinus,
        EfficiencyGrade::D,
        EfficiencyGrade::DPlus,
    ];
}

impl std::fmt::Display for EfficiencyGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EfficiencyGrade::DMinus => write!(f, "D-"),
            EfficiencyGrade::D => write!(f, "D"),
            EfficiencyGrade::DPlus => write!(f, "D+"),
        }
    }
}

/// Headline metrics that only the mock path fabricates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockHeadline {
    pub response_time: ResponseTime,
    pub reply_rate_percent: u32,
    pub efficiency_grade: EfficiencyGrade,
}

/// Display-only data attached to a mock session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockInsights {
    pub comments: Vec<CommentRecord>,
    pub volume: Vec<VolumePoint>,
    pub headline: MockHeadline,
}
