use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{AuditMode, AuditRequest};
use crate::estimate::AuditReport;
use crate::types::{MockInsights, PostSample, Profile};

/// Everything the renderer needs for one audit run.
///
/// Built once per invocation and handed off by value; a new run produces a
/// new session rather than updating an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSession {
    pub id: Uuid,
    pub mode: AuditMode,
    pub request: AuditRequest,
    pub generated_at: DateTime<Utc>,
    pub profile: Option<Profile>,
    pub samples: Vec<PostSample>,
    pub report: AuditReport,
    pub insights: Option<MockInsights>,
}

impl AuditSession {
    #[must_use]
    pub fn live(
        request: AuditRequest,
        profile: Profile,
        samples: Vec<PostSample>,
        report: AuditReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: AuditMode::Live,
            request,
            generated_at: Utc::now(),
            profile: Some(profile),
            samples,
            report,
            insights: None,
        }
    }

    #[must_use]
    pub fn mock(
        request: AuditRequest,
        samples: Vec<PostSample>,
        report: AuditReport,
        insights: MockInsights,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: AuditMode::Mock,
            request,
            generated_at: Utc::now(),
            profile: None,
            samples,
            report,
            insights: Some(insights),
        }
    }
}
