//! Domain types, the leak estimate, and configuration for the leak detector.

pub mod app_config;
pub mod audit;
pub mod config;
pub mod error;
pub mod estimate;
pub mod session;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ThrottleStrategy};
pub use audit::{
    AuditMode, AuditRequest, Handle, OfferPrice, MAX_OFFER_PRICE, MIN_OFFER_PRICE,
    OFFER_PRICE_STEP,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::AuditError;
pub use estimate::{compute_report, estimated_leads, AuditReport, LEAD_RATE_PERCENT, MAX_SAMPLE_SIZE};
pub use session::AuditSession;
pub use types::{
    CommentRecord, EfficiencyGrade, MockHeadline, MockInsights, PostSample, Profile, ResponseTime,
    VolumePoint,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
