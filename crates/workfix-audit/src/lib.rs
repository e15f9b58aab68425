//! Audit orchestration for the leak detector.
//!
//! Two ways to produce an [`AuditSession`](workfix_core::AuditSession):
//! the live runner pulls a bounded sample from any
//! [`ProfileSource`](workfix_instagram::ProfileSource), and the mock sampler
//! fabricates a demo audit from an injectable RNG. Both feed the same
//! estimate so their numbers are comparable.

pub mod mock;
pub mod runner;

pub use mock::{run_mock_audit, MockSampler};
pub use runner::run_live_audit;
