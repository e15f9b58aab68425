//! Data fetch adapter: profile and recent-post retrieval behind [`ProfileSource`].

pub mod client;
pub mod error;
pub mod fixture;
pub mod normalize;
pub mod source;
pub mod throttle;
pub mod types;

pub use client::InstagramClient;
pub use error::SourceError;
pub use fixture::FixtureSource;
pub use source::{PostStream, ProfileSource};
pub use throttle::{FixedDelay, NoThrottle, Throttle, ThrottlePolicy, TokenBucket};
