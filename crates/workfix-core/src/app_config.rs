use std::net::SocketAddr;

use crate::audit::{Handle, OfferPrice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Pause strategy applied between requests to the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleStrategy {
    None,
    Fixed,
    TokenBucket,
}

impl std::fmt::Display for ThrottleStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThrottleStrategy::None => write!(f, "none"),
            ThrottleStrategy::Fixed => write!(f, "fixed"),
            ThrottleStrategy::TokenBucket => write!(f, "token-bucket"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub default_handle: Handle,
    pub default_offer_price: OfferPrice,
    pub instagram_base_url: String,
    pub instagram_app_id: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_throttle: ThrottleStrategy,
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_throttle_burst: u32,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("default_handle", &self.default_handle.as_str())
            .field("default_offer_price", &self.default_offer_price.get())
            .field("instagram_base_url", &self.instagram_base_url)
            .field("instagram_app_id", &self.instagram_app_id)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_throttle", &self.scraper_throttle)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("scraper_throttle_burst", &self.scraper_throttle_burst)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
