use crate::app_config::{AppConfig, Environment, ThrottleStrategy};
use crate::audit::{Handle, OfferPrice};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config. Tests drive this with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("WORKFIX_ENV", "development"));
    let bind_addr = parse_addr("WORKFIX_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("WORKFIX_LOG_LEVEL", "info");

    let default_handle = Handle::parse(&or_default("WORKFIX_DEFAULT_HANDLE", "alexhormozi"))
        .map_err(|e| invalid("WORKFIX_DEFAULT_HANDLE", e.to_string()))?;
    let default_offer_price = or_default("WORKFIX_DEFAULT_OFFER_PRICE", "3000")
        .parse::<i64>()
        .map_err(|e| e.to_string())
        .and_then(|v| OfferPrice::new(v).map_err(|e| e.to_string()))
        .map_err(|reason| invalid("WORKFIX_DEFAULT_OFFER_PRICE", reason))?;

    let instagram_base_url = or_default("WORKFIX_INSTAGRAM_BASE_URL", "https://i.instagram.com");
    let instagram_app_id = or_default("WORKFIX_INSTAGRAM_APP_ID", "936619743392459");

    let scraper_request_timeout_secs = parse_u64("WORKFIX_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "WORKFIX_SCRAPER_USER_AGENT",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    );
    let scraper_throttle = parse_throttle(&or_default("WORKFIX_SCRAPER_THROTTLE", "fixed"))
        .map_err(|reason| invalid("WORKFIX_SCRAPER_THROTTLE", reason))?;
    let scraper_inter_request_delay_ms =
        parse_u64("WORKFIX_SCRAPER_INTER_REQUEST_DELAY_MS", "1000")?;
    let scraper_throttle_burst = parse_u32("WORKFIX_SCRAPER_THROTTLE_BURST", "1")?;
    if scraper_throttle_burst == 0 {
        return Err(invalid(
            "WORKFIX_SCRAPER_THROTTLE_BURST",
            "must be at least 1".to_string(),
        ));
    }
    let rate_limit_per_minute = parse_usize("WORKFIX_RATE_LIMIT_PER_MINUTE", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        default_handle,
        default_offer_price,
        instagram_base_url,
        instagram_app_id,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_throttle,
        scraper_inter_request_delay_ms,
        scraper_throttle_burst,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_throttle(s: &str) -> Result<ThrottleStrategy, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "none" => Ok(ThrottleStrategy::None),
        "fixed" => Ok(ThrottleStrategy::Fixed),
        "token-bucket" | "token_bucket" => Ok(ThrottleStrategy::TokenBucket),
        other => Err(format!(
            "unknown throttle \"{other}\" (expected none, fixed or token-bucket)"
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
