//! Validated audit inputs.

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

pub const MIN_OFFER_PRICE: u64 = 500;
pub const MAX_OFFER_PRICE: u64 = 10_000;
/// Increment used by input controls. Not enforced on parsed values.
pub const OFFER_PRICE_STEP: u64 = 500;

const MAX_HANDLE_LEN: usize = 30;

/// Public username of a profile, with every `@` removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parses raw user input into a handle.
    ///
    /// Every `@` is stripped and surrounding whitespace trimmed. The remainder
    /// must be 1–30 ASCII letters, digits, `.` or `_`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidInput`] if nothing valid remains.
    pub fn parse(raw: &str) -> Result<Self, AuditError> {
        let stripped: String = raw.replace('@', "");
        let handle = stripped.trim();

        if handle.is_empty() {
            return Err(AuditError::InvalidInput("handle must not be empty".into()));
        }
        if handle.len() > MAX_HANDLE_LEN {
            return Err(AuditError::InvalidInput(format!(
                "handle \"{handle}\" is longer than {MAX_HANDLE_LEN} characters"
            )));
        }
        if let Some(bad) = handle
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '_'))
        {
            return Err(AuditError::InvalidInput(format!(
                "handle \"{handle}\" contains invalid character '{bad}'"
            )));
        }

        Ok(Self(handle.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = AuditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// Dollar value of one converted lead, bounded to 500–10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct OfferPrice(u64);

impl OfferPrice {
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidInput`] when `value` is outside 500–10000
    /// (this includes zero and negative input).
    pub fn new(value: i64) -> Result<Self, AuditError> {
        match u64::try_from(value) {
            Ok(v) if (MIN_OFFER_PRICE..=MAX_OFFER_PRICE).contains(&v) => Ok(Self(v)),
            _ => Err(AuditError::InvalidInput(format!(
                "offer price {value} is outside {MIN_OFFER_PRICE}-{MAX_OFFER_PRICE}"
            ))),
        }
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for OfferPrice {
    type Error = AuditError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OfferPrice> for u64 {
    fn from(price: OfferPrice) -> Self {
        price.0
    }
}

/// One audit's inputs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRequest {
    pub handle: Handle,
    pub offer_price: OfferPrice,
}

impl AuditRequest {
    /// Validates raw input from a form or command line.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidInput`] if either field is rejected.
    pub fn from_raw(handle: &str, offer_price: i64) -> Result<Self, AuditError> {
        Ok(Self {
            handle: Handle::parse(handle)?,
            offer_price: OfferPrice::new(offer_price)?,
        })
    }
}

/// Which generator produced a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    #[default]
    Live,
    Mock,
}

impl std::fmt::Display for AuditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditMode::Live => write!(f, "live"),
            AuditMode::Mock => write!(f, "mock"),
        }
    }
}
