use thiserror::Error;

/// Terminal failure of a single audit. No report is produced for any variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The target handle does not exist on the data source.
    #[error("profile @{handle} does not exist")]
    NotFound { handle: String },

    /// The data source rejected the request (login wall, throttling, refused connection).
    #[error("data source refused the request: {reason}")]
    ConnectionRefused { reason: String },

    /// Input rejected before any computation ran.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other data-source failure (unexpected status, malformed body, transport).
    #[error("data source error: {0}")]
    Upstream(String),
}

impl AuditError {
    /// Short hint for the operator, shown next to the error message.
    #[must_use]
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            AuditError::ConnectionRefused { .. } => Some(
                "the data source is throttling this network; wait a few minutes or retry from an unrestricted network",
            ),
            AuditError::NotFound { .. } => Some("check the spelling of the handle"),
            AuditError::InvalidInput(_) | AuditError::Upstream(_) => None,
        }
    }
}
