use thiserror::Error;
use workfix_core::AuditError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile not found: @{handle}")]
    NotFound { handle: String },

    /// Login wall, throttling status, or a refused TCP connection.
    #[error("request refused by data source: {reason}")]
    ConnectionRefused { reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<SourceError> for AuditError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { handle } => AuditError::NotFound { handle },
            SourceError::ConnectionRefused { reason } => AuditError::ConnectionRefused { reason },
            SourceError::Http(e) if e.is_connect() => AuditError::ConnectionRefused {
                reason: e.to_string(),
            },
            other => AuditError::Upstream(other.to_string()),
        }
    }
}
