//! Error types for the library layer.

use std::fmt;

use crate::config::ConfigError;

/// Caller-visible failures. None of them are retried inside the library;
/// use [`CvrError::is_retryable`] to decide whether a retry could help.
#[derive(Debug)]
pub enum CvrError {
    /// The registry query failed: transport error, non-success status, or
    /// an unreadable response.
    UpstreamUnavailable(cvr_api::Error),
    /// A required lookup matched nothing.
    NotFound(String),
    /// A document lacks structure needed for a required output field.
    MalformedRecord(String),
    /// A bounded wait exceeded its deadline.
    Timeout(String),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// Startup configuration could not be read.
    Config(ConfigError),
    /// The document export trigger reported a failure.
    ExportFailed(String),
    /// A filesystem operation failed.
    Io(std::io::Error),
}

impl CvrError {
    /// Returns `true` for transient upstream failures: transport errors,
    /// rate limiting, and server-side (5xx) statuses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamUnavailable(cvr_api::Error::RequestFailed) => true,
            Self::UpstreamUnavailable(e) => {
                matches!(e.status(), Some(status) if status == 429 || status >= 500)
            }
            _ => false,
        }
    }
}

impl fmt::Display for CvrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamUnavailable(e) => write!(f, "Registry unavailable: {}", e),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
            Self::Timeout(msg) => write!(f, "Timed out: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::ExportFailed(msg) => write!(f, "Export failed: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CvrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UpstreamUnavailable(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<cvr_api::Error> for CvrError {
    fn from(e: cvr_api::Error) -> Self {
        Self::UpstreamUnavailable(e)
    }
}

impl From<ConfigError> for CvrError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for CvrError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
