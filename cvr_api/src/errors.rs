//! Error types for the registry search client.

/// Errors that can occur when querying the registry search endpoint.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("Request failed")]
    RequestFailed,
    /// The registry returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not a search result envelope.
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
}

impl Error {
    /// Returns the HTTP status code, if the registry answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
