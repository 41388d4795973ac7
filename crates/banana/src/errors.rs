use thiserror::Error;

/// Request-level failures on the relay side
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("{0}")]
    Configuration(String),

    #[error("{message}")]
    UpstreamRejection { status: u16, message: String },

    #[error("Request to upstream failed: {0}")]
    Transport(String),

    #[error("Upstream stream failed: {0}")]
    UpstreamStream(String),

    #[error("Relay exceeded its {0}s deadline")]
    DeadlineExceeded(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP status to report for this error when no stream has started yet
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::UpstreamRejection { status, .. } => *status,
            RelayError::DeadlineExceeded(_) => 504,
            _ => 500,
        }
    }
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Search API key not configured")]
    MissingCredentials,

    #[error("Search failed with status {0}")]
    Status(u16),

    #[error("Search error: {0}")]
    Transport(String),

    #[error("Search response could not be decoded: {0}")]
    Decode(String),
}

/// Failures observed by the stream consumer
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    /// The body failed after some text may already have been published
    #[error("Stream interrupted: {reason}")]
    Interrupted { partial: String, reason: String },

    #[error("No content was generated. This might be a parsing issue or empty response from the API.")]
    EmptyResult,
}

pub type RelayResult<T> = Result<T, RelayError>;
