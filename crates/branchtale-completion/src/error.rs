//! Completion client errors.

use branchtale_core::error::DomainError;
use thiserror::Error;

/// Failures talking to the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, timeout or body decoding failure.
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("completion API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The API answered without any message content.
    #[error("completion API returned no content")]
    EmptyResponse,
}

impl From<CompletionError> for DomainError {
    fn from(err: CompletionError) -> Self {
        DomainError::Upstream(err.to_string())
    }
}
