//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A request field is missing or holds a value outside its allowed set.
    #[error("{0}")]
    Validation(String),

    /// An operation was invoked out of sequence (e.g. adventure before start).
    #[error("{0}")]
    InvalidState(String),

    /// No session is stored under the requested token.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Another request committed to the same session first.
    #[error("concurrency conflict on session {token}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The session that had the conflict.
        token: String,
        /// The version the caller read.
        expected: u64,
        /// The version found in the store.
        actual: u64,
    },

    /// The completion service failed or returned content that could not be parsed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A storage or serialization error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
