//! Session storage abstraction.
//!
//! Game sessions are stored as serialized snapshots keyed by a
//! [`SessionToken`], so the adventure crate owns the session shape while
//! storage adapters only deal in JSON payloads and versions.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Token used when a caller does not supply one.
pub const DEFAULT_SESSION_TOKEN: &str = "default";

/// Caller-supplied key identifying one game session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Builds a token from an optional caller value.
    ///
    /// `None` maps to [`DEFAULT_SESSION_TOKEN`]. Surrounding whitespace is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the supplied value is blank.
    pub fn from_request(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            None => Ok(Self::default()),
            Some(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::Validation(
                        "Session id must not be empty.".to_owned(),
                    ));
                }
                Ok(Self(trimmed.to_owned()))
            }
        }
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self(DEFAULT_SESSION_TOKEN.to_owned())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored representation of a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    /// Key the session is stored under.
    pub token: SessionToken,
    /// Number of committed transitions.
    pub version: u64,
    /// Serialized session state.
    pub payload: serde_json::Value,
    /// Timestamp of the last commit.
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for loading and committing game sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session stored under `token`, if any.
    async fn load(&self, token: &SessionToken) -> Result<Option<StoredSession>, DomainError>;

    /// Store `session` unconditionally, discarding whatever was there.
    ///
    /// The stored version is raised above the discarded session's, so a
    /// commit prepared against the old game can never match the new one.
    async fn replace(&self, session: StoredSession) -> Result<(), DomainError>;

    /// Store `session` only if the stored version still equals
    /// `expected_version`.
    ///
    /// Returns `DomainError::ConcurrencyConflict` when another commit won,
    /// and `DomainError::InvalidState` when the session vanished.
    async fn commit(&self, session: StoredSession, expected_version: u64)
    -> Result<(), DomainError>;
}
