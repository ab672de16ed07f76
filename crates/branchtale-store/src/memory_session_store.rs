//! In-memory implementation of the `SessionStore` trait.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use branchtale_core::error::DomainError;
use branchtale_core::session_store::{SessionStore, SessionToken, StoredSession};

/// Process-local session store. The lock is held only for map access, never
/// across an await.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionToken, StoredSession>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    /// Whether no sessions are stored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionToken, StoredSession>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session store mutex poisoned: {e}")))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.lock()?.get(token).cloned())
    }

    async fn replace(&self, mut session: StoredSession) -> Result<(), DomainError> {
        let mut sessions = self.lock()?;
        if let Some(current) = sessions.get(&session.token) {
            session.version = session.version.max(current.version + 1);
        }
        debug!(session_id = %session.token, version = session.version, "replacing session");
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn commit(
        &self,
        session: StoredSession,
        expected_version: u64,
    ) -> Result<(), DomainError> {
        let mut sessions = self.lock()?;
        let Some(current) = sessions.get(&session.token) else {
            return Err(DomainError::InvalidState(format!(
                "session {} no longer exists",
                session.token
            )));
        };
        if current.version != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                token: session.token.to_string(),
                expected: expected_version,
                actual: current.version,
            });
        }
        debug!(session_id = %session.token, version = session.version, "committing session");
        sessions.insert(session.token.clone(), session);
        Ok(())
    }
}
