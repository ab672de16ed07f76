//! Test session stores — mock `SessionStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use branchtale_core::error::DomainError;
use branchtale_core::session_store::{SessionStore, SessionToken, StoredSession};

/// A session store backed by a map that records every write. Enforces the
/// same version check as the production store.
#[derive(Debug, Default)]
pub struct RecordingSessionStore {
    sessions: Mutex<HashMap<SessionToken, StoredSession>>,
    writes: Mutex<Vec<StoredSession>>,
}

impl RecordingSessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `sessions`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_sessions(sessions: Vec<StoredSession>) -> Self {
        let store = Self::new();
        {
            let mut map = store.sessions.lock().unwrap();
            for session in sessions {
                map.insert(session.token.clone(), session);
            }
        }
        store
    }

    /// Returns the session currently stored under `token`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn get(&self, token: &SessionToken) -> Option<StoredSession> {
        self.sessions.lock().unwrap().get(token).cloned()
    }

    /// Returns a snapshot of every successful write, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<StoredSession> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn load(&self, token: &SessionToken) -> Result<Option<StoredSession>, DomainError> {
        Ok(self.get(token))
    }

    async fn replace(&self, mut session: StoredSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(current) = sessions.get(&session.token) {
            session.version = session.version.max(current.version + 1);
        }
        self.writes.lock().unwrap().push(session.clone());
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn commit(
        &self,
        session: StoredSession,
        expected_version: u64,
    ) -> Result<(), DomainError> {
        let mut sessions = self.sessions.lock().unwrap();
        let actual = sessions.get(&session.token).map(|s| s.version);
        match actual {
            Some(actual) if actual == expected_version => {
                self.writes.lock().unwrap().push(session.clone());
                sessions.insert(session.token.clone(), session);
                Ok(())
            }
            Some(actual) => Err(DomainError::ConcurrencyConflict {
                token: session.token.to_string(),
                expected: expected_version,
                actual,
            }),
            None => Err(DomainError::InvalidState(format!(
                "session {} no longer exists",
                session.token
            ))),
        }
    }
}

/// A session store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn load(&self, _token: &SessionToken) -> Result<Option<StoredSession>, DomainError> {
        Err(DomainError::Infrastructure("session store unavailable".into()))
    }

    async fn replace(&self, _session: StoredSession) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("session store unavailable".into()))
    }

    async fn commit(
        &self,
        _session: StoredSession,
        _expected_version: u64,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("session store unavailable".into()))
    }
}
