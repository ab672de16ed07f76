//! Test completion clients — mock `CompletionClient` implementations.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use branchtale_core::completion::CompletionClient;
use branchtale_core::error::DomainError;

/// A completion client that returns queued replies in order and records
/// every prompt it receives. Returns an upstream error once the queue is
/// empty.
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    /// Create a client that will answer with `replies`, one per call.
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of replies not yet consumed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| DomainError::Upstream("scripted replies exhausted".into()))
    }
}

/// A completion client that always fails. Useful for testing upstream
/// error paths.
#[derive(Debug)]
pub struct FailingCompletionClient;

#[async_trait]
impl CompletionClient for FailingCompletionClient {
    async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::Upstream("connection refused".into()))
    }
}
