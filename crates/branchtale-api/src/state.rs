//! Shared application state.

use std::sync::{Arc, Mutex};

use branchtale_adventure::domain::rules::GameRules;
use branchtale_core::clock::Clock;
use branchtale_core::completion::CompletionClient;
use branchtale_core::rng::DeterministicRng;
use branchtale_core::session_store::SessionStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Turn budget, win threshold and success keywords.
    pub rules: Arc<GameRules>,
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for scenario selection.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Language-model client.
    pub completion: Arc<dyn CompletionClient>,
    /// Where game sessions live.
    pub session_store: Arc<dyn SessionStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        rules: GameRules,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        completion: Arc<dyn CompletionClient>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            rules: Arc::new(rules),
            clock,
            rng,
            completion,
            session_store,
        }
    }
}
