//! Shared test doubles and utilities for the Branchtale adventure service.

mod clock;
mod completion;
mod rng;
mod session_store;

pub use clock::FixedClock;
pub use completion::{FailingCompletionClient, ScriptedCompletionClient};
pub use rng::{MockRng, SequenceRng};
pub use session_store::{FailingSessionStore, RecordingSessionStore};
