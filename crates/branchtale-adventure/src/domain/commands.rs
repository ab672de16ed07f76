//! Commands for the adventure context.
//!
//! Commands carry raw request values; validation happens in the handlers so
//! that the order of checks (state before choice) is kept in one place.

use branchtale_core::command::Command;
use uuid::Uuid;

/// Command to start (or restart) a game.
#[derive(Debug, Clone)]
pub struct StartAdventure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Caller-supplied session token, if any.
    pub session_id: Option<String>,
    /// Caller-supplied character description, if any.
    pub character: Option<String>,
}

impl Command for StartAdventure {
    fn command_type(&self) -> &'static str {
        "adventure.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to make the next choice in a running game.
#[derive(Debug, Clone)]
pub struct ChooseOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Caller-supplied session token, if any.
    pub session_id: Option<String>,
    /// Caller-supplied choice, expected to be `A` or `B`.
    pub choice: Option<String>,
}

impl Command for ChooseOption {
    fn command_type(&self) -> &'static str {
        "adventure.choose_option"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
