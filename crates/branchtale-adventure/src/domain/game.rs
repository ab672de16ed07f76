//! The game session aggregate and its turn state machine.
//!
//! A token with no stored session is `Idle`. `start` creates an `Active`
//! session at turn 1; each choice advances the turn until the rules say the
//! turn budget is spent, at which point the session is `Finished` with an
//! outcome. Finished sessions accept no further choices.

use branchtale_core::clock::Clock;
use branchtale_core::error::DomainError;
use branchtale_core::session_store::{SessionToken, StoredSession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parser::ParsedScene;
use super::rules::{GameRules, Outcome};

/// Message for a missing or blank character.
pub const CHARACTER_REQUIRED: &str = "Character is required to start the game.";

/// Message for a choice outside `A`/`B`.
pub const INVALID_CHOICE: &str = "Invalid choice. Please choose A or B.";

/// Message for a choice made before `start`.
pub const NOT_INITIALIZED: &str = "Game not initialized. Please start a new game.";

/// Message for a choice made after the final turn.
pub const ALREADY_FINISHED: &str = "The adventure has ended. Please start a new game.";

/// Validates and trims the character supplied to `start`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the character is missing or blank.
pub fn validate_character(raw: Option<&str>) -> Result<String, DomainError> {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| DomainError::Validation(CHARACTER_REQUIRED.to_owned()))
}

/// A player's binary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Option A.
    A,
    /// Option B.
    B,
}

impl Choice {
    /// Parses a request value. Only the exact strings `"A"` and `"B"` are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for anything else, including a
    /// missing value.
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw {
            Some("A") => Ok(Self::A),
            Some("B") => Ok(Self::B),
            _ => Err(DomainError::Validation(INVALID_CHOICE.to_owned())),
        }
    }

    /// The letter for this choice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// What led to a progress entry: the opening, or a player choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepChoice {
    /// The opening scene.
    #[serde(rename = "start")]
    Start,
    /// Player picked option A.
    A,
    /// Player picked option B.
    B,
}

impl From<Choice> for StepChoice {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::A => Self::A,
            Choice::B => Self::B,
        }
    }
}

/// One entry of narrative history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStep {
    /// What prompted this scene.
    pub choice: StepChoice,
    /// The full scene text returned by the model.
    pub result: String,
}

/// Explicit turn state of a stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GamePhase {
    /// Awaiting the player's choice for `turn`.
    Active {
        /// Current choice index, starting at 1.
        turn: u32,
    },
    /// The turn budget is spent.
    Finished {
        /// Final choice index (equals the rules' max choices).
        turn: u32,
        /// Win or lose.
        outcome: Outcome,
    },
}

/// A turn about to be played, computed before calling the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTurn {
    /// The current choice index.
    pub turn: u32,
    /// Whether this turn ends the game.
    pub is_final: bool,
}

/// Result of applying a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResolution {
    /// The game continues at `turn`.
    Continue {
        /// The new choice index.
        turn: u32,
    },
    /// The game ended.
    Finished {
        /// The final choice index.
        turn: u32,
        /// Win or lose.
        outcome: Outcome,
    },
}

/// Serialized part of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GameState {
    character: String,
    scenario: String,
    phase: GamePhase,
    progress: Vec<ProgressStep>,
    success_count: u32,
    started_at: DateTime<Utc>,
}

/// The aggregate root for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    token: SessionToken,
    version: u64,
    updated_at: DateTime<Utc>,
    state: GameState,
}

impl GameSession {
    /// Starts a fresh game at turn 1 with the opening scene recorded.
    #[must_use]
    pub fn begin(
        token: SessionToken,
        character: String,
        scenario: String,
        opening: &ParsedScene,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            token,
            version: 1,
            updated_at: now,
            state: GameState {
                character,
                scenario,
                phase: GamePhase::Active { turn: 1 },
                progress: vec![ProgressStep {
                    choice: StepChoice::Start,
                    result: opening.scene.clone(),
                }],
                success_count: 0,
                started_at: now,
            },
        }
    }

    /// Rehydrates a session from its stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload does not
    /// deserialize.
    pub fn from_stored(stored: StoredSession) -> Result<Self, DomainError> {
        let state: GameState = serde_json::from_value(stored.payload).map_err(|e| {
            DomainError::Infrastructure(format!("session deserialization failed: {e}"))
        })?;
        Ok(Self {
            token: stored.token,
            version: stored.version,
            updated_at: stored.updated_at,
            state,
        })
    }

    /// Serializes the session for storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails.
    pub fn to_stored(&self) -> Result<StoredSession, DomainError> {
        let payload = serde_json::to_value(&self.state).map_err(|e| {
            DomainError::Infrastructure(format!("session serialization failed: {e}"))
        })?;
        Ok(StoredSession {
            token: self.token.clone(),
            version: self.version,
            payload,
            updated_at: self.updated_at,
        })
    }

    /// Checks that a choice can be made and whether it is the last one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the game has finished.
    pub fn plan_turn(&self, rules: &GameRules) -> Result<PlannedTurn, DomainError> {
        match self.state.phase {
            GamePhase::Active { turn } => Ok(PlannedTurn {
                turn,
                is_final: rules.is_final_turn(turn),
            }),
            GamePhase::Finished { .. } => {
                Err(DomainError::InvalidState(ALREADY_FINISHED.to_owned()))
            }
        }
    }

    /// Records `choice` and the scene it produced, then advances the turn.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the game has finished.
    pub fn advance(
        &mut self,
        choice: Choice,
        scene: &ParsedScene,
        rules: &GameRules,
        clock: &dyn Clock,
    ) -> Result<TurnResolution, DomainError> {
        let planned = self.plan_turn(rules)?;

        self.state.progress.push(ProgressStep {
            choice: choice.into(),
            result: scene.scene.clone(),
        });
        if rules.is_success(&scene.scene) {
            self.state.success_count += 1;
        }

        let next_turn = planned.turn + 1;
        let resolution = if planned.is_final {
            let outcome = rules.outcome(self.state.success_count);
            self.state.phase = GamePhase::Finished {
                turn: next_turn,
                outcome,
            };
            TurnResolution::Finished {
                turn: next_turn,
                outcome,
            }
        } else {
            self.state.phase = GamePhase::Active { turn: next_turn };
            TurnResolution::Continue { turn: next_turn }
        };

        self.version += 1;
        self.updated_at = clock.now();
        Ok(resolution)
    }

    /// Key the session is stored under.
    #[must_use]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Number of committed transitions.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The player's character.
    #[must_use]
    pub fn character(&self) -> &str {
        &self.state.character
    }

    /// The quest premise.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.state.scenario
    }

    /// Current turn state.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Current choice index.
    #[must_use]
    pub fn current_choice(&self) -> u32 {
        match self.state.phase {
            GamePhase::Active { turn } | GamePhase::Finished { turn, .. } => turn,
        }
    }

    /// Narrative history, oldest first.
    #[must_use]
    pub fn progress(&self) -> &[ProgressStep] {
        &self.state.progress
    }

    /// Scenes counted as successes so far.
    #[must_use]
    pub fn success_count(&self) -> u32 {
        self.state.success_count
    }

    /// When the game was started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.state.started_at
    }

    /// When the game last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
