//! Command handlers for the adventure context.
//!
//! Each handler validates the request, calls the completion service, parses
//! the reply and only then commits the new session state. A failure at any
//! step leaves the stored session untouched.

use std::sync::Mutex;

use branchtale_core::clock::Clock;
use branchtale_core::command::Command;
use branchtale_core::completion::CompletionClient;
use branchtale_core::error::DomainError;
use branchtale_core::rng::DeterministicRng;
use branchtale_core::session_store::{SessionStore, SessionToken};
use tracing::info;

use crate::domain::commands::{ChooseOption, StartAdventure};
use crate::domain::game::{
    Choice, GameSession, NOT_INITIALIZED, TurnResolution, validate_character,
};
use crate::domain::parser::{
    MAX_SCENE_SENTENCES, ParsedScene, ParserChain, SceneOptions, SceneShape, limit_sentences,
};
use crate::domain::prompts::{continuation_prompt, opening_prompt};
use crate::domain::rules::{GameRules, Outcome};
use crate::domain::scenarios::pick_scenario;

/// Result of a successful `StartAdventure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedAdventure {
    /// Token the new game is stored under.
    pub session_id: SessionToken,
    /// The player's character.
    pub character: String,
    /// The randomly chosen quest.
    pub scenario: String,
    /// Opening scene, limited to a few sentences.
    pub scene: String,
    /// Options for the first choice.
    pub options: SceneOptions,
}

impl StartedAdventure {
    /// Introductory line naming the character and quest.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "You are a {}. Your adventure: {}",
            self.character, self.scenario
        )
    }
}

/// Result of a successful `ChooseOption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdventureTurn {
    /// The game continues with a new scene and options.
    Continue {
        /// Token of the game.
        session_id: SessionToken,
        /// The new choice index.
        turn: u32,
        /// Scene, limited to a few sentences.
        scene: String,
        /// Options for the next choice.
        options: SceneOptions,
    },
    /// The turn budget is spent.
    Finished {
        /// Token of the game.
        session_id: SessionToken,
        /// The final choice index.
        turn: u32,
        /// Closing scene, limited to a few sentences.
        scene: String,
        /// Win or lose.
        outcome: Outcome,
    },
}

fn require_options(parsed: &ParsedScene) -> Result<SceneOptions, DomainError> {
    parsed
        .options
        .clone()
        .ok_or_else(|| DomainError::Upstream("completion reply contained no options".to_owned()))
}

/// Handles the `StartAdventure` command: validates the character, picks a
/// scenario, generates the opening scene and replaces whatever session was
/// stored under the token.
///
/// The `Mutex` is locked only around scenario selection, never across an
/// await.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a missing character or blank
/// token, `DomainError::Upstream` if the completion call or parsing fails,
/// and storage errors from the session store.
pub async fn handle_start_adventure(
    command: &StartAdventure,
    rules: &GameRules,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    completion: &dyn CompletionClient,
    store: &dyn SessionStore,
) -> Result<StartedAdventure, DomainError> {
    let character = validate_character(command.character.as_deref())?;
    let token = SessionToken::from_request(command.session_id.as_deref())?;

    let scenario = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        pick_scenario(&mut *rng_guard)
    };

    let reply = completion
        .complete(&opening_prompt(&character, scenario))
        .await?;
    let parsed = ParserChain::standard().parse(&reply, SceneShape::SceneWithOptions)?;
    let options = require_options(&parsed)?;

    let session = GameSession::begin(
        token.clone(),
        character.clone(),
        scenario.to_owned(),
        &parsed,
        clock,
    );
    store.replace(session.to_stored()?).await?;

    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
        session_id = %token,
        scenario,
        max_choices = rules.max_choices(),
        "adventure started"
    );

    Ok(StartedAdventure {
        session_id: token,
        character,
        scenario: scenario.to_owned(),
        scene: limit_sentences(&parsed.scene, MAX_SCENE_SENTENCES),
        options,
    })
}

/// Handles the `ChooseOption` command: loads the session, generates the
/// scene that follows the choice, advances the turn and commits with an
/// optimistic version check.
///
/// The session must exist before the choice is validated, so a game that
/// was never started reports the state error whatever the choice.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` if no game is running under the
/// token or it has finished, `DomainError::Validation` for a choice other
/// than `A`/`B`, `DomainError::Upstream` if the completion call or parsing
/// fails, and `DomainError::ConcurrencyConflict` if another request
/// committed first.
pub async fn handle_choose_option(
    command: &ChooseOption,
    rules: &GameRules,
    clock: &dyn Clock,
    completion: &dyn CompletionClient,
    store: &dyn SessionStore,
) -> Result<AdventureTurn, DomainError> {
    let token = SessionToken::from_request(command.session_id.as_deref())?;
    let stored = store
        .load(&token)
        .await?
        .ok_or_else(|| DomainError::InvalidState(NOT_INITIALIZED.to_owned()))?;
    let mut session = GameSession::from_stored(stored)?;
    let planned = session.plan_turn(rules)?;
    let choice = Choice::parse(command.choice.as_deref())?;

    let shape = if planned.is_final {
        SceneShape::SceneOnly
    } else {
        SceneShape::SceneWithOptions
    };
    let reply = completion
        .complete(&continuation_prompt(&session, choice, planned.is_final))
        .await?;
    let parsed = ParserChain::standard().parse(&reply, shape)?;
    let options = match shape {
        SceneShape::SceneWithOptions => Some(require_options(&parsed)?),
        SceneShape::SceneOnly => None,
    };

    let expected_version = session.version();
    let resolution = session.advance(choice, &parsed, rules, clock)?;
    store.commit(session.to_stored()?, expected_version).await?;

    let scene = limit_sentences(&parsed.scene, MAX_SCENE_SENTENCES);
    match (resolution, options) {
        (TurnResolution::Finished { turn, outcome }, _) => {
            info!(
                command_type = command.command_type(),
                correlation_id = %command.correlation_id,
                session_id = %token,
                turn,
                success_count = session.success_count(),
                outcome = outcome.as_str(),
                "adventure finished"
            );
            Ok(AdventureTurn::Finished {
                session_id: token,
                turn,
                scene,
                outcome,
            })
        }
        (TurnResolution::Continue { turn }, Some(options)) => {
            info!(
                command_type = command.command_type(),
                correlation_id = %command.correlation_id,
                session_id = %token,
                choice = choice.as_str(),
                turn,
                "adventure advanced"
            );
            Ok(AdventureTurn::Continue {
                session_id: token,
                turn,
                scene,
                options,
            })
        }
        (TurnResolution::Continue { .. }, None) => Err(DomainError::Upstream(
            "completion reply contained no options".to_owned(),
        )),
    }
}
