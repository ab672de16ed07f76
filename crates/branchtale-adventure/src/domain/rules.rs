//! Tunable game rules: turn budget, win threshold and the success heuristic.

use branchtale_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of turns in a game, counting the opening scene.
pub const DEFAULT_MAX_CHOICES: u32 = 6;

/// Successful scenes required to win.
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 4;

/// Words whose presence in a scene counts that turn as a success.
pub const DEFAULT_SUCCESS_KEYWORDS: &[&str] = &[
    "success",
    "successful",
    "succeed",
    "succeeds",
    "victory",
    "victorious",
    "triumph",
    "triumphant",
    "win",
    "won",
    "overcome",
    "rescued",
    "defeated",
    "escaped",
    "achieved",
    "safely",
];

/// Message returned when the quest is won.
pub const WIN_MESSAGE: &str = "Congratulations! You completed your quest.";

/// Message returned when the quest is lost.
pub const LOSE_MESSAGE: &str = "Your quest ends in failure, but every adventure teaches a lesson.";

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The success count reached the threshold.
    Win,
    /// The success count fell short.
    Lose,
}

impl Outcome {
    /// The player-facing closing message.
    #[must_use]
    pub fn final_message(self) -> &'static str {
        match self {
            Self::Win => WIN_MESSAGE,
            Self::Lose => LOSE_MESSAGE,
        }
    }

    /// Lowercase name used in API responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}

/// Rules governing turn count and outcome.
///
/// The success heuristic is a crude keyword match on scene text, not
/// sentiment analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    max_choices: u32,
    success_threshold: u32,
    success_keywords: Vec<String>,
}

impl GameRules {
    /// Creates a rule set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `max_choices` is below 2 (a game
    /// needs an opening and at least one choice) or no keywords are given.
    pub fn new<I, S>(
        max_choices: u32,
        success_threshold: u32,
        success_keywords: I,
    ) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if max_choices < 2 {
            return Err(DomainError::Validation(format!(
                "max choices must be at least 2, got {max_choices}"
            )));
        }
        let success_keywords: Vec<String> = success_keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if success_keywords.is_empty() {
            return Err(DomainError::Validation(
                "at least one success keyword is required".to_owned(),
            ));
        }
        Ok(Self {
            max_choices,
            success_threshold,
            success_keywords,
        })
    }

    /// Turn budget, counting the opening scene as turn 1.
    #[must_use]
    pub fn max_choices(&self) -> u32 {
        self.max_choices
    }

    /// Successful scenes required to win.
    #[must_use]
    pub fn success_threshold(&self) -> u32 {
        self.success_threshold
    }

    /// Whether a turn taken at `turn` is the last one.
    #[must_use]
    pub fn is_final_turn(&self, turn: u32) -> bool {
        turn + 1 >= self.max_choices
    }

    /// Returns `true` if any whole word of `scene` is a success keyword.
    #[must_use]
    pub fn is_success(&self, scene: &str) -> bool {
        scene
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .any(|word| self.success_keywords.iter().any(|k| *k == word))
    }

    /// Computes the outcome for a final success count.
    #[must_use]
    pub fn outcome(&self, success_count: u32) -> Outcome {
        if success_count >= self.success_threshold {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_choices: DEFAULT_MAX_CHOICES,
            success_threshold: DEFAULT_SUCCESS_THRESHOLD,
            success_keywords: DEFAULT_SUCCESS_KEYWORDS
                .iter()
                .map(|k| (*k).to_owned())
                .collect(),
        }
    }
}
