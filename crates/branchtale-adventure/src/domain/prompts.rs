//! Prompt construction for the completion service.
//!
//! Every prompt asks for a strict JSON object so replies can be parsed by
//! [`JsonSceneParser`](super::parser::JsonSceneParser); the line-based parser
//! remains as a fallback for models that ignore the contract.

use super::game::{Choice, GameSession};

const OPTIONS_CONTRACT: &str = r#"Respond with only a JSON object, no other text, in exactly this shape:
{"scene": "<the scene>", "options": {"A": "<first option>", "B": "<second option>"}}"#;

const FINAL_CONTRACT: &str = r#"Respond with only a JSON object, no other text, in exactly this shape:
{"scene": "<the closing scene>"}"#;

/// Prompt for the opening scene of a new game.
#[must_use]
pub fn opening_prompt(character: &str, scenario: &str) -> String {
    format!(
        "You are the narrator of a choose-your-own-adventure game.\n\
         The player is a {character} on a quest: {scenario}\n\
         Describe the opening scene in 2-3 sentences. Then provide two distinct options, A and B, \
         for what the player could do next.\n\
         {contract}",
        contract = OPTIONS_CONTRACT,
    )
}

/// Prompt for the scene that follows the player's `choice`.
///
/// When `is_final` is set the model is asked to resolve the quest and give no
/// further options.
#[must_use]
pub fn continuation_prompt(session: &GameSession, choice: Choice, is_final: bool) -> String {
    let history = session
        .progress()
        .iter()
        .map(|step| step.result.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let turn = session.current_choice();

    let instructions = if is_final {
        format!(
            "This is the final scene. Write it in 2-3 sentences and bring the quest to a close.\n\
             {contract}",
            contract = FINAL_CONTRACT,
        )
    } else {
        format!(
            "Write the next part of the story in 2-3 sentences. Then provide two new options, \
             A and B.\n\
             {contract}",
            contract = OPTIONS_CONTRACT,
        )
    };

    format!(
        "You are the narrator of a choose-your-own-adventure game.\n\
         The player is a {character} on a quest: {scenario}\n\
         Continue the story based on the previous scenes:\n\
         {history}\n\
         This is choice #{turn}. The player chose: {choice}.\n\
         {instructions}",
        character = session.character(),
        scenario = session.scenario(),
        choice = choice.as_str(),
    )
}
