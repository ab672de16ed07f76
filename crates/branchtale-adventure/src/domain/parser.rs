//! Parsing of model replies into scenes and options.
//!
//! Replies are run through an ordered chain of [`SceneParser`] strategies.
//! Each strategy either produces a scene, declines (the reply is not in a
//! shape it understands) or fails (the reply is in its shape but broken).
//! The first strategy that does not decline decides the result.

use std::fmt;

use branchtale_core::error::DomainError;
use serde_json::{Map, Value};
use tracing::debug;

/// Placeholder used when the line-based parser finds no option A.
pub const MISSING_OPTION_A: &str = "Option A not found.";

/// Placeholder used when the line-based parser finds no option B.
pub const MISSING_OPTION_B: &str = "Option B not found.";

/// Sentences kept when a scene is shown to the player.
pub const MAX_SCENE_SENTENCES: usize = 3;

/// The two options offered after a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneOptions {
    /// Text of option A.
    pub a: String,
    /// Text of option B.
    pub b: String,
}

/// A structured model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScene {
    /// Scene narration, untruncated.
    pub scene: String,
    /// Options for the next choice; absent on the final scene.
    pub options: Option<SceneOptions>,
}

/// What the caller expects the reply to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneShape {
    /// A scene followed by options A and B.
    SceneWithOptions,
    /// A closing scene with no options.
    SceneOnly,
}

/// Result of running one parsing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStep {
    /// The strategy understood the reply.
    Parsed(ParsedScene),
    /// The reply is not in this strategy's format; try the next one.
    Declined,
    /// The reply is in this strategy's format but unusable.
    Failed(String),
}

/// One strategy for turning reply text into a scene.
pub trait SceneParser: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Attempt to parse `text`.
    fn parse(&self, text: &str, shape: SceneShape) -> ParseStep;
}

/// Parses a `{"scene": .., "options": {"A": .., "B": ..}}` object, tolerating
/// prose or code fences around it.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSceneParser;

impl JsonSceneParser {
    fn extract(object: &Map<String, Value>, shape: SceneShape) -> ParseStep {
        let Some(scene) = non_empty_str(object.get("scene")) else {
            return ParseStep::Failed("JSON reply is missing `scene`".to_owned());
        };

        let options = match shape {
            SceneShape::SceneOnly => None,
            SceneShape::SceneWithOptions => {
                let Some(options) = object.get("options").and_then(Value::as_object) else {
                    return ParseStep::Failed("JSON reply is missing `options`".to_owned());
                };
                let Some(a) = option_value(options, "A") else {
                    return ParseStep::Failed("JSON reply is missing `options.A`".to_owned());
                };
                let Some(b) = option_value(options, "B") else {
                    return ParseStep::Failed("JSON reply is missing `options.B`".to_owned());
                };
                Some(SceneOptions { a, b })
            }
        };

        ParseStep::Parsed(ParsedScene { scene, options })
    }
}

impl SceneParser for JsonSceneParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, text: &str, shape: SceneShape) -> ParseStep {
        let trimmed = strip_code_fence(text.trim());
        let looks_like_json = trimmed.starts_with('{');

        let span = match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ if looks_like_json => {
                return ParseStep::Failed("JSON reply is not a complete object".to_owned());
            }
            _ => return ParseStep::Declined,
        };

        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(object)) => Self::extract(&object, shape),
            Ok(_) => ParseStep::Declined,
            Err(e) if looks_like_json => ParseStep::Failed(format!("malformed JSON reply: {e}")),
            Err(_) => ParseStep::Declined,
        }
    }
}

/// Treats the first non-blank line as the scene and the next two as options.
///
/// Missing option lines are replaced with placeholder text rather than
/// failing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineSceneParser;

impl SceneParser for LineSceneParser {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn parse(&self, text: &str, shape: SceneShape) -> ParseStep {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let Some(first) = lines.next() else {
            return ParseStep::Declined;
        };
        let scene = strip_scene_label(first);
        if scene.is_empty() {
            return ParseStep::Declined;
        }

        let options = match shape {
            SceneShape::SceneOnly => None,
            SceneShape::SceneWithOptions => {
                let a = lines
                    .next()
                    .map_or_else(|| MISSING_OPTION_A.to_owned(), |l| strip_option_label(l, 'A'));
                let b = lines
                    .next()
                    .map_or_else(|| MISSING_OPTION_B.to_owned(), |l| strip_option_label(l, 'B'));
                Some(SceneOptions { a, b })
            }
        };

        ParseStep::Parsed(ParsedScene {
            scene: scene.to_owned(),
            options,
        })
    }
}

/// Ordered list of parsing strategies applied until one does not decline.
#[derive(Debug)]
pub struct ParserChain {
    parsers: Vec<Box<dyn SceneParser>>,
}

impl ParserChain {
    /// Creates a chain from explicit strategies, tried in order.
    #[must_use]
    pub fn new(parsers: Vec<Box<dyn SceneParser>>) -> Self {
        Self { parsers }
    }

    /// Strict JSON first, then the line-based fallback.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![Box::new(JsonSceneParser), Box::new(LineSceneParser)])
    }

    /// Parses `text` with the first strategy that accepts it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if a strategy fails or every
    /// strategy declines.
    pub fn parse(&self, text: &str, shape: SceneShape) -> Result<ParsedScene, DomainError> {
        for parser in &self.parsers {
            match parser.parse(text, shape) {
                ParseStep::Parsed(scene) => {
                    debug!(parser = parser.name(), "parsed completion reply");
                    return Ok(scene);
                }
                ParseStep::Failed(reason) => {
                    return Err(DomainError::Upstream(format!(
                        "{} parser rejected reply: {reason}",
                        parser.name()
                    )));
                }
                ParseStep::Declined => {
                    debug!(parser = parser.name(), "parser declined completion reply");
                }
            }
        }
        Err(DomainError::Upstream(
            "no parser could interpret the completion reply".to_owned(),
        ))
    }
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Keeps the first `max` sentences of `text`.
///
/// Sentences are split naively on `". "`, so abbreviations ("Dr. Who") and
/// decimals followed by a space are mis-split. A closing period is added
/// unless the result already ends in terminal punctuation.
#[must_use]
pub fn limit_sentences(text: &str, max: usize) -> String {
    let joined = text.split(". ").take(max).collect::<Vec<_>>().join(". ");
    let trimmed = joined.trim();
    if trimmed.is_empty() || trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_owned()
    } else {
        format!("{trimmed}.")
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn option_value(options: &Map<String, Value>, key: &str) -> Option<String> {
    non_empty_str(options.get(key)).or_else(|| non_empty_str(options.get(&key.to_lowercase())))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.find('\n').map_or("", |i| &rest[i + 1..]);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn strip_scene_label(line: &str) -> &str {
    let line = line.trim_matches('*').trim();
    line.strip_prefix("Scene:")
        .or_else(|| line.strip_prefix("scene:"))
        .map_or(line, str::trim)
}

fn strip_option_label(line: &str, letter: char) -> String {
    let line = line.trim_matches('*').trim();
    let without_word = line
        .strip_prefix("Option ")
        .or_else(|| line.strip_prefix("option "))
        .unwrap_or(line);

    let mut chars = without_word.chars();
    let labelled = chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&letter))
        && chars.next().is_some_and(|c| matches!(c, ':' | ')' | '.'));
    if labelled {
        without_word[2..].trim_start_matches('*').trim().to_owned()
    } else {
        line.to_owned()
    }
}
