//! Branchtale — adventure context.
//!
//! Responsible for the turn state machine of a single game, the prompts
//! sent to the completion service, and turning its free-form replies into
//! scenes and options.

pub mod application;
pub mod domain;
