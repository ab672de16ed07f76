//! Domain model for the adventure context.

pub mod commands;
pub mod game;
pub mod parser;
pub mod prompts;
pub mod rules;
pub mod scenarios;
