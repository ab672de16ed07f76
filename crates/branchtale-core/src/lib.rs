//! Branchtale Core — shared domain abstractions.
//!
//! This crate defines the error taxonomy and the ports (session storage,
//! text completion, clock, randomness) that the adventure logic depends on.
//! It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod completion;
pub mod error;
pub mod rng;
pub mod session_store;
