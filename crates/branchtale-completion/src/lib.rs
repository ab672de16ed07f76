//! Branchtale Completion — client for OpenAI-compatible chat-completion APIs.
//!
//! Implements the core `CompletionClient` port. One request per call, no
//! retries and no streaming.

pub mod client;
pub mod config;
pub mod error;

pub use client::OpenAiCompletionClient;
pub use config::CompletionConfig;
pub use error::CompletionError;
