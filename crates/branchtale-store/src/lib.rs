//! Branchtale Store — session storage adapters.
//!
//! Only an in-memory adapter exists; sessions do not survive a restart.

pub mod memory_session_store;
