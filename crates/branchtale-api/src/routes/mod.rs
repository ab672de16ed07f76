//! Route modules for the adventure service.

pub mod adventure;
pub mod health;
pub mod session;
