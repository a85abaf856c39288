//! # codechat_core
//!
//! Core domain logic for Codechat: chat records, the document store seam,
//! AI code generators and the chat workflow that ties them together.

pub mod ai;
pub mod chats;
pub mod hello;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
