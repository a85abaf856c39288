//! Request handlers.

pub mod chats;
pub mod hello;
