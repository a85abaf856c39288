//! Document store seam for chat records.
//!
//! The chat workflow only talks to storage through [`ChatStore`]. Two
//! adapters ship with the crate:
//!
//! - [`postgres::PgChatStore`] — one row per chat, messages and code as JSONB
//! - [`memory::MemoryChatStore`] — in-process map for tests and dev runs

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Chat, CodePatch, Message, NewChat};

pub use memory::MemoryChatStore;
pub use postgres::PgChatStore;

/// Errors raised by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A partial update of one chat record.
///
/// Applied atomically: appended messages, the code overlay and the optional
/// rename land together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatUpdate {
    /// New display name, if the chat should be renamed.
    pub set_name: Option<String>,
    /// Messages appended to the end of the history, in order.
    pub push_messages: Vec<Message>,
    /// Code fields to overwrite.
    pub set_code: CodePatch,
}

impl ChatUpdate {
    /// An update that only renames the chat.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            set_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// What an [`ChatStore::update_one`] call touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of existing records matched by the id.
    pub matched: u64,
    /// True when no record matched and upsert created one.
    pub upserted: bool,
}

/// Storage operations the chat workflow depends on.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Parse an identifier in this store's id format. `None` means the id
    /// is malformed.
    fn parse_id(&self, raw: &str) -> Option<Uuid> {
        crate::uuid::parse_id(raw)
    }

    /// All chats owned by `user_id`, oldest first.
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Chat>>;

    /// Point lookup by id.
    async fn find_one(&self, id: Uuid) -> StoreResult<Option<Chat>>;

    /// Insert a new chat with empty messages and code.
    async fn insert_one(&self, chat: NewChat) -> StoreResult<Chat>;

    /// Apply `update` to the chat with `id`.
    ///
    /// With `upsert`, a missing record is created from the update alone.
    async fn update_one(
        &self,
        id: Uuid,
        update: &ChatUpdate,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome>;

    /// Delete by id, returning the number of records removed.
    async fn delete_one(&self, id: Uuid) -> StoreResult<u64>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> bool;
}
