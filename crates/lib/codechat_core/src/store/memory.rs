//! In-memory chat store.
//!
//! Keeps every chat in a single map behind an async `RwLock`; each write takes
//! the lock once, so an update is atomic with respect to other requests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChatStore, ChatUpdate, StoreResult, UpdateOutcome};
use crate::models::{Chat, Code, DEFAULT_CHAT_NAME, NewChat};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct MemoryChatStore {
    chats: RwLock<HashMap<Uuid, Chat>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chats.
    pub async fn len(&self) -> usize {
        self.chats.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chats.read().await.is_empty()
    }
}

fn apply(chat: &mut Chat, update: &ChatUpdate) {
    if let Some(name) = &update.set_name {
        chat.name.clone_from(name);
    }
    chat.messages.extend(update.push_messages.iter().cloned());
    update.set_code.apply_to(&mut chat.code);
    chat.updated_at = Utc::now();
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Chat>> {
        let chats = self.chats.read().await;
        let mut owned: Vec<Chat> = chats
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(owned)
    }

    async fn find_one(&self, id: Uuid) -> StoreResult<Option<Chat>> {
        Ok(self.chats.read().await.get(&id).cloned())
    }

    async fn insert_one(&self, chat: NewChat) -> StoreResult<Chat> {
        let now = Utc::now();
        let record = Chat {
            id: uuidv7(),
            user_id: chat.user_id,
            name: chat.name,
            messages: Vec::new(),
            code: Code::default(),
            created_at: now,
            updated_at: now,
        };
        self.chats.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_one(
        &self,
        id: Uuid,
        update: &ChatUpdate,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let mut chats = self.chats.write().await;

        if let Some(chat) = chats.get_mut(&id) {
            apply(chat, update);
            return Ok(UpdateOutcome {
                matched: 1,
                upserted: false,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome::default());
        }

        let now = Utc::now();
        let mut chat = Chat {
            id,
            user_id: String::new(),
            name: DEFAULT_CHAT_NAME.to_string(),
            messages: Vec::new(),
            code: Code::default(),
            created_at: now,
            updated_at: now,
        };
        apply(&mut chat, update);
        chats.insert(id, chat);

        Ok(UpdateOutcome {
            matched: 0,
            upserted: true,
        })
    }

    async fn delete_one(&self, id: Uuid) -> StoreResult<u64> {
        Ok(u64::from(self.chats.write().await.remove(&id).is_some()))
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodePatch, Message};

    fn new_chat(user_id: &str) -> NewChat {
        NewChat {
            user_id: user_id.into(),
            name: DEFAULT_CHAT_NAME.into(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryChatStore::new();
        let a = store.insert_one(new_chat("u1")).await.unwrap();
        let b = store.insert_one(new_chat("u1")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn find_by_user_filters_by_owner_in_creation_order() {
        let store = MemoryChatStore::new();
        let first = store.insert_one(new_chat("u1")).await.unwrap();
        store.insert_one(new_chat("u2")).await.unwrap();
        let second = store.insert_one(new_chat("u1")).await.unwrap();

        let ids: Vec<Uuid> = store
            .find_by_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(store.find_by_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_missing_without_upsert_matches_nothing() {
        let store = MemoryChatStore::new();
        let outcome = store
            .update_one(uuidv7(), &ChatUpdate::rename("x"), false)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_missing_with_upsert_creates_record() {
        let store = MemoryChatStore::new();
        let id = uuidv7();
        let update = ChatUpdate {
            set_name: None,
            push_messages: vec![Message::user("q"), Message::ai("a")],
            set_code: CodePatch::non_blank("<p>", "", ""),
        };
        let outcome = store.update_one(id, &update, true).await.unwrap();
        assert!(outcome.upserted);

        let chat = store.find_one(id).await.unwrap().unwrap();
        assert_eq!(chat.name, DEFAULT_CHAT_NAME);
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.code.html, "<p>");
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let store = MemoryChatStore::new();
        let chat = store.insert_one(new_chat("u1")).await.unwrap();
        assert_eq!(store.delete_one(chat.id).await.unwrap(), 1);
        assert_eq!(store.delete_one(chat.id).await.unwrap(), 0);
    }
}
