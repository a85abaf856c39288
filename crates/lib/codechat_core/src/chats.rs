//! Chat workflow.
//!
//! [`ChatService`] implements the chat operations on top of a [`ChatStore`]
//! and a [`CodeGenerator`]. Every operation that takes a chat id validates it
//! first, so a malformed id is reported as [`ChatError::InvalidArgument`]
//! without touching storage or the AI provider.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::{AiError, CodeGenerator, Generation};
use crate::models::{Chat, ChatSummary, DEFAULT_CHAT_NAME, Message, NewChat, PostedMessage};
use crate::store::{ChatStore, ChatUpdate, StoreError};

/// Errors returned by chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("AI provider failed: {0}")]
    Upstream(#[from] AiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ChatError {
    fn invalid_chat_id() -> Self {
        Self::InvalidArgument("Invalid chat ID".into())
    }

    fn chat_not_found() -> Self {
        Self::NotFound("Chat not found".into())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

/// Tunables for [`ChatService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatServiceOptions {
    /// Recreate the chat if it disappears between the lookup and the write
    /// of a posted message. The post is reported as `NotFound` either way.
    pub upsert_on_post: bool,
}

/// Chat operations over a store and an AI provider.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn ChatStore>,
    generator: Arc<dyn CodeGenerator>,
    options: ChatServiceOptions,
}

impl ChatService {
    pub fn new(store: Arc<dyn ChatStore>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self::with_options(store, generator, ChatServiceOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn ChatStore>,
        generator: Arc<dyn CodeGenerator>,
        options: ChatServiceOptions,
    ) -> Self {
        Self {
            store,
            generator,
            options,
        }
    }

    /// Whether the backing store answers.
    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await
    }

    fn chat_id(&self, raw: &str) -> ChatResult<Uuid> {
        self.store
            .parse_id(raw)
            .ok_or_else(ChatError::invalid_chat_id)
    }

    /// All chats owned by `user_id`, oldest first. No chats is an empty list.
    pub async fn list_chats(&self, user_id: &str) -> ChatResult<Vec<ChatSummary>> {
        let chats = self.store.find_by_user(user_id).await?;
        Ok(chats.iter().map(Chat::summary).collect())
    }

    /// Create a chat for `user_id`; a missing or blank name becomes "New Chat".
    pub async fn create_chat(&self, user_id: &str, name: Option<&str>) -> ChatResult<ChatSummary> {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_CHAT_NAME);

        let chat = self
            .store
            .insert_one(NewChat {
                user_id: user_id.to_string(),
                name: name.to_string(),
            })
            .await?;

        info!(chat_id = %chat.id, user_id, "chat created");
        Ok(chat.summary())
    }

    pub async fn rename_chat(&self, chat_id: &str, name: &str) -> ChatResult<()> {
        let id = self.chat_id(chat_id)?;
        let outcome = self
            .store
            .update_one(id, &ChatUpdate::rename(name), false)
            .await?;
        if outcome.matched == 0 {
            return Err(ChatError::chat_not_found());
        }

        info!(chat_id = %id, "chat renamed");
        Ok(())
    }

    pub async fn get_chat(&self, chat_id: &str) -> ChatResult<Chat> {
        let id = self.chat_id(chat_id)?;
        self.store
            .find_one(id)
            .await?
            .ok_or_else(ChatError::chat_not_found)
    }

    pub async fn delete_chat(&self, chat_id: &str) -> ChatResult<()> {
        let id = self.chat_id(chat_id)?;
        if self.store.delete_one(id).await? == 0 {
            return Err(ChatError::chat_not_found());
        }

        self.generator.end_session(&id.to_string()).await;
        info!(chat_id = %id, "chat deleted");
        Ok(())
    }

    /// Send `prompt` to the AI provider and record the turn on the chat.
    ///
    /// The provider is called before the chat is looked up, so a chat
    /// deleted in the meantime still costs one generation. The turn only
    /// enters the provider's session context once it has been stored.
    pub async fn post_message(&self, prompt: &str, chat_id: &str) -> ChatResult<PostedMessage> {
        let id = self.chat_id(chat_id)?;
        let session_id = id.to_string();

        let generation = self
            .generator
            .generate(prompt, &session_id)
            .await
            .inspect_err(|e| {
                warn!(chat_id = %id, provider = self.generator.name(), "generation failed: {e}");
            })?;

        let chat = self
            .store
            .find_one(id)
            .await?
            .ok_or_else(ChatError::chat_not_found)?;

        let (update, posted) = plan_turn(&chat, prompt, &generation);

        let outcome = self
            .store
            .update_one(id, &update, self.options.upsert_on_post)
            .await?;
        if outcome.matched == 0 {
            if outcome.upserted {
                warn!(chat_id = %id, "chat vanished before update, recreated by upsert");
            }
            return Err(ChatError::chat_not_found());
        }

        self.generator
            .record_turn(&session_id, prompt, &generation)
            .await;

        info!(
            chat_id = %id,
            renamed = update.set_name.is_some(),
            code_fields = code_field_count(&update),
            "message posted"
        );
        Ok(posted)
    }
}

/// Build the update for one prompt/reply turn and the response it yields.
///
/// Appends `[USER(prompt), AI(explanation)]`, overlays non-blank code fields
/// and renames a chat still called "New Chat" to the raw prompt text.
pub fn plan_turn(
    chat: &Chat,
    prompt: &str,
    generation: &Generation,
) -> (ChatUpdate, PostedMessage) {
    let ai_message = Message::ai(generation.explanation.clone());
    let set_code = generation.code_patch();
    let set_name = (chat.name == DEFAULT_CHAT_NAME).then(|| prompt.to_string());

    let mut code = chat.code.clone();
    set_code.apply_to(&mut code);

    let posted = PostedMessage {
        name: set_name.clone().unwrap_or_else(|| chat.name.clone()),
        message: ai_message.clone(),
        code,
    };

    let update = ChatUpdate {
        set_name,
        push_messages: vec![Message::user(prompt), ai_message],
        set_code,
    };

    (update, posted)
}

fn code_field_count(update: &ChatUpdate) -> usize {
    let patch = &update.set_code;
    [patch.html.is_some(), patch.css.is_some(), patch.js.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count()
}
