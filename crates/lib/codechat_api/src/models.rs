//! Request and response bodies.
//!
//! Each operation gets its own explicit struct. Request bodies with required
//! text are checked by their `validate` method before the chat workflow runs.

use codechat_core::models::{Chat, ChatSummary, Code, Message, PostedMessage};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `GET /api/hello` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloWorldResponse {
    pub greeting: String,
    pub db_connected: bool,
}

/// Plain acknowledgement for rename and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummaryResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

impl From<ChatSummary> for ChatSummaryResponse {
    fn from(s: ChatSummary) -> Self {
        Self {
            id: s.id.to_string(),
            user_id: s.user_id,
            name: s.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatSummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDetailResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub messages: Vec<Message>,
    pub code: Code,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Chat> for ChatDetailResponse {
    fn from(c: Chat) -> Self {
        Self {
            id: c.id.to_string(),
            user_id: c.user_id,
            name: c.name,
            messages: c.messages,
            code: c.code,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// `POST /api/users/{user_id}/chats` body. The body itself is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// `PATCH /api/chats/{chat_id}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChatRequest {
    pub name: String,
}

impl RenameChatRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Chat name must not be empty".into()));
        }
        Ok(())
    }
}

/// `POST /api/chats/{chat_id}/messages` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub input: String,
}

impl PromptRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.input.trim().is_empty() {
            return Err(AppError::Validation("Prompt input must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub name: String,
    pub message: Message,
    pub code: Code,
}

impl From<PostedMessage> for PostMessageResponse {
    fn from(p: PostedMessage) -> Self {
        Self {
            name: p.name,
            message: p.message,
            code: p.code,
        }
    }
}
