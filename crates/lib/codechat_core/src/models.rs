//! Chat domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name every chat starts with until its first prompt renames it.
pub const DEFAULT_CHAT_NAME: &str = "New Chat";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    User,
    Ai,
}

/// A single chat message. Messages are never edited once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageType::User,
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageType::Ai,
        }
    }
}

/// Latest generated code for a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Code {
    pub html: String,
    pub css: String,
    pub js: String,
}

/// Sparse overlay of [`Code`] fields.
///
/// Only fields that are `Some` are written; serializes to a JSON object that
/// contains just those keys, which is what the PostgreSQL store merges in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
}

impl CodePatch {
    /// Keep each field only if it has non-whitespace content.
    pub fn non_blank(html: &str, css: &str, js: &str) -> Self {
        fn keep(value: &str) -> Option<String> {
            (!value.trim().is_empty()).then(|| value.to_string())
        }

        Self {
            html: keep(html),
            css: keep(css),
            js: keep(js),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.css.is_none() && self.js.is_none()
    }

    /// Overwrite the fields of `code` that this patch carries.
    pub fn apply_to(&self, code: &mut Code) {
        if let Some(html) = &self.html {
            code.html.clone_from(html);
        }
        if let Some(css) = &self.css {
            code.css.clone_from(css);
        }
        if let Some(js) = &self.js {
            code.js.clone_from(js);
        }
    }
}

/// A stored chat with its full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub messages: Vec<Message>,
    pub code: Code,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id,
            user_id: self.user_id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The fields returned when listing or creating chats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
}

/// Input for creating a chat record; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub user_id: String,
    pub name: String,
}

/// Result of posting a prompt to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedMessage {
    /// Chat name after the update.
    pub name: String,
    /// The AI reply that was appended.
    pub message: Message,
    /// Code snapshot after the overlay was applied.
    pub code: Code,
}
