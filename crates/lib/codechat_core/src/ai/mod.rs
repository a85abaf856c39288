//! AI code generation — turns a prompt into an explanation plus HTML, CSS
//! and JS fragments.
//!
//! # Providers
//!
//! - `"gemini"` — Google Generative Language API, JSON response mode
//! - `"local"` — deterministic echo (offline, no external deps)
//!
//! Use [`provider::from_name`] to build the configured provider.

pub mod config;
pub mod gemini;
pub mod local;
pub mod provider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CodePatch;

/// Errors that can occur while generating code.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Response parse error: {0}")]
    Parse(String),
}

/// Structured result of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Generation {
    pub explanation: String,
    pub html: String,
    pub css: String,
    pub js: String,
}

impl Generation {
    /// Code fields worth storing: those with non-whitespace content.
    pub fn code_patch(&self) -> CodePatch {
        CodePatch::non_blank(&self.html, &self.css, &self.js)
    }
}

/// A provider that answers prompts within a session.
///
/// `session_id` groups prompts of one chat so providers that keep
/// conversational context can thread follow-ups onto earlier turns.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Provider identifier for logging.
    fn name(&self) -> &str;

    /// Generate a reply for `prompt`. Called once per prompt, no retries.
    ///
    /// Does not add the turn to the session; see [`CodeGenerator::record_turn`].
    async fn generate(&self, prompt: &str, session_id: &str) -> Result<Generation, AiError>;

    /// Keep a completed turn as context for later prompts in `session_id`.
    /// Only called once the turn has been written to the chat.
    async fn record_turn(&self, _session_id: &str, _prompt: &str, _generation: &Generation) {}

    /// Drop any context held for `session_id`.
    async fn end_session(&self, _session_id: &str) {}
}
