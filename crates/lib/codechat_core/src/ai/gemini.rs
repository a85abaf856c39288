//! Gemini code generator.
//!
//! Calls `models/{model}:generateContent` with JSON response mode and parses
//! the single text part as a [`Generation`]. Each session keeps its own
//! conversation history in memory so follow-up prompts can refer back to
//! earlier code. Only turns passed to `record_turn` enter the history, and
//! at most `max_sessions` sessions are kept. No retries: a failed call is
//! returned to the caller as-is.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::GeminiConfig;
use super::{AiError, CodeGenerator, Generation};

const SYSTEM_PROMPT: &str = "You are a front-end assistant that builds small web pages. \
Reply with a single JSON object with exactly these string fields: \
\"explanation\" (a short description of what you built or changed), \
\"html\" (body markup only), \"css\" (a complete stylesheet) and \"js\" (plain script). \
Always return the full current version of every file you change. \
Use an empty string for any file that does not need to change.";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user".into(),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model".into(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [PartRef<'a>; 1],
}

#[derive(Serialize)]
struct PartRef<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

struct Session {
    turns: Vec<Content>,
    /// Value of the generator's use counter when last recorded to.
    last_used: u64,
}

/// Gemini-backed [`CodeGenerator`] with per-session history.
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
    sessions: DashMap<String, Session>,
    uses: AtomicU64,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            sessions: DashMap::new(),
            uses: AtomicU64::new(0),
        })
    }

    /// Number of sessions with stored history.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn history(&self, session_id: &str) -> Vec<Content> {
        self.sessions
            .get(session_id)
            .map(|s| s.turns.clone())
            .unwrap_or_default()
    }

    fn remember(&self, session_id: &str, prompt: &str, reply: &str) {
        if !self.sessions.contains_key(session_id) {
            self.evict_to_fit();
        }

        let max_entries = self.config.max_history_turns * 2;
        let tick = self.uses.fetch_add(1, Ordering::Relaxed);
        let mut session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                turns: Vec::new(),
                last_used: tick,
            });
        session.last_used = tick;
        session.turns.push(Content::user(prompt));
        session.turns.push(Content::model(reply));
        if session.turns.len() > max_entries {
            let excess = session.turns.len() - max_entries;
            session.turns.drain(..excess);
        }
    }

    /// Drop least recently used sessions until one more fits.
    fn evict_to_fit(&self) {
        while self.sessions.len() >= self.config.max_sessions.max(1) {
            // The iterator holds shard read locks; release them before removing.
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|s| s.last_used)
                .map(|s| s.key().clone());
            let Some(oldest) = oldest else { break };
            self.sessions.remove(&oldest);
            debug!(session_id = %oldest, "evicted Gemini session history");
        }
    }
}

#[async_trait]
impl CodeGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, session_id: &str) -> Result<Generation, AiError> {
        // Snapshot the history so no map guard is held across the request.
        let mut contents = self.history(session_id);
        contents.push(Content::user(prompt));

        let body = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: [PartRef { text: SYSTEM_PROMPT }],
            },
            contents: &contents,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.config.temperature,
            },
        };

        debug!(
            session_id,
            model = %self.config.model,
            history = contents.len() - 1,
            "calling Gemini generateContent"
        );

        let resp = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(session_id, %status, "Gemini request rejected");
            return Err(AiError::Provider(format!(
                "Gemini generateContent failed: {status} {body}"
            )));
        }

        let data: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| AiError::Parse(format!("Gemini response body: {e}")))?;

        let text = first_text(data)?;
        parse_generation(&text)
    }

    async fn record_turn(&self, session_id: &str, prompt: &str, generation: &Generation) {
        match serde_json::to_string(generation) {
            Ok(reply) => self.remember(session_id, prompt, &reply),
            Err(e) => warn!(session_id, "could not serialize turn for history: {e}"),
        }
    }

    async fn end_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }
}

fn first_text(data: GenerateResponse) -> Result<String, AiError> {
    data.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AiError::Provider("Gemini returned no candidates".to_string()))
}

/// Parse the model's JSON reply, tolerating a surrounding Markdown fence.
fn parse_generation(text: &str) -> Result<Generation, AiError> {
    let trimmed = text.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(json.trim())
        .map_err(|e| AiError::Parse(format!("Gemini reply is not a generation object: {e}")))
}
