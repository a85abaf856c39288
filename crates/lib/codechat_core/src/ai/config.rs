//! Gemini provider configuration.
//!
//! Resolved from environment variables; the API key is required, everything
//! else has a default.

use std::env;
use std::time::Duration;

use url::Url;

use super::AiError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Prompts beyond this many turns are dropped from the session context.
pub const DEFAULT_MAX_HISTORY_TURNS: usize = 20;

/// Sessions kept in memory before the least recently used one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Resolved configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// API root, without the trailing `/models/...` path.
    pub base_url: Url,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_history_turns: usize,
    pub max_sessions: usize,
}

impl GeminiConfig {
    /// Build a config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AiError> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: parse_base_url(DEFAULT_GEMINI_BASE_URL)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: None,
            max_history_turns: DEFAULT_MAX_HISTORY_TURNS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        })
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable              | Default                                 |
    /// |-----------------------|-----------------------------------------|
    /// | `GEMINI_API_KEY` / `GOOGLE_GENERATIVE_AI_API_KEY` | required    |
    /// | `GEMINI_MODEL`        | `gemini-1.5-flash`                      |
    /// | `GEMINI_BASE_URL`     | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_TIMEOUT_SECS` | `60`                                    |
    /// | `GEMINI_TEMPERATURE`  | provider default                        |
    /// | `GEMINI_MAX_SESSIONS` | `1000`                                  |
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_GENERATIVE_AI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AiError::Config("GEMINI_API_KEY is required for the gemini provider".to_string())
            })?;

        let mut config = Self::new(api_key)?;

        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            config.base_url = parse_base_url(&base_url)?;
        }
        if let Ok(secs) = env::var("GEMINI_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|e| AiError::Config(format!("GEMINI_TIMEOUT_SECS: {e}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(temperature) = env::var("GEMINI_TEMPERATURE") {
            let temperature = temperature
                .parse::<f32>()
                .map_err(|e| AiError::Config(format!("GEMINI_TEMPERATURE: {e}")))?;
            config.temperature = Some(temperature);
        }
        if let Ok(max_sessions) = env::var("GEMINI_MAX_SESSIONS") {
            config.max_sessions = max_sessions
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AiError::Config(format!(
                        "GEMINI_MAX_SESSIONS must be a positive integer, got '{max_sessions}'"
                    ))
                })?;
        }

        Ok(config)
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        )
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AiError> {
    Url::parse(raw).map_err(|e| AiError::Config(format!("invalid Gemini base URL '{raw}': {e}")))
}
