//! Provider dispatch — builds the configured [`CodeGenerator`].

use std::sync::Arc;

use super::config::GeminiConfig;
use super::gemini::GeminiGenerator;
use super::local::LocalGenerator;
use super::{AiError, CodeGenerator};

/// Build a generator by provider name.
///
/// - `"gemini"` → Gemini API, configured from the environment
/// - `"local"` → deterministic echo
pub fn from_name(provider: &str) -> Result<Arc<dyn CodeGenerator>, AiError> {
    match provider {
        "local" => Ok(Arc::new(LocalGenerator)),
        "gemini" => Ok(Arc::new(GeminiGenerator::new(GeminiConfig::from_env()?)?)),
        other => Err(AiError::UnsupportedProvider(other.to_string())),
    }
}
