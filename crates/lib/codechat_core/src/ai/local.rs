//! Local code generator — deterministic, offline.
//!
//! Echoes the prompt back as the explanation and returns no code, so the chat
//! workflow can be exercised end to end without an API key.

use async_trait::async_trait;

use super::{AiError, CodeGenerator, Generation};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGenerator;

#[async_trait]
impl CodeGenerator for LocalGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, prompt: &str, _session_id: &str) -> Result<Generation, AiError> {
        Ok(Generation {
            explanation: format!("Received: {prompt}"),
            ..Generation::default()
        })
    }
}
