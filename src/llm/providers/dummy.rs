//! Dummy LLM provider: echoes the user message back prefixed with `[echo]`.
//! Runs the full pipeline offline, without an API key.

use crate::llm::LlmError;
use crate::prompt::PromptEnvelope;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, envelope: &PromptEnvelope) -> Result<String, LlmError> {
        Ok(format!("[echo] {}", envelope.user()))
    }
}
