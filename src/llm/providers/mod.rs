//! LLM provider implementations.
//!
//! `build(config, api_key, timeout)` is the factory, called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openai_compatible;

use std::time::Duration;

use tracing::info;

use crate::config::LlmConfig;
use crate::error::AppError;
use crate::llm::LlmProvider;

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from the environment (never TOML). Keyed providers
/// refuse to build without it, so a missing credential is reported before
/// any request is attempted.
pub fn build(config: &LlmConfig, api_key: Option<String>, timeout: Duration) -> Result<LlmProvider, AppError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openai" | "openai-compatible" => {
            let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                AppError::MissingCredential(
                    "provider 'openai' needs LLM_API_KEY (or OPENAI_API_KEY) to be set".into(),
                )
            })?;
            let oai = &config.openai;
            info!(url = %oai.api_base_url, model = %oai.model, "llm provider: openai-compatible");
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                timeout,
                key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        other => Err(AppError::Config(format!("unknown llm provider: {other}"))),
    }
}
