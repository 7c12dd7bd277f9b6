//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! [`LlmClient`] wraps a provider with the resilience policy: a per-call
//! timeout and a bounded retry for transient failures. Prompt construction
//! stays out of this layer entirely; the client only ever sees finished
//! [`PromptEnvelope`]s.

pub mod providers;
pub mod retry;

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::AppError;
use crate::prompt::PromptEnvelope;

pub use retry::RetryPolicy;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Failure category of an LLM call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// The call did not finish within the configured timeout.
    Timeout,
    /// Provider answered HTTP 429.
    RateLimited,
    /// Credential rejected (HTTP 401/403).
    Auth,
    /// Response arrived but could not be understood.
    Malformed,
    /// Connection-level failure before any response.
    Network,
    Unknown,
}

impl LlmErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmErrorKind::Timeout => "timeout",
            LlmErrorKind::RateLimited => "rate_limited",
            LlmErrorKind::Auth => "auth",
            LlmErrorKind::Malformed => "malformed",
            LlmErrorKind::Network => "network",
            LlmErrorKind::Unknown => "unknown",
        }
    }

    /// Kinds worth another attempt.
    pub fn is_transient(self) -> bool {
        matches!(self, LlmErrorKind::Timeout | LlmErrorKind::RateLimited | LlmErrorKind::Network)
    }
}

impl fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("llm error ({kind}): {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// One round-trip: send the envelope, return the generated text.
    pub async fn complete(&self, envelope: &PromptEnvelope) -> Result<String, LlmError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(envelope).await,
            LlmProvider::OpenAiCompatible(p) => p.complete(envelope).await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Dummy(_) => "dummy",
            LlmProvider::OpenAiCompatible(_) => "openai",
        }
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Stateless request/response client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    retry: RetryPolicy,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(provider: LlmProvider, retry: RetryPolicy, timeout: Duration) -> Self {
        Self { provider, retry, timeout }
    }

    /// Build the configured provider and wrap it. A keyed provider without
    /// `api_key` fails here with [`AppError::MissingCredential`], before any
    /// network activity.
    pub fn from_config(config: &LlmConfig, api_key: Option<String>) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let provider = providers::build(config, api_key, timeout)?;
        let retry = RetryPolicy::new(config.max_retries, Duration::from_millis(config.retry_backoff_ms));
        Ok(Self::new(provider, retry, timeout))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send `envelope` and return the reply text. Each attempt is bounded by
    /// the client timeout; transient failures are retried per the policy.
    /// The envelope is consumed: it belongs to exactly one request.
    pub async fn complete(&self, envelope: PromptEnvelope) -> Result<String, LlmError> {
        let mut attempt: u32 = 0;
        loop {
            let result = match tokio::time::timeout(self.timeout, self.provider.complete(&envelope)).await {
                Ok(r) => r,
                Err(_) => Err(LlmError::new(
                    LlmErrorKind::Timeout,
                    format!("no response within {}s", self.timeout.as_secs_f32()),
                )),
            };

            match result {
                Ok(text) => {
                    debug!(provider = self.provider.name(), attempt, reply_len = text.len(), "llm reply");
                    return Ok(text);
                }
                Err(e) if e.kind.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        provider = self.provider.name(),
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient llm failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
