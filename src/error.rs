//! Application-wide error types.

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No data available to proceed; the user must supply input.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Source table could not be parsed.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Prompt construction is missing a required field.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A keyed LLM provider was configured without a credential.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
