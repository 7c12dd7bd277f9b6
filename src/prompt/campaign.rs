//! Campaign strategy prompt.

use super::{PromptBuilder, PromptEnvelope, Sampling};
use crate::error::AppError;

pub const PERSONA: &str = "You are a campaign execution specialist in AI-enhanced marketing.";

pub const SAMPLING: Sampling = Sampling { temperature: 0.7, max_tokens: 800 };

const TEMPLATE: &str = include_str!("../../config/prompts/campaign_strategy.md");

/// Campaign metadata supplied by the caller. Both fields are required;
/// `None` means the caller did not provide the field at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignParams {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CampaignParams {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }
}

fn required<'a>(value: Option<&'a String>, field: &str) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.as_str()),
        Some(_) => Err(AppError::InvalidParameters(format!("campaign {field} is empty"))),
        None => Err(AppError::InvalidParameters(format!("campaign {field} is required"))),
    }
}

/// Five-point campaign checklist with the name and description inserted
/// verbatim. Missing or blank fields are rejected rather than defaulted.
pub fn campaign_strategy(params: &CampaignParams) -> Result<PromptEnvelope, AppError> {
    let name = required(params.name.as_ref(), "name")?;
    let description = required(params.description.as_ref(), "description")?;

    let user = PromptBuilder::new()
        .append(TEMPLATE)
        .with_vars([("campaign_name", name), ("campaign_description", description)])
        .build()?;

    PromptEnvelope::new(PERSONA, user, SAMPLING)
}
