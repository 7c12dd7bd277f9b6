//! KPI insight prompt.

use super::{PromptBuilder, PromptEnvelope, Sampling};
use crate::data::RecordTable;
use crate::error::AppError;

pub const PERSONA: &str = "You are a telecom marketing strategist.";

pub const SAMPLING: Sampling = Sampling { temperature: 0.5, max_tokens: 600 };

const TEMPLATE: &str = include_str!("../../config/prompts/kpi_insight.md");

/// Analysis instructions followed by the first `excerpt_rows` rows of
/// `table` rendered as text. Larger tables are truncated, never dumped whole.
pub fn kpi_insight(table: &RecordTable, excerpt_rows: usize) -> Result<PromptEnvelope, AppError> {
    if excerpt_rows == 0 {
        return Err(AppError::InvalidParameters("excerpt row cap must be at least 1".into()));
    }

    let user = PromptBuilder::new()
        .append(TEMPLATE)
        .var("data", table.render(excerpt_rows))
        .build()?;

    PromptEnvelope::new(PERSONA, user, SAMPLING)
}
