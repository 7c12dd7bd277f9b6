//! Prompt construction.
//!
//! Every LLM call is described by a [`PromptEnvelope`]: one system message
//! carrying the persona, one user message carrying the task instructions and
//! any data excerpt, and the sampling settings. Envelopes are built by pure
//! functions ([`kpi::kpi_insight`], [`campaign::campaign_strategy`]) and are
//! immutable once built.

pub mod builder;
pub mod campaign;
pub mod kpi;

use serde::Serialize;

use crate::data::RecordTable;
use crate::error::AppError;
use crate::task::TaskId;

pub use builder::PromptBuilder;
pub use campaign::CampaignParams;

/// Rows rendered into a prompt's data section unless configured otherwise.
pub const DEFAULT_EXCERPT_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Sampling settings sent alongside the messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// System + user message pair plus sampling, ready for the LLM client.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptEnvelope {
    messages: [ChatMessage; 2],
    sampling: Sampling,
}

impl PromptEnvelope {
    /// Validates sampling: temperature within `[0, 1]`, `max_tokens > 0`.
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        sampling: Sampling,
    ) -> Result<Self, AppError> {
        if !(0.0..=1.0).contains(&sampling.temperature) {
            return Err(AppError::InvalidParameters(format!(
                "temperature {} outside [0, 1]",
                sampling.temperature
            )));
        }
        if sampling.max_tokens == 0 {
            return Err(AppError::InvalidParameters("max_tokens must be positive".into()));
        }
        Ok(Self {
            messages: [
                ChatMessage { role: Role::System, content: system.into() },
                ChatMessage { role: Role::User, content: user.into() },
            ],
            sampling,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn system(&self) -> &str {
        &self.messages[0].content
    }

    pub fn user(&self) -> &str {
        &self.messages[1].content
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }
}

/// Inputs a task's prompt may draw on.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub table: Option<&'a RecordTable>,
    pub campaign: Option<&'a CampaignParams>,
    pub excerpt_rows: usize,
}

/// Build the envelope for `task`. Tasks without a prompt, or calls missing
/// the context the task needs, fail with [`AppError::InvalidParameters`].
pub fn for_task(task: TaskId, ctx: &PromptContext<'_>) -> Result<PromptEnvelope, AppError> {
    match task {
        TaskId::KpiDashboard => {
            let table = ctx.table.ok_or_else(|| {
                AppError::InvalidParameters("KPI insight prompt needs a data table".into())
            })?;
            kpi::kpi_insight(table, ctx.excerpt_rows)
        }
        TaskId::CampaignAutomation => {
            let params = ctx.campaign.ok_or_else(|| {
                AppError::InvalidParameters("campaign strategy prompt needs campaign parameters".into())
            })?;
            campaign::campaign_strategy(params)
        }
        other => Err(AppError::InvalidParameters(format!(
            "no prompt defined for task {}",
            other.key()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::table;

    fn sampling(temperature: f32, max_tokens: u32) -> Sampling {
        Sampling { temperature, max_tokens }
    }

    #[test]
    fn envelope_is_system_then_user() {
        let env = PromptEnvelope::new("sys", "usr", sampling(0.5, 10)).unwrap();
        let roles: Vec<Role> = env.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User]);
        assert_eq!(env.system(), "sys");
        assert_eq!(env.user(), "usr");
    }

    #[test]
    fn envelope_rejects_bad_sampling() {
        assert!(PromptEnvelope::new("s", "u", sampling(1.5, 10)).is_err());
        assert!(PromptEnvelope::new("s", "u", sampling(-0.1, 10)).is_err());
        assert!(PromptEnvelope::new("s", "u", sampling(0.2, 0)).is_err());
        assert!(PromptEnvelope::new("s", "u", sampling(1.0, 1)).is_ok());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage { role: Role::System, content: "x".into() }).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
    }

    #[test]
    fn for_task_dispatches_by_task() {
        let t = table(&["Region"], &[&["North"]]);
        let params = CampaignParams::new("Spring Push", "Upgrade MDU tenants");
        let ctx = PromptContext { table: Some(&t), campaign: Some(&params), excerpt_rows: 10 };

        let kpi = for_task(TaskId::KpiDashboard, &ctx).unwrap();
        assert!(kpi.user().contains("North"));
        let camp = for_task(TaskId::CampaignAutomation, &ctx).unwrap();
        assert!(camp.user().contains("Spring Push"));
    }

    #[test]
    fn for_task_without_context_fails() {
        let ctx = PromptContext { table: None, campaign: None, excerpt_rows: 10 };
        assert!(matches!(
            for_task(TaskId::KpiDashboard, &ctx),
            Err(AppError::InvalidParameters(_))
        ));
        assert!(matches!(
            for_task(TaskId::CampaignAutomation, &ctx),
            Err(AppError::InvalidParameters(_))
        ));
    }

    #[test]
    fn for_task_unimplemented_task_fails() {
        let ctx = PromptContext { table: None, campaign: None, excerpt_rows: 10 };
        assert!(for_task(TaskId::ChurnMonitoring, &ctx).is_err());
    }
}
