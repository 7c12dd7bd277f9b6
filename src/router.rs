//! Task router: one dispatch per user interaction.
//!
//! The selected [`TaskId`] maps to a [`Handler`] or to nothing. Tasks without a
//! handler get a static guidance notice: no pipeline runs and no LLM call is
//! made. That path is a normal outcome, not an error.
//!
//! Handlers either complete fully or fail; a failed dispatch returns only the
//! error, never a partially rendered output.

use chrono::{DateTime, Utc};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::config::PromptConfig;
use crate::data::RecordTable;
use crate::enrichment::EnrichmentSource;
use crate::error::AppError;
use crate::llm::LlmClient;
use crate::prompt::{self, CampaignParams, PromptContext};
use crate::summary::{self, KPI_DIMENSIONS};
use crate::task::TaskId;

/// One piece of rendered output.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    /// Leading rows of a table.
    Preview { title: String, table: RecordTable },
    /// Category counts for one dimension column, most frequent first.
    Breakdown { dimension: String, counts: Vec<(String, usize)> },
    /// Labelled input values echoed back to the user.
    Fields(Vec<(String, String)>),
    /// LLM-generated text.
    Narrative { title: String, text: String },
    Notice(String),
}

/// Everything one dispatch produced, tagged with the task that produced it.
#[derive(Debug, Clone)]
pub struct TaskOutput {
    pub task: TaskId,
    pub invocation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub blocks: Vec<Block>,
}

impl TaskOutput {
    pub fn narratives(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Narrative { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn breakdown(&self, dimension: &str) -> Option<&[(String, usize)]> {
        self.blocks.iter().find_map(|b| match b {
            Block::Breakdown { dimension: d, counts } if d == dimension => Some(counts.as_slice()),
            _ => None,
        })
    }
}

/// What the user asked for in this interaction.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub task: Option<TaskId>,
    /// Append synthetic demographic columns before analysis.
    pub enrich: bool,
    pub campaign: CampaignParams,
    /// Explicit trigger for campaign generation. Without it the campaign task
    /// only echoes its inputs.
    pub generate: bool,
}

impl Invocation {
    pub fn new(task: TaskId) -> Self {
        Self { task: Some(task), ..Self::default() }
    }
}

/// Implemented task handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    KpiDashboard,
    CampaignAutomation,
}

impl Handler {
    pub fn for_task(task: TaskId) -> Option<Handler> {
        match task {
            TaskId::KpiDashboard => Some(Handler::KpiDashboard),
            TaskId::CampaignAutomation => Some(Handler::CampaignAutomation),
            TaskId::GenerateSalesPitch
            | TaskId::AnalyzeProspects
            | TaskId::ChurnMonitoring
            | TaskId::RouteOptimization
            | TaskId::DirectMailOptimization
            | TaskId::MarketingCollateral => None,
        }
    }
}

/// Guidance shown for every task without a handler.
pub const FALLBACK_NOTICE: &str = "This assistant is currently focused on KPI Dashboard and \
     Campaign Automation. Select one of those to continue.";

pub struct Router {
    client: LlmClient,
    enrichment: EnrichmentSource,
    excerpt_rows: usize,
    preview_rows: usize,
}

impl Router {
    pub fn new(client: LlmClient, prompt: &PromptConfig) -> Self {
        Self {
            client,
            enrichment: EnrichmentSource::default(),
            excerpt_rows: prompt.excerpt_rows,
            preview_rows: prompt.preview_rows,
        }
    }

    pub fn with_enrichment(mut self, source: EnrichmentSource) -> Self {
        self.enrichment = source;
        self
    }

    /// Run `invocation` against `table`. A missing task selection is a
    /// [`AppError::MissingInput`].
    pub async fn dispatch(&self, invocation: &Invocation, table: RecordTable) -> Result<TaskOutput, AppError> {
        let task = invocation
            .task
            .ok_or_else(|| AppError::MissingInput("no task selected".into()))?;
        let invocation_id = Uuid::new_v4();
        let span = info_span!("dispatch", task = %task, invocation_id = %invocation_id);

        async move {
            let blocks = match Handler::for_task(task) {
                Some(Handler::KpiDashboard) => self.kpi_dashboard(invocation, table).await?,
                Some(Handler::CampaignAutomation) => self.campaign_automation(invocation).await?,
                None => {
                    info!("task has no handler, returning guidance");
                    vec![Block::Notice(FALLBACK_NOTICE.into())]
                }
            };
            info!(blocks = blocks.len(), "dispatch complete");
            Ok::<_, AppError>(TaskOutput { task, invocation_id, generated_at: Utc::now(), blocks })
        }
        .instrument(span)
        .await
    }

    async fn kpi_dashboard(&self, invocation: &Invocation, table: RecordTable) -> Result<Vec<Block>, AppError> {
        if table.is_empty() {
            return Err(AppError::MissingInput("dataset has no rows to analyse".into()));
        }

        let mut blocks = vec![
            Block::Heading("Salesforce & Marketing KPI Analysis".into()),
            Block::Preview { title: "Data Preview".into(), table: table.head(self.preview_rows) },
        ];

        let table = self.enrichment.enrich(table, invocation.enrich)?;
        if invocation.enrich {
            blocks.push(Block::Notice(self.enrichment.notice().into()));
            blocks.push(Block::Preview { title: "Enriched Data".into(), table: table.head(self.preview_rows) });
        }

        for dimension in KPI_DIMENSIONS {
            match summary::aggregate(&table, dimension) {
                Some(counts) => blocks.push(Block::Breakdown { dimension: dimension.into(), counts }),
                None => debug!(dimension, "column absent, breakdown skipped"),
            }
        }

        let ctx = PromptContext { table: Some(&table), campaign: None, excerpt_rows: self.excerpt_rows };
        let envelope = prompt::for_task(TaskId::KpiDashboard, &ctx)?;
        let text = self.client.complete(envelope).await?;
        blocks.push(Block::Narrative { title: "KPI Insights".into(), text });
        Ok(blocks)
    }

    async fn campaign_automation(&self, invocation: &Invocation) -> Result<Vec<Block>, AppError> {
        let params = &invocation.campaign;
        let mut blocks = vec![
            Block::Heading("Campaign Automation".into()),
            Block::Fields(vec![
                ("Campaign Name".into(), params.name.clone().unwrap_or_default()),
                ("Campaign Overview".into(), params.description.clone().unwrap_or_default()),
            ]),
        ];

        if !invocation.generate {
            blocks.push(Block::Notice("Campaign strategy not generated; trigger generation to run it.".into()));
            return Ok(blocks);
        }

        let ctx = PromptContext { table: None, campaign: Some(params), excerpt_rows: self.excerpt_rows };
        let envelope = prompt::for_task(TaskId::CampaignAutomation, &ctx)?;
        let text = self.client.complete(envelope).await?;
        blocks.push(Block::Narrative { title: "Campaign Strategy".into(), text });
        Ok(blocks)
    }
}
