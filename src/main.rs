//! prospect-pilot: command-line front end.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Init logger at the CLI level, or "info"
//!   3. Load config
//!   4. Build the LLM client (fails fast on a missing credential)
//!   5. Select the dataset, dispatch the task, print the result

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use prospect_pilot::config::{self, Config, DEFAULT_CONFIG_PATH};
use prospect_pilot::data::catalog::{Catalog, DatasetSource, Segment};
use prospect_pilot::data::RecordTable;
use prospect_pilot::error::AppError;
use prospect_pilot::llm::LlmClient;
use prospect_pilot::logger;
use prospect_pilot::prompt::CampaignParams;
use prospect_pilot::render::render_text;
use prospect_pilot::router::{Invocation, Router};
use prospect_pilot::task::TaskId;

const DEFAULT_CAMPAIGN_NAME: &str = "Fiber Rollout Target 2025";
const DEFAULT_CAMPAIGN_DESCRIPTION: &str =
    "Engage commercial and MDU properties to increase upgrades, using Salesforce opportunity data.";

/// Sales & marketing assistant: analyse CRM data and draft campaign strategy.
#[derive(Debug, Parser)]
#[command(name = "prospect-pilot", version)]
struct Cli {
    /// Task to run, by key or label (e.g. "KPIDashboard", "Campaign Automation").
    #[arg(short, long)]
    task: Option<String>,

    /// Property segment dataset: residential, mdu, commercial, all.
    #[arg(short, long, default_value = "residential")]
    segment: String,

    /// Use your own CSV instead of a catalog segment.
    #[arg(long)]
    custom: bool,

    /// CSV file to upload (implies --custom).
    #[arg(long, value_name = "FILE")]
    upload: Option<PathBuf>,

    /// Enrich with simulated contact & demographic data.
    #[arg(long)]
    enrich: bool,

    #[arg(long, default_value = DEFAULT_CAMPAIGN_NAME)]
    campaign_name: String,

    #[arg(long, default_value = DEFAULT_CAMPAIGN_DESCRIPTION)]
    campaign_description: String,

    /// Generate the campaign strategy (Campaign Automation only).
    #[arg(long)]
    generate: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: PathBuf,

    /// Log level; takes precedence over RUST_LOG, PROSPECT_LOG_LEVEL and the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// List the available tasks and exit.
    #[arg(long)]
    list_tasks: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.list_tasks {
        for t in TaskId::ALL {
            let status = if t.is_implemented() { "" } else { " (coming soon)" };
            println!("{:<24} {}{status}", t.key(), t.label());
        }
        return Ok(());
    }

    // The config's own level is only known after loading; validate the CLI
    // level up front so a typo fails before anything else happens.
    if let Some(level) = &cli.log_level {
        logger::parse_level(level)?;
    }

    let config = config::load(&cli.config)?;
    match &cli.log_level {
        Some(level) => logger::init(level, true)?,
        None => logger::init(&config.log_level, false)?,
    }

    info!(
        config = %cli.config.display(),
        data_dir = %config.data_dir.display(),
        provider = %config.llm.provider,
        "config loaded"
    );

    let task: TaskId = cli
        .task
        .as_deref()
        .ok_or_else(|| AppError::MissingInput("select a task with --task (see --list-tasks)".into()))?
        .parse()?;

    let client = LlmClient::from_config(&config.llm, config.llm_api_key.clone())?;
    let router = Router::new(client, &config.prompt);

    let table = load_table(&cli, &config)?;

    let invocation = Invocation {
        task: Some(task),
        enrich: cli.enrich,
        campaign: CampaignParams::new(cli.campaign_name, cli.campaign_description),
        generate: cli.generate,
    };

    let output = router.dispatch(&invocation, table).await?;
    println!("{}", render_text(&output));
    Ok(())
}

fn load_table(cli: &Cli, config: &Config) -> Result<RecordTable, AppError> {
    let catalog = Catalog::new(&config.data_dir, &config.catalog);
    let source = if cli.custom || cli.upload.is_some() {
        let bytes = match &cli.upload {
            Some(path) => Some(std::fs::read(path)?),
            None => None,
        };
        DatasetSource::Upload(bytes)
    } else {
        DatasetSource::Segment(cli.segment.parse::<Segment>()?)
    };
    catalog.select(source)
}
