//! Tests for the prompt templates under config/prompts

use std::fs;
use std::path::{Path, PathBuf};

fn prompt_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompts").join(name)
}

#[test]
fn test_kpi_prompt_file_exists() {
    assert!(prompt_path("kpi_insight.md").exists(), "kpi_insight.md prompt file missing");
}

#[test]
fn test_campaign_prompt_file_exists() {
    assert!(prompt_path("campaign_strategy.md").exists(), "campaign_strategy.md prompt file missing");
}

#[test]
fn test_kpi_prompt_template_vars() {
    let text = fs::read_to_string(prompt_path("kpi_insight.md")).unwrap();
    assert!(text.contains("{{data}}"), "kpi_insight.md should contain {{data}} variable");
}

#[test]
fn test_campaign_prompt_template_vars() {
    let text = fs::read_to_string(prompt_path("campaign_strategy.md")).unwrap();
    assert!(text.contains("{{campaign_name}}"), "campaign_strategy.md should contain {{campaign_name}}");
    assert!(
        text.contains("{{campaign_description}}"),
        "campaign_strategy.md should contain {{campaign_description}}"
    );
}

#[test]
fn test_default_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
    let cfg = prospect_pilot::config::load_from(&path, None, None, None).unwrap();
    assert_eq!(cfg.llm.provider, "dummy");
    assert_eq!(cfg.prompt.excerpt_rows, 10);
}
