//! Configuration loading with env-var overrides.
//!
//! Reads a TOML file (default `config/default.toml` relative to the current
//! working directory), then applies `PROSPECT_DATA_DIR` and
//! `PROSPECT_LOG_LEVEL` env overrides. The LLM credential comes from
//! `LLM_API_KEY` (falling back to `OPENAI_API_KEY`) and is never read from TOML.

use std::{
    collections::{BTreeMap, HashMap},
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::data::catalog::Segment;
use crate::error::AppError;
use crate::logger;
use crate::prompt::DEFAULT_EXCERPT_ROWS;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// OpenAI / OpenAI-compatible provider configuration (`[llm.openai]`).
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
}

/// LLM client configuration (`[llm]`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Active provider: `"dummy"` or `"openai"`. Named `default` in TOML.
    pub provider: String,
    /// Upper bound on a single completion call, in seconds.
    pub timeout_seconds: u64,
    /// Extra attempts after a transient failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_backoff_ms: u64,
    pub openai: OpenAiConfig,
}

/// Prompt and preview sizing (`[prompt]`).
#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// Rows rendered into a prompt's data excerpt.
    pub excerpt_rows: usize,
    /// Rows shown in data previews.
    pub preview_rows: usize,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Directory the sample datasets live in (already expanded, no `~`).
    pub data_dir: PathBuf,
    /// Per-segment dataset path overrides from `[catalog]`.
    pub catalog: BTreeMap<Segment, PathBuf>,
    pub prompt: PromptConfig,
    pub llm: LlmConfig,
    /// API key from the environment; `None` when unset or blank.
    pub llm_api_key: Option<String>,
}

/// Raw TOML shape: `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    app: RawApp,
    #[serde(default)]
    catalog: HashMap<String, String>,
    #[serde(default)]
    prompt: RawPrompt,
    #[serde(default)]
    llm: RawLlm,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_data_dir")]
    data_dir: String,
}

#[derive(Deserialize)]
struct RawPrompt {
    #[serde(default = "default_excerpt_rows")]
    excerpt_rows: usize,
    #[serde(default = "default_preview_rows")]
    preview_rows: usize,
}

impl Default for RawPrompt {
    fn default() -> Self {
        Self { excerpt_rows: default_excerpt_rows(), preview_rows: default_preview_rows() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            openai: RawOpenAiConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self { api_base_url: default_openai_api_base_url(), model: default_openai_model() }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_data_dir() -> String { "data".to_string() }
fn default_excerpt_rows() -> usize { DEFAULT_EXCERPT_ROWS }
fn default_preview_rows() -> usize { 5 }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_timeout_seconds() -> u64 { 30 }
fn default_max_retries() -> u32 { 1 }
fn default_retry_backoff_ms() -> u64 { 500 }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4".to_string() }

/// Load config from `path`, then apply env-var overrides.
pub fn load(path: &Path) -> Result<Config, AppError> {
    let data_dir_override = env::var("PROSPECT_DATA_DIR").ok();
    let log_level_override = env::var("PROSPECT_LOG_LEVEL").ok();
    let api_key = pick_api_key(env::var("LLM_API_KEY").ok(), env::var("OPENAI_API_KEY").ok());
    load_from(
        path,
        data_dir_override.as_deref(),
        log_level_override.as_deref(),
        api_key,
    )
}

/// First non-blank key wins, so an empty `LLM_API_KEY=` line still falls
/// through to `OPENAI_API_KEY`.
pub fn pick_api_key(llm_api_key: Option<String>, openai_api_key: Option<String>) -> Option<String> {
    llm_api_key
        .into_iter()
        .chain(openai_api_key)
        .find(|k| !k.trim().is_empty())
}

/// Internal loader: accepts an explicit path, overrides and credential.
/// Tests pass these directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    data_dir_override: Option<&str>,
    log_level_override: Option<&str>,
    api_key: Option<String>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = log_level_override.unwrap_or(&parsed.app.log_level).to_string();
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    let data_dir = expand_home(data_dir_override.unwrap_or(&parsed.app.data_dir));

    let mut catalog = BTreeMap::new();
    for (key, file) in parsed.catalog {
        let segment: Segment = key
            .parse()
            .map_err(|_| AppError::Config(format!("unknown catalog segment '{key}'")))?;
        catalog.insert(segment, expand_home(&file));
    }

    if parsed.prompt.excerpt_rows == 0 || parsed.prompt.preview_rows == 0 {
        return Err(AppError::Config("prompt row counts must be at least 1".into()));
    }
    if parsed.llm.timeout_seconds == 0 {
        return Err(AppError::Config("llm.timeout_seconds must be at least 1".into()));
    }

    Ok(Config {
        log_level,
        data_dir,
        catalog,
        prompt: PromptConfig {
            excerpt_rows: parsed.prompt.excerpt_rows,
            preview_rows: parsed.prompt.preview_rows,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            timeout_seconds: parsed.llm.timeout_seconds,
            max_retries: parsed.llm.max_retries,
            retry_backoff_ms: parsed.llm.retry_backoff_ms,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
            },
        },
        llm_api_key: api_key.filter(|k| !k.trim().is_empty()),
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

impl Config {
    /// `Config` for tests that never leaves the machine.
    pub fn test_default(data_dir: &Path) -> Self {
        Self {
            log_level: "info".into(),
            data_dir: data_dir.to_path_buf(),
            catalog: BTreeMap::new(),
            prompt: PromptConfig { excerpt_rows: DEFAULT_EXCERPT_ROWS, preview_rows: 5 },
            llm: LlmConfig {
                provider: "dummy".into(),
                timeout_seconds: 1,
                max_retries: 1,
                retry_backoff_ms: 1,
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                },
            },
            llm_api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[app]
log_level = "info"
data_dir = "~/prospect-data"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None, None).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.prompt.excerpt_rows, 10);
        assert_eq!(cfg.prompt.preview_rows, 5);
        assert_eq!(cfg.llm.provider, "dummy");
        assert_eq!(cfg.llm.timeout_seconds, 30);
        assert_eq!(cfg.llm.max_retries, 1);
        assert!(cfg.llm_api_key.is_none());
    }

    #[test]
    fn full_config_parses() {
        let f = write_toml(
            r#"
[app]
log_level = "debug"
data_dir = "/srv/data"

[catalog]
mdu = "mdu_2025.csv"

[prompt]
excerpt_rows = 4

[llm]
default = "openai"
timeout_seconds = 12
max_retries = 2
retry_backoff_ms = 250

[llm.openai]
api_base_url = "http://localhost:11434/v1/chat/completions"
model = "llama3"
"#,
        );
        let cfg = load_from(f.path(), None, None, Some("sk-test".into())).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(cfg.catalog.get(&Segment::Mdu), Some(&PathBuf::from("mdu_2025.csv")));
        assert_eq!(cfg.prompt.excerpt_rows, 4);
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.timeout_seconds, 12);
        assert_eq!(cfg.llm.max_retries, 2);
        assert_eq!(cfg.llm.retry_backoff_ms, 250);
        assert_eq!(cfg.llm.openai.model, "llama3");
        assert_eq!(cfg.llm_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn blank_api_key_is_none() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None, Some("  ".into())).unwrap();
        assert!(cfg.llm_api_key.is_none());
    }

    #[test]
    fn blank_primary_key_falls_back_to_openai_key() {
        let f = write_toml(MINIMAL_TOML);
        let key = pick_api_key(Some(String::new()), Some("sk-real".into()));
        let cfg = load_from(f.path(), None, None, key).unwrap();
        assert_eq!(cfg.llm_api_key.as_deref(), Some("sk-real"));
    }

    #[test]
    fn primary_key_wins_when_set() {
        assert_eq!(pick_api_key(Some("sk-a".into()), Some("sk-b".into())).as_deref(), Some("sk-a"));
        assert_eq!(pick_api_key(None, Some("sk-b".into())).as_deref(), Some("sk-b"));
        assert_eq!(pick_api_key(Some(" ".into()), None), None);
    }

    #[test]
    fn unknown_catalog_segment_errors() {
        let f = write_toml("[app]\n[catalog]\nrural = \"x.csv\"\n");
        let err = load_from(f.path(), None, None, None).unwrap_err();
        assert!(err.to_string().contains("rural"));
    }

    #[test]
    fn zero_excerpt_rows_rejected() {
        let f = write_toml("[app]\n[prompt]\nexcerpt_rows = 0\n");
        assert!(load_from(f.path(), None, None, None).is_err());
    }

    #[test]
    fn bad_log_level_rejected() {
        let f = write_toml(MINIMAL_TOML);
        let err = load_from(f.path(), None, Some("chatty"), None).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn overrides_apply() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("/tmp/override"), Some("debug"), None).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/override"));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/prospect-data");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("prospect-data"));
    }

    #[test]
    fn relative_path_unchanged() {
        assert_eq!(expand_home("data"), PathBuf::from("data"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), None, None, None);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }
}
