use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::api::client::{DEFAULT_ACTIVITY_URL, DEFAULT_SYNC_URL};
use crate::api::Endpoints;
use crate::cli::Cli;
use crate::error::ReportError;
use crate::report::{MonthFilter, ReportOptions, DEFAULT_PAGE_LIMIT};

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Used when neither --token nor TODOIST_API_TOKEN is given
    pub token: Option<String>,
    #[serde(default = "default_sync_url")]
    pub sync_url: String,
    #[serde(default = "default_activity_url")]
    pub activity_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            token: None,
            sync_url: default_sync_url(),
            activity_url: default_activity_url(),
            timeout_secs: default_timeout(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_sync_url() -> String {
    DEFAULT_SYNC_URL.to_string()
}

fn default_activity_url() -> String {
    DEFAULT_ACTIVITY_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub filter: MonthFilter,
    #[serde(default)]
    pub sort_ascending: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            filter: MonthFilter::default(),
            sort_ascending: false,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    Tsv,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            other => bail!("Unknown format: {}. Expected text, json, csv, tsv or md", other),
        }
    }
}

/// Configuration merged from the config file, environment and command line
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub token: String,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub report: ReportOptions,
    pub sort_ascending: bool,
}

impl EffectiveConfig {
    /// Load the config file and apply command line overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        let global = match cli.config.as_deref() {
            Some(path) => load_config_file(&expand_path(path)?)?,
            None => load_global_config()?,
        };
        Self::merge(global, cli)
    }

    fn merge(global: GlobalConfig, cli: &Cli) -> Result<Self> {
        let token = cli
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or(global.api.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ReportError::Config(
                    "API token missing: pass --token, set TODOIST_API_TOKEN or api.token in the config file"
                        .to_string(),
                )
            })?;

        let endpoints = Endpoints::parse(&global.api.sync_url, &global.api.activity_url)?;

        if global.api.page_limit == 0 {
            return Err(ReportError::Config("api.page_limit must be greater than 0".to_string()).into());
        }

        let format = cli
            .format
            .as_deref()
            .unwrap_or(global.report.format.as_str())
            .parse()?;

        let output = cli.output.as_deref().map(expand_path).transpose()?;

        let filter = if cli.month_only {
            MonthFilter::MonthOnly
        } else {
            global.report.filter
        };

        Ok(Self {
            token,
            endpoints,
            timeout: Duration::from_secs(cli.timeout.unwrap_or(global.api.timeout_secs)),
            format,
            output,
            report: ReportOptions {
                filter,
                page_limit: global.api.page_limit,
            },
            sort_ascending: cli.sort || global.report.sort_ascending,
        })
    }
}

/// Get the global config directory path
pub fn global_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("todoist-monthly-report");
    Ok(config_dir)
}

/// Get the global config file path
pub fn global_config_path() -> Result<PathBuf> {
    Ok(global_config_dir()?.join("config.toml"))
}

/// Load global configuration from ~/.config/todoist-monthly-report/config.toml
pub fn load_global_config() -> Result<GlobalConfig> {
    let config_path = global_config_path()?;

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    load_config_file(&config_path)
}

/// Load configuration from an explicit path, which must exist
pub fn load_config_file(config_path: &Path) -> Result<GlobalConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: GlobalConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(config)
}

/// Expand ~ and environment variables in path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
