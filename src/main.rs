mod api;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod window;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use api::{ActivityClient, HttpTransport};
use cli::Cli;
use config::{EffectiveConfig, OutputFormat};
use models::{MonthlyReport, YearMonth};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = EffectiveConfig::load(cli)?;

    let target = match cli.target.as_deref() {
        Some(t) => t.parse::<YearMonth>()?,
        None => YearMonth::current(),
    };

    let transport = HttpTransport::new(config.timeout).context("Failed to build HTTP client")?;
    let client = ActivityClient::new(transport, config.token.clone(), config.endpoints.clone());

    let project_id = client
        .resolve_project_id(&cli.project)
        .context("Failed to resolve project")?;

    let window = window::compute_window(target, Utc::now());
    info!(
        project = %cli.project,
        project_id = %project_id,
        target_month = %target,
        start_page = window.start_page,
        end_page = window.end_page,
        "fetching activity log"
    );

    let mut lines = report::build_report(&client, &project_id, target, window, &config.report)
        .context("Failed to fetch activity log")?;

    if config.sort_ascending {
        report::sort_chronologically(&mut lines);
    }

    let report_data = MonthlyReport {
        period: target.to_string(),
        project: cli.project.clone(),
        lines,
    };

    let content = render(&report_data, config.format)?;

    if let Some(ref base_path) = config.output {
        let file_path = with_extension(base_path, config.format);
        fs::write(&file_path, &content)
            .with_context(|| format!("Failed to write report to {}", file_path.display()))?;
        eprintln!("Report written to: {}", file_path.display());
    } else {
        print!("{}", content);
    }

    Ok(())
}

fn render(report_data: &MonthlyReport, format: OutputFormat) -> Result<String> {
    let mut content = match format {
        OutputFormat::Text => report::text::generate(report_data),
        OutputFormat::Json => report::json::generate(report_data)?,
        OutputFormat::Csv => report::csv::generate_string(report_data)?,
        OutputFormat::Tsv => report::tsv::generate_string(report_data),
        OutputFormat::Markdown => report::markdown::generate(report_data),
    };

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    Ok(content)
}

/// Append the format's extension unless the path already has one
fn with_extension(path: &Path, format: OutputFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        let path = PathBuf::from("/tmp/report");
        assert_eq!(with_extension(&path, OutputFormat::Csv), PathBuf::from("/tmp/report.csv"));

        let path = PathBuf::from("/tmp/feb.txt");
        assert_eq!(with_extension(&path, OutputFormat::Json), PathBuf::from("/tmp/feb.txt"));
    }

    #[test]
    fn test_render_json_ends_with_newline() {
        let report_data = MonthlyReport {
            period: "2024/02".to_string(),
            project: "Work".to_string(),
            lines: Vec::new(),
        };

        let json = render(&report_data, OutputFormat::Json).unwrap();
        assert!(json.ends_with("}\n"));
        assert_eq!(render(&report_data, OutputFormat::Text).unwrap(), "");
    }
}
