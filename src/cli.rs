use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "todoist-monthly-report")]
#[command(about = "List the tasks completed in a Todoist project during a month", long_about = None)]
pub struct Cli {
    /// Todoist API token
    #[arg(long, env = "TODOIST_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Project name (exact, case-sensitive)
    #[arg(long)]
    pub project: String,

    /// Month to report (YYYY/MM format), defaults to current month
    #[arg(long)]
    pub target: Option<String>,

    /// Output format: text, json, csv, tsv, md
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (extension added from the format if missing)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Match events by month number only, ignoring the year
    #[arg(long)]
    pub month_only: bool,

    /// Sort tasks oldest first instead of page order
    #[arg(long)]
    pub sort: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Config file path, defaults to ~/.config/todoist-monthly-report/config.toml
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "todoist-monthly-report",
            "--token",
            "abc",
            "--project",
            "Work",
            "--target",
            "2024/02",
            "--month-only",
        ]);

        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.project, "Work");
        assert_eq!(cli.target.as_deref(), Some("2024/02"));
        assert!(cli.month_only);
        assert!(!cli.sort);
    }

    #[test]
    fn test_project_is_required() {
        assert!(Cli::try_parse_from(["todoist-monthly-report", "--token", "abc"]).is_err());
    }
}
