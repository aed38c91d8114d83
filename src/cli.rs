use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Turn a CSV, JSON or Parquet table into an illustrated data story.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset to open (.csv, .json, .parquet)
    pub file: Option<PathBuf>,

    /// Print the report to stdout instead of opening the viewer
    #[arg(long, value_enum, value_name = "FORMAT", requires = "file")]
    pub report: Option<ReportFormat>,

    /// Append an AI-written summary to a printed report
    #[arg(long, requires = "report")]
    pub ai: bool,

    /// Use specific config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logging
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_mode_parses() {
        let cli = Cli::try_parse_from(["data-story", "data.csv", "--report", "json", "--ai"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("data.csv")));
        assert_eq!(cli.report, Some(ReportFormat::Json));
        assert!(cli.ai);
    }

    #[test]
    fn report_needs_a_file() {
        assert!(Cli::try_parse_from(["data-story", "--report", "markdown"]).is_err());
    }

    #[test]
    fn ai_needs_report_mode() {
        assert!(Cli::try_parse_from(["data-story", "data.csv", "--ai"]).is_err());
    }

    #[test]
    fn bare_invocation_opens_the_viewer() {
        let cli = Cli::try_parse_from(["data-story"]).unwrap();
        assert!(cli.file.is_none() && cli.report.is_none());
    }
}
