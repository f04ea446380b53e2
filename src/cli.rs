use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "license-audit",
    about = "Audit organization repositories for dependency license compliance",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Policy config file [default: ./.license-audit/config.toml, fallback ~/.config/license-audit/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT", global = true)]
    pub report: ReportFormat,

    /// Log filter (e.g. `debug`); overrides the config file and RUST_LOG
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every dependency and report policy violations per repository and per package
    Report(ReportArgs),
    /// List the distinct license identifiers found in the dependency feed
    Licenses(LicensesArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Repository feed (JSON array of repository records)
    #[arg(long, value_name = "FILE")]
    pub repos: PathBuf,

    /// Dependency feed (JSON array of package records)
    #[arg(long, value_name = "FILE")]
    pub deps: PathBuf,

    /// Write the JSON report to FILE instead of stdout (implies --report json)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show repository metadata columns in the terminal tables
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct LicensesArgs {
    /// Dependency feed (JSON array of package records)
    #[arg(long, value_name = "FILE")]
    pub deps: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
