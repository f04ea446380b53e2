//! `license-audit`: check an organization's dependency licenses against policy.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config and validate the policy snapshot ([`config::load_config`]).
//! 3. Load the repository and dependency feeds ([`feed`]).
//! 4. Classify every package instance and aggregate per repository ([`audit`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean), `1` (violations found) or `2` (fatal error, no report).

mod audit;
mod cli;
mod config;
mod detector;
mod error;
mod feed;
mod inventory;
mod license;
mod logger;
mod models;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command, LicensesArgs, ReportArgs, ReportFormat};
use config::{load_config, Config};
use license::extract::LicenseExtractor;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let work_dir = std::env::current_dir()?;
    let config = load_config(&work_dir, cli.config.as_deref())?;
    logger::init(cli.log_level.as_deref(), &config.logging, cli.quiet);

    match &cli.command {
        Command::Report(args) => run_report(&cli, &config, args),
        Command::Licenses(args) => run_licenses(&cli, &config, args),
    }
}

fn run_report(cli: &Cli, config: &Config, args: &ReportArgs) -> Result<ExitCode> {
    // Policy problems must surface before any feed is read.
    let policy = config.policy()?;
    tracing::info!(
        "Policy loaded: {} entries, {} disallowed",
        policy.entries().len(),
        policy.disallowed().count()
    );

    let repos = feed::load_repositories(&args.repos)?;
    let packages = feed::load_packages(&args.deps)?;

    let report = audit::run(&repos, &packages, &policy)?;

    if args.output.is_some() || cli.report == ReportFormat::Json {
        report::write_json(&report, args.output.as_deref())?;
    } else {
        report::terminal::render(&report, args.verbose, cli.quiet);
    }

    if report.detail.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn run_licenses(cli: &Cli, config: &Config, args: &LicensesArgs) -> Result<ExitCode> {
    let policy = config.policy()?;
    let packages = feed::load_packages(&args.deps)?;

    let extractor = LicenseExtractor::new()?;
    let usage = inventory::unique_licenses(&extractor, &packages, &policy);

    match cli.report {
        ReportFormat::Json => report::write_json(&usage, None)?,
        ReportFormat::Terminal => report::terminal::render_inventory(&usage, cli.quiet),
    }

    Ok(ExitCode::SUCCESS)
}
