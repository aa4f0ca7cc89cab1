//! autocat CLI - YNAB auto-categorizer and reporter
//!
//! Usage:
//!   autocat simulate              Dry-run categorization
//!   autocat apply                 Categorize and push updates to YNAB
//!   autocat report --period month Build a spending report
//!   autocat email --to a@b.com    Mail the weekly HTML report
//!
//! Configuration comes from the environment: YNAB_API_TOKEN (required),
//! YNAB_BUDGET_ID, AUTOCAT_REPORT_FILE, AUTOCAT_MAIL_TO, AUTOCAT_SENDMAIL.

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Simulate { days_back } => {
            let client = commands::build_client(cli.budget.as_deref())?;
            let rules = commands::load_rules(cli.rules.as_deref())?;
            commands::cmd_simulate(&client, &rules, days_back).await
        }
        Commands::Apply { days_back } => {
            let client = commands::build_client(cli.budget.as_deref())?;
            let rules = commands::load_rules(cli.rules.as_deref())?;
            commands::cmd_apply(&client, &rules, days_back).await
        }
        Commands::Report {
            period,
            format,
            output,
            days_back,
        } => {
            let client = commands::build_client(cli.budget.as_deref())?;
            commands::cmd_report(&client, &period, &format, output.as_deref(), days_back).await
        }
        Commands::Email {
            to,
            period,
            days_back,
        } => {
            let client = commands::build_client(cli.budget.as_deref())?;
            commands::cmd_email(&client, to.as_deref(), &period, days_back).await
        }
    }
}
