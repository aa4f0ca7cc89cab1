//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// autocat - Rule-based auto-categorizer and reporter for YNAB
#[derive(Parser)]
#[command(name = "autocat")]
#[command(about = "Categorize YNAB transactions with keyword rules and build spending reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a JSON rules file (array of {category, keywords});
    /// built-in defaults are used when omitted
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Budget id (overrides YNAB_BUDGET_ID, defaults to "last-used")
    #[arg(long, global = true)]
    pub budget: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dry run: show what would be categorized without changing anything
    Simulate {
        /// How many days back to look for uncategorized transactions
        #[arg(long, default_value = "30")]
        days_back: i64,
    },

    /// Categorize uncategorized transactions and push the updates to YNAB
    Apply {
        /// How many days back to look for uncategorized transactions
        #[arg(long, default_value = "30")]
        days_back: i64,
    },

    /// Build a spending report from categorized transactions
    Report {
        /// Bucket granularity: week or month
        #[arg(long, default_value = "month")]
        period: String,

        /// Output format: text or html
        #[arg(long, default_value = "text")]
        format: String,

        /// Where to write an HTML report
        /// (default: AUTOCAT_REPORT_FILE or reporte_ynab.html, overwritten)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How many days back the reporting window reaches
        #[arg(long, default_value = "30")]
        days_back: i64,
    },

    /// Build the HTML report and hand it to the configured mail command
    Email {
        /// Recipient address (overrides AUTOCAT_MAIL_TO)
        #[arg(long)]
        to: Option<String>,

        /// Bucket granularity: week or month
        #[arg(long, default_value = "week")]
        period: String,

        /// How many days back the reporting window reaches
        #[arg(long, default_value = "7")]
        days_back: i64,
    },
}
