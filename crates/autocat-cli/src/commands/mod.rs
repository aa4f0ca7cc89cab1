//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `categorize` - simulate/apply runs and summary printing
//! - `report` - report building and artifact writing
//! - `email` - report delivery through a sendmail-compatible command

pub mod categorize;
pub mod email;
pub mod report;

// Re-export command functions for main.rs
pub use categorize::*;
pub use email::*;
pub use report::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};

use autocat_core::{RuleSet, YnabClient};

/// Build the YNAB client from the environment, with an optional budget
/// override from the command line
pub fn build_client(budget_override: Option<&str>) -> Result<YnabClient> {
    let client = YnabClient::from_env().context(
        "YNAB_API_TOKEN is not set. Get a token at https://app.ynab.com/settings/developer",
    )?;
    Ok(match budget_override {
        Some(budget_id) => client.with_budget(budget_id),
        None => client,
    })
}

/// Load the rule table from a file, or fall back to the built-in defaults
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(p) => RuleSet::load(p)
            .with_context(|| format!("Failed to load rules from {}", p.display())),
        None => Ok(RuleSet::defaults()),
    }
}

/// First day of the window reaching `days_back` days before today
pub fn since_date(days_back: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(days_back)
}
