//! Report command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use tracing::{info, warn};

use autocat_core::{
    aggregate, render, summarize, BudgetClient, Period, RenderFormat, ReportBucket,
    ReportSummary,
};

use super::since_date;

/// Default artifact path, overwritten on each run
pub const DEFAULT_REPORT_FILE: &str = "reporte_ynab.html";

/// Resolve the HTML artifact path: flag > AUTOCAT_REPORT_FILE > default
pub fn report_output_path(flag: Option<&Path>) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    std::env::var("AUTOCAT_REPORT_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REPORT_FILE))
}

/// Fetch and aggregate the reporting window
pub async fn build_report(
    client: &impl BudgetClient,
    period: Period,
    days_back: i64,
) -> Result<(Vec<ReportBucket>, ReportSummary)> {
    let since = since_date(days_back);
    let until = Utc::now().date_naive();

    let transactions = client
        .transactions_since(since)
        .await
        .context("Failed to fetch transactions for the report")?;
    info!(
        "Report window {} to {}: {} transactions",
        since,
        until,
        transactions.len()
    );

    let buckets = aggregate(&transactions, period);
    let summary = summarize(&transactions, since, until);
    Ok((buckets, summary))
}

pub async fn cmd_report(
    client: &impl BudgetClient,
    period: &str,
    format: &str,
    output: Option<&Path>,
    days_back: i64,
) -> Result<()> {
    let period: Period = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let format: RenderFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let (buckets, summary) = build_report(client, period, days_back).await?;

    // The monthly text report carries the budget-vs-spending table; a
    // failed budget fetch degrades to a report without it
    let budget = if period == Period::Month {
        match client.month_budget(Utc::now().date_naive()).await {
            Ok(figures) => Some(figures),
            Err(e) => {
                warn!("Could not fetch the month's budget figures: {}", e);
                None
            }
        }
    } else {
        None
    };

    let artifact = render(
        &buckets,
        &summary,
        budget.as_deref(),
        Local::now().naive_local(),
        format,
    );

    match format {
        RenderFormat::Text => print!("{}", artifact),
        RenderFormat::Html => {
            let path = report_output_path(output);
            std::fs::write(&path, &artifact)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Reporte generado: {}", path.display());
        }
    }
    Ok(())
}
