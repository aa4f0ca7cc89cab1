//! Report rendering
//!
//! Turns aggregated buckets plus window totals into a text table or a
//! single self-contained HTML page (inline CSS, no external assets). An
//! empty window still renders a valid artifact with an explicit
//! "no transactions" indicator. The generation timestamp is passed in by
//! the caller, so rendering stays deterministic for fixed inputs.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{BudgetedCategory, ReportBucket, ReportSummary};

/// Output format for a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Text,
    Html,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
        }
    }
}

impl std::str::FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            _ => Err(format!("Unknown format: {} (valid: text, html)", s)),
        }
    }
}

impl std::fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const NO_DATA_LABEL: &str = "Sin transacciones en este período";
const APP_NAME: &str = "autocat";

/// Render buckets and totals in the requested format
///
/// `budget` carries the month's budgeted/activity figures and adds a
/// budget-vs-spending table to the text output; the HTML page does not
/// include it. `generated_at` feeds the footer.
pub fn render(
    buckets: &[ReportBucket],
    summary: &ReportSummary,
    budget: Option<&[BudgetedCategory]>,
    generated_at: NaiveDateTime,
    format: RenderFormat,
) -> String {
    match format {
        RenderFormat::Text => render_text(buckets, summary, budget, generated_at),
        RenderFormat::Html => render_html(buckets, summary, generated_at),
    }
}

fn format_units(milliunits: i64) -> String {
    format!("{:.2}", milliunits as f64 / 1000.0)
}

fn format_timestamp(generated_at: NaiveDateTime) -> String {
    generated_at.format("%d/%m/%Y a las %H:%M").to_string()
}

/// Expense magnitude share of a bucket within its period, for bar widths
fn expense_share(bucket: &ReportBucket, buckets: &[ReportBucket]) -> f64 {
    if bucket.total >= 0 {
        return 0.0;
    }
    let period_expenses: i64 = buckets
        .iter()
        .filter(|b| b.period_key == bucket.period_key && b.total < 0)
        .map(|b| -b.total)
        .sum();
    if period_expenses == 0 {
        0.0
    } else {
        (-bucket.total) as f64 / period_expenses as f64 * 100.0
    }
}

fn render_text(
    buckets: &[ReportBucket],
    summary: &ReportSummary,
    budget: Option<&[BudgetedCategory]>,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "REPORTE FINANCIERO");
    let _ = writeln!(out, "Período: {} - {}", summary.since, summary.until);
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out);
    let _ = writeln!(out, "Ingresos:  €{:>12}", format_units(summary.total_income));
    let _ = writeln!(
        out,
        "Gastos:    €{:>12}",
        format_units(summary.total_expenses)
    );
    let _ = writeln!(out, "Balance:   €{:>12}", format_units(summary.net));
    let _ = writeln!(out);

    if buckets.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA_LABEL);
    } else {
        let mut current_period = "";
        for bucket in buckets {
            if bucket.period_key != current_period {
                current_period = &bucket.period_key;
                let _ = writeln!(
                    out,
                    "── {} {}",
                    current_period,
                    "─".repeat(63 - current_period.len().min(60))
                );
            }
            let share = expense_share(bucket, buckets);
            let bar = "█".repeat((share / 10.0).round() as usize);
            let _ = writeln!(
                out,
                "   {:<35} €{:>12.2}  ({:>3} mov.) {}",
                bucket.category,
                bucket.total_units(),
                bucket.transaction_count,
                bar
            );
        }
    }

    if let Some(budget) = budget {
        let _ = writeln!(out);
        let _ = writeln!(out, "PRESUPUESTO DEL MES");
        let _ = writeln!(
            out,
            "   {:<32} {:>10} {:>10} {:>11} Estado",
            "Categoría", "Presup.", "Gastado", "Disponible"
        );
        let _ = writeln!(out, "   {}", "-".repeat(78));
        for (category, spent) in &summary.expenses_by_category {
            if let Some(figures) = budget.iter().find(|b| &b.name == category) {
                let _ = writeln!(
                    out,
                    "   {:<32} €{:>9} €{:>9} €{:>10} {}",
                    category,
                    format_units(figures.budgeted),
                    format_units(*spent),
                    format_units(figures.balance),
                    figures.status().label()
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Transacciones: {}", summary.transaction_count);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generado el {} ({})",
        format_timestamp(generated_at),
        APP_NAME
    );
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(
    buckets: &[ReportBucket],
    summary: &ReportSummary,
    generated_at: NaiveDateTime,
) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<div class="header">
  <h1>Reporte Financiero</h1>
  <p class="period">{since} &ndash; {until}</p>
</div>
<div class="summary">
  <div class="card"><h2>Ingresos</h2><div class="amount income">&euro;{income}</div></div>
  <div class="card"><h2>Gastos</h2><div class="amount expense">&euro;{expenses}</div></div>
  <div class="card"><h2>Balance</h2><div class="amount balance{neg}">&euro;{net}</div></div>
</div>
"#,
        since = summary.since,
        until = summary.until,
        income = format_units(summary.total_income),
        expenses = format_units(summary.total_expenses),
        net = format_units(summary.net),
        neg = if summary.net < 0 { " negative" } else { "" },
    );

    if buckets.is_empty() {
        let _ = write!(
            body,
            r#"<div class="category-list"><p class="no-data">{}</p></div>
"#,
            NO_DATA_LABEL
        );
    } else {
        let mut current_period = "";
        for bucket in buckets {
            if bucket.period_key != current_period {
                if !current_period.is_empty() {
                    body.push_str("</div>\n");
                }
                current_period = &bucket.period_key;
                let _ = write!(
                    body,
                    r#"<div class="category-list"><h2>{}</h2>
"#,
                    escape_html(current_period)
                );
            }
            let share = expense_share(bucket, buckets);
            let _ = write!(
                body,
                r#"  <div class="category-item">
    <div class="category-name">{name}</div>
    <div class="category-amount">&euro;{amount:.2}</div>
    <div class="category-bar"><div class="category-bar-fill" style="width: {share:.1}%">{share:.1}%</div></div>
  </div>
"#,
                name = escape_html(&bucket.category),
                amount = bucket.total_units(),
                share = share,
            );
        }
        body.push_str("</div>\n");
    }

    let _ = write!(
        body,
        r#"<div class="transaction-count">
  <div class="number">{count}</div>
  <div class="label">Transacciones</div>
</div>
<div class="footer">
  <p>Generado el {timestamp}</p>
  <p>{app} 🏦</p>
</div>
"#,
        count = summary.transaction_count,
        timestamp = format_timestamp(generated_at),
        app = APP_NAME,
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Reporte Financiero {since} - {until}</title>
<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
  padding: 20px; min-height: 100vh;
}}
.container {{ max-width: 1100px; margin: 0 auto; }}
.header {{ background: white; border-radius: 16px; padding: 32px; margin-bottom: 24px; }}
h1 {{ color: #2d3748; font-size: 2.2em; margin-bottom: 8px; }}
.period {{ color: #718096; }}
.summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 16px; margin-bottom: 24px; }}
.card {{ background: white; border-radius: 12px; padding: 24px; }}
.card h2 {{ color: #4a5568; font-size: 0.9em; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 12px; }}
.amount {{ font-size: 2em; font-weight: bold; }}
.amount.income {{ color: #48bb78; }}
.amount.expense {{ color: #f56565; }}
.amount.balance {{ color: #667eea; }}
.amount.balance.negative {{ color: #f56565; }}
.category-list {{ background: white; border-radius: 12px; padding: 24px; margin-bottom: 24px; }}
.category-list h2 {{ color: #2d3748; margin-bottom: 16px; }}
.category-item {{ display: flex; align-items: center; padding: 12px 0; border-bottom: 1px solid #e2e8f0; }}
.category-item:last-child {{ border-bottom: none; }}
.category-name {{ flex: 1; font-weight: 600; color: #2d3748; }}
.category-amount {{ margin: 0 16px; font-weight: bold; color: #4a5568; }}
.category-bar {{ flex: 1; max-width: 280px; height: 26px; background: #edf2f7; border-radius: 13px; overflow: hidden; }}
.category-bar-fill {{ height: 100%; background: linear-gradient(90deg, #667eea 0%, #764ba2 100%);
  border-radius: 13px; display: flex; align-items: center; justify-content: flex-end;
  padding-right: 8px; color: white; font-size: 0.8em; font-weight: bold; }}
.no-data {{ color: #718096; text-align: center; padding: 24px; }}
.transaction-count {{ background: white; border-radius: 12px; padding: 20px; text-align: center; }}
.transaction-count .number {{ font-size: 2.5em; font-weight: bold; color: #667eea; }}
.transaction-count .label {{ color: #718096; text-transform: uppercase; letter-spacing: 1px; }}
.footer {{ text-align: center; color: white; margin-top: 40px; opacity: 0.9; }}
</style>
</head>
<body>
<div class="container">
{body}</div>
</body>
</html>
"#,
        since = summary.since,
        until = summary.until,
        body = body,
    )
}
