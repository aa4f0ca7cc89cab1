//! CLI command tests
//!
//! Runs the command functions against the in-memory mock budget client.

use std::path::Path;

use chrono::NaiveDate;

use autocat_core::{MockClient, Period, RuleSet, RunMode, RunSummary, Transaction};

use crate::commands::{self, build_message, report_output_path, DEFAULT_REPORT_FILE};

fn txn(id: &str, payee: &str, amount: i64) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        payee: Some(payee.to_string()),
        amount,
        category_id: None,
        category_name: None,
        transfer_account_id: None,
        deleted: false,
    }
}

fn mock_client() -> MockClient {
    MockClient::new()
        .with_categories(&["Supermercado", "Gasolina", "Suscripciones"])
        .with_transactions(vec![
            txn("t1", "MERCADONA VALENCIA", -23_500),
            txn("t2", "REPSOL ESTACION", -60_000),
            txn("t3", "XYZ Unknown Store", -5_000),
        ])
}

// ========== Categorize Command Tests ==========

#[tokio::test]
async fn test_cmd_simulate_runs_without_updates() {
    let client = mock_client();
    let rules = RuleSet::defaults();
    // Window reaching back years so the fixed test dates are included
    let result = commands::cmd_simulate(&client, &rules, 3650).await;
    assert!(result.is_ok());
    assert!(client.recorded_updates().is_empty());
}

#[tokio::test]
async fn test_cmd_apply_pushes_updates() {
    let client = mock_client();
    let rules = RuleSet::defaults();
    let result = commands::cmd_apply(&client, &rules, 3650).await;
    assert!(result.is_ok());
    assert_eq!(client.recorded_updates().len(), 2);
}

#[test]
fn test_print_summary_handles_errors_and_warnings() {
    // Smoke test: must not panic on a populated summary
    let summary = RunSummary {
        matched: 3,
        unmatched: 1,
        updated: 2,
        errors: vec![autocat_core::RunError {
            transaction_id: "t3".into(),
            reason: "injected".into(),
        }],
        warnings: vec!["Rule category \"Viajes\" does not exist".into()],
    };
    commands::print_summary(RunMode::Apply, &summary);
    commands::print_summary(RunMode::Simulate, &summary);
}

// ========== Report Command Tests ==========

#[tokio::test]
async fn test_build_report_buckets_window() {
    let client = mock_client();
    let (buckets, summary) = commands::build_report(&client, Period::Month, 3650)
        .await
        .unwrap();
    assert!(!buckets.is_empty());
    assert_eq!(summary.transaction_count, 3);
    let bucket_sum: i64 = buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_sum, -88_500);
}

#[tokio::test]
async fn test_cmd_report_writes_html_artifact() {
    let client = mock_client();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");

    let result =
        commands::cmd_report(&client, "month", "html", Some(path.as_path()), 3650).await;
    assert!(result.is_ok());

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Sin categoría"));
    assert!(html.contains(r#"<div class="footer">"#));
    assert!(html.contains("Generado el"));
}

#[tokio::test]
async fn test_cmd_report_with_budget_figures() {
    let client = mock_client().with_month_budget(vec![autocat_core::BudgetedCategory {
        name: "Sin categoría".into(),
        budgeted: 100_000,
        activity: -88_500,
        balance: 11_500,
    }]);
    // The monthly report fetches budget figures from the client; the run
    // must succeed with them present
    let result = commands::cmd_report(&client, "month", "text", None, 3650).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_report_overwrites_existing_artifact() {
    let client = mock_client();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.html");
    std::fs::write(&path, "stale").unwrap();

    commands::cmd_report(&client, "week", "html", Some(path.as_path()), 3650)
        .await
        .unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(!html.contains("stale"));
    assert!(html.contains("</html>"));
}

#[tokio::test]
async fn test_cmd_report_rejects_unknown_period() {
    let client = mock_client();
    let result = commands::cmd_report(&client, "quarter", "text", None, 30).await;
    assert!(result.is_err());
}

#[test]
fn test_report_output_path_prefers_flag() {
    let flag = Path::new("/tmp/custom.html");
    assert_eq!(report_output_path(Some(flag)), flag);
}

#[test]
fn test_default_report_file_name() {
    assert_eq!(DEFAULT_REPORT_FILE, "reporte_ynab.html");
}

// ========== Email Command Tests ==========

#[test]
fn test_build_message_is_wellformed_mime() {
    let message = build_message("user@example.com", "Reporte", "<html></html>");
    assert!(message.starts_with("To: user@example.com\r\n"));
    assert!(message.contains("Subject: Reporte\r\n"));
    assert!(message.contains("Content-Type: text/html; charset=UTF-8"));
    // Blank line separates headers from body
    assert!(message.contains("\r\n\r\n<html></html>"));
}

// ========== Shared Helper Tests ==========

#[test]
fn test_since_date_reaches_back() {
    let today = chrono::Utc::now().date_naive();
    assert_eq!(commands::since_date(0), today);
    assert_eq!(commands::since_date(30), today - chrono::Duration::days(30));
}

#[test]
fn test_load_rules_defaults_when_no_path() {
    let rules = commands::load_rules(None).unwrap();
    assert_eq!(rules.len(), 10);
}

#[test]
fn test_load_rules_rejects_missing_file() {
    let result = commands::load_rules(Some(Path::new("/nonexistent/rules.json")));
    assert!(result.is_err());
}
