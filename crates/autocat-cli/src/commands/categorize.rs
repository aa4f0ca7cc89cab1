//! Simulate/apply command implementations

use anyhow::Result;

use autocat_core::{BudgetClient, Categorizer, RuleSet, RunMode, RunSummary};

use super::since_date;

pub async fn cmd_simulate(
    client: &(impl BudgetClient + Sync),
    rules: &RuleSet,
    days_back: i64,
) -> Result<()> {
    run_categorization(client, rules, RunMode::Simulate, days_back).await
}

pub async fn cmd_apply(client: &(impl BudgetClient + Sync), rules: &RuleSet, days_back: i64) -> Result<()> {
    run_categorization(client, rules, RunMode::Apply, days_back).await
}

async fn run_categorization(
    client: &(impl BudgetClient + Sync),
    rules: &RuleSet,
    mode: RunMode,
    days_back: i64,
) -> Result<()> {
    let since = since_date(days_back);
    println!();
    println!(
        "🔍 Looking for uncategorized transactions since {} ({} rules, {} mode)",
        since,
        rules.len(),
        mode
    );

    let summary = Categorizer::new(client, rules).run(mode, since).await?;
    print_summary(mode, &summary);
    Ok(())
}

/// Print a run summary in the style of the original script's RESUMEN block
pub fn print_summary(mode: RunMode, summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(70));
    match mode {
        RunMode::Simulate => println!(
            "📈 RESUMEN (simulación): {} coincidencias, {} sin regla (nada se ha modificado)",
            summary.matched, summary.unmatched
        ),
        RunMode::Apply => println!(
            "📈 RESUMEN: {} coincidencias, {} sin regla, {} actualizadas",
            summary.matched, summary.unmatched, summary.updated
        ),
    }
    println!("{}", "=".repeat(70));

    if !summary.warnings.is_empty() {
        println!();
        println!("⚠️  Avisos:");
        for warning in &summary.warnings {
            println!("   - {}", warning);
        }
    }

    if !summary.errors.is_empty() {
        println!();
        println!("❌ Errores ({}):", summary.errors.len());
        for error in &summary.errors {
            println!("   - {}: {}", error.transaction_id, error.reason);
        }
    }
}
