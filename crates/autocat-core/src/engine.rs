//! Categorization engine
//!
//! Orchestrates one run: fetch the category catalog, validate the rule
//! table against it, fetch uncategorized transactions, match each payee,
//! and (in apply mode) push one category update per match.
//!
//! Failure model: anything that goes wrong before the first mutation is
//! fatal and aborts the run with nothing changed. Once the update loop has
//! started, a failure on one transaction is recorded and the loop moves on;
//! transactions are processed strictly in fetch order so reruns are
//! reproducible.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::BudgetClient;
use crate::error::{Error, Result};
use crate::matcher::match_payee;
use crate::models::{MatchResult, RunError, RunMode, RunSummary};
use crate::rules::RuleSet;

/// One-shot categorization runner
///
/// Holds references only; construct per run with the configuration in
/// hand — there is no process-wide state.
pub struct Categorizer<'a, C: BudgetClient + Sync> {
    client: &'a C,
    rules: &'a RuleSet,
}

impl<'a, C: BudgetClient + Sync> Categorizer<'a, C> {
    pub fn new(client: &'a C, rules: &'a RuleSet) -> Self {
        Self { client, rules }
    }

    /// Run categorization over uncategorized transactions since `since`
    pub async fn run(&self, mode: RunMode, since: NaiveDate) -> Result<RunSummary> {
        // Catalog fetch doubles as the auth check: a bad token fails here,
        // before anything could be mutated.
        let catalog = self.client.categories().await?;
        info!("Budget catalog has {} categories", catalog.len());

        let mut summary = RunSummary {
            warnings: self.rules.validate_against(&catalog),
            ..RunSummary::default()
        };
        for warning in &summary.warnings {
            warn!("{}", warning);
        }

        let transactions = self.client.uncategorized_since(since).await?;
        info!(
            "Found {} uncategorized transactions since {} ({} mode)",
            transactions.len(),
            since,
            mode
        );

        for transaction in &transactions {
            let payee = transaction.payee.as_deref().unwrap_or("");
            let result = match match_payee(payee, self.rules) {
                Some(m) => MatchResult {
                    transaction_id: transaction.id.clone(),
                    matched_category: Some(m.category.to_string()),
                    matched_keyword: Some(m.keyword.to_string()),
                },
                None => MatchResult {
                    transaction_id: transaction.id.clone(),
                    matched_category: None,
                    matched_keyword: None,
                },
            };

            let Some(category) = result.matched_category.as_deref() else {
                debug!("No rule matched \"{}\"", payee);
                summary.unmatched += 1;
                continue;
            };
            summary.matched += 1;
            debug!(
                "\"{}\" ({:.2}) -> {} (keyword \"{}\")",
                payee,
                transaction.amount_units(),
                category,
                result.matched_keyword.as_deref().unwrap_or("")
            );

            if mode == RunMode::Simulate {
                continue;
            }

            // Apply path: resolve the category against the catalog, then
            // patch. Either step failing is a per-transaction error.
            let Some(category_id) = catalog.id_for(category) else {
                summary.errors.push(RunError {
                    transaction_id: transaction.id.clone(),
                    reason: Error::UnknownCategory(category.to_string()).to_string(),
                });
                continue;
            };

            match self.client.update_category(&transaction.id, category_id).await {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!("Update failed for {}: {}", transaction.id, e);
                    summary.errors.push(RunError {
                        transaction_id: transaction.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Run complete: {} matched, {} unmatched, {} updated, {} errors",
            summary.matched,
            summary.unmatched,
            summary.updated,
            summary.errors.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockClient;
    use crate::error::Error;
    use crate::models::Transaction;
    use crate::rules::RuleSet;

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

    fn since() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn spanish_catalog() -> Vec<&'static str> {
        vec![
            "Supermercado",
            "Restaurantes y bares",
            "Gasolina",
            "Transporte Público",
            "Suscripciones",
            "Internet y móviles",
            "Suministros (luz, agua y gas)",
            "Ropa",
            "Salud y belleza",
            "Deporte",
        ]
    }

    #[tokio::test]
    async fn test_simulate_never_updates() {
        let client = MockClient::new()
            .with_categories(&spanish_catalog())
            .with_transactions(vec![
                txn("t1", "MERCADONA VALENCIA", -23_500),
                txn("t2", "NETFLIX.COM", -12_990),
                txn("t3", "XYZ Unknown Store 123", -5_000),
            ]);
        let rules = RuleSet::defaults();

        let summary = Categorizer::new(&client, &rules)
            .run(RunMode::Simulate, since())
            .await
            .unwrap();

        assert_eq!(summary.matched, 2);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.updated, 0);
        assert!(summary.errors.is_empty());
        assert!(client.recorded_updates().is_empty());
    }

    #[tokio::test]
    async fn test_apply_updates_matched_transactions() {
        let client = MockClient::new()
            .with_categories(&spanish_catalog())
            .with_transactions(vec![
                txn("t1", "MERCADONA VALENCIA", -23_500),
                txn("t2", "Spotify AB", -10_990),
            ]);
        let rules = RuleSet::defaults();

        let summary = Categorizer::new(&client, &rules)
            .run(RunMode::Apply, since())
            .await
            .unwrap();

        assert_eq!(summary.matched, 2);
        assert_eq!(summary.updated, 2);
        assert!(summary.errors.is_empty());

        let updates = client.recorded_updates();
        assert_eq!(updates.len(), 2);
        // Sequential in fetch order
        assert_eq!(updates[0].0, "t1");
        assert_eq!(updates[1].0, "t2");
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort() {
        let client = MockClient::new()
            .with_categories(&spanish_catalog())
            .with_transactions(vec![
                txn("t1", "MERCADONA", -1_000),
                txn("t2", "LIDL", -2_000),
                txn("t3", "CARREFOUR", -3_000),
                txn("t4", "ALDI", -4_000),
                txn("t5", "EROSKI", -5_000),
            ])
            .failing_update("t3");
        let rules = RuleSet::defaults();

        let summary = Categorizer::new(&client, &rules)
            .run(RunMode::Apply, since())
            .await
            .unwrap();

        assert_eq!(summary.matched, 5);
        assert_eq!(summary.updated, 4);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].transaction_id, "t3");
    }

    #[tokio::test]
    async fn test_unknown_rule_category_is_per_transaction_error() {
        let client = MockClient::new()
            .with_categories(&["Supermercado"])
            .with_transactions(vec![txn("t1", "NETFLIX.COM", -12_990)]);
        let rules = RuleSet::defaults();

        let summary = Categorizer::new(&client, &rules)
            .run(RunMode::Apply, since())
            .await
            .unwrap();

        // Suscripciones is not in this budget's catalog
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].reason.contains("Unknown category"));
        assert!(summary.errors[0].reason.contains("Suscripciones"));
        // And the startup validation flagged it too
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.contains("Suscripciones")));
    }

    #[tokio::test]
    async fn test_auth_failure_is_fatal_before_any_mutation() {
        let client = MockClient::new()
            .with_categories(&spanish_catalog())
            .with_transactions(vec![txn("t1", "MERCADONA", -1_000)])
            .with_auth_failure();
        let rules = RuleSet::defaults();

        let result = Categorizer::new(&client, &rules)
            .run(RunMode::Apply, since())
            .await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert!(client.recorded_updates().is_empty());
    }

    #[tokio::test]
    async fn test_missing_payee_counts_as_unmatched() {
        let mut no_payee = txn("t1", "", -1_000);
        no_payee.payee = None;
        let client = MockClient::new()
            .with_categories(&spanish_catalog())
            .with_transactions(vec![no_payee]);
        let rules = RuleSet::defaults();

        let summary = Categorizer::new(&client, &rules)
            .run(RunMode::Apply, since())
            .await
            .unwrap();

        assert_eq!(summary.matched, 0);
        assert_eq!(summary.unmatched, 1);
    }
}
