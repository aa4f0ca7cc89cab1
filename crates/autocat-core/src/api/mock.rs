//! Mock budget client for testing
//!
//! In-memory [`BudgetClient`] with configurable transactions, catalog, and
//! failure injection. Records the update calls it receives so tests can
//! assert what was (not) mutated.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{BudgetedCategory, Category, CategoryCatalog, Transaction};

use super::BudgetClient;

/// Mock budget client
///
/// Default state: empty catalog, no transactions, everything succeeds.
#[derive(Default)]
pub struct MockClient {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    month_budget: Vec<BudgetedCategory>,
    /// Transaction ids whose update call should fail
    failing_updates: HashSet<String>,
    /// When set, every call fails with `Error::Auth`
    auth_failure: bool,
    /// (transaction_id, category_id) pairs, in call order
    updates: Mutex<Vec<(String, String)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, names: &[&str]) -> Self {
        self.categories = names
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: format!("cat-{}", i + 1),
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn with_month_budget(mut self, budget: Vec<BudgetedCategory>) -> Self {
        self.month_budget = budget;
        self
    }

    /// Make `update_category` fail for the given transaction id
    pub fn failing_update(mut self, transaction_id: &str) -> Self {
        self.failing_updates.insert(transaction_id.to_string());
        self
    }

    /// Make every call fail with an authentication error
    pub fn with_auth_failure(mut self) -> Self {
        self.auth_failure = true;
        self
    }

    /// Updates received so far, in call order
    pub fn recorded_updates(&self) -> Vec<(String, String)> {
        self.updates.lock().expect("mock lock poisoned").clone()
    }

    fn check_auth(&self) -> Result<()> {
        if self.auth_failure {
            Err(Error::Auth("mock token rejected".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BudgetClient for MockClient {
    async fn categories(&self) -> Result<CategoryCatalog> {
        self.check_auth()?;
        Ok(CategoryCatalog::new(self.categories.clone()))
    }

    async fn transactions_since(&self, since: NaiveDate) -> Result<Vec<Transaction>> {
        self.check_auth()?;
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.date >= since && t.is_reportable())
            .cloned()
            .collect())
    }

    async fn month_budget(&self, _month: NaiveDate) -> Result<Vec<BudgetedCategory>> {
        self.check_auth()?;
        Ok(self.month_budget.clone())
    }

    async fn update_category(&self, transaction_id: &str, category_id: &str) -> Result<()> {
        self.check_auth()?;
        if self.failing_updates.contains(transaction_id) {
            return Err(Error::Update {
                transaction_id: transaction_id.to_string(),
                reason: "injected failure".into(),
            });
        }
        self.updates
            .lock()
            .expect("mock lock poisoned")
            .push((transaction_id.to_string(), category_id.to_string()));
        Ok(())
    }
}
