//! Budgeting service access
//!
//! The engine and the report commands talk to the budgeting service
//! through the [`BudgetClient`] trait. [`YnabClient`] is the production
//! implementation against the YNAB v1 API; [`MockClient`] is an in-memory
//! implementation for tests and development without network access.

mod mock;
mod ynab;

pub use mock::MockClient;
pub use ynab::YnabClient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{BudgetedCategory, CategoryCatalog, Transaction};

/// Read/update access to a single budget
///
/// All calls are blocking round-trips from the caller's point of view;
/// implementations must not overlap requests.
#[async_trait]
pub trait BudgetClient {
    /// The budget's flattened, non-hidden category catalog
    async fn categories(&self) -> Result<CategoryCatalog>;

    /// All non-deleted, non-transfer transactions on or after `since`
    async fn transactions_since(&self, since: NaiveDate) -> Result<Vec<Transaction>>;

    /// The subset of [`transactions_since`](Self::transactions_since)
    /// without a category
    async fn uncategorized_since(&self, since: NaiveDate) -> Result<Vec<Transaction>> {
        let transactions = self.transactions_since(since).await?;
        Ok(transactions
            .into_iter()
            .filter(|t| t.is_uncategorized())
            .collect())
    }

    /// Per-category budgeted/activity/balance figures for the month
    /// containing `month` (YNAB keys months by their first day)
    async fn month_budget(&self, month: NaiveDate) -> Result<Vec<BudgetedCategory>>;

    /// Set the category of one transaction
    async fn update_category(&self, transaction_id: &str, category_id: &str) -> Result<()>;
}
