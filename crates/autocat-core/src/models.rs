//! Domain models for autocat

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction as read from the budgeting service
///
/// Amounts are YNAB milliunits: 1000 = one currency unit. Expenses are
/// negative, income positive. The sign convention belongs to the service;
/// this crate only preserves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Merchant/counterparty name. YNAB can leave this empty.
    pub payee: Option<String>,
    /// Signed amount in milliunits
    pub amount: i64,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    /// Set when the transaction is an internal transfer
    pub transfer_account_id: Option<String>,
    pub deleted: bool,
}

impl Transaction {
    /// Whether this transaction should be considered for categorization
    /// or reporting at all (not deleted, not an internal transfer)
    pub fn is_reportable(&self) -> bool {
        !self.deleted && self.transfer_account_id.is_none()
    }

    pub fn is_uncategorized(&self) -> bool {
        self.is_reportable() && self.category_id.is_none()
    }

    /// Amount in whole currency units (for display only)
    pub fn amount_units(&self) -> f64 {
        self.amount as f64 / 1000.0
    }
}

/// A budget category from the service's catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// The flattened, non-hidden category catalog of a budget
///
/// Lookup is by exact name, the same contract the original rules have:
/// a rule's category must match a catalog name verbatim.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.id_for(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

/// Execution mode for a categorization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Compute matches only, issue no mutation calls
    Simulate,
    /// Push one category update per matched transaction
    Apply,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulate => "simulate",
            Self::Apply => "apply",
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulate" => Ok(Self::Simulate),
            "apply" => Ok(Self::Apply),
            _ => Err(format!("Unknown run mode: {} (valid: simulate, apply)", s)),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report bucketing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            _ => Err(format!("Unknown period: {} (valid: week, month)", s)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One category's budget figures for a month
///
/// All amounts are signed milliunits as YNAB reports them: `budgeted` and
/// `balance` are usually positive, `activity` is negative for spending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetedCategory {
    pub name: String,
    pub budgeted: i64,
    pub activity: i64,
    pub balance: i64,
}

impl BudgetedCategory {
    /// Traffic-light status of the remaining balance against the budget
    pub fn status(&self) -> BudgetStatus {
        if self.budgeted == 0 {
            BudgetStatus::Unbudgeted
        } else if self.balance < 0 {
            BudgetStatus::Exceeded
        } else if self.balance * 5 < self.budgeted {
            // Less than 20% of the budgeted amount left
            BudgetStatus::Low
        } else {
            BudgetStatus::Ok
        }
    }
}

/// How a category's spending stands against its monthly budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// No amount budgeted for the category this month
    Unbudgeted,
    /// Balance is negative: more spent than budgeted
    Exceeded,
    /// Less than a fifth of the budget remains
    Low,
    Ok,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unbudgeted => "⚪",
            Self::Exceeded => "🔴 Excedido",
            Self::Low => "🟡 Bajo",
            Self::Ok => "🟢 OK",
        }
    }
}

/// The outcome of matching one transaction against the rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub transaction_id: String,
    pub matched_category: Option<String>,
    pub matched_keyword: Option<String>,
}

/// A per-transaction failure recorded during an apply run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub transaction_id: String,
    pub reason: String,
}

/// Summary of a categorization run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Transactions a rule matched
    pub matched: usize,
    /// Transactions no rule matched (expected outcome, not an error)
    pub unmatched: usize,
    /// Category updates actually pushed to the service (always 0 in simulate)
    pub updated: usize,
    /// Per-transaction failures, in processing order
    pub errors: Vec<RunError>,
    /// Startup findings, e.g. rule categories missing from the catalog
    pub warnings: Vec<String>,
}

/// An aggregated total for one (period, category) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBucket {
    /// ISO year-week ("2024-W05") or year-month ("2024-02")
    pub period_key: String,
    pub category: String,
    /// Signed total in milliunits
    pub total: i64,
    pub transaction_count: usize,
}

impl ReportBucket {
    pub fn total_units(&self) -> f64 {
        self.total as f64 / 1000.0
    }
}

/// Income/expense totals for a reporting window
///
/// Amounts here are positive magnitudes in milliunits; the split by sign
/// happens during summarization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub since: NaiveDate,
    pub until: NaiveDate,
    pub total_income: i64,
    pub total_expenses: i64,
    /// income - expenses, signed
    pub net: i64,
    pub transaction_count: usize,
    /// (category, positive magnitude) sorted by magnitude descending
    pub expenses_by_category: Vec<(String, i64)>,
    pub income_by_category: Vec<(String, i64)>,
}

/// Category label used for transactions the service has no category for
pub const UNCATEGORIZED: &str = "Sin categoría";
