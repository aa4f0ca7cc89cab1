//! autocat core library
//!
//! Shared functionality for the autocat YNAB auto-categorizer:
//! - Ordered keyword rule table with JSON loading and built-in defaults
//! - Pure substring matcher over payee names
//! - YNAB v1 API client behind a `BudgetClient` trait (with a test mock)
//! - Categorization engine with simulate/apply modes
//! - Report aggregation into (period, category) buckets
//! - Text/HTML report rendering

pub mod api;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod models;
pub mod render;
pub mod report;
pub mod rules;

pub use api::{BudgetClient, MockClient, YnabClient};
pub use engine::Categorizer;
pub use error::{Error, Result};
pub use matcher::{match_payee, RuleMatch};
pub use models::{
    BudgetStatus, BudgetedCategory, Category, CategoryCatalog, MatchResult, Period,
    ReportBucket, ReportSummary, RunError, RunMode, RunSummary, Transaction, UNCATEGORIZED,
};
pub use render::{render, RenderFormat};
pub use report::{aggregate, period_key, summarize};
pub use rules::{Rule, RuleSet};
