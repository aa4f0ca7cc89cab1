//! YNAB v1 API client
//!
//! Thin wrapper over the three endpoints this tool needs: list categories,
//! list transactions since a date, and patch one transaction's category.
//! Authentication is a bearer token; the token is held in memory only and
//! never logged.
//!
//! Transient transport failures (connect/timeout) are retried a bounded
//! number of times with a short pause. HTTP 401/403 is an authentication
//! failure and is never retried.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{BudgetedCategory, Category, CategoryCatalog, Transaction};

use super::BudgetClient;

const DEFAULT_BASE_URL: &str = "https://api.ynab.com/v1";

/// Retries after the initial attempt, transient transport errors only
const MAX_RETRIES: u32 = 2;
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Client for one YNAB budget
pub struct YnabClient {
    http_client: Client,
    base_url: String,
    token: String,
    budget_id: String,
}

impl YnabClient {
    /// Create a client for the given budget
    ///
    /// YNAB accepts the literal budget id `"last-used"` for the most
    /// recently opened budget.
    pub fn new(token: &str, budget_id: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token, budget_id)
    }

    /// Create a client against a non-default base URL (tests, mocks)
    pub fn with_base_url(base_url: &str, token: &str, budget_id: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            budget_id: budget_id.to_string(),
        }
    }

    /// Create from `YNAB_API_TOKEN` and `YNAB_BUDGET_ID` environment
    /// variables; `None` when no token is configured
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("YNAB_API_TOKEN").ok().filter(|t| !t.is_empty())?;
        let budget_id =
            std::env::var("YNAB_BUDGET_ID").unwrap_or_else(|_| "last-used".to_string());
        Some(Self::new(&token, &budget_id))
    }

    /// Same client pointed at a different budget
    pub fn with_budget(mut self, budget_id: &str) -> Self {
        self.budget_id = budget_id.to_string();
        self
    }

    pub fn budget_id(&self) -> &str {
        &self.budget_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    /// Send a request, retrying bounded on transient transport errors
    async fn send_with_retry(&self, build: impl Fn() -> RequestBuilder) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match build().send().await {
                Ok(response) => return self.check_status(response),
                Err(e) if attempt < MAX_RETRIES && (e.is_connect() || e.is_timeout()) => {
                    attempt += 1;
                    warn!(
                        "Transient YNAB request failure ({}), retry {}/{}",
                        e, attempt, MAX_RETRIES
                    );
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }

    fn check_status(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(
                "YNAB rejected the API token (check YNAB_API_TOKEN)".into(),
            )),
            status if !status.is_success() => Err(Error::Fetch(format!(
                "YNAB returned HTTP {} for {}",
                status,
                response.url().path()
            ))),
            _ => Ok(response),
        }
    }
}

// ---- Wire types (YNAB v1 JSON envelopes) ----

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    data: CategoriesData,
}

#[derive(Debug, Deserialize)]
struct CategoriesData {
    category_groups: Vec<ApiCategoryGroup>,
}

#[derive(Debug, Deserialize)]
struct ApiCategoryGroup {
    categories: Vec<ApiCategory>,
}

#[derive(Debug, Deserialize)]
struct ApiCategory {
    id: String,
    name: String,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    data: TransactionsData,
}

#[derive(Debug, Deserialize)]
struct TransactionsData {
    transactions: Vec<ApiTransaction>,
}

#[derive(Debug, Deserialize)]
struct ApiTransaction {
    id: String,
    date: NaiveDate,
    /// Milliunits, signed
    amount: i64,
    payee_name: Option<String>,
    category_id: Option<String>,
    category_name: Option<String>,
    transfer_account_id: Option<String>,
    #[serde(default)]
    deleted: bool,
}

impl From<ApiTransaction> for Transaction {
    fn from(t: ApiTransaction) -> Self {
        Transaction {
            id: t.id,
            date: t.date,
            payee: t.payee_name,
            amount: t.amount,
            category_id: t.category_id,
            category_name: t.category_name,
            transfer_account_id: t.transfer_account_id,
            deleted: t.deleted,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MonthResponse {
    data: MonthData,
}

#[derive(Debug, Deserialize)]
struct MonthData {
    month: ApiMonth,
}

#[derive(Debug, Deserialize)]
struct ApiMonth {
    categories: Vec<ApiBudgetedCategory>,
}

#[derive(Debug, Deserialize)]
struct ApiBudgetedCategory {
    name: String,
    budgeted: i64,
    activity: i64,
    balance: i64,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Serialize)]
struct UpdateTransactionRequest<'a> {
    transaction: TransactionPatch<'a>,
}

#[derive(Debug, Serialize)]
struct TransactionPatch<'a> {
    category_id: &'a str,
}

#[async_trait]
impl BudgetClient for YnabClient {
    async fn categories(&self) -> Result<CategoryCatalog> {
        let path = format!("/budgets/{}/categories", self.budget_id);
        let response = self
            .send_with_retry(|| self.request(Method::GET, &path))
            .await?;
        let body: CategoriesResponse = response.json().await?;

        let categories: Vec<Category> = body
            .data
            .category_groups
            .into_iter()
            .flat_map(|g| g.categories)
            .filter(|c| !c.hidden)
            .map(|c| Category {
                id: c.id,
                name: c.name,
            })
            .collect();
        debug!("Fetched {} visible categories", categories.len());

        Ok(CategoryCatalog::new(categories))
    }

    async fn transactions_since(&self, since: NaiveDate) -> Result<Vec<Transaction>> {
        let path = format!("/budgets/{}/transactions", self.budget_id);
        let since_date = since.format("%Y-%m-%d").to_string();
        let response = self
            .send_with_retry(|| {
                self.request(Method::GET, &path)
                    .query(&[("since_date", since_date.as_str())])
            })
            .await?;
        let body: TransactionsResponse = response.json().await?;

        let transactions: Vec<Transaction> = body
            .data
            .transactions
            .into_iter()
            .map(Transaction::from)
            .filter(|t| t.is_reportable())
            .collect();
        debug!(
            "Fetched {} reportable transactions since {}",
            transactions.len(),
            since_date
        );

        Ok(transactions)
    }

    async fn month_budget(&self, month: NaiveDate) -> Result<Vec<BudgetedCategory>> {
        // YNAB addresses months by their first day
        let month_key = month.format("%Y-%m-01").to_string();
        let path = format!("/budgets/{}/months/{}", self.budget_id, month_key);
        let response = self
            .send_with_retry(|| self.request(Method::GET, &path))
            .await?;
        let body: MonthResponse = response.json().await?;

        let categories: Vec<BudgetedCategory> = body
            .data
            .month
            .categories
            .into_iter()
            .filter(|c| !c.hidden)
            .map(|c| BudgetedCategory {
                name: c.name,
                budgeted: c.budgeted,
                activity: c.activity,
                balance: c.balance,
            })
            .collect();
        debug!(
            "Fetched budget figures for {} categories in {}",
            categories.len(),
            month_key
        );

        Ok(categories)
    }

    async fn update_category(&self, transaction_id: &str, category_id: &str) -> Result<()> {
        let path = format!("/budgets/{}/transactions/{}", self.budget_id, transaction_id);
        let body = UpdateTransactionRequest {
            transaction: TransactionPatch { category_id },
        };

        // Mutations are not retried: a timed-out PATCH may still have landed
        let response = self.request(Method::PATCH, &path).json(&body).send().await?;
        self.check_status(response).map_err(|e| match e {
            Error::Auth(_) => e,
            other => Error::Update {
                transaction_id: transaction_id.to_string(),
                reason: other.to_string(),
            },
        })?;

        debug!("Updated category of transaction {}", transaction_id);
        Ok(())
    }
}
