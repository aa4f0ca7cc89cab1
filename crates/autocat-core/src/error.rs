//! Error types for autocat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch from YNAB: {0}")]
    Fetch(String),

    #[error("Failed to update transaction {transaction_id}: {reason}")]
    Update {
        transaction_id: String,
        reason: String,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, Error>;
