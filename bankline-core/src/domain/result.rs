//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Unknown account number or PIN mismatch. Both look the same to the caller.
    #[error("Invalid account number or PIN")]
    Authentication,

    #[error("Insufficient balance: available {balance:.2}, requested {requested:.2}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("Withdrawal limit per operation is {limit:.2}")]
    WithdrawalLimitExceeded { limit: Decimal },

    #[error("Withdrawal limit reached: at most {max} withdrawals per session")]
    WithdrawalCountExceeded { max: u32 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Short category name, safe to write to the event log
    pub fn category(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Authentication => "authentication",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::WithdrawalLimitExceeded { .. } => "withdrawal_limit_exceeded",
            Error::WithdrawalCountExceeded { .. } => "withdrawal_count_exceeded",
            Error::Storage(_) => "storage",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
