use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for tracker operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to open database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("Database operation failed: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Amount overflow while computing {0}")]
    Overflow(&'static str),
}

/// Client-input failures. Raised before anything touches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),

    #[error("invalid amount '{0}'")]
    Amount(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("month must be between 1 and 12 (got {0})")]
    Month(u32),

    #[error("year {0} is out of range (1-9999)")]
    Year(i32),

    #[error("invalid period '{0}', expected YYYY-MM")]
    Period(String),

    #[error("invalid timestamp '{0}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    Timestamp(String),

    #[error("alert threshold must not be negative (got {0})")]
    NegativeThreshold(Decimal),
}
