//! Error types for rusty-ledger

use crate::types::Timestamp;
use thiserror::Error;

/// Main error type for rusty-ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Rejected input at a construction boundary (factory, holding, deserialization)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No price for {ticker} at or before {date}")]
    MissingPrice { ticker: String, date: Timestamp },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl LedgerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(msg.into())
    }

    /// True for the construction-time validation failures
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LedgerError::InvalidArgument(_))
    }
}

/// Result type alias for rusty-ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
