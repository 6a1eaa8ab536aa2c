//! Typed failures of the ledger operations.

use crate::core::currency::RateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("No client with identification number {0}")]
    NotFound(u64),

    #[error("A client with identification number {0} already exists")]
    DuplicateIdentificationNumber(u64),

    #[error("Client index {index} is out of range for {len} clients")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{field} must be a finite number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("No client is selected, look one up first")]
    NoSelection,

    #[error("Selected client {0} has changed since it was looked up, look it up again")]
    StaleSelection(u64),

    #[error("Stored record '{record}' is malformed: {source}")]
    MalformedRecord {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage failure: {0}")]
    Storage(anyhow::Error),

    #[error(transparent)]
    Rate(#[from] RateError),
}
