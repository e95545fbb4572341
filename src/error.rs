//! Error types shared by the engine and its persistence layer.
//!
//! None of these are fatal: purchases report a shortfall and leave state
//! untouched, and store failures fall back to in-memory play.

use thiserror::Error;

/// A spend attempt that the current balance cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpendError {
    #[error("insufficient funds: {shortfall} more coins needed")]
    InsufficientFunds { shortfall: u64 },
}

impl SpendError {
    pub fn shortfall(&self) -> u64 {
        match self {
            SpendError::InsufficientFunds { shortfall } => *shortfall,
        }
    }
}

/// Failures of the save/load round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be read or written.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    /// A blob was found under the save key but could not be parsed.
    #[error("corrupt save: {0}")]
    CorruptSave(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::CorruptSave(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::PersistenceUnavailable(e.to_string())
    }
}
