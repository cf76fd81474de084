//! Store error types.

use thiserror::Error;
use txprop_transaction::TransactionError;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record was rejected by the store's fault injector.
    #[error("validation failed in {store} for key {key}: {message}")]
    Validation {
        store: String,
        key: String,
        message: String,
    },

    /// A record with this key already exists or is already staged.
    #[error("duplicate key {key} in {store}")]
    DuplicateKey { store: String, key: String },

    /// The fault pattern did not compile.
    #[error("invalid fault pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Transaction error while staging or auto-committing.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl StoreError {
    pub fn validation(
        store: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            store: store.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_key(store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            store: store.into(),
            key: key.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Check if this is an injected validation fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
