//! Service error types.

use thiserror::Error;
use txprop_store::StoreError;
use txprop_transaction::TransactionError;

/// Service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// Configuration could not be parsed or is invalid.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl ServiceError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is an injected validation fault from a store.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_validation())
    }

    /// Check if a commit hit a transaction poisoned by a swallowed failure.
    pub fn is_inconsistent_commit(&self) -> bool {
        match self {
            Self::Transaction(err) | Self::Store(StoreError::Transaction(err)) => {
                err.is_inconsistent_commit()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::config(err.to_string())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
