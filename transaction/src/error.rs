//! Transaction error types.

use thiserror::Error;
use txprop_core::{ContextId, TxnId};

/// Transaction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// A context was ended or marked after it had already been ended.
    #[error("transaction context {context} already ended")]
    DoubleEnd { context: ContextId },

    /// Commit was requested but the transaction was marked rollback-only.
    #[error("transaction {txn} rolled back because it was marked rollback-only")]
    InconsistentCommit { txn: TxnId },

    /// The context is not known to this manager.
    #[error("unknown transaction context {context}")]
    UnknownContext { context: ContextId },

    /// Contexts must end in reverse order of their creation.
    #[error("cannot end {context}: {innermost} is still active")]
    NotInnermost {
        context: ContextId,
        innermost: ContextId,
    },

    /// No transaction is active.
    #[error("no transaction is active")]
    NoActiveTransaction,

    /// A resource refused or failed to apply committed writes.
    #[error("resource {resource} failed: {message}")]
    Resource { resource: String, message: String },
}

impl TransactionError {
    pub fn resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resource {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Check if this is the rollback-only commit failure.
    pub fn is_inconsistent_commit(&self) -> bool {
        matches!(self, Self::InconsistentCommit { .. })
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
