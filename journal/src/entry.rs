//! Journal entry types.

use serde::{Deserialize, Serialize};
use txprop_core::{ContextId, TxnId};

/// Sequence number - unique identifier for each journal entry.
pub type Seq = u64;

/// Transaction lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnEvent {
    /// A new physical transaction was started by an owning context.
    Begin { txn: TxnId, context: ContextId },

    /// A non-owning context joined an existing physical transaction.
    Join { txn: TxnId, context: ContextId },

    /// A physical transaction was set aside for an independent one.
    Suspend { txn: TxnId },

    /// A suspended physical transaction became current again.
    Resume { txn: TxnId },

    /// A physical transaction was marked rollback-only.
    MarkRollbackOnly { txn: TxnId, context: ContextId },

    /// A physical transaction committed.
    Commit { txn: TxnId },

    /// A physical transaction rolled back.
    Rollback { txn: TxnId },

    /// A non-owning context ended without physical action.
    Release { txn: TxnId, context: ContextId },
}

impl TxnEvent {
    /// Get the physical transaction this event belongs to.
    pub fn txn(&self) -> TxnId {
        match self {
            TxnEvent::Begin { txn, .. }
            | TxnEvent::Join { txn, .. }
            | TxnEvent::Suspend { txn }
            | TxnEvent::Resume { txn }
            | TxnEvent::MarkRollbackOnly { txn, .. }
            | TxnEvent::Commit { txn }
            | TxnEvent::Rollback { txn }
            | TxnEvent::Release { txn, .. } => *txn,
        }
    }

    /// Check if this is a commit event.
    pub fn is_commit(&self) -> bool {
        matches!(self, TxnEvent::Commit { .. })
    }

    /// Check if this is a rollback event.
    pub fn is_rollback(&self) -> bool {
        matches!(self, TxnEvent::Rollback { .. })
    }
}

/// A journal entry with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: Seq,
    pub event: TxnEvent,
}

impl EventRecord {
    pub fn new(seq: Seq, event: TxnEvent) -> Self {
        Self { seq, event }
    }
}
