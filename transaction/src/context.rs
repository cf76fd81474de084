//! Transaction contexts and propagation modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use txprop_core::{ContextId, TxnId};

/// How a context relates to the transaction that is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationMode {
    /// Join the active transaction, or start one if none is active.
    #[serde(alias = "required")]
    JoinOrCreate,
    /// Always start an independent transaction, suspending any active one.
    #[serde(alias = "requires_new")]
    AlwaysNew,
}

impl fmt::Display for PropagationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagationMode::JoinOrCreate => write!(f, "JOIN_OR_CREATE"),
            PropagationMode::AlwaysNew => write!(f, "ALWAYS_NEW"),
        }
    }
}

/// Handle to one begin/end pair.
///
/// Owning contexts (`is_new`) decide the physical commit or rollback of their
/// transaction. Joined contexts only ever mark it rollback-only. The
/// rollback-only flag itself lives on the physical transaction and is read
/// through [`TransactionManager::is_rollback_only`](crate::TransactionManager::is_rollback_only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionContext {
    pub(crate) id: ContextId,
    pub(crate) txn: TxnId,
    pub(crate) is_new: bool,
    pub(crate) parent: Option<ContextId>,
}

impl TransactionContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The physical transaction this context belongs to.
    pub fn txn(&self) -> TxnId {
        self.txn
    }

    /// Whether this context owns the physical commit/rollback decision.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The context that was innermost when this one began.
    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }
}

/// What ending a context did physically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Owning context, writes made durable.
    Committed,
    /// Owning context, writes discarded.
    RolledBack,
    /// Joined context, nothing happened physically.
    Released,
}
