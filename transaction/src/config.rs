//! Transaction manager configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`TransactionManager`](crate::TransactionManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Record lifecycle events in the manager's journal.
    pub journal_enabled: bool,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            journal_enabled: true,
        }
    }
}

impl TransactionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal_enabled(mut self, enabled: bool) -> Self {
        self.journal_enabled = enabled;
        self
    }
}
