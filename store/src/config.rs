//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection name, used in logs, errors and as the resource name.
    pub name: String,
    /// Payloads containing this substring fail validation on save.
    #[serde(default)]
    pub fault_sentinel: Option<String>,
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fault_sentinel: None,
        }
    }

    pub fn fault_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.fault_sentinel = Some(sentinel.into());
        self
    }
}
