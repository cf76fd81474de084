//! Record structures for txprop.
//!
//! A record is the only persisted entity: a unique key within its collection
//! and an opaque string payload.

use crate::RecordId;
use serde::{Deserialize, Serialize};

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier assigned by the owning store.
    pub id: RecordId,
    /// Key, unique within a collection.
    pub key: String,
    /// Opaque payload.
    pub payload: String,
}

impl Record {
    /// Create a record with an already assigned id.
    pub fn new(id: RecordId, key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub key: String,
    pub payload: String,
}

impl NewRecord {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }

    /// Attach an id, turning this into a full record.
    pub fn with_id(self, id: RecordId) -> Record {
        Record {
            id,
            key: self.key,
            payload: self.payload,
        }
    }
}
