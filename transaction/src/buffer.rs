//! Transaction buffer for tracking staged writes.

use std::fmt;
use std::sync::Arc;
use txprop_core::Record;

use crate::resource::TransactionalResource;

/// A write staged for a resource, not yet visible to readers.
#[derive(Clone)]
pub struct PendingWrite {
    /// The resource the record will be applied to.
    pub resource: Arc<dyn TransactionalResource>,
    /// The staged record.
    pub record: Record,
}

impl fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWrite")
            .field("resource", &self.resource.name())
            .field("record", &self.record)
            .finish()
    }
}

/// Transaction buffer that tracks uncommitted writes of one physical transaction.
///
/// Writes from every context sharing the transaction land in the same buffer,
/// so a rollback discards joined contexts' writes too.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuffer {
    writes: Vec<PendingWrite>,
}

impl TransactionBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a record for a resource.
    pub fn stage(&mut self, resource: Arc<dyn TransactionalResource>, record: Record) {
        self.writes.push(PendingWrite { resource, record });
    }

    /// Records staged for the named resource, in staging order.
    pub fn pending_for<'a>(&'a self, resource: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.writes
            .iter()
            .filter(move |w| w.resource.name() == resource)
            .map(|w| &w.record)
    }

    /// Check if a key is already staged for the named resource.
    pub fn contains_key(&self, resource: &str, key: &str) -> bool {
        self.pending_for(resource).any(|r| r.key == key)
    }

    /// Number of staged writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Group the staged writes by resource.
    ///
    /// Resources appear in the order they were first written to; records keep
    /// their staging order.
    pub fn into_grouped(self) -> Vec<(Arc<dyn TransactionalResource>, Vec<Record>)> {
        let mut groups: Vec<(Arc<dyn TransactionalResource>, Vec<Record>)> = Vec::new();
        for write in self.writes {
            match groups
                .iter_mut()
                .find(|(res, _)| res.name() == write.resource.name())
            {
                Some((_, records)) => records.push(write.record),
                None => groups.push((write.resource, vec![write.record])),
            }
        }
        groups
    }
}
