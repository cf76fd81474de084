//! Record store implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use txprop_core::{NewRecord, Record, RecordId};
use txprop_transaction::{
    TransactionError, TransactionManager, TransactionResult, TransactionalResource,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::fault::FaultInjector;

/// A collection of records keyed by name.
///
/// Saves go through the caller's [`TransactionManager`]: with an active
/// context the record is staged in that context's physical transaction and
/// becomes visible when the owner commits; without one the save is
/// committed on its own. `find` only ever sees committed records.
///
/// Stores are shared behind an `Arc` by any number of concurrent managers.
#[derive(Debug)]
pub struct RecordStore {
    name: String,
    fault: Option<FaultInjector>,
    committed: RwLock<HashMap<String, Record>>,
    next_id: AtomicU64,
}

impl RecordStore {
    /// Create a store from configuration.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let fault = config
            .fault_sentinel
            .as_deref()
            .map(FaultInjector::sentinel)
            .transpose()?;
        Ok(Self::build(config.name, fault))
    }

    /// Create a store without fault injection.
    pub fn named(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// Create a store with an explicit fault injector.
    pub fn with_fault_injector(name: impl Into<String>, fault: FaultInjector) -> Self {
        Self::build(name.into(), Some(fault))
    }

    fn build(name: String, fault: Option<FaultInjector>) -> Self {
        Self {
            name,
            fault,
            committed: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fault_injector(&self) -> Option<&FaultInjector> {
        self.fault.as_ref()
    }

    // ==================== Writes ====================

    /// Save a record in the caller's current transaction.
    ///
    /// A key that is committed, or staged in any open transaction of `tx`,
    /// is rejected with [`StoreError::DuplicateKey`].
    pub fn save(
        self: &Arc<Self>,
        tx: &mut TransactionManager,
        record: NewRecord,
    ) -> StoreResult<RecordId> {
        if let Some(fault) = &self.fault {
            if fault.triggers(&record.payload) {
                debug!(store = %self.name, key = %record.key, "save rejected by fault injector");
                return Err(StoreError::validation(
                    &self.name,
                    &record.key,
                    format!("payload matches fault pattern {}", fault.pattern()),
                ));
            }
        }

        if self.contains_key(&record.key) || tx.is_staged(&self.name, &record.key) {
            return Err(StoreError::duplicate_key(&self.name, &record.key));
        }

        let id = RecordId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = record.with_id(id);

        if tx.is_active() {
            let resource: Arc<dyn TransactionalResource> = self.clone();
            tx.stage(resource, record)?;
        } else {
            debug!(store = %self.name, key = %record.key, "no active transaction, auto-committing");
            let batch = vec![record];
            self.prepare(&batch)?;
            self.apply(batch)?;
        }

        Ok(id)
    }

    // ==================== Reads ====================

    /// Look up a committed record by key.
    pub fn find(&self, key: &str) -> Option<Record> {
        self.read().get(key).cloned()
    }

    /// Check if a committed record exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the store has no committed records.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Committed keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    // The map is only replaced wholesale per key, so a poisoned lock still
    // guards a consistent map.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Record>> {
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Record>> {
        self.committed.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_conflicts(
        &self,
        committed: &HashMap<String, Record>,
        records: &[Record],
    ) -> TransactionResult<()> {
        let mut seen = HashSet::new();
        for record in records {
            if committed.contains_key(&record.key) || !seen.insert(record.key.as_str()) {
                return Err(TransactionError::resource(
                    &self.name,
                    format!("duplicate key {}", record.key),
                ));
            }
        }
        Ok(())
    }
}

impl TransactionalResource for RecordStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, records: &[Record]) -> TransactionResult<()> {
        self.check_conflicts(&self.read(), records)
    }

    fn apply(&self, records: Vec<Record>) -> TransactionResult<()> {
        let mut committed = self.write();
        // Another transaction may have committed the same key since prepare.
        self.check_conflicts(&committed, &records)?;
        debug!(store = %self.name, records = records.len(), "applied committed records");
        for record in records {
            committed.insert(record.key.clone(), record);
        }
        Ok(())
    }

    fn revert(&self, records: &[Record]) {
        let mut committed = self.write();
        for record in records {
            if committed.get(&record.key).is_some_and(|r| r.id == record.id) {
                committed.remove(&record.key);
            }
        }
        debug!(store = %self.name, records = records.len(), "reverted applied records");
    }
}
