//! Member and log repositories.

use std::sync::Arc;

use txprop_core::{NewRecord, Record, RecordId};
use txprop_store::{RecordStore, StoreConfig};
use txprop_transaction::{PropagationMode, TransactionManager};

use crate::config::DEFAULT_LOG_FAULT_SENTINEL;
use crate::error::{ServiceError, ServiceResult};

/// Run `f` inside a context when `propagation` is set, directly otherwise.
pub fn transactional<T, F>(
    tx: &mut TransactionManager,
    propagation: Option<PropagationMode>,
    f: F,
) -> ServiceResult<T>
where
    F: FnOnce(&mut TransactionManager) -> ServiceResult<T>,
{
    match propagation {
        Some(mode) => tx.with_transaction(mode, f),
        None => f(tx),
    }
}

/// Repository over the member store.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    store: Arc<RecordStore>,
}

impl MemberRepository {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh store named `member`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(RecordStore::named("member")))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn save(
        &self,
        tx: &mut TransactionManager,
        propagation: Option<PropagationMode>,
        username: &str,
    ) -> ServiceResult<RecordId> {
        transactional(tx, propagation, |tx| {
            Ok(self.store.save(tx, NewRecord::new(username, username))?)
        })
    }

    pub fn find(&self, username: &str) -> Option<Record> {
        self.store.find(username)
    }
}

/// Repository over the log store.
#[derive(Debug, Clone)]
pub struct LogRepository {
    store: Arc<RecordStore>,
}

impl LogRepository {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh store named `log` that rejects
    /// [`DEFAULT_LOG_FAULT_SENTINEL`].
    pub fn in_memory() -> ServiceResult<Self> {
        let config = StoreConfig::new("log").fault_sentinel(DEFAULT_LOG_FAULT_SENTINEL);
        let store = RecordStore::new(config).map_err(ServiceError::from)?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn save(
        &self,
        tx: &mut TransactionManager,
        propagation: Option<PropagationMode>,
        message: &str,
    ) -> ServiceResult<RecordId> {
        transactional(tx, propagation, |tx| {
            Ok(self.store.save(tx, NewRecord::new(message, message))?)
        })
    }

    pub fn find(&self, message: &str) -> Option<Record> {
        self.store.find(message)
    }
}
