//! txprop Store
//!
//! Key-by-name record stores that take part in transactions.
//!
//! Responsibilities:
//! - Stage saves in the caller's transaction, or auto-commit without one
//! - Serve `find` from committed state only
//! - Enforce key uniqueness within a collection
//! - Inject validation faults for payloads matching a sentinel

mod config;
mod error;
mod fault;
mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use fault::FaultInjector;
pub use store::RecordStore;
