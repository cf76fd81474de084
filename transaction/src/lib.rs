//! txprop Transaction
//!
//! Transaction propagation and the commit/rollback decision.
//!
//! Responsibilities:
//! - Track the stack of active transaction contexts for one call path
//! - Implement propagation: join-or-create and always-new (with suspension)
//! - Buffer staged writes per physical transaction
//! - Decide commit vs rollback, including rollback-only marking by participants
//! - Provide a scoped `with_transaction` wrapper that always ends its context

mod buffer;
mod config;
mod context;
mod error;
mod manager;
mod resource;

pub use buffer::{PendingWrite, TransactionBuffer};
pub use config::TransactionConfig;
pub use context::{Completion, PropagationMode, TransactionContext};
pub use error::{TransactionError, TransactionResult};
pub use manager::TransactionManager;
pub use resource::TransactionalResource;
