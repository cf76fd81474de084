//! The seam between the transaction manager and the stores it commits into.

use txprop_core::Record;

use crate::error::TransactionResult;

/// A store that takes part in transactions.
///
/// Writes are staged in the manager's buffer while a transaction is open and
/// handed over only when the owning context commits. Commit runs in two
/// phases across every resource touched: all `prepare` calls, then all
/// `apply` calls. If an `apply` fails, resources already applied are
/// reverted in reverse order, so a transaction lands in every store or none.
pub trait TransactionalResource: Send + Sync {
    /// Name used in logs and errors. Unique among the resources of a transaction.
    fn name(&self) -> &str;

    /// Check that `records` can be applied. Must not change visible state.
    fn prepare(&self, records: &[Record]) -> TransactionResult<()> {
        let _ = records;
        Ok(())
    }

    /// Make `records` durable and visible to readers.
    fn apply(&self, records: Vec<Record>) -> TransactionResult<()>;

    /// Undo a successful `apply` of `records`.
    ///
    /// Only called with a batch this resource applied in the same commit.
    fn revert(&self, records: &[Record]);
}
