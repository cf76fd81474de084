//! Transaction manager for propagation and the commit/rollback decision.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use txprop_core::{ContextId, Record, TxnId};
use txprop_journal::{JournalStats, MemoryJournal, TxnEvent};

use crate::buffer::TransactionBuffer;
use crate::config::TransactionConfig;
use crate::context::{Completion, PropagationMode, TransactionContext};
use crate::error::{TransactionError, TransactionResult};
use crate::resource::TransactionalResource;

// Process-wide so handles from one manager never alias another manager's.
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_TXN_ID: AtomicU64 = AtomicU64::new(1);

fn alloc_context_id() -> ContextId {
    ContextId::new(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
}

fn alloc_txn_id() -> TxnId {
    TxnId::new(NEXT_TXN_ID.fetch_add(1, Ordering::Relaxed))
}

/// The unit that physically commits or rolls back.
#[derive(Debug)]
struct PhysicalTxn {
    /// The owning context.
    owner: ContextId,
    rollback_only: bool,
    buffer: TransactionBuffer,
}

/// Transaction manager for one execution path.
///
/// Holds the stack of active contexts for a single top-level call. Create one
/// manager per call and pass it down explicitly; independent calls each get
/// their own manager and share only the stores.
///
/// Writes are staged in the buffer of the current physical transaction and
/// reach the stores only when the owning context commits, which gives readers
/// of the stores Read Committed visibility.
#[derive(Debug)]
pub struct TransactionManager {
    config: TransactionConfig,
    stack: Vec<TransactionContext>,
    transactions: HashMap<TxnId, PhysicalTxn>,
    ended: HashSet<ContextId>,
    journal: MemoryJournal,
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager {
    /// Create a new transaction manager.
    pub fn new() -> Self {
        Self::with_config(TransactionConfig::default())
    }

    /// Create a transaction manager with the given configuration.
    pub fn with_config(config: TransactionConfig) -> Self {
        let journal = if config.journal_enabled {
            MemoryJournal::new()
        } else {
            MemoryJournal::disabled()
        };
        Self {
            config,
            stack: Vec::new(),
            transactions: HashMap::new(),
            ended: HashSet::new(),
            journal,
        }
    }

    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Check if any context is active.
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of active contexts, joined ones included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost active context.
    pub fn current(&self) -> Option<TransactionContext> {
        self.stack.last().copied()
    }

    /// Check whether the transaction `ctx` belongs to is marked rollback-only.
    pub fn is_rollback_only(&self, ctx: &TransactionContext) -> TransactionResult<bool> {
        self.position(ctx)?;
        self.transactions
            .get(&ctx.txn)
            .map(|t| t.rollback_only)
            .ok_or(TransactionError::UnknownContext { context: ctx.id })
    }

    /// The lifecycle journal.
    pub fn journal(&self) -> &MemoryJournal {
        &self.journal
    }

    /// Summary of physical outcomes so far.
    pub fn stats(&self) -> JournalStats {
        self.journal.stats()
    }

    // ========== Context Lifecycle ==========

    /// Begin a context under the given propagation mode.
    ///
    /// `JoinOrCreate` with an active context returns a joined (non-owning)
    /// context on the same physical transaction. Otherwise a new physical
    /// transaction is started; if one was active it stays suspended until the
    /// new context ends.
    pub fn begin(&mut self, mode: PropagationMode) -> TransactionContext {
        let id = alloc_context_id();
        let outer = self.stack.last().copied();

        let ctx = match (mode, outer) {
            (PropagationMode::JoinOrCreate, Some(outer)) => {
                self.journal.append(TxnEvent::Join {
                    txn: outer.txn,
                    context: id,
                });
                debug!(txn = %outer.txn, context = %id, "participating in existing transaction");
                TransactionContext {
                    id,
                    txn: outer.txn,
                    is_new: false,
                    parent: Some(outer.id),
                }
            }
            (_, outer) => {
                if let Some(outer) = outer {
                    self.journal.append(TxnEvent::Suspend { txn: outer.txn });
                    debug!(txn = %outer.txn, "suspending current transaction");
                }
                let txn = alloc_txn_id();
                self.transactions.insert(
                    txn,
                    PhysicalTxn {
                        owner: id,
                        rollback_only: false,
                        buffer: TransactionBuffer::new(),
                    },
                );
                self.journal.append(TxnEvent::Begin { txn, context: id });
                debug!(%txn, context = %id, %mode, "creating new transaction");
                TransactionContext {
                    id,
                    txn,
                    is_new: true,
                    parent: outer.map(|o| o.id),
                }
            }
        };

        self.stack.push(ctx);
        ctx
    }

    /// Mark the transaction `ctx` belongs to as rollback-only.
    ///
    /// For a joined context this poisons the owner's transaction.
    pub fn mark_rollback_only(&mut self, ctx: &TransactionContext) -> TransactionResult<()> {
        self.position(ctx)?;
        let txn = self
            .transactions
            .get_mut(&ctx.txn)
            .ok_or(TransactionError::UnknownContext { context: ctx.id })?;

        if !txn.rollback_only {
            txn.rollback_only = true;
            self.journal.append(TxnEvent::MarkRollbackOnly {
                txn: ctx.txn,
                context: ctx.id,
            });
            debug!(txn = %ctx.txn, context = %ctx.id, owner = %txn.owner, "marked rollback-only");
        }
        Ok(())
    }

    /// End the innermost context.
    ///
    /// Joined contexts are released without physical action. Owning contexts
    /// roll back if their transaction is rollback-only and commit otherwise.
    pub fn end(&mut self, ctx: &TransactionContext) -> TransactionResult<Completion> {
        self.ensure_innermost(ctx)?;
        self.stack.pop();
        self.ended.insert(ctx.id);

        if !ctx.is_new {
            self.journal.append(TxnEvent::Release {
                txn: ctx.txn,
                context: ctx.id,
            });
            debug!(txn = %ctx.txn, context = %ctx.id, "released joined context");
            return Ok(Completion::Released);
        }

        let txn = self
            .transactions
            .remove(&ctx.txn)
            .ok_or(TransactionError::UnknownContext { context: ctx.id })?;

        let result = if txn.rollback_only {
            self.rollback_physical(ctx.txn, txn);
            Ok(Completion::RolledBack)
        } else {
            self.commit_physical(ctx.txn, txn)
                .map(|()| Completion::Committed)
        };

        self.resume_outer(ctx);
        result
    }

    /// End the innermost context after its operation succeeded.
    ///
    /// Same as [`end`](Self::end), except an owning context whose transaction
    /// was poisoned by a participant is rolled back and reported as
    /// [`TransactionError::InconsistentCommit`] instead of completing quietly.
    pub fn commit(&mut self, ctx: &TransactionContext) -> TransactionResult<Completion> {
        self.ensure_innermost(ctx)?;

        let poisoned = ctx.is_new
            && self
                .transactions
                .get(&ctx.txn)
                .is_some_and(|t| t.rollback_only);

        if poisoned {
            warn!(
                txn = %ctx.txn,
                context = %ctx.id,
                "commit requested on rollback-only transaction, rolling back"
            );
            self.end(ctx)?;
            return Err(TransactionError::InconsistentCommit { txn: ctx.txn });
        }

        self.end(ctx)
    }

    /// End the innermost context after its operation failed.
    pub fn rollback(&mut self, ctx: &TransactionContext) -> TransactionResult<Completion> {
        self.mark_rollback_only(ctx)?;
        self.end(ctx)
    }

    /// Run `f` inside a context, ending the context on every exit path.
    ///
    /// `Ok` commits (surfacing `InconsistentCommit` if a participant poisoned
    /// the transaction). `Err` marks the transaction rollback-only, ends the
    /// context, and returns the original error. Contexts `f` left open are
    /// rolled back first.
    pub fn with_transaction<T, E, F>(&mut self, mode: PropagationMode, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<TransactionError>,
    {
        let ctx = self.begin(mode);
        let result = f(self);
        self.unwind_above(&ctx);

        match result {
            Ok(value) => {
                self.commit(&ctx)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(cleanup) = self.rollback(&ctx) {
                    warn!(context = %ctx.id, error = %cleanup, "failed to roll back after error");
                }
                Err(err)
            }
        }
    }

    // ========== Staged Writes ==========

    /// Stage a record for `resource` in the current physical transaction.
    pub fn stage(
        &mut self,
        resource: Arc<dyn TransactionalResource>,
        record: Record,
    ) -> TransactionResult<TxnId> {
        let current = self
            .current()
            .ok_or(TransactionError::NoActiveTransaction)?;
        let txn = self
            .transactions
            .get_mut(&current.txn)
            .ok_or(TransactionError::UnknownContext {
                context: current.id,
            })?;

        debug!(
            txn = %current.txn,
            resource = resource.name(),
            key = %record.key,
            "staged write"
        );
        txn.buffer.stage(resource, record);
        Ok(current.txn)
    }

    /// Check if `key` is staged for `resource` in any open physical
    /// transaction, suspended ones included.
    pub fn is_staged(&self, resource: &str, key: &str) -> bool {
        self.transactions
            .values()
            .any(|t| t.buffer.contains_key(resource, key))
    }

    /// Number of writes staged in the current physical transaction.
    pub fn pending_writes(&self) -> usize {
        self.current()
            .and_then(|c| self.transactions.get(&c.txn))
            .map_or(0, |t| t.buffer.len())
    }

    // ========== Internal Helpers ==========

    fn position(&self, ctx: &TransactionContext) -> TransactionResult<usize> {
        if self.ended.contains(&ctx.id) {
            return Err(TransactionError::DoubleEnd { context: ctx.id });
        }
        self.stack
            .iter()
            .rposition(|c| c.id == ctx.id)
            .ok_or(TransactionError::UnknownContext { context: ctx.id })
    }

    fn ensure_innermost(&self, ctx: &TransactionContext) -> TransactionResult<()> {
        let pos = self.position(ctx)?;
        match self.stack.last() {
            Some(top) if pos + 1 != self.stack.len() => Err(TransactionError::NotInnermost {
                context: ctx.id,
                innermost: top.id,
            }),
            _ => Ok(()),
        }
    }

    fn unwind_above(&mut self, ctx: &TransactionContext) {
        if !self.stack.iter().any(|c| c.id == ctx.id) {
            return;
        }
        while let Some(top) = self.current() {
            if top.id == ctx.id {
                break;
            }
            warn!(context = %top.id, txn = %top.txn, "context left open, rolling back");
            if let Err(err) = self.rollback(&top) {
                warn!(context = %top.id, error = %err, "failed to roll back leaked context");
                break;
            }
        }
    }

    fn commit_physical(&mut self, txn_id: TxnId, txn: PhysicalTxn) -> TransactionResult<()> {
        let writes = txn.buffer.len();
        let groups = txn.buffer.into_grouped();

        let prepared = groups
            .iter()
            .try_for_each(|(resource, records)| resource.prepare(records));
        if let Err(err) = prepared {
            warn!(txn = %txn_id, error = %err, "prepare failed, rolling back");
            self.journal.append(TxnEvent::Rollback { txn: txn_id });
            return Err(err);
        }

        let mut applied: Vec<(Arc<dyn TransactionalResource>, Vec<Record>)> =
            Vec::with_capacity(groups.len());
        for (resource, records) in groups {
            debug!(txn = %txn_id, resource = resource.name(), records = records.len(), "applying writes");
            if let Err(err) = resource.apply(records.clone()) {
                warn!(
                    txn = %txn_id,
                    resource = resource.name(),
                    reverted = applied.len(),
                    error = %err,
                    "apply failed after prepare, reverting applied resources"
                );
                for (done, records) in applied.iter().rev() {
                    done.revert(records);
                }
                self.journal.append(TxnEvent::Rollback { txn: txn_id });
                return Err(err);
            }
            applied.push((resource, records));
        }

        self.journal.append(TxnEvent::Commit { txn: txn_id });
        debug!(txn = %txn_id, writes, "committed transaction");
        Ok(())
    }

    fn rollback_physical(&mut self, txn_id: TxnId, txn: PhysicalTxn) {
        let discarded = txn.buffer.len();
        self.journal.append(TxnEvent::Rollback { txn: txn_id });
        debug!(txn = %txn_id, discarded, "rolled back transaction");
    }

    fn resume_outer(&mut self, ended: &TransactionContext) {
        if let Some(top) = self.current() {
            if top.txn != ended.txn {
                self.journal.append(TxnEvent::Resume { txn: top.txn });
                debug!(txn = %top.txn, "resuming suspended transaction");
            }
        }
    }
}

impl Drop for TransactionManager {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            warn!(
                open = self.stack.len(),
                "transaction manager dropped with open contexts, staged writes discarded"
            );
        }
    }
}
