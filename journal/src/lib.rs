//! txprop Journal
//!
//! In-memory record of transaction lifecycle events.
//!
//! Responsibilities:
//! - Append one event per begin/join/suspend/resume/commit/rollback step
//! - Assign monotonically increasing sequence numbers
//! - Summarise physical outcomes (committed vs rolled back)

mod entry;
mod journal;

pub use entry::{EventRecord, Seq, TxnEvent};
pub use journal::{JournalStats, MemoryJournal};
