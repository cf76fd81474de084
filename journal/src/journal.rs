//! In-memory transaction journal.

use std::collections::HashSet;

use txprop_core::TxnId;

use crate::entry::{EventRecord, Seq, TxnEvent};

/// In-memory journal of transaction events.
#[derive(Debug)]
pub struct MemoryJournal {
    /// All recorded entries.
    entries: Vec<EventRecord>,
    /// Next sequence number to assign.
    next_seq: Seq,
    /// Whether appends are recorded at all.
    enabled: bool,
}

impl Default for MemoryJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryJournal {
    /// Create a new empty journal.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 1,
            enabled: true,
        }
    }

    /// Create a journal that drops every event.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Check if events are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append an event, returning its sequence number.
    ///
    /// Sequence numbers advance even when recording is disabled.
    pub fn append(&mut self, event: TxnEvent) -> Seq {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.enabled {
            self.entries.push(EventRecord::new(seq, event));
        }
        seq
    }

    /// Get all entries.
    pub fn entries(&self) -> &[EventRecord] {
        &self.entries
    }

    /// Iterate over the bare events in order.
    pub fn events(&self) -> impl Iterator<Item = &TxnEvent> + '_ {
        self.entries.iter().map(|r| &r.event)
    }

    /// Get entry by sequence number.
    pub fn get(&self, seq: Seq) -> Option<&EventRecord> {
        self.entries.iter().find(|r| r.seq == seq)
    }

    /// All events that belong to one physical transaction.
    pub fn events_for(&self, txn: TxnId) -> Vec<&TxnEvent> {
        self.events().filter(|e| e.txn() == txn).collect()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summarise physical outcomes.
    pub fn stats(&self) -> JournalStats {
        let mut stats = JournalStats::default();
        let mut begun: HashSet<TxnId> = HashSet::new();
        let mut finished: HashSet<TxnId> = HashSet::new();

        for event in self.events() {
            match event {
                TxnEvent::Begin { txn, .. } => {
                    begun.insert(*txn);
                    stats.transactions_begun += 1;
                }
                TxnEvent::Join { .. } => stats.joins += 1,
                TxnEvent::Commit { txn } => {
                    finished.insert(*txn);
                    stats.committed += 1;
                }
                TxnEvent::Rollback { txn } => {
                    finished.insert(*txn);
                    stats.rolled_back += 1;
                }
                TxnEvent::Suspend { .. }
                | TxnEvent::Resume { .. }
                | TxnEvent::MarkRollbackOnly { .. }
                | TxnEvent::Release { .. } => {}
            }
        }

        stats.in_flight = begun.difference(&finished).count();
        stats
    }
}

/// Summary of physical transaction outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalStats {
    pub transactions_begun: usize,
    pub joins: usize,
    pub committed: usize,
    pub rolled_back: usize,
    /// Begun but neither committed nor rolled back.
    pub in_flight: usize,
}
