//! Record table - in-memory top-10 ranking of finished sessions.
//!
//! Storage is left to the caller: the table is serde-serializable and can be
//! rebuilt from saved entries with [`RecordTable::from_entries`].

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::protocol::RecordEntry;
use crate::types::{EndReason, SessionResult, RECORD_TABLE_LEN};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTable {
    entries: Vec<RecordEntry>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from saved entries, keeping the best ten
    pub fn from_entries(entries: impl IntoIterator<Item = RecordEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Entries from best to worst
    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&RecordEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a session that just ended, stamped with the current time
    pub fn record(&mut self, result: SessionResult, reason: EndReason) -> Option<usize> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.insert(RecordEntry::new(result, reason, ts))
    }

    /// Insert an entry; returns its 1-based rank if it made the table
    ///
    /// A new entry ranks below earlier entries with the same total.
    pub fn insert(&mut self, entry: RecordEntry) -> Option<usize> {
        let idx = self
            .entries
            .iter()
            .position(|e| entry.total > e.total)
            .unwrap_or(self.entries.len());
        if idx >= RECORD_TABLE_LEN {
            return None;
        }
        self.entries.insert(idx, entry);
        self.entries.truncate(RECORD_TABLE_LEN);
        Some(idx + 1)
    }
}
