//! Bounded undo history of store snapshots

use crate::store::ArtifactStore;
use std::collections::VecDeque;

/// Number of undo steps kept by default
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// What produced the change a snapshot precedes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Merge,
    Delete,
    Rename,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: ArtifactStore,
    pub kind: ChangeKind,
}

/// Undo stack (newest last). Oldest entries are evicted past the limit.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryManager {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record the snapshot taken before a mutation
    pub fn push(&mut self, snapshot: ArtifactStore, kind: ChangeKind) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry { snapshot, kind });
    }

    /// Pop the newest snapshot; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<ArtifactStore> {
        self.entries.pop_back().map(|entry| entry.snapshot)
    }

    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
