//! Linear undo/redo over full editor snapshots

use crate::types::Book;
use std::collections::VecDeque;

/// Default number of undo steps kept
pub const DEFAULT_CAPACITY: usize = 100;

/// A deep copy of the editable state.
///
/// `Book` is an owned tree (pages and chapters refer to each other by id, not
/// by pointer) so `Clone` always terminates and shares nothing with the live
/// session.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub book: Book,
    pub current_page_index: Option<usize>,
    pub current_chapter_index: Option<usize>,
    /// Raw surface markup at the time of the snapshot
    pub content: String,
}

/// Bounded undo stack plus redo stack
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Push the state as it is before a mutation. Invalidates redo.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.redo.clear();
        self.push_undo(snapshot);
    }

    /// Pop the last recorded state, stashing `current` for redo
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Inverse of `undo`
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }
}
