#![forbid(unsafe_code)]

//! Bounded undo/redo history of immutable snapshots.
//!
//! The history always holds at least one snapshot, the current state, and a
//! cursor pointing at it. Recording after an undo drops the redo branch.
//! When the buffer is full the oldest snapshot is discarded, so at most
//! `capacity` states can be revisited.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of retained snapshots.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Fixed-capacity snapshot history with an undo/redo cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History<T> {
    snapshots: VecDeque<T>,
    /// Index of the current snapshot (`< snapshots.len()`).
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// History whose only entry is `initial`.
    ///
    /// A zero `capacity` is treated as 1.
    #[must_use]
    pub fn new(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots = VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY));
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained snapshots, current included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the current snapshot is always retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The snapshot the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.snapshots.get(self.cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Record `snapshot` as the new current state.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            #[cfg(feature = "tracing")]
            tracing::trace!(capacity = self.capacity, "history evicted oldest snapshot");
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    /// Forget everything but `current`.
    pub fn reset(&mut self, current: T) {
        self.snapshots.clear();
        self.snapshots.push_back(current);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_the_cursor() {
        let mut history = History::new(0, 10);
        assert!(!history.can_undo() && !history.can_redo());
        history.push(1);
        history.push(2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), Some(&2));
    }

    #[test]
    fn push_after_undo_drops_redo_branch() {
        let mut history = History::new("a", 10);
        history.push("b");
        history.push("c");
        history.undo();
        history.push("d");

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&"b"));
        assert_eq!(history.redo(), Some(&"d"));
    }

    #[test]
    fn capacity_keeps_newest_snapshots() {
        let mut history = History::new(0, DEFAULT_HISTORY_CAPACITY);
        for step in 1..=60 {
            history.push(step);
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(history.current(), Some(&60));

        let mut oldest = 60;
        while let Some(&snapshot) = history.undo() {
            oldest = snapshot;
        }
        assert_eq!(oldest, 11);
    }

    #[test]
    fn zero_capacity_still_holds_current() {
        let mut history = History::new('x', 0);
        history.push('y');
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(&'y'));
        assert!(!history.can_undo());
    }

    #[test]
    fn reset_forgets_everything() {
        let mut history = History::new(1, 5);
        history.push(2);
        history.reset(9);
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(&9));
        assert!(!history.can_undo());
    }
}
