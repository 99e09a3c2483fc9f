//! Undo/redo history — bounded stacks of whole-state snapshots.
//!
//! Each undo step is a [`Snapshot`] of everything a command can change:
//! buffer, cursor, mode and register. Restoring a snapshot is therefore
//! exact, whatever the command did.
//!
//! # Usage
//!
//! ```text
//! history.push(session.snapshot());   // before any mutation
//! // mutate
//! if let Some(prev) = history.undo(session.snapshot()) { restore(prev) }
//! if let Some(next) = history.redo(session.snapshot()) { restore(next) }
//! ```
//!
//! Insert mode takes its snapshot lazily: entering insert calls
//! [`History::begin`], and the first real edit calls
//! [`History::commit_pending`]. Leaving insert without typing anything
//! discards the pending snapshot, so it never clutters the undo stack.
//!
//! The undo stack is bounded; pushing past the limit evicts the oldest
//! entry. Any push clears the redo stack.

use std::collections::VecDeque;

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::mode::Mode;
use crate::register::Register;

/// Default undo depth.
pub const DEFAULT_UNDO_LEVELS: usize = 200;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The state one undo step restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub register: Register,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    pending: Option<Snapshot>,
    limit: usize,
}

impl History {
    /// An empty history keeping at most `limit` undo steps (at least one).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            pending: None,
            limit: limit.max(1),
        }
    }

    /// Record the state before a mutation. Clears redo.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.pending = None;
        self.redo.clear();
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    // -- Deferred snapshots -------------------------------------------------

    /// Hold a snapshot to be pushed on the first edit (entering insert).
    pub fn begin(&mut self, snapshot: Snapshot) {
        self.pending = Some(snapshot);
    }

    /// Push the held snapshot, if any. Returns `true` if one was pushed.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(snapshot) => {
                self.push(snapshot);
                true
            }
            None => false,
        }
    }

    /// Drop the held snapshot (leaving insert without editing).
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    // -- Undo / redo --------------------------------------------------------

    /// Step back. `current` goes onto the redo stack; the returned snapshot
    /// is the state to restore. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        self.redo.push(current);
        Some(prev)
    }

    /// Step forward again after an undo. `None` when redo is empty.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(next)
    }

    // -- Queries ------------------------------------------------------------

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LEVELS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
