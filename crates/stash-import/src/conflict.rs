//! Conflict-resolution session state machine.
//!
//! A FIFO queue of [`ConflictEntry`] driven one head entry at a time by
//! an external resolve action. The machine is pure:
//! [`ConflictSession::resolve`] returns the side effects for the caller
//! to apply (a single-item write for `Keep`, a session summary exactly
//! once when the queue drains) instead of performing I/O itself, so every
//! transition is testable without a store or a UI.

use std::collections::VecDeque;

use tracing::debug;

use stash_core::VaultItem;

use crate::dedup::ConflictEntry;

/// The three-valued action the consuming surface can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Persist the incoming item (a by-id write; the pre-existing
    /// conflicting item keeps its own id and is left untouched, so two
    /// items with the same URL may coexist afterwards).
    Keep,
    /// Discard the incoming item without writing.
    Skip,
    /// Discard the entire remaining queue and end the session.
    SkipAll,
}

/// Final counts for one session, reported exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub kept: usize,
    pub skipped: usize,
}

/// Side effects of one resolve transition.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// Item to persist via a single-item write, for `Keep` only.
    pub write: Option<VaultItem>,
    /// Present exactly once per session, when the queue empties. The
    /// caller performs its single corpus reload on seeing this, never on
    /// intermediate resolutions.
    pub done: Option<SessionSummary>,
}

/// A live conflict-resolution session.
///
/// Constructed only from a non-empty conflict list; an import with no
/// conflicts reloads and reports success without ever opening a session.
#[derive(Debug)]
pub struct ConflictSession {
    queue: VecDeque<ConflictEntry>,
    kept: usize,
    skipped: usize,
}

impl ConflictSession {
    pub fn new(conflicts: Vec<ConflictEntry>) -> Self {
        Self {
            queue: conflicts.into(),
            kept: 0,
            skipped: 0,
        }
    }

    /// The entry currently presented for resolution.
    pub fn current(&self) -> Option<&ConflictEntry> {
        self.queue.front()
    }

    /// Entries still queued, including the presented one.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Apply one action to the head of the queue.
    pub fn resolve(&mut self, action: Resolution) -> ResolveOutcome {
        if action == Resolution::SkipAll {
            self.skipped += self.queue.len();
            self.queue.clear();
            debug!(skipped = self.skipped, "session ended by skip-all");
            return self.finish();
        }

        let Some(entry) = self.queue.pop_front() else {
            // Resolving an already-drained session is a no-op beyond the
            // summary; the caller gets the same terminal signal.
            return self.finish();
        };

        let write = match action {
            Resolution::Keep => {
                self.kept += 1;
                Some(entry.incoming)
            }
            Resolution::Skip => {
                self.skipped += 1;
                None
            }
            Resolution::SkipAll => unreachable!("handled above"),
        };

        debug!(
            remaining = self.queue.len(),
            kept = self.kept,
            skipped = self.skipped,
            "conflict resolved"
        );

        ResolveOutcome {
            write,
            done: self.queue.is_empty().then(|| self.summary()),
        }
    }

    fn finish(&self) -> ResolveOutcome {
        ResolveOutcome {
            write: None,
            done: Some(self.summary()),
        }
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            kept: self.kept,
            skipped: self.skipped,
        }
    }
}
