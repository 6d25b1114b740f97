// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linear undo/redo log: two stacks of [`Patch`]es.
//!
//! `past` holds the prior values of each forward edit, most recent last.
//! `future` holds the values displaced by each undo, most recently undone on
//! top. Recording a new forward edit discards `future` entirely; there is no
//! branching.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::patch::Patch;
use crate::schema::Schema;

/// Two-stack undo/redo history with an optional depth limit.
///
/// Serializes both stacks in order, so a session can be stashed and resumed.
/// A stored `past` longer than the stored limit is trimmed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: Schema", from = "StoredHistory<S>")]
pub struct History<S: Schema> {
    past: VecDeque<Patch<S>>,
    future: Vec<Patch<S>>,
    limit: Option<NonZeroUsize>,
}

#[derive(Deserialize)]
#[serde(bound = "S: Schema")]
struct StoredHistory<S: Schema> {
    past: VecDeque<Patch<S>>,
    future: Vec<Patch<S>>,
    limit: Option<NonZeroUsize>,
}

impl<S: Schema> From<StoredHistory<S>> for History<S> {
    fn from(stored: StoredHistory<S>) -> Self {
        let mut history = Self {
            past: stored.past,
            future: stored.future,
            limit: stored.limit,
        };
        history.enforce_limit();
        history
    }
}

impl<S: Schema> Default for History<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> History<S> {
    /// Unlimited history.
    pub fn new() -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: None,
        }
    }

    /// History that keeps at most `limit` undo steps (oldest dropped first).
    pub fn with_limit(limit: NonZeroUsize) -> Self {
        let mut history = Self::new();
        history.set_limit(Some(limit));
        history
    }

    /// Changes the undo depth limit (`None` = unlimited), trimming existing
    /// entries if needed.
    pub fn set_limit(&mut self, limit: Option<NonZeroUsize>) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Current undo depth limit.
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Records the prior values of a forward edit and clears redo.
    pub fn record_before_edit(&mut self, prior: Patch<S>) {
        self.future.clear();
        self.push_undo(prior);
    }

    /// True when there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// True when there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redo steps available.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Pops the most recent undo entry.
    pub fn pop_undo(&mut self) -> Option<Patch<S>> {
        self.past.pop_back()
    }

    /// Pushes an undo entry without touching redo (used when redoing).
    pub fn push_undo(&mut self, patch: Patch<S>) {
        self.past.push_back(patch);
        self.enforce_limit();
    }

    /// Pops the most recently undone entry.
    pub fn pop_redo(&mut self) -> Option<Patch<S>> {
        self.future.pop()
    }

    /// Pushes an entry onto the redo stack (used when undoing).
    pub fn push_redo(&mut self, patch: Patch<S>) {
        self.future.push(patch);
    }

    /// Peeks at the entry the next undo would apply.
    pub fn peek_undo(&self) -> Option<&Patch<S>> {
        self.past.back()
    }

    /// Peeks at the entry the next redo would apply.
    pub fn peek_redo(&self) -> Option<&Patch<S>> {
        self.future.last()
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.past.len() > limit.get() {
                self.past.pop_front();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::avatar::{Avatar, AvatarValue};

    fn height(h: u16) -> Patch<Avatar> {
        Patch::single(AvatarValue::Height(h))
    }

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_history_pops_nothing() {
        let mut history = History::<Avatar>::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.pop_undo().is_none());
        assert!(history.pop_redo().is_none());
    }

    #[test]
    fn undo_stack_is_lifo() {
        let mut history = History::new();
        history.record_before_edit(height(150));
        history.record_before_edit(height(160));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.pop_undo(), Some(height(160)));
        assert_eq!(history.pop_undo(), Some(height(150)));
    }

    #[test]
    fn recording_clears_redo() {
        let mut history = History::new();
        history.push_redo(height(170));
        assert!(history.can_redo());
        history.record_before_edit(height(150));
        assert!(!history.can_redo());
    }

    #[test]
    fn push_undo_keeps_redo() {
        let mut history = History::new();
        history.push_redo(height(170));
        history.push_redo(height(171));
        history.push_undo(height(150));
        assert_eq!(history.redo_depth(), 2);
        assert_eq!(history.peek_redo(), Some(&height(171)));
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut history = History::with_limit(cap(2));
        history.record_before_edit(height(150));
        history.record_before_edit(height(160));
        history.record_before_edit(height(170));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.peek_undo(), Some(&height(170)));
        history.pop_undo();
        assert_eq!(history.pop_undo(), Some(height(160)));
        assert!(!history.can_undo());
    }

    #[test]
    fn lowering_limit_trims_existing_past() {
        let mut history = History::new();
        for h in 150..155 {
            history.record_before_edit(height(h));
        }
        history.set_limit(Some(cap(1)));
        assert_eq!(history.limit(), Some(cap(1)));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.peek_undo(), Some(&height(154)));
        history.set_limit(None);
        history.record_before_edit(height(160));
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn stored_history_is_trimmed_to_its_limit() {
        let mut history = History::new();
        for h in 150..155 {
            history.record_before_edit(height(h));
        }
        let mut json = serde_json::to_value(&history).unwrap();
        json["limit"] = serde_json::json!(2);
        let loaded: History<Avatar> = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.limit(), Some(cap(2)));
        assert_eq!(loaded.undo_depth(), 2);
        assert_eq!(loaded.peek_undo(), Some(&height(154)));

        let zero = serde_json::json!({ "past": [], "future": [], "limit": 0 });
        assert!(serde_json::from_value::<History<Avatar>>(zero).is_err());
    }
}
