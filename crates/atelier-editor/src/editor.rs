// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The editor controller: edits, undo/redo, reset and snapshots over one record.
//!
//! Every operation runs to completion synchronously. Edits that would not
//! change anything, and undo/redo on an empty stack, come back as
//! [`Outcome::Ignored`] and leave the record, history and timestamps alone.
//! Only lookups of unknown snapshots are errors.

use std::num::NonZeroUsize;

use atelier_app_core::prefs::StudioPrefs;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::error::EditorError;
use crate::history::History;
use crate::ident::{RecordId, SnapshotId};
use crate::patch::Patch;
use crate::schema::{FieldKey, Schema};
use crate::snapshot::{Snapshot, SnapshotRegistry, ThumbnailRef};
use crate::store::RecordStore;

/// Result of a mutating editor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record changed and history was updated.
    Applied,
    /// Nothing to do; record and history are untouched.
    Ignored,
}

impl Outcome {
    /// True for [`Outcome::Applied`].
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

fn field_names<S: Schema>(patch: &Patch<S>) -> Vec<&'static str> {
    patch.fields().map(FieldKey::name).collect()
}

/// Owns the record, its undo history and its snapshots for one editing session.
#[derive(Debug)]
pub struct Editor<S: Schema, C: Clock = SystemClock> {
    store: RecordStore<S>,
    history: History<S>,
    snapshots: SnapshotRegistry<S>,
    clock: C,
    snapshot_prefix: String,
}

impl<S: Schema> Editor<S> {
    /// Opens an editor on `initial` using the system clock.
    pub fn open(id: RecordId, initial: S) -> Self {
        Self::with_clock(id, initial, SystemClock)
    }
}

impl<S: Schema, C: Clock> Editor<S, C> {
    /// Opens an editor on `initial` with an explicit clock.
    pub fn with_clock(id: RecordId, initial: S, clock: C) -> Self {
        let now = clock.now();
        Self {
            store: RecordStore::new(id, initial, now),
            history: History::new(),
            snapshots: SnapshotRegistry::new(id),
            clock,
            snapshot_prefix: "Snapshot".to_owned(),
        }
    }

    /// Caps undo depth (`None` = unlimited).
    pub fn with_history_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.history.set_limit(limit);
        self
    }

    /// Prefix for auto-generated snapshot names.
    pub fn with_snapshot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.snapshot_prefix = prefix.into();
        self
    }

    /// Applies the history and snapshot sections of studio prefs.
    pub fn apply_prefs(&mut self, prefs: &StudioPrefs) {
        self.history.set_limit(prefs.history.limit());
        self.snapshot_prefix.clone_from(&prefs.snapshots.name_prefix);
    }

    /// Current record value.
    pub fn record(&self) -> &S {
        self.store.get()
    }

    /// Record value plus identity and timestamps.
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Undo/redo stacks.
    pub fn history(&self) -> &History<S> {
        &self.history
    }

    /// Saved snapshots.
    pub fn snapshots(&self) -> &SnapshotRegistry<S> {
        &self.snapshots
    }

    /// True when [`undo`](Self::undo) would do something.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// True when [`redo`](Self::redo) would do something.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Sets one field. Setting a field to its current value is ignored; a
    /// value failing [`Schema::validate`] is rejected with nothing changed.
    pub fn edit_field(&mut self, value: S::Value) -> Result<Outcome, EditorError> {
        self.edit_bulk(std::iter::once(value))
    }

    /// Parses `raw` for the field called `name`, then behaves like
    /// [`edit_field`](Self::edit_field).
    pub fn edit_parsed(&mut self, name: &str, raw: &str) -> Result<Outcome, EditorError> {
        let value = S::parse(name, raw)?;
        Ok(self.apply(std::iter::once(value)))
    }

    /// Sets several fields as one undoable step. Only fields whose value
    /// actually changes are recorded; if none change the call is ignored.
    /// One invalid value rejects the whole batch.
    pub fn edit_bulk<I>(&mut self, values: I) -> Result<Outcome, EditorError>
    where
        I: IntoIterator<Item = S::Value>,
    {
        let values: Vec<S::Value> = values.into_iter().collect();
        values.iter().try_for_each(S::validate)?;
        Ok(self.apply(values))
    }

    fn apply<I>(&mut self, values: I) -> Outcome
    where
        I: IntoIterator<Item = S::Value>,
    {
        match Patch::diff(self.store.get(), values) {
            Some((forward, inverse)) => {
                debug!(fields = ?field_names(&forward), "edit");
                self.history.record_before_edit(inverse);
                self.store.set(&forward, self.clock.now());
                Outcome::Applied
            }
            None => {
                trace!("edit changed nothing; ignored");
                Outcome::Ignored
            }
        }
    }

    /// Reverts the most recent edit or redo.
    pub fn undo(&mut self) -> Outcome {
        let Some(patch) = self.history.pop_undo() else {
            trace!("undo with empty history; ignored");
            return Outcome::Ignored;
        };
        let displaced = patch.inverse_against(self.store.get());
        debug!(fields = ?field_names(&patch), "undo");
        self.store.set(&patch, self.clock.now());
        self.history.push_redo(displaced);
        Outcome::Applied
    }

    /// Re-applies the most recently undone step.
    pub fn redo(&mut self) -> Outcome {
        let Some(patch) = self.history.pop_redo() else {
            trace!("redo with empty future; ignored");
            return Outcome::Ignored;
        };
        let displaced = patch.inverse_against(self.store.get());
        debug!(fields = ?field_names(&patch), "redo");
        self.store.set(&patch, self.clock.now());
        self.history.push_undo(displaced);
        Outcome::Applied
    }

    /// Restores schema defaults for every field not in `preserve`, as one
    /// undoable step.
    pub fn reset(&mut self, preserve: &[S::Field]) -> Outcome {
        let defaults = S::default();
        let values: Vec<S::Value> = <S::Field as FieldKey>::ALL
            .iter()
            .filter(|f| !preserve.contains(*f))
            .map(|&f| defaults.get(f))
            .collect();
        self.apply(values)
    }

    /// Saves a copy of the full record. History is not affected.
    pub fn save_snapshot(&mut self, name: Option<&str>) -> &Snapshot<S> {
        let now = self.clock.now();
        let snapshot =
            self.snapshots
                .capture(self.store.get(), name, &self.snapshot_prefix, now);
        debug!(id = %snapshot.id.short(), name = %snapshot.name, "snapshot saved");
        snapshot
    }

    /// Loads a snapshot's fields into the record as one undoable step.
    pub fn load_snapshot(&mut self, id: &SnapshotId) -> Result<Outcome, EditorError> {
        let snapshot = self
            .snapshots
            .get(id)
            .ok_or(EditorError::SnapshotNotFound(*id))?;
        let values: Vec<S::Value> = <S::Field as FieldKey>::ALL
            .iter()
            .map(|&f| snapshot.data.get(f))
            .collect();
        Ok(self.apply(values))
    }

    /// Deletes a snapshot. History is not affected.
    pub fn delete_snapshot(&mut self, id: &SnapshotId) -> Result<Snapshot<S>, EditorError> {
        let removed = self.snapshots.remove(id)?;
        debug!(id = %id.short(), "snapshot deleted");
        Ok(removed)
    }

    /// Records a captured thumbnail on a snapshot.
    pub fn attach_thumbnail(
        &mut self,
        id: &SnapshotId,
        thumbnail: ThumbnailRef,
    ) -> Result<(), EditorError> {
        self.snapshots.attach_thumbnail(id, thumbnail)
    }
}
