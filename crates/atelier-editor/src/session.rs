// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Host-facing session: editor + persistence port + toast queue.
//!
//! The session is what a rendering layer talks to. Synchronous editor calls
//! pass straight through; snapshot saves and record saves additionally queue
//! background jobs whose completions are reported as toasts by [`Session::pump`].
//! A failed job never rolls back the record, history or snapshot metadata.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use atelier_app_core::prefs::StudioPrefs;
use atelier_app_core::toast::{ToastId, ToastKind, ToastRender, ToastService};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::editor::{Editor, Outcome};
use crate::error::EditorError;
use crate::ident::SnapshotId;
use crate::persist::{Completion, Job, JobId, JobOutput, PersistencePort};
use crate::schema::Schema;
use crate::snapshot::Snapshot;

/// Completions handled per [`Session::pump`] call.
pub const PUMP_BATCH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Save,
    Thumbnail(SnapshotId),
}

/// One editing session as seen by a host.
pub struct Session<S: Schema, P, C: Clock = SystemClock> {
    editor: Editor<S, C>,
    port: P,
    toasts: ToastService,
    toast_ttl: Duration,
    capture_thumbnails: bool,
    pending: BTreeMap<JobId, Pending>,
    next_job: u64,
}

impl<S, P, C> Session<S, P, C>
where
    S: Schema,
    P: PersistencePort<S>,
    C: Clock,
{
    /// Wraps `editor`, applying `prefs` to it and to the toast queue.
    pub fn new(mut editor: Editor<S, C>, port: P, prefs: &StudioPrefs) -> Self {
        editor.apply_prefs(prefs);
        Self {
            editor,
            port,
            toasts: ToastService::new(prefs.notifications.max_visible),
            toast_ttl: prefs.notifications.ttl(),
            capture_thumbnails: prefs.snapshots.capture_thumbnails,
            pending: BTreeMap::new(),
            next_job: 1,
        }
    }

    /// The wrapped editor.
    pub fn editor(&self) -> &Editor<S, C> {
        &self.editor
    }

    /// Mutable access for plain edits, undo and redo.
    pub fn editor_mut(&mut self) -> &mut Editor<S, C> {
        &mut self.editor
    }

    /// The persistence port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the persistence port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Jobs submitted but not yet completed.
    pub fn pending_jobs(&self) -> usize {
        self.pending.len()
    }

    /// Pushes a toast using the session's TTL.
    pub fn notify(
        &mut self,
        kind: ToastKind,
        title: &str,
        body: Option<String>,
        now: Instant,
    ) -> ToastId {
        self.toasts.push(kind, title, body, self.toast_ttl, now)
    }

    /// Toasts still visible at `now`.
    pub fn toasts(&self, now: Instant) -> Vec<ToastRender> {
        self.toasts.visible(now)
    }

    fn submit(&mut self, job: Job<S>, pending: Pending) -> JobId {
        let id = JobId(self.next_job);
        self.next_job += 1;
        self.pending.insert(id, pending);
        self.port.submit(id, job);
        id
    }

    /// Text edit; schema errors are toasted and returned.
    pub fn edit_parsed(
        &mut self,
        name: &str,
        raw: &str,
        now: Instant,
    ) -> Result<Outcome, EditorError> {
        self.editor.edit_parsed(name, raw).inspect_err(|err| {
            self.toasts.push(
                ToastKind::Warn,
                "Invalid value",
                Some(err.to_string()),
                self.toast_ttl,
                now,
            );
        })
    }

    /// Queues a save of the current record.
    pub fn save_record(&mut self) -> JobId {
        let job = Job::SaveRecord {
            record: self.editor.store().id(),
            value: self.editor.record().clone(),
        };
        self.submit(job, Pending::Save)
    }

    /// Saves a snapshot and, if enabled, queues its thumbnail capture.
    pub fn save_snapshot(&mut self, name: Option<&str>) -> SnapshotId {
        let record = self.editor.store().id();
        let snapshot = self.editor.save_snapshot(name);
        let id = snapshot.id;
        let value = snapshot.data.clone();
        if self.capture_thumbnails {
            self.submit(
                Job::CaptureThumbnail {
                    record,
                    snapshot: id,
                    value,
                },
                Pending::Thumbnail(id),
            );
        }
        id
    }

    /// Loads a snapshot; an unknown id is toasted and returned as an error.
    pub fn load_snapshot(&mut self, id: &SnapshotId, now: Instant) -> Result<Outcome, EditorError> {
        self.editor
            .load_snapshot(id)
            .inspect_err(|err| self.report_error("Snapshot not found", err, now))
    }

    /// Deletes a snapshot; an unknown id is toasted and returned as an error.
    pub fn delete_snapshot(
        &mut self,
        id: &SnapshotId,
        now: Instant,
    ) -> Result<Snapshot<S>, EditorError> {
        self.editor
            .delete_snapshot(id)
            .inspect_err(|err| self.report_error("Snapshot not found", err, now))
    }

    fn report_error(&mut self, title: &str, err: &EditorError, now: Instant) {
        self.toasts
            .push(ToastKind::Error, title, Some(err.to_string()), self.toast_ttl, now);
    }

    /// Drains finished jobs into toasts and drops expired toasts. Returns the
    /// number of completions handled.
    pub fn pump(&mut self, now: Instant) -> usize {
        let completions = self.port.drain_completions(PUMP_BATCH);
        let handled = completions.len();
        for completion in completions {
            self.complete(completion, now);
        }
        self.toasts.retain_visible(now);
        handled
    }

    fn complete(&mut self, completion: Completion, now: Instant) {
        let Some(pending) = self.pending.remove(&completion.job) else {
            warn!(job = completion.job.0, "completion for unknown job dropped");
            return;
        };
        match (pending, completion.result) {
            (Pending::Save, Ok(_)) => {
                debug!(job = completion.job.0, "record saved");
                self.notify(ToastKind::Success, "Avatar saved", None, now);
            }
            (Pending::Save, Err(err)) => {
                warn!(job = completion.job.0, %err, "record save failed");
                self.notify(ToastKind::Error, "Save failed", Some(err.to_string()), now);
            }
            (Pending::Thumbnail(snapshot), Ok(JobOutput::Thumbnail(thumb))) => {
                if let Err(err) = self.editor.attach_thumbnail(&snapshot, thumb) {
                    // Snapshot was deleted while the capture ran.
                    debug!(%err, "thumbnail arrived for a removed snapshot");
                }
            }
            (Pending::Thumbnail(snapshot), Ok(JobOutput::Saved)) => {
                warn!(snapshot = %snapshot.short(), "thumbnail job returned no image");
                self.notify(ToastKind::Warn, "Thumbnail unavailable", None, now);
            }
            (Pending::Thumbnail(snapshot), Err(err)) => {
                warn!(snapshot = %snapshot.short(), %err, "thumbnail capture failed");
                self.notify(
                    ToastKind::Warn,
                    "Thumbnail unavailable",
                    Some(err.to_string()),
                    now,
                );
            }
        }
    }
}
