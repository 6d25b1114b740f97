// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port for fire-and-forget persistence work.
//!
//! The editor never waits on storage. Hosts hand jobs to a
//! [`PersistencePort`] and later drain [`Completion`]s, which the
//! [`Session`](crate::Session) turns into toasts. Retries, if any, belong to the
//! port implementation.

use thiserror::Error;

use crate::ident::{RecordId, SnapshotId};
use crate::snapshot::ThumbnailRef;

/// Identifier of a submitted job, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

/// Work handed to the persistence collaborator. Each job carries its own copy
/// of the record, so later edits cannot race with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Job<S> {
    /// Persist the full record.
    SaveRecord {
        /// Record identity.
        record: RecordId,
        /// Value to store.
        value: S,
    },
    /// Render and store a thumbnail for a snapshot.
    CaptureThumbnail {
        /// Owning record.
        record: RecordId,
        /// Snapshot the thumbnail belongs to.
        snapshot: SnapshotId,
        /// Snapshot contents to render.
        value: S,
    },
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutput {
    /// The record was stored.
    Saved,
    /// A thumbnail was captured.
    Thumbnail(ThumbnailRef),
}

/// Failure reported by the persistence collaborator. The cause is opaque to
/// the editor and only shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PersistenceError(pub String);

/// Result of one finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Job this result belongs to.
    pub job: JobId,
    /// Output or failure.
    pub result: Result<JobOutput, PersistenceError>,
}

/// Asynchronous storage collaborator.
pub trait PersistencePort<S> {
    /// Queue a job. Must not block on the work itself.
    fn submit(&mut self, id: JobId, job: Job<S>);
    /// Return up to `max` finished jobs, oldest first.
    fn drain_completions(&mut self, max: usize) -> Vec<Completion>;
}
