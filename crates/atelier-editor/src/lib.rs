// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! atelier-editor: structured record editing with linear undo/redo.
//!
//! A record type implements [`Schema`] to declare its fields. An [`Editor`]
//! owns one record, its [`History`] of inverse [`Patch`]es and a
//! [`SnapshotRegistry`]. Hosts that need background persistence wrap the
//! editor in a [`Session`], which forwards jobs to a [`PersistencePort`] and
//! reports their completions as toasts.
#![forbid(unsafe_code)]

/// Reference record: the avatar customization model.
pub mod avatar;
mod clock;
mod editor;
mod error;
mod history;
mod ident;
mod patch;
/// Background persistence port.
pub mod persist;
mod schema;
mod session;
mod snapshot;
mod store;

/// Millisecond clocks.
pub use clock::{Clock, SystemClock, Timestamp};
/// Editor controller.
pub use editor::{Editor, Outcome};
/// Error types.
pub use error::{EditorError, PatchError, SchemaError};
/// Undo/redo stacks.
pub use history::History;
/// BLAKE3-derived identifiers.
pub use ident::{make_record_id, make_snapshot_id, ParseIdError, RecordId, SnapshotId};
/// Sparse field patches.
pub use patch::Patch;
/// Field schema traits.
pub use schema::{FieldKey, Schema};
/// Host session over an editor and a persistence port.
pub use session::{Session, PUMP_BATCH};
/// Snapshots.
pub use snapshot::{Snapshot, SnapshotRegistry, ThumbnailRef};
/// Record value with identity and timestamps.
pub use store::RecordStore;
