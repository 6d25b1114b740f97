// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types surfaced at the editor boundary.

use thiserror::Error;

use crate::ident::SnapshotId;

/// Text input could not be mapped onto the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No field with this name exists.
    #[error("unknown field {0:?}")]
    UnknownField(String),
    /// The field exists but the text is not a valid value for it.
    #[error("invalid value {raw:?} for `{field}`: {reason}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending input.
        raw: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl SchemaError {
    pub(crate) fn invalid(field: &'static str, raw: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            raw: raw.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A serialized patch violated the patch invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// Patches always carry at least one field.
    #[error("patch is empty")]
    Empty,
    /// A field appeared more than once.
    #[error("field `{0}` appears more than once")]
    DuplicateField(&'static str),
}

/// Failures reported by editor and session operations.
///
/// Empty-stack undo/redo and unchanged edits are not errors; they come back as
/// [`Outcome::Ignored`](crate::Outcome::Ignored). Storage failures arrive later
/// as [`PersistenceError`](crate::persist::PersistenceError) completions, not
/// through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The referenced snapshot does not exist.
    #[error("snapshot {0} not found")]
    SnapshotNotFound(SnapshotId),
    /// Input did not match the record schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
