// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Current value of the edited record plus its identity and timestamps.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::ident::RecordId;
use crate::patch::Patch;
use crate::schema::Schema;

/// Holds one record and its metadata.
///
/// `modified_at` never moves backwards: a clock reading older than the last
/// mutation leaves it where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: Schema")]
pub struct RecordStore<S: Schema> {
    id: RecordId,
    created_at: Timestamp,
    modified_at: Timestamp,
    value: S,
}

impl<S: Schema> RecordStore<S> {
    /// Wraps `value` as a freshly created record.
    pub fn new(id: RecordId, value: S, now: Timestamp) -> Self {
        Self {
            id,
            created_at: now,
            modified_at: now,
            value,
        }
    }

    /// Current record value.
    pub fn get(&self) -> &S {
        &self.value
    }

    /// Record identity.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Creation time; immutable.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the last successful mutation.
    pub fn modified_at(&self) -> Timestamp {
        self.modified_at
    }

    /// Shallow-merges `patch` into the record and bumps `modified_at`.
    pub fn set(&mut self, patch: &Patch<S>, now: Timestamp) {
        patch.apply_to(&mut self.value);
        self.modified_at = self.modified_at.max(now);
    }
}
