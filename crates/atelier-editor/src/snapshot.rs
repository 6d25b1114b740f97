// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Named, timestamped copies of a record, kept apart from undo history.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::EditorError;
use crate::ident::{make_snapshot_id, RecordId, SnapshotId};
use crate::schema::Schema;

/// Reference to a rendered thumbnail produced by a capture job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThumbnailRef(pub String);

/// A saved copy of the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: Schema")]
pub struct Snapshot<S: Schema> {
    /// Identifier, unique within the owning record.
    pub id: SnapshotId,
    /// Display name.
    pub name: String,
    /// When the snapshot was taken.
    pub created_at: Timestamp,
    /// Thumbnail, once a capture job has succeeded.
    pub thumbnail: Option<ThumbnailRef>,
    /// Record value at save time.
    pub data: S,
}

/// Ordered snapshot sequence for one record.
///
/// Sequence numbers only grow, so deleting a snapshot never frees its id for
/// reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: Schema")]
pub struct SnapshotRegistry<S: Schema> {
    record: RecordId,
    entries: Vec<Snapshot<S>>,
    next_seq: u64,
}

impl<S: Schema> SnapshotRegistry<S> {
    /// Empty registry for `record`.
    pub fn new(record: RecordId) -> Self {
        Self {
            record,
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    /// Appends a deep copy of `value`. When `name` is `None` the snapshot is
    /// called `"<prefix> <n>"`.
    pub fn capture(
        &mut self,
        value: &S,
        name: Option<&str>,
        prefix: &str,
        now: Timestamp,
    ) -> &Snapshot<S> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| format!("{prefix} {seq}"), str::to_owned);
        let index = self.entries.len();
        self.entries.push(Snapshot {
            id: make_snapshot_id(&self.record, seq),
            name,
            created_at: now,
            thumbnail: None,
            data: value.clone(),
        });
        &self.entries[index]
    }

    /// Looks up a snapshot by id.
    pub fn get(&self, id: &SnapshotId) -> Option<&Snapshot<S>> {
        self.entries.iter().find(|s| &s.id == id)
    }

    /// Resolves a hex prefix to the single snapshot id it matches.
    pub fn resolve(&self, prefix: &str) -> Option<SnapshotId> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut hits = self
            .entries
            .iter()
            .filter(|s| s.id.to_string().starts_with(&prefix));
        match (hits.next(), hits.next()) {
            (Some(only), None) => Some(only.id),
            _ => None,
        }
    }

    /// Records a thumbnail for an existing snapshot.
    pub fn attach_thumbnail(
        &mut self,
        id: &SnapshotId,
        thumbnail: ThumbnailRef,
    ) -> Result<(), EditorError> {
        let snapshot = self
            .entries
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or(EditorError::SnapshotNotFound(*id))?;
        snapshot.thumbnail = Some(thumbnail);
        Ok(())
    }

    /// Explicitly deletes a snapshot.
    pub fn remove(&mut self, id: &SnapshotId) -> Result<Snapshot<S>, EditorError> {
        let index = self
            .entries
            .iter()
            .position(|s| &s.id == id)
            .ok_or(EditorError::SnapshotNotFound(*id))?;
        Ok(self.entries.remove(index))
    }

    /// Snapshots in save order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot<S>> + '_ {
        self.entries.iter()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no snapshots exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::avatar::Avatar;
    use crate::ident::make_record_id;

    fn registry() -> SnapshotRegistry<Avatar> {
        SnapshotRegistry::new(make_record_id("owner"))
    }

    #[test]
    fn unnamed_snapshots_get_sequential_names() {
        let mut reg = registry();
        let first = reg.capture(&Avatar::default(), None, "Look", Timestamp(1)).name.clone();
        let second = reg.capture(&Avatar::default(), Some("  "), "Look", Timestamp(2)).name.clone();
        let third = reg.capture(&Avatar::default(), Some("Beach day"), "Look", Timestamp(3)).name.clone();
        assert_eq!(first, "Look 1");
        assert_eq!(second, "Look 2");
        assert_eq!(third, "Beach day");
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut reg = registry();
        let a = reg.capture(&Avatar::default(), None, "Look", Timestamp(1)).id;
        reg.remove(&a).unwrap();
        let b = reg.capture(&Avatar::default(), None, "Look", Timestamp(2)).id;
        assert_ne!(a, b);
        assert!(reg.get(&a).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn missing_ids_report_not_found() {
        let mut reg = registry();
        let ghost = make_snapshot_id(&make_record_id("other"), 1);
        assert_eq!(
            reg.attach_thumbnail(&ghost, ThumbnailRef("t".into())),
            Err(EditorError::SnapshotNotFound(ghost))
        );
        assert!(matches!(reg.remove(&ghost), Err(EditorError::SnapshotNotFound(_))));
    }

    #[test]
    fn thumbnail_attaches_to_the_right_snapshot() {
        let mut reg = registry();
        let a = reg.capture(&Avatar::default(), None, "Look", Timestamp(1)).id;
        let b = reg.capture(&Avatar::default(), None, "Look", Timestamp(1)).id;
        reg.attach_thumbnail(&b, ThumbnailRef("thumb-b".into())).unwrap();
        assert!(reg.get(&a).unwrap().thumbnail.is_none());
        assert_eq!(
            reg.get(&b).unwrap().thumbnail,
            Some(ThumbnailRef("thumb-b".into()))
        );
    }

    #[test]
    fn resolve_requires_unique_prefix() {
        let mut reg = registry();
        let id = reg.capture(&Avatar::default(), None, "Look", Timestamp(1)).id;
        assert_eq!(reg.resolve(&id.short()), Some(id));
        assert_eq!(reg.resolve(&id.short().to_uppercase()), Some(id));
        assert_eq!(reg.resolve(""), None);
        assert_eq!(reg.resolve("zz"), None);
    }
}
