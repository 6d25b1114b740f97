// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sparse, non-empty field overlays.
//!
//! A [`Patch`] maps a subset of a record's fields to values. History entries
//! are patches holding the *prior* values of exactly the fields an edit
//! touched, so applying one restores the record without a full snapshot.
//!
//! Invariants:
//! - a patch is never empty (constructors return `None`/`Err` instead);
//! - each key equals the tag of the value stored under it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PatchError;
use crate::schema::{FieldKey, Schema};

/// Sparse mapping of field -> value for one edit.
#[derive(Clone, PartialEq, Debug)]
pub struct Patch<S: Schema> {
    entries: BTreeMap<S::Field, S::Value>,
}

impl<S: Schema> Patch<S> {
    fn from_map(entries: BTreeMap<S::Field, S::Value>) -> Option<Self> {
        (!entries.is_empty()).then_some(Self { entries })
    }

    /// A patch holding one value.
    pub fn single(value: S::Value) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(S::field_of(&value), value);
        Self { entries }
    }

    /// Collects values into a patch. A later value for the same field replaces
    /// an earlier one. Returns `None` when `values` is empty.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S::Value>,
    {
        Self::from_map(
            values
                .into_iter()
                .map(|v| (S::field_of(&v), v))
                .collect(),
        )
    }

    /// Strict constructor used for decoding: rejects empty input and repeated fields.
    pub fn try_from_values(values: Vec<S::Value>) -> Result<Self, PatchError> {
        let mut entries = BTreeMap::new();
        for value in values {
            let field = S::field_of(&value);
            if entries.insert(field, value).is_some() {
                return Err(PatchError::DuplicateField(field.name()));
            }
        }
        Self::from_map(entries).ok_or(PatchError::Empty)
    }

    /// Reads the current values of `fields` from `record`.
    pub fn capture<I>(record: &S, fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S::Field>,
    {
        Self::from_map(fields.into_iter().map(|f| (f, record.get(f))).collect())
    }

    /// Diffs `values` against `record`.
    ///
    /// Returns `(forward, inverse)` restricted to the fields whose value
    /// actually differs, or `None` when nothing would change.
    pub fn diff<I>(record: &S, values: I) -> Option<(Self, Self)>
    where
        I: IntoIterator<Item = S::Value>,
    {
        let wanted: BTreeMap<S::Field, S::Value> = values
            .into_iter()
            .map(|v| (S::field_of(&v), v))
            .collect();
        let mut forward = BTreeMap::new();
        let mut inverse = BTreeMap::new();
        for (field, value) in wanted {
            let current = record.get(field);
            if current != value {
                inverse.insert(field, current);
                forward.insert(field, value);
            }
        }
        Some((Self::from_map(forward)?, Self::from_map(inverse)?))
    }

    /// Values currently held by `record` for this patch's fields.
    pub fn inverse_against(&self, record: &S) -> Self {
        Self {
            entries: self
                .entries
                .keys()
                .map(|&f| (f, record.get(f)))
                .collect(),
        }
    }

    /// Writes every value into `record`.
    pub fn apply_to(&self, record: &mut S) {
        for value in self.entries.values() {
            record.set(value.clone());
        }
    }

    /// Fields touched by this patch, in key order.
    pub fn fields(&self) -> impl Iterator<Item = S::Field> + '_ {
        self.entries.keys().copied()
    }

    /// Values carried by this patch, in key order.
    pub fn values(&self) -> impl Iterator<Item = &S::Value> + '_ {
        self.entries.values()
    }

    /// Value stored for `field`, if any.
    pub fn get(&self, field: S::Field) -> Option<&S::Value> {
        self.entries.get(&field)
    }

    /// True if `field` is part of this patch.
    pub fn contains(&self, field: S::Field) -> bool {
        self.entries.contains_key(&field)
    }

    /// Number of fields (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the patch, yielding its values in key order.
    pub fn into_values(self) -> Vec<S::Value> {
        self.entries.into_values().collect()
    }
}

impl<S: Schema> Serialize for Patch<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, S: Schema> Deserialize<'de> for Patch<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<S::Value>::deserialize(deserializer)?;
        Self::try_from_values(values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::avatar::{Avatar, AvatarField, AvatarValue, BodyType};

    #[test]
    fn from_values_keeps_last_value_per_field() {
        let patch = Patch::<Avatar>::from_values([
            AvatarValue::Height(150),
            AvatarValue::Height(180),
        ])
        .unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(AvatarField::Height), Some(&AvatarValue::Height(180)));
    }

    #[test]
    fn empty_inputs_never_build_a_patch() {
        assert!(Patch::<Avatar>::from_values([]).is_none());
        assert!(Patch::<Avatar>::capture(&Avatar::default(), []).is_none());
        assert_eq!(
            Patch::<Avatar>::try_from_values(Vec::new()),
            Err(PatchError::Empty)
        );
    }

    #[test]
    fn diff_drops_unchanged_fields() {
        let avatar = Avatar::default();
        let (forward, inverse) = Patch::diff(
            &avatar,
            [
                AvatarValue::Glasses(true),
                AvatarValue::BodyType(avatar.body_type),
            ],
        )
        .unwrap();
        assert_eq!(forward.fields().collect::<Vec<_>>(), vec![AvatarField::Glasses]);
        assert_eq!(inverse.get(AvatarField::Glasses), Some(&AvatarValue::Glasses(false)));
    }

    #[test]
    fn diff_of_identical_values_is_none() {
        let avatar = Avatar::default();
        assert!(Patch::diff(&avatar, [AvatarValue::BodyType(BodyType::Average)]).is_none());
        assert!(Patch::<Avatar>::diff(&avatar, []).is_none());
    }

    #[test]
    fn apply_then_inverse_restores_record() {
        let original = Avatar::default();
        let mut edited = original.clone();
        let patch = Patch::<Avatar>::from_values([
            AvatarValue::DisplayName("Nova".into()),
            AvatarValue::Height(190),
        ])
        .unwrap();
        let inverse = patch.inverse_against(&edited);
        patch.apply_to(&mut edited);
        assert_eq!(edited.display_name, "Nova");
        inverse.apply_to(&mut edited);
        assert_eq!(edited, original);
    }

    #[test]
    fn decoding_rejects_duplicates_and_empty() {
        let dup = r#"[{"field":"glasses","value":true},{"field":"glasses","value":false}]"#;
        assert!(serde_json::from_str::<Patch<Avatar>>(dup).is_err());
        assert!(serde_json::from_str::<Patch<Avatar>>("[]").is_err());

        let ok = r#"[{"field":"height","value":170}]"#;
        let patch: Patch<Avatar> = serde_json::from_str(ok).unwrap();
        assert_eq!(patch, Patch::single(AvatarValue::Height(170)));
    }
}
