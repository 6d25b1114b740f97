// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static field schemas for editable records.
//!
//! A record type declares its complete field set up front: a `Field` key enum
//! and a tagged `Value` union with one variant per field. Every edit, patch and
//! snapshot is expressed in those two types, so an unknown field can never be
//! merged into a record.

use core::fmt;
use core::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::SchemaError;

/// Key naming one field of a [`Schema`].
pub trait FieldKey: Copy + Ord + Hash + fmt::Debug + 'static {
    /// Every field, in declaration order.
    const ALL: &'static [Self];

    /// Stable snake_case name used in text input and serialized forms.
    fn name(self) -> &'static str;

    /// Looks a field up by its [`name`](Self::name).
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// A record with a statically enumerated field set.
///
/// `Default` supplies the values used by `reset`. Implementations must keep
/// `field_of(&r.get(f)) == f` for every field `f`, and `set` must only touch
/// the field named by the value's tag.
pub trait Schema: Clone + PartialEq + Default + fmt::Debug + Serialize + DeserializeOwned {
    /// Field key enum.
    type Field: FieldKey;
    /// Tagged union of per-field values.
    type Value: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned;

    /// The field a value belongs to.
    fn field_of(value: &Self::Value) -> Self::Field;

    /// Current value of `field`.
    fn get(&self, field: Self::Field) -> Self::Value;

    /// Overwrite the field named by `value`'s tag.
    fn set(&mut self, value: Self::Value);

    /// Parse user text into a value for `field`. Range and length rules
    /// belong in [`validate`](Self::validate), which [`parse`](Self::parse)
    /// applies afterwards.
    fn parse_value(field: Self::Field, raw: &str) -> Result<Self::Value, SchemaError>;

    /// Field-level constraints on a typed value. Accepts everything unless
    /// overridden.
    fn validate(_value: &Self::Value) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Runs [`validate`](Self::validate) over every field of `self`.
    fn validate_record(&self) -> Result<(), SchemaError> {
        <Self::Field as FieldKey>::ALL
            .iter()
            .try_for_each(|&field| Self::validate(&self.get(field)))
    }

    /// Parse `name` + text into a validated value, rejecting unknown field
    /// names.
    fn parse(name: &str, raw: &str) -> Result<Self::Value, SchemaError> {
        let field = <Self::Field as FieldKey>::from_name(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_owned()))?;
        let value = Self::parse_value(field, raw)?;
        Self::validate(&value)?;
        Ok(value)
    }
}
