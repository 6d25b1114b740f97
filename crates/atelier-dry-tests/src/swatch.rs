// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-field fixture schema.
//!
//! Small enough that a test can spell out every state by hand.

use atelier_editor::{make_record_id, Editor, FieldKey, Schema, SchemaError};
use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;

/// A colour chip with a size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Swatch {
    /// Colour name.
    pub color: String,
    /// Edge length.
    pub size: u32,
}

impl Swatch {
    /// Convenience constructor.
    pub fn new(color: &str, size: u32) -> Self {
        Self {
            color: color.to_owned(),
            size,
        }
    }
}

impl Default for Swatch {
    fn default() -> Self {
        Self::new("white", 1)
    }
}

/// Field keys of [`Swatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SwatchField {
    /// `color`
    Color,
    /// `size`
    Size,
}

impl FieldKey for SwatchField {
    const ALL: &'static [Self] = &[Self::Color, Self::Size];

    fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Size => "size",
        }
    }
}

/// Field values of [`Swatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SwatchValue {
    /// New colour.
    Color(String),
    /// New size.
    Size(u32),
}

impl Schema for Swatch {
    type Field = SwatchField;
    type Value = SwatchValue;

    fn field_of(value: &SwatchValue) -> SwatchField {
        match value {
            SwatchValue::Color(_) => SwatchField::Color,
            SwatchValue::Size(_) => SwatchField::Size,
        }
    }

    fn get(&self, field: SwatchField) -> SwatchValue {
        match field {
            SwatchField::Color => SwatchValue::Color(self.color.clone()),
            SwatchField::Size => SwatchValue::Size(self.size),
        }
    }

    fn set(&mut self, value: SwatchValue) {
        match value {
            SwatchValue::Color(c) => self.color = c,
            SwatchValue::Size(s) => self.size = s,
        }
    }

    fn parse_value(field: SwatchField, raw: &str) -> Result<SwatchValue, SchemaError> {
        let raw = raw.trim();
        match field {
            SwatchField::Color if raw.is_empty() => Err(SchemaError::InvalidValue {
                field: field.name(),
                raw: raw.to_owned(),
                reason: "colour must not be empty".to_owned(),
            }),
            SwatchField::Color => Ok(SwatchValue::Color(raw.to_owned())),
            SwatchField::Size => {
                raw.parse()
                    .map(SwatchValue::Size)
                    .map_err(|e: std::num::ParseIntError| SchemaError::InvalidValue {
                        field: field.name(),
                        raw: raw.to_owned(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

/// Editor over `initial` driven by a [`ManualClock`] that steps 1 ms per
/// read. The returned clock shares time with the editor's.
pub fn swatch_editor(initial: Swatch) -> (Editor<Swatch, ManualClock>, ManualClock) {
    let clock = ManualClock::stepping(1_000, 1);
    let editor = Editor::with_clock(make_record_id("swatch"), initial, clock.clone());
    (editor, clock)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_name() {
        assert_eq!(
            Swatch::parse("size", " 12 ").unwrap(),
            SwatchValue::Size(12)
        );
        assert_eq!(
            Swatch::parse("color", "blue").unwrap(),
            SwatchValue::Color("blue".into())
        );
        assert!(matches!(
            Swatch::parse("shape", "round"),
            Err(SchemaError::UnknownField(_))
        ));
        assert!(Swatch::parse("size", "-1").is_err());
        assert!(Swatch::parse("color", "  ").is_err());
    }

    #[test]
    fn values_serialize_tagged() {
        let json = serde_json::to_string(&SwatchValue::Size(3)).unwrap();
        assert_eq!(json, r#"{"field":"size","value":3}"#);
    }
}
