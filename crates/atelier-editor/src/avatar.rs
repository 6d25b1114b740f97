// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Avatar configuration record edited by the studio.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::{FieldKey, Schema};

/// Valid avatar height range in centimetres.
pub const HEIGHT_RANGE: core::ops::RangeInclusive<u16> = 120..=220;

/// Maximum display name length in characters.
pub const MAX_NAME_CHARS: usize = 32;

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Every choice, in menu order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Stable lowercase name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let names: Vec<_> = Self::ALL.iter().map(|c| c.name()).collect();
                        format!("expected one of: {}", names.join(", "))
                    })
            }
        }
    };
}

choice_enum! {
    /// Overall body silhouette.
    BodyType default Average {
        /// Narrow frame.
        Slim => "slim",
        /// Default frame.
        Average => "average",
        /// Muscular frame.
        Athletic => "athletic",
        /// Wide frame.
        Broad => "broad",
    }
}

choice_enum! {
    /// Facial expression.
    Expression default Neutral {
        /// Resting face.
        Neutral => "neutral",
        /// Closed-mouth smile.
        Smile => "smile",
        /// Open laugh.
        Laugh => "laugh",
        /// Concentrating.
        Focused => "focused",
        /// Half-closed eyes.
        Sleepy => "sleepy",
    }
}

choice_enum! {
    /// Scene behind the avatar.
    Background default Studio {
        /// Plain studio backdrop.
        Studio => "studio",
        /// Outdoor park.
        Park => "park",
        /// Seaside.
        Beach => "beach",
        /// Workplace.
        Office => "office",
        /// Starfield.
        Space => "space",
    }
}

choice_enum! {
    /// Hair cut.
    HairStyle default Short {
        /// Close crop.
        Buzz => "buzz",
        /// Short cut.
        Short => "short",
        /// Curls.
        Curly => "curly",
        /// Long straight hair.
        Long => "long",
        /// Braided.
        Braids => "braids",
        /// Tied-up bun.
        Bun => "bun",
    }
}

/// 24-bit colour, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.0))
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
        let mut out = [0u8; 3];
        hex::decode_to_slice(digits, &mut out).map_err(|_| "expected #rrggbb".to_owned())?;
        Ok(Self(out))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Hair sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hair {
    /// Cut.
    pub style: HairStyle,
    /// Colour.
    pub color: Rgb,
}

impl Default for Hair {
    fn default() -> Self {
        Self {
            style: HairStyle::default(),
            color: Rgb([0x2c, 0x1b, 0x10]),
        }
    }
}

/// Clothing sub-record; each slot holds a catalogue item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    /// Upper body item.
    pub top: String,
    /// Lower body item.
    pub bottom: String,
    /// Footwear item.
    pub shoes: String,
}

impl Default for Outfit {
    fn default() -> Self {
        Self {
            top: "tee-basic".to_owned(),
            bottom: "jeans-classic".to_owned(),
            shoes: "sneakers-white".to_owned(),
        }
    }
}

/// The avatar configuration.
///
/// Deserializing fills missing fields from [`Avatar::default`] and rejects
/// values that fail [`Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AvatarDoc")]
pub struct Avatar {
    /// Name shown on profile cards.
    pub display_name: String,
    /// Body silhouette.
    pub body_type: BodyType,
    /// Skin colour.
    pub skin_tone: Rgb,
    /// Hair cut and colour.
    pub hair: Hair,
    /// Facial expression.
    pub expression: Expression,
    /// Clothing.
    pub outfit: Outfit,
    /// Scene behind the avatar.
    pub background: Background,
    /// Height in centimetres.
    pub height: u16,
    /// Glasses on/off.
    pub glasses: bool,
    /// Show the wellness badge on the avatar card.
    pub show_badge: bool,
    /// Applied accessory/reward item ids, in application order.
    pub accessories: Vec<String>,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            display_name: "Wanderer".to_owned(),
            body_type: BodyType::default(),
            skin_tone: Rgb([0xc6, 0x86, 0x42]),
            hair: Hair::default(),
            expression: Expression::default(),
            outfit: Outfit::default(),
            background: Background::default(),
            height: 170,
            glasses: false,
            show_badge: true,
            accessories: Vec::new(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct AvatarDoc {
    display_name: Option<String>,
    body_type: Option<BodyType>,
    skin_tone: Option<Rgb>,
    hair: Option<Hair>,
    expression: Option<Expression>,
    outfit: Option<Outfit>,
    background: Option<Background>,
    height: Option<u16>,
    glasses: Option<bool>,
    show_badge: Option<bool>,
    accessories: Option<Vec<String>>,
}

impl TryFrom<AvatarDoc> for Avatar {
    type Error = SchemaError;

    fn try_from(doc: AvatarDoc) -> Result<Self, Self::Error> {
        let base = Self::default();
        let avatar = Self {
            display_name: doc.display_name.unwrap_or(base.display_name),
            body_type: doc.body_type.unwrap_or(base.body_type),
            skin_tone: doc.skin_tone.unwrap_or(base.skin_tone),
            hair: doc.hair.unwrap_or(base.hair),
            expression: doc.expression.unwrap_or(base.expression),
            outfit: doc.outfit.unwrap_or(base.outfit),
            background: doc.background.unwrap_or(base.background),
            height: doc.height.unwrap_or(base.height),
            glasses: doc.glasses.unwrap_or(base.glasses),
            show_badge: doc.show_badge.unwrap_or(base.show_badge),
            accessories: doc.accessories.unwrap_or(base.accessories),
        };
        avatar.validate_record()?;
        Ok(avatar)
    }
}

/// Field keys of [`Avatar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarField {
    /// [`Avatar::display_name`].
    DisplayName,
    /// [`Avatar::body_type`].
    BodyType,
    /// [`Avatar::skin_tone`].
    SkinTone,
    /// [`Avatar::hair`].
    Hair,
    /// [`Avatar::expression`].
    Expression,
    /// [`Avatar::outfit`].
    Outfit,
    /// [`Avatar::background`].
    Background,
    /// [`Avatar::height`].
    Height,
    /// [`Avatar::glasses`].
    Glasses,
    /// [`Avatar::show_badge`].
    ShowBadge,
    /// [`Avatar::accessories`].
    Accessories,
}

impl FieldKey for AvatarField {
    const ALL: &'static [Self] = &[
        Self::DisplayName,
        Self::BodyType,
        Self::SkinTone,
        Self::Hair,
        Self::Expression,
        Self::Outfit,
        Self::Background,
        Self::Height,
        Self::Glasses,
        Self::ShowBadge,
        Self::Accessories,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::DisplayName => "display_name",
            Self::BodyType => "body_type",
            Self::SkinTone => "skin_tone",
            Self::Hair => "hair",
            Self::Expression => "expression",
            Self::Outfit => "outfit",
            Self::Background => "background",
            Self::Height => "height",
            Self::Glasses => "glasses",
            Self::ShowBadge => "show_badge",
            Self::Accessories => "accessories",
        }
    }
}

/// One [`Avatar`] field value, tagged with its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum AvatarValue {
    /// Display name.
    DisplayName(String),
    /// Body silhouette.
    BodyType(BodyType),
    /// Skin colour.
    SkinTone(Rgb),
    /// Hair.
    Hair(Hair),
    /// Expression.
    Expression(Expression),
    /// Clothing.
    Outfit(Outfit),
    /// Background.
    Background(Background),
    /// Height in centimetres.
    Height(u16),
    /// Glasses toggle.
    Glasses(bool),
    /// Badge toggle.
    ShowBadge(bool),
    /// Accessory ids.
    Accessories(Vec<String>),
}

impl Schema for Avatar {
    type Field = AvatarField;
    type Value = AvatarValue;

    fn field_of(value: &AvatarValue) -> AvatarField {
        match value {
            AvatarValue::DisplayName(_) => AvatarField::DisplayName,
            AvatarValue::BodyType(_) => AvatarField::BodyType,
            AvatarValue::SkinTone(_) => AvatarField::SkinTone,
            AvatarValue::Hair(_) => AvatarField::Hair,
            AvatarValue::Expression(_) => AvatarField::Expression,
            AvatarValue::Outfit(_) => AvatarField::Outfit,
            AvatarValue::Background(_) => AvatarField::Background,
            AvatarValue::Height(_) => AvatarField::Height,
            AvatarValue::Glasses(_) => AvatarField::Glasses,
            AvatarValue::ShowBadge(_) => AvatarField::ShowBadge,
            AvatarValue::Accessories(_) => AvatarField::Accessories,
        }
    }

    fn get(&self, field: AvatarField) -> AvatarValue {
        match field {
            AvatarField::DisplayName => AvatarValue::DisplayName(self.display_name.clone()),
            AvatarField::BodyType => AvatarValue::BodyType(self.body_type),
            AvatarField::SkinTone => AvatarValue::SkinTone(self.skin_tone),
            AvatarField::Hair => AvatarValue::Hair(self.hair.clone()),
            AvatarField::Expression => AvatarValue::Expression(self.expression),
            AvatarField::Outfit => AvatarValue::Outfit(self.outfit.clone()),
            AvatarField::Background => AvatarValue::Background(self.background),
            AvatarField::Height => AvatarValue::Height(self.height),
            AvatarField::Glasses => AvatarValue::Glasses(self.glasses),
            AvatarField::ShowBadge => AvatarValue::ShowBadge(self.show_badge),
            AvatarField::Accessories => AvatarValue::Accessories(self.accessories.clone()),
        }
    }

    fn set(&mut self, value: AvatarValue) {
        match value {
            AvatarValue::DisplayName(v) => self.display_name = v,
            AvatarValue::BodyType(v) => self.body_type = v,
            AvatarValue::SkinTone(v) => self.skin_tone = v,
            AvatarValue::Hair(v) => self.hair = v,
            AvatarValue::Expression(v) => self.expression = v,
            AvatarValue::Outfit(v) => self.outfit = v,
            AvatarValue::Background(v) => self.background = v,
            AvatarValue::Height(v) => self.height = v,
            AvatarValue::Glasses(v) => self.glasses = v,
            AvatarValue::ShowBadge(v) => self.show_badge = v,
            AvatarValue::Accessories(v) => self.accessories = v,
        }
    }

    fn parse_value(field: AvatarField, raw: &str) -> Result<AvatarValue, SchemaError> {
        let name = field.name();
        let bad = |reason: String| SchemaError::invalid(name, raw, reason);
        let text = raw.trim();
        Ok(match field {
            AvatarField::DisplayName => AvatarValue::DisplayName(text.to_owned()),
            AvatarField::BodyType => AvatarValue::BodyType(text.parse().map_err(bad)?),
            AvatarField::SkinTone => AvatarValue::SkinTone(text.parse().map_err(bad)?),
            AvatarField::Hair => AvatarValue::Hair(parse_hair(text).map_err(bad)?),
            AvatarField::Expression => AvatarValue::Expression(text.parse().map_err(bad)?),
            AvatarField::Outfit => AvatarValue::Outfit(parse_outfit(text).map_err(bad)?),
            AvatarField::Background => AvatarValue::Background(text.parse().map_err(bad)?),
            AvatarField::Height => AvatarValue::Height(
                text.parse()
                    .map_err(|_| bad("expected a whole number of cm".to_owned()))?,
            ),
            AvatarField::Glasses => AvatarValue::Glasses(parse_toggle(text).map_err(bad)?),
            AvatarField::ShowBadge => AvatarValue::ShowBadge(parse_toggle(text).map_err(bad)?),
            AvatarField::Accessories => AvatarValue::Accessories(parse_item_list(text)),
        })
    }

    fn validate(value: &AvatarValue) -> Result<(), SchemaError> {
        match value {
            AvatarValue::DisplayName(name) => check_display_name(name)
                .map_err(|reason| SchemaError::invalid(AvatarField::DisplayName.name(), name, reason)),
            AvatarValue::Height(cm) => check_height(*cm).map_err(|reason| {
                SchemaError::invalid(AvatarField::Height.name(), &cm.to_string(), reason)
            }),
            _ => Ok(()),
        }
    }
}

fn check_display_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must not be empty".to_owned());
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(format!("name is longer than {MAX_NAME_CHARS} characters"));
    }
    Ok(())
}

fn parse_hair(text: &str) -> Result<Hair, String> {
    let (style, color) = text
        .split_once(':')
        .ok_or_else(|| "expected <style>:#rrggbb".to_owned())?;
    Ok(Hair {
        style: style.parse()?,
        color: color.parse()?,
    })
}

fn parse_outfit(text: &str) -> Result<Outfit, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [top, bottom, shoes] if !top.is_empty() && !bottom.is_empty() && !shoes.is_empty() => {
            Ok(Outfit {
                top: (*top).to_owned(),
                bottom: (*bottom).to_owned(),
                shoes: (*shoes).to_owned(),
            })
        }
        _ => Err("expected <top>,<bottom>,<shoes>".to_owned()),
    }
}

fn check_height(cm: u16) -> Result<(), String> {
    if HEIGHT_RANGE.contains(&cm) {
        Ok(())
    } else {
        Err(format!(
            "must be within {}..={}",
            HEIGHT_RANGE.start(),
            HEIGHT_RANGE.end()
        ))
    }
}

fn parse_toggle(text: &str) -> Result<bool, String> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err("expected on/off".to_owned()),
    }
}

/// Comma-separated ids; blanks and repeats are dropped, `-` means none.
fn parse_item_list(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if text == "-" {
        return out;
    }
    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|existing| existing == item) {
            out.push(item.to_owned());
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn get_reports_matching_tags() {
        let avatar = Avatar::default();
        for &field in AvatarField::ALL {
            assert_eq!(Avatar::field_of(&avatar.get(field)), field);
        }
    }

    #[test]
    fn field_names_round_trip() {
        for &field in AvatarField::ALL {
            assert_eq!(AvatarField::from_name(field.name()), Some(field));
        }
        assert_eq!(AvatarField::from_name("mood"), None);
    }

    #[test]
    fn set_only_touches_its_field() {
        let mut avatar = Avatar::default();
        avatar.set(AvatarValue::Expression(Expression::Laugh));
        let expected = Avatar {
            expression: Expression::Laugh,
            ..Avatar::default()
        };
        assert_eq!(avatar, expected);
    }

    #[test]
    fn parses_every_field_kind() {
        assert_eq!(
            Avatar::parse("body_type", "Athletic").unwrap(),
            AvatarValue::BodyType(BodyType::Athletic)
        );
        assert_eq!(
            Avatar::parse("skin_tone", "#8d5524").unwrap(),
            AvatarValue::SkinTone(Rgb([0x8d, 0x55, 0x24]))
        );
        assert_eq!(
            Avatar::parse("hair", "curly:#101010").unwrap(),
            AvatarValue::Hair(Hair {
                style: HairStyle::Curly,
                color: Rgb([0x10, 0x10, 0x10]),
            })
        );
        assert_eq!(
            Avatar::parse("outfit", "hoodie, shorts ,boots").unwrap(),
            AvatarValue::Outfit(Outfit {
                top: "hoodie".into(),
                bottom: "shorts".into(),
                shoes: "boots".into(),
            })
        );
        assert_eq!(Avatar::parse("height", "182").unwrap(), AvatarValue::Height(182));
        assert_eq!(Avatar::parse("glasses", "on").unwrap(), AvatarValue::Glasses(true));
        assert_eq!(
            Avatar::parse("accessories", "cap,medal,cap,").unwrap(),
            AvatarValue::Accessories(vec!["cap".into(), "medal".into()])
        );
        assert_eq!(
            Avatar::parse("accessories", "-").unwrap(),
            AvatarValue::Accessories(Vec::new())
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Avatar::parse("mood", "happy"),
            Err(SchemaError::UnknownField("mood".into()))
        );
        for (field, raw) in [
            ("display_name", "   "),
            ("body_type", "tall"),
            ("skin_tone", "#zzzzzz"),
            ("hair", "curly"),
            ("outfit", "hoodie,shorts"),
            ("height", "300"),
            ("height", "tall"),
            ("glasses", "maybe"),
        ] {
            assert!(
                matches!(Avatar::parse(field, raw), Err(SchemaError::InvalidValue { .. })),
                "{field}={raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn values_serialize_with_field_tag() {
        let json = serde_json::to_value(AvatarValue::Hair(Hair::default())).unwrap();
        assert_eq!(json["field"], "hair");
        assert_eq!(json["value"]["style"], "short");
        assert_eq!(json["value"]["color"], "#2c1b10");
    }

    #[test]
    fn partial_avatar_json_fills_defaults() {
        let avatar: Avatar = serde_json::from_str(r#"{"height":150}"#).unwrap();
        assert_eq!(avatar.height, 150);
        assert_eq!(avatar.display_name, "Wanderer");
    }

    #[test]
    fn typed_values_obey_the_same_limits_as_text() {
        assert!(Avatar::validate(&AvatarValue::Height(5)).is_err());
        assert!(Avatar::validate(&AvatarValue::Height(*HEIGHT_RANGE.end())).is_ok());
        assert!(Avatar::validate(&AvatarValue::DisplayName("x".repeat(MAX_NAME_CHARS + 1))).is_err());
        assert!(Avatar::validate(&AvatarValue::DisplayName(String::new())).is_err());
        assert!(Avatar::validate(&AvatarValue::Glasses(true)).is_ok());
    }

    #[test]
    fn stored_avatar_out_of_range_is_rejected() {
        let err = serde_json::from_str::<Avatar>(r#"{"height":5}"#).unwrap_err();
        assert!(err.to_string().contains("height"), "{err}");
        let long = format!(r#"{{"display_name":"{}"}}"#, "n".repeat(MAX_NAME_CHARS + 1));
        assert!(serde_json::from_str::<Avatar>(&long).is_err());
        let avatar = Avatar::default();
        let back: Avatar = serde_json::from_str(&serde_json::to_string(&avatar).unwrap()).unwrap();
        assert_eq!(back, avatar);
    }
}
