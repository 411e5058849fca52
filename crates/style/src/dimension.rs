//! Defines primitives for size, position, and spacing.
use crate::attribute::{Overridable, take_if_set};
use crate::parsers::{StyleParseError, parse_dimension, run_parser};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tabulate_types::Size;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Pt(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Dimension::Pt(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Percent(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Auto => {
                2u8.hash(state);
            }
        }
    }
}

impl Eq for Dimension {}

impl Dimension {
    /// Resolves against the available extent. `Auto` has no fixed value.
    pub fn resolve(&self, available: f32) -> Option<f32> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) if available.is_finite() => Some(available * p / 100.0),
            Dimension::Percent(_) | Dimension::Auto => None,
        }
    }
}

impl FromStr for Dimension {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        run_parser(parse_dimension, s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Width {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Dimension>,
}

impl Width {
    pub fn new(value: Dimension) -> Self {
        Self { value: Some(value) }
    }

    pub fn pt(value: f32) -> Self {
        Self::new(Dimension::Pt(value))
    }
}

impl Overridable for Width {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            value: take_if_set(&self.value, &other.value),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Height {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Dimension>,
}

impl Height {
    pub fn new(value: Dimension) -> Self {
        Self { value: Some(value) }
    }

    pub fn pt(value: f32) -> Self {
        Self::new(Dimension::Pt(value))
    }
}

impl Overridable for Height {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            value: take_if_set(&self.value, &other.value),
        }
    }
}

/// Resolves a declared width/height pair, falling back to `natural` per axis.
pub fn declared_size(
    width: Option<&Width>,
    height: Option<&Height>,
    available: Size,
    natural: Size,
) -> Size {
    Size::new(
        width
            .and_then(|w| w.value)
            .and_then(|d| d.resolve(available.width))
            .unwrap_or(natural.width),
        height
            .and_then(|h| h.value)
            .and_then(|d| d.resolve(available.height))
            .unwrap_or(natural.height),
    )
}

/// Offset applied to a model's layout origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
}

impl Eq for Margins {}

impl Hash for Margins {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.map(f32::to_bits).hash(state);
        self.top.map(f32::to_bits).hash(state);
    }
}

impl Margins {
    pub fn new(left: f32, top: f32) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
        }
    }

    pub fn offset(&self) -> Size {
        Size::new(self.left.unwrap_or(0.0), self.top.unwrap_or(0.0))
    }
}

impl Overridable for Margins {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            left: take_if_set(&self.left, &other.left),
            top: take_if_set(&self.top, &other.top),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl Eq for PageSize {}

impl Hash for PageSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            PageSize::A4 => 0u8.hash(state),
            PageSize::Letter => 1u8.hash(state),
            PageSize::Legal => 2u8.hash(state),
            PageSize::Custom { width, height } => {
                3u8.hash(state);
                width.to_bits().hash(state);
                height.to_bits().hash(state);
            }
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl PageSize {
    pub fn dimensions_pt(&self) -> Size {
        match self {
            PageSize::A4 => Size::new(595.28, 841.89),
            PageSize::Letter => Size::new(612.0, 792.0),
            PageSize::Legal => Size::new(612.0, 1008.0),
            PageSize::Custom { width, height } => Size::new(*width, *height),
        }
    }

    /// Parse a page size name (e.g., "A4", "Letter", "Legal")
    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}
