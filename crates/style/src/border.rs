use crate::attribute::{Overridable, take_if_set};
use crate::parsers::{StyleParseError, parse_border, run_parser};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tabulate_types::Color;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// One side of a border. Each field merges independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl Eq for Border {}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.style.hash(state);
        self.color.hash(state);
        self.width.map(f32::to_bits).hash(state);
    }
}

impl Border {
    pub fn new(width: f32, style: BorderStyle, color: Color) -> Self {
        Self {
            style: Some(style),
            color: Some(color),
            width: Some(width),
        }
    }
}

impl FromStr for Border {
    type Err = StyleParseError;

    /// Parses a border shorthand such as `"1pt solid #000000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        run_parser(parse_border, s)
    }
}

impl Overridable for Border {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            style: take_if_set(&self.style, &other.style),
            color: take_if_set(&self.color, &other.color),
            width: take_if_set(&self.width, &other.width),
        }
    }
}

fn merge_side(this: &Option<Border>, other: &Option<Border>) -> Option<Border> {
    match (this, other) {
        (Some(a), Some(b)) => Some(a.override_with(b)),
        _ => take_if_set(this, other),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Borders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Border>,
}

impl Borders {
    pub fn all(border: Border) -> Self {
        Self {
            left: Some(border.clone()),
            right: Some(border.clone()),
            top: Some(border.clone()),
            bottom: Some(border),
        }
    }
}

impl Overridable for Borders {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            left: merge_side(&self.left, &other.left),
            right: merge_side(&self.right, &other.right),
            top: merge_side(&self.top, &other.top),
            bottom: merge_side(&self.bottom, &other.bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_fields_merge_independently() {
        let coarse = Borders::all(Border::new(1.0, BorderStyle::Solid, Color::BLACK));
        let fine = Borders {
            top: Some(Border {
                color: Some(Color::RED),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = coarse.override_with(&fine);
        let top = merged.top.unwrap();
        assert_eq!(top.color, Some(Color::RED));
        assert_eq!(top.style, Some(BorderStyle::Solid), "style kept from coarse level");
        assert_eq!(top.width, Some(1.0));
        assert_eq!(merged.left, coarse.left, "untouched sides are inherited");
    }

    #[test]
    fn test_parse_border_shorthand() {
        let border: Border = "2pt dashed #ff0000".parse().unwrap();
        assert_eq!(border, Border::new(2.0, BorderStyle::Dashed, Color::RED));
        assert!("thick".parse::<Border>().is_err());
    }
}
