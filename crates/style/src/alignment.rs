use crate::attribute::{Overridable, take_if_set};
use serde::{Deserialize, Serialize};
use tabulate_types::{Rect, Size};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalAlignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlignment>,
}

impl Alignment {
    pub fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal: Some(horizontal),
            vertical: Some(vertical),
        }
    }

    /// Positions a box of `size` inside `outer` according to this alignment.
    pub fn align(&self, outer: Rect, size: Size) -> Rect {
        let free_x = (outer.width - size.width).max(0.0);
        let free_y = (outer.height - size.height).max(0.0);
        let dx = match self.horizontal.unwrap_or_default() {
            HorizontalAlignment::Left | HorizontalAlignment::Justify => 0.0,
            HorizontalAlignment::Center => free_x / 2.0,
            HorizontalAlignment::Right => free_x,
        };
        let dy = match self.vertical.unwrap_or_default() {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => free_y / 2.0,
            VerticalAlignment::Bottom => free_y,
        };
        Rect::new(outer.x + dx, outer.y + dy, size.width, size.height)
    }
}

impl Overridable for Alignment {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            horizontal: take_if_set(&self.horizontal, &other.horizontal),
            vertical: take_if_set(&self.vertical, &other.vertical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_center_bottom() {
        let alignment = Alignment::new(HorizontalAlignment::Center, VerticalAlignment::Bottom);
        let placed = alignment.align(Rect::new(0.0, 0.0, 100.0, 50.0), Size::new(20.0, 10.0));
        assert_eq!(placed, Rect::new(40.0, 40.0, 20.0, 10.0));
    }
}
