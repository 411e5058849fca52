//! Attributes that only make sense on tables, columns and rows.

use crate::attribute::{Overridable, take_if_set};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Fixed row height. A finer level always replaces a coarser one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowHeight {
    pub height: f32,
}

impl Eq for RowHeight {}

impl Hash for RowHeight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.height.to_bits().hash(state);
    }
}

impl RowHeight {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Overridable for RowHeight {
    fn override_with(&self, other: &Self) -> Self {
        other.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
}

impl Eq for ColumnWidth {}

impl Hash for ColumnWidth {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.map(f32::to_bits).hash(state);
        self.auto.hash(state);
    }
}

impl ColumnWidth {
    pub fn fixed(width: f32) -> Self {
        Self {
            width: Some(width),
            auto: None,
        }
    }

    pub fn auto() -> Self {
        Self {
            width: None,
            auto: Some(true),
        }
    }
}

impl Overridable for ColumnWidth {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            width: take_if_set(&self.width, &other.width),
            auto: take_if_set(&self.auto, &other.auto),
        }
    }
}

/// A backend template file the output is based on. A finer level always replaces a coarser one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFile {
    pub path: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Overridable for TemplateFile {
    fn override_with(&self, other: &Self) -> Self {
        other.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_height_replaces_unconditionally() {
        assert_eq!(
            RowHeight::new(20.0).override_with(&RowHeight::new(8.0)),
            RowHeight::new(8.0)
        );
    }

    #[test]
    fn test_column_width_keeps_auto_flag() {
        let merged = ColumnWidth::auto().override_with(&ColumnWidth::fixed(80.0));
        assert_eq!(merged.width, Some(80.0));
        assert_eq!(merged.auto, Some(true));
    }
}
