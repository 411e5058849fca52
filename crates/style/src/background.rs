use crate::attribute::{Overridable, take_if_set};
use serde::{Deserialize, Serialize};
use tabulate_types::Color;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum FillPattern {
    #[default]
    Solid,
    Striped,
    Dotted,
    Diamonds,
    Bricks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillPattern>,
}

impl Background {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            fill: None,
        }
    }

    pub fn with_fill(mut self, fill: FillPattern) -> Self {
        self.fill = Some(fill);
        self
    }
}

impl Overridable for Background {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            color: take_if_set(&self.color, &other.color),
            fill: take_if_set(&self.fill, &other.fill),
        }
    }
}
