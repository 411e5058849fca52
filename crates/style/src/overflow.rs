use crate::attribute::{Overridable, take_if_set};
use serde::{Deserialize, Serialize};
use tabulate_types::Axis;

/// What a model does when a unit of its content does not fit the layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverflowPolicy {
    /// Abort the remaining export of siblings. The unit is not rendered.
    Stop,
    /// Render the unit clipped, then stop exporting this model.
    Finish,
    /// Render the unit clipped and keep going with the next unit.
    Continue,
    /// Skip the unit, reserve its space, and re-export it on the next page.
    Retry,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Stop => "STOP",
            OverflowPolicy::Finish => "FINISH",
            OverflowPolicy::Continue => "CONTINUE",
            OverflowPolicy::Retry => "RETRY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Overflow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<OverflowPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<OverflowPolicy>,
}

impl Overflow {
    pub fn vertical(policy: OverflowPolicy) -> Self {
        Self {
            horizontal: None,
            vertical: Some(policy),
        }
    }

    pub fn horizontal(policy: OverflowPolicy) -> Self {
        Self {
            horizontal: Some(policy),
            vertical: None,
        }
    }

    pub fn on(&self, axis: Axis) -> Option<OverflowPolicy> {
        match axis {
            Axis::X => self.horizontal,
            Axis::Y => self.vertical,
        }
    }
}

impl Overridable for Overflow {
    fn override_with(&self, other: &Self) -> Self {
        Self {
            horizontal: take_if_set(&self.horizontal, &other.horizontal),
            vertical: take_if_set(&self.vertical, &other.vertical),
        }
    }
}
