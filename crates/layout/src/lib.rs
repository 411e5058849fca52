use tabulate_types::ModelId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Model {0} was placed before it was measured.")]
    NotMeasured(ModelId),
    #[error("Node has a height of {0:.2} which exceeds the total page content height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("State mismatch: Expected state for {0}, got {1}.")]
    StateMismatch(&'static str, &'static str),
    #[error("No layout scope is open.")]
    NoActiveLayout,
}

pub mod layout;
pub mod overflow;
pub mod stack;

pub use self::layout::{Fit, Layout, Placement};
pub use self::overflow::OverflowAction;
pub use self::stack::LayoutStack;

// Re-export geometry types used by callers to prevent type mismatches
pub use tabulate_types::geometry::{Orientation, Position, Rect, Size};

#[cfg(test)]
mod layout_test;
