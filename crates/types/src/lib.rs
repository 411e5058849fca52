pub mod color;
pub mod geometry;
pub mod ids;
pub mod kind;
pub mod value;

pub use color::Color;
pub use geometry::{Axis, Orientation, Position, Rect, Size};
pub use ids::{DocumentFormat, ModelId};
pub use kind::ModelKind;
pub use value::{CellType, CellValue};
