//! Typed, immutable attributes and the algebra for merging them.
//!
//! Attributes are declared at several granularities (table, column, row, cell, or
//! any visual model). Two instances of the same attribute type merge field by field,
//! with the finer level winning; distinct types never interact. An
//! [`AttributeSet`] holds at most one instance per [`AttributeKind`].

use thiserror::Error;

pub mod alignment;
pub mod attribute;
pub mod background;
pub mod border;
pub mod constraints;
pub mod dimension;
pub mod font;
pub mod overflow;
pub mod parsers;
pub mod set;
pub mod table;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use attribute::{Attribute, AttributeKind, AttributePayload, Overridable};
pub use background::{Background, FillPattern};
pub use border::{Border, BorderStyle, Borders};
pub use constraints::AttributeConstraints;
pub use dimension::{Dimension, Height, Margins, PageSize, Width, declared_size};
pub use font::{FontStyle, FontWeight, TextStyles};
pub use overflow::{Overflow, OverflowPolicy};
pub use parsers::StyleParseError;
pub use set::AttributeSet;
pub use table::{ColumnWidth, RowHeight, TemplateFile};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("Attribute {attribute} is not allowed on {model} models.")]
    NotAllowed {
        attribute: &'static str,
        model: &'static str,
    },
    #[error("Invalid attribute value: {0}")]
    Parse(#[from] StyleParseError),
}
