//! The closed set of attribute types and the per-type override rule.

use crate::alignment::Alignment;
use crate::background::Background;
use crate::border::Borders;
use crate::dimension::{Height, Margins, Width};
use crate::font::TextStyles;
use crate::overflow::Overflow;
use crate::table::{ColumnWidth, RowHeight, TemplateFile};
use serde::{Deserialize, Serialize};

/// Right-biased, per-field override between two values of the same attribute type.
pub trait Overridable: Sized {
    /// Returns `self` overridden by `other`: each field set on `other` wins.
    fn override_with(&self, other: &Self) -> Self;
}

/// Picks `other` when it carries a value, else keeps `this`.
pub(crate) fn take_if_set<T: Clone>(this: &Option<T>, other: &Option<T>) -> Option<T> {
    other.clone().or_else(|| this.clone())
}

/// Explicit tag for each concrete attribute type.
///
/// The declaration order is the canonical iteration order of an [`crate::AttributeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    Background,
    Borders,
    Alignment,
    Width,
    Height,
    Margins,
    TextStyles,
    RowHeight,
    ColumnWidth,
    TemplateFile,
    Overflow,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 11] = [
        AttributeKind::Background,
        AttributeKind::Borders,
        AttributeKind::Alignment,
        AttributeKind::Width,
        AttributeKind::Height,
        AttributeKind::Margins,
        AttributeKind::TextStyles,
        AttributeKind::RowHeight,
        AttributeKind::ColumnWidth,
        AttributeKind::TemplateFile,
        AttributeKind::Overflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Background => "Background",
            AttributeKind::Borders => "Borders",
            AttributeKind::Alignment => "Alignment",
            AttributeKind::Width => "Width",
            AttributeKind::Height => "Height",
            AttributeKind::Margins => "Margins",
            AttributeKind::TextStyles => "TextStyles",
            AttributeKind::RowHeight => "RowHeight",
            AttributeKind::ColumnWidth => "ColumnWidth",
            AttributeKind::TemplateFile => "TemplateFile",
            AttributeKind::Overflow => "Overflow",
        }
    }
}

/// An immutable attribute value, tagged by its concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Attribute {
    Background(Background),
    Borders(Borders),
    Alignment(Alignment),
    Width(Width),
    Height(Height),
    Margins(Margins),
    TextStyles(TextStyles),
    RowHeight(RowHeight),
    ColumnWidth(ColumnWidth),
    TemplateFile(TemplateFile),
    Overflow(Overflow),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Background(_) => AttributeKind::Background,
            Attribute::Borders(_) => AttributeKind::Borders,
            Attribute::Alignment(_) => AttributeKind::Alignment,
            Attribute::Width(_) => AttributeKind::Width,
            Attribute::Height(_) => AttributeKind::Height,
            Attribute::Margins(_) => AttributeKind::Margins,
            Attribute::TextStyles(_) => AttributeKind::TextStyles,
            Attribute::RowHeight(_) => AttributeKind::RowHeight,
            Attribute::ColumnWidth(_) => AttributeKind::ColumnWidth,
            Attribute::TemplateFile(_) => AttributeKind::TemplateFile,
            Attribute::Overflow(_) => AttributeKind::Overflow,
        }
    }

    /// Merges two attributes using the override rule of their common type.
    ///
    /// Distinct types never interact; merging across types yields `other` unchanged.
    pub fn override_with(&self, other: &Attribute) -> Attribute {
        match (self, other) {
            (Attribute::Background(a), Attribute::Background(b)) => {
                Attribute::Background(a.override_with(b))
            }
            (Attribute::Borders(a), Attribute::Borders(b)) => Attribute::Borders(a.override_with(b)),
            (Attribute::Alignment(a), Attribute::Alignment(b)) => {
                Attribute::Alignment(a.override_with(b))
            }
            (Attribute::Width(a), Attribute::Width(b)) => Attribute::Width(a.override_with(b)),
            (Attribute::Height(a), Attribute::Height(b)) => Attribute::Height(a.override_with(b)),
            (Attribute::Margins(a), Attribute::Margins(b)) => Attribute::Margins(a.override_with(b)),
            (Attribute::TextStyles(a), Attribute::TextStyles(b)) => {
                Attribute::TextStyles(a.override_with(b))
            }
            (Attribute::RowHeight(a), Attribute::RowHeight(b)) => {
                Attribute::RowHeight(a.override_with(b))
            }
            (Attribute::ColumnWidth(a), Attribute::ColumnWidth(b)) => {
                Attribute::ColumnWidth(a.override_with(b))
            }
            (Attribute::TemplateFile(a), Attribute::TemplateFile(b)) => {
                Attribute::TemplateFile(a.override_with(b))
            }
            (Attribute::Overflow(a), Attribute::Overflow(b)) => {
                Attribute::Overflow(a.override_with(b))
            }
            (_, other) => other.clone(),
        }
    }
}

/// Typed access to the payload of one [`Attribute`] variant.
pub trait AttributePayload: Overridable + Clone + Into<Attribute> {
    const KIND: AttributeKind;

    fn from_attribute(attribute: &Attribute) -> Option<&Self>;
}

macro_rules! attribute_payload {
    ($($variant:ident),* $(,)?) => {
        $(
            impl AttributePayload for $variant {
                const KIND: AttributeKind = AttributeKind::$variant;

                fn from_attribute(attribute: &Attribute) -> Option<&Self> {
                    match attribute {
                        Attribute::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for Attribute {
                fn from(payload: $variant) -> Self {
                    Attribute::$variant(payload)
                }
            }
        )*
    };
}

attribute_payload!(
    Background,
    Borders,
    Alignment,
    Width,
    Height,
    Margins,
    TextStyles,
    RowHeight,
    ColumnWidth,
    TemplateFile,
    Overflow,
);
