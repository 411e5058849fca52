use serde::{Deserialize, Serialize};

/// The kind of a model node, or of a table sub-element (column, row, cell).
///
/// Used as a key for attribute constraints and for rendering lookups instead of
/// stringly-typed identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModelKind {
    Document,
    Page,
    Container,
    Table,
    Column,
    Row,
    Cell,
    Text,
    Image,
    Margins,
    Spacing,
    Wrapper,
}

impl ModelKind {
    pub const ALL: [ModelKind; 12] = [
        ModelKind::Document,
        ModelKind::Page,
        ModelKind::Container,
        ModelKind::Table,
        ModelKind::Column,
        ModelKind::Row,
        ModelKind::Cell,
        ModelKind::Text,
        ModelKind::Image,
        ModelKind::Margins,
        ModelKind::Spacing,
        ModelKind::Wrapper,
    ];

    /// Returns a string representation, primarily for debugging or error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Document => "Document",
            ModelKind::Page => "Page",
            ModelKind::Container => "Container",
            ModelKind::Table => "Table",
            ModelKind::Column => "Column",
            ModelKind::Row => "Row",
            ModelKind::Cell => "Cell",
            ModelKind::Text => "Text",
            ModelKind::Image => "Image",
            ModelKind::Margins => "Margins",
            ModelKind::Spacing => "Spacing",
            ModelKind::Wrapper => "Wrapper",
        }
    }

    /// Composite kinds own child models and open their own layout scope.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            ModelKind::Document
                | ModelKind::Page
                | ModelKind::Container
                | ModelKind::Margins
                | ModelKind::Spacing
                | ModelKind::Wrapper
        )
    }
}
