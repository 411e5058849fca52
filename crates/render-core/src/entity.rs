use serde::Serialize;
use tabulate_style::AttributeSet;
use tabulate_types::{CellValue, ModelId, Rect};

/// The kind of a render-time event, used as the key of every operation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    DocumentStart,
    DocumentEnd,
    PageStart,
    PageEnd,
    Text,
    Image,
    TableStart,
    TableEnd,
    ColumnStart,
    ColumnEnd,
    RowStart,
    RowEnd,
    Cell,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::DocumentStart,
        EntityKind::DocumentEnd,
        EntityKind::PageStart,
        EntityKind::PageEnd,
        EntityKind::Text,
        EntityKind::Image,
        EntityKind::TableStart,
        EntityKind::TableEnd,
        EntityKind::ColumnStart,
        EntityKind::ColumnEnd,
        EntityKind::RowStart,
        EntityKind::RowEnd,
        EntityKind::Cell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::DocumentStart => "document-start",
            EntityKind::DocumentEnd => "document-end",
            EntityKind::PageStart => "page-start",
            EntityKind::PageEnd => "page-end",
            EntityKind::Text => "text",
            EntityKind::Image => "image",
            EntityKind::TableStart => "table-start",
            EntityKind::TableEnd => "table-end",
            EntityKind::ColumnStart => "column-start",
            EntityKind::ColumnEnd => "column-end",
            EntityKind::RowStart => "row-start",
            EntityKind::RowEnd => "row-end",
            EntityKind::Cell => "cell",
        }
    }
}

/// Where a table entity sits in the rendered grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "is_single")]
    pub col_span: usize,
    #[serde(skip_serializing_if = "is_single")]
    pub row_span: usize,
}

fn is_single(span: &usize) -> bool {
    *span == 1
}

impl Coordinates {
    pub fn row(row: usize) -> Self {
        Self {
            row: Some(row),
            column: None,
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn column(column: usize) -> Self {
        Self {
            row: None,
            column: Some(column),
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn cell(row: usize, column: usize) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn with_span(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span.max(1);
        self.row_span = row_span.max(1);
        self
    }
}

/// The resolved, render-time projection of a model, row, column or cell.
///
/// Attributes are already merged for the entity's coordinates. Entities are created
/// fresh for each dispatch and are never mutated by operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableEntity {
    pub kind: EntityKind,
    pub model: ModelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "AttributeSet::is_empty")]
    pub attributes: AttributeSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Rect>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub clipped: bool,
    /// Resolved cells of a row, carried by `RowEnd`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<RenderableEntity>,
}

impl RenderableEntity {
    pub fn new(kind: EntityKind, model: ModelId) -> Self {
        Self {
            kind,
            model,
            name: None,
            attributes: AttributeSet::new(),
            value: None,
            coordinates: None,
            page: None,
            bbox: None,
            clipped: false,
            cells: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_value(mut self, value: Option<CellValue>) -> Self {
        self.value = value;
        self
    }

    pub fn at(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_bbox(mut self, bbox: Rect) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_clipped(mut self, clipped: bool) -> Self {
        self.clipped = clipped;
        self
    }

    pub fn with_cells(mut self, cells: Vec<RenderableEntity>) -> Self {
        self.cells = cells;
        self
    }

    /// Key under which backends memoize values derived from this entity's attributes.
    pub fn cache_key(&self) -> u64 {
        self.attributes.cache_key()
    }

    /// The value as plain text, or an empty string for entities without a value.
    pub fn text(&self) -> String {
        self.value.as_ref().map(CellValue::to_text).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabulate_style::Background;
    use tabulate_types::Color;

    #[test]
    fn test_entity_serializes_only_present_fields() {
        let entity = RenderableEntity::new(EntityKind::Cell, ModelId::new(4))
            .with_value(Some(CellValue::from("Alpha")))
            .at(Coordinates::cell(1, 0));

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            json!({
                "kind": "cell",
                "model": 4,
                "value": { "value": "Alpha", "cellType": "string" },
                "coordinates": { "row": 1, "column": 0 }
            })
        );
    }

    #[test]
    fn test_cache_key_follows_attributes() {
        let plain = RenderableEntity::new(EntityKind::Cell, ModelId::new(1));
        let styled = RenderableEntity::new(EntityKind::Cell, ModelId::new(2))
            .with_attributes(AttributeSet::new().with(Background::color(Color::RED)));
        let styled_again = RenderableEntity::new(EntityKind::Cell, ModelId::new(3))
            .with_attributes(AttributeSet::new().with(Background::color(Color::RED)));

        assert_ne!(plain.cache_key(), styled.cache_key());
        assert_eq!(styled.cache_key(), styled_again.cache_key());
    }

    #[test]
    fn test_span_is_never_zero() {
        let coords = Coordinates::cell(0, 0).with_span(0, 3);
        assert_eq!(coords.col_span, 1);
        assert_eq!(coords.row_span, 3);
    }
}
