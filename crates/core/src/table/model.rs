use crate::table::index::{RowIndexDef, SourceRow};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tabulate_source::lookup;
use tabulate_style::AttributeSet;
use tabulate_types::{CellType, ModelId};

/// Reads a column value off a record.
#[derive(Clone)]
pub enum Accessor {
    /// Dotted path or JSON pointer into the record.
    Path(String),
    Function(Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>),
}

impl Accessor {
    /// `None` when the record has no such value. That is never an error.
    pub fn read(&self, record: &Value) -> Option<Value> {
        match self {
            Accessor::Path(path) => lookup(record, path).filter(|v| !v.is_null()).cloned(),
            Accessor::Function(f) => f(record),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub id: String,
    pub position: usize,
    pub accessor: Option<Accessor>,
    pub attributes: AttributeSet,
}

pub type RowPredicate = Arc<dyn Fn(&SourceRow<'_>) -> bool + Send + Sync>;

pub type CellExpression = Arc<dyn Fn(&SourceRow<'_>) -> Option<Value> + Send + Sync>;

/// Which requested rows a row definition applies to.
#[derive(Clone)]
pub enum RowQualifier {
    /// Inserted at these positions without consuming the data source.
    At(BTreeSet<RowIndexDef>),
    /// Applied to every row the predicate accepts.
    Matching(RowPredicate),
}

impl fmt::Debug for RowQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowQualifier::At(indices) => f.debug_tuple("At").field(indices).finish(),
            RowQualifier::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

#[derive(Clone)]
pub enum CellSource {
    Literal(Value),
    Computed(CellExpression),
}

impl CellSource {
    pub fn evaluate(&self, row: &SourceRow<'_>) -> Option<Value> {
        match self {
            CellSource::Literal(value) => Some(value.clone()),
            CellSource::Computed(expression) => expression(row),
        }
    }
}

impl fmt::Debug for CellSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellSource::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            CellSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An explicit per-column override within a row definition.
#[derive(Debug, Clone, Default)]
pub struct CellDef {
    pub value: Option<CellSource>,
    pub cell_type: Option<CellType>,
    pub col_span: Option<usize>,
    pub row_span: Option<usize>,
    pub attributes: AttributeSet,
}

impl CellDef {
    /// Field-wise merge; whatever `other` sets wins.
    pub fn merged_with(&self, other: &CellDef) -> CellDef {
        CellDef {
            value: other.value.clone().or_else(|| self.value.clone()),
            cell_type: other.cell_type.or(self.cell_type),
            col_span: other.col_span.or(self.col_span),
            row_span: other.row_span.or(self.row_span),
            attributes: self.attributes.merged_with(&other.attributes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowDef {
    pub qualifier: RowQualifier,
    /// Applied to the row's start and end entities.
    pub attributes: AttributeSet,
    /// Applied to every cell of the row.
    pub cell_attributes: AttributeSet,
    /// Keyed by column position.
    pub cells: BTreeMap<usize, CellDef>,
}

impl RowDef {
    pub fn matches(&self, row: &SourceRow<'_>) -> bool {
        match &self.qualifier {
            RowQualifier::At(_) => false,
            RowQualifier::Matching(predicate) => predicate(row),
        }
    }

    pub fn positions(&self) -> Option<&BTreeSet<RowIndexDef>> {
        match &self.qualifier {
            RowQualifier::At(indices) => Some(indices),
            RowQualifier::Matching(_) => None,
        }
    }
}

/// Payload of a table model: columns in render order plus declared rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: ModelId,
    pub columns: Vec<Column>,
    pub rows: Vec<RowDef>,
    /// Named data source; the export's default source when absent.
    pub source: Option<String>,
}

impl Table {
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabulate_style::{Background, FillPattern};
    use tabulate_types::Color;

    #[test]
    fn test_path_accessor_treats_null_as_missing() {
        let record = json!({"code": "a", "meta": {"tag": null}});
        assert_eq!(Accessor::Path("code".into()).read(&record), Some(json!("a")));
        assert_eq!(Accessor::Path("meta.tag".into()).read(&record), None);
        assert_eq!(Accessor::Path("nope".into()).read(&record), None);
    }

    #[test]
    fn test_cell_def_merge_is_field_wise() {
        let coarse = CellDef {
            value: Some(CellSource::Literal(json!("x"))),
            col_span: Some(2),
            attributes: AttributeSet::new()
                .with(Background::color(Color::BLACK).with_fill(FillPattern::Solid)),
            ..CellDef::default()
        };
        let fine = CellDef {
            cell_type: Some(CellType::String),
            attributes: AttributeSet::new().with(Background::color(Color::WHITE)),
            ..CellDef::default()
        };

        let merged = coarse.merged_with(&fine);
        assert!(matches!(merged.value, Some(CellSource::Literal(ref v)) if v == "x"));
        assert_eq!(merged.col_span, Some(2));
        assert_eq!(merged.cell_type, Some(CellType::String));
        let background = merged.attributes.get_as::<Background>().unwrap();
        assert_eq!(background.color, Some(Color::WHITE));
        assert_eq!(background.fill, Some(FillPattern::Solid));
    }
}
