//! Builders for tables, their columns, rows and cells.

use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::builder::{Attributed, impl_model_builder};
use crate::model::{Model, ModelHeader, Node};
use crate::table::index::{RowIndexDef, SourceRow};
use crate::table::model::{
    Accessor, CellDef, CellSource, Column, RowDef, RowPredicate, RowQualifier, Table,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Range;
use std::sync::Arc;
use tabulate_style::{Attribute, AttributeSet};
use tabulate_types::{CellType, ModelKind};

/// Fails unless at least one of `kinds` allows each attribute in `attributes`.
fn check_any(
    ctx: &BuildContext,
    kinds: &[ModelKind],
    attributes: &AttributeSet,
) -> Result<(), ExportError> {
    for attribute in attributes.kinds() {
        let allowed = kinds
            .iter()
            .any(|kind| ctx.constraints().is_allowed(*kind, attribute));
        if !allowed {
            ctx.constraints().check(kinds[0], attribute)?;
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct TableBuilder {
    name: Option<String>,
    attributes: AttributeSet,
    columns: Vec<ColumnBuilder>,
    rows: Vec<RowBuilder>,
    source: Option<String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_column(mut self, column: ColumnBuilder) -> Self {
        self.columns.push(column);
        self
    }

    /// Shorthand for a column reading the field at `path`.
    pub fn with_field(self, path: impl Into<String>) -> Self {
        self.with_column(ColumnBuilder::new().with_path(path))
    }

    pub fn with_row(mut self, row: RowBuilder) -> Self {
        self.rows.push(row);
        self
    }

    /// A header row at index 0 with one literal cell per label, in column order.
    pub fn with_header<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = labels
            .into_iter()
            .enumerate()
            .fold(RowBuilder::at(0), |row, (position, label)| {
                let label: String = label.into();
                row.with_cell(position, CellBuilder::new().with_value(label))
            });
        self.with_row(row)
    }

    /// Reads records from the named source of the export call instead of the default one.
    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        // Table attributes cascade to columns, rows and cells.
        check_any(
            ctx,
            &[ModelKind::Table, ModelKind::Column, ModelKind::Row, ModelKind::Cell],
            &self.attributes,
        )?;
        let id = ctx.next_id();
        let name = ctx.name(ModelKind::Table, id, self.name.as_deref());

        let mut declared = self
            .columns
            .into_iter()
            .enumerate()
            .map(|(position, column)| column.build(ctx).map(|c| (position, c)))
            .collect::<Result<Vec<_>, _>>()?;
        // An explicit index wins a tie with a declaration position.
        declared.sort_by_key(|(position, (index, _))| (index.unwrap_or(*position), index.is_none()));

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(declared.len());
        for (position, (_, (_, mut column))) in declared.into_iter().enumerate() {
            if !seen.insert(column.id.clone()) {
                return Err(ExportError::Config(format!(
                    "Table '{}' declares column '{}' twice",
                    name, column.id
                )));
            }
            column.position = position;
            columns.push(column);
        }

        let rows = self
            .rows
            .into_iter()
            .map(|row| row.build(ctx, &columns))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Built table '{}' with {} column(s) and {} row definition(s)",
            name,
            columns.len(),
            rows.len()
        );
        Ok(Model {
            header: ModelHeader {
                id,
                kind: ModelKind::Table,
                name,
                attributes: self.attributes,
            },
            node: Node::Table(Table {
                id,
                columns,
                rows,
                source: self.source,
            }),
        })
    }
}

#[derive(Default)]
pub struct ColumnBuilder {
    id: Option<String>,
    accessor: Option<Accessor>,
    index: Option<usize>,
    attributes: AttributeSet,
}

impl ColumnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Reads the record field at `path`. The column id defaults to the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Path(path.into()));
        self
    }

    pub fn with_accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::Function(Arc::new(f)));
        self
    }

    /// Explicit render position; columns without one keep their declaration order.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    fn build(self, ctx: &BuildContext) -> Result<(Option<usize>, Column), ExportError> {
        check_any(ctx, &[ModelKind::Column, ModelKind::Cell], &self.attributes)?;
        let id = match (self.id, &self.accessor) {
            (Some(id), _) => id,
            (None, Some(Accessor::Path(path))) => path.clone(),
            (None, _) => return Err(ExportError::missing("ColumnBuilder", "id")),
        };
        Ok((
            self.index,
            Column {
                id,
                position: 0,
                accessor: self.accessor,
                attributes: self.attributes,
            },
        ))
    }
}

/// A column addressed by id or by render position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Id(String),
    Position(usize),
}

impl From<&str> for ColumnRef {
    fn from(id: &str) -> Self {
        ColumnRef::Id(id.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(id: String) -> Self {
        ColumnRef::Id(id)
    }
}

impl From<usize> for ColumnRef {
    fn from(position: usize) -> Self {
        ColumnRef::Position(position)
    }
}

pub struct RowBuilder {
    qualifier: RowQualifier,
    attributes: AttributeSet,
    cell_attributes: AttributeSet,
    cells: Vec<(ColumnRef, CellBuilder)>,
}

impl RowBuilder {
    fn with_qualifier(qualifier: RowQualifier) -> Self {
        Self {
            qualifier,
            attributes: AttributeSet::new(),
            cell_attributes: AttributeSet::new(),
            cells: Vec::new(),
        }
    }

    /// A custom row inserted at absolute index `index`.
    pub fn at(index: usize) -> Self {
        Self::at_all([index])
    }

    pub fn at_all<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        Self::at_defs(indices.into_iter().map(RowIndexDef::at))
    }

    pub fn range(indices: Range<usize>) -> Self {
        Self::at_all(indices)
    }

    /// A custom row `offset` rows after the last record of the data source.
    pub fn trailing(offset: usize) -> Self {
        Self::at_defs([RowIndexDef::trailing(offset)])
    }

    pub fn at_defs<I: IntoIterator<Item = RowIndexDef>>(defs: I) -> Self {
        Self::with_qualifier(RowQualifier::At(defs.into_iter().collect::<BTreeSet<_>>()))
    }

    /// Applies to every row the predicate accepts.
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&SourceRow<'_>) -> bool + Send + Sync + 'static,
    {
        let predicate: RowPredicate = Arc::new(predicate);
        Self::with_qualifier(RowQualifier::Matching(predicate))
    }

    /// Applied to every cell of the row.
    pub fn with_cell_attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.cell_attributes.insert(attribute);
        self
    }

    pub fn with_cell(mut self, column: impl Into<ColumnRef>, cell: CellBuilder) -> Self {
        self.cells.push((column.into(), cell));
        self
    }

    fn build(self, ctx: &BuildContext, columns: &[Column]) -> Result<RowDef, ExportError> {
        ctx.check(ModelKind::Row, &self.attributes)?;
        ctx.check(ModelKind::Cell, &self.cell_attributes)?;

        let mut cells = BTreeMap::new();
        for (reference, cell) in self.cells {
            let position = match &reference {
                ColumnRef::Id(id) => columns.iter().position(|c| &c.id == id),
                ColumnRef::Position(position) => Some(*position).filter(|p| *p < columns.len()),
            }
            .ok_or_else(|| ExportError::Config(format!("Row refers to unknown column {:?}", reference)))?;
            let def = cell.build(ctx)?;
            let merged = match cells.remove(&position) {
                Some(existing) => CellDef::merged_with(&existing, &def),
                None => def,
            };
            cells.insert(position, merged);
        }

        Ok(RowDef {
            qualifier: self.qualifier,
            attributes: self.attributes,
            cell_attributes: self.cell_attributes,
            cells,
        })
    }
}

#[derive(Default)]
pub struct CellBuilder {
    value: Option<CellSource>,
    cell_type: Option<CellType>,
    col_span: Option<usize>,
    row_span: Option<usize>,
    attributes: AttributeSet,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(CellSource::Literal(value.into()));
        self
    }

    /// A value computed from the row being resolved.
    pub fn with_expression<F>(mut self, f: F) -> Self
    where
        F: Fn(&SourceRow<'_>) -> Option<Value> + Send + Sync + 'static,
    {
        self.value = Some(CellSource::Computed(Arc::new(f)));
        self
    }

    pub fn with_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    pub fn with_col_span(mut self, span: usize) -> Self {
        self.col_span = Some(span);
        self
    }

    pub fn with_row_span(mut self, span: usize) -> Self {
        self.row_span = Some(span);
        self
    }

    fn build(self, ctx: &BuildContext) -> Result<CellDef, ExportError> {
        ctx.check(ModelKind::Cell, &self.attributes)?;
        if self.col_span == Some(0) || self.row_span == Some(0) {
            return Err(ExportError::Config("Cell spans must be at least 1".to_string()));
        }
        Ok(CellDef {
            value: self.value,
            cell_type: self.cell_type,
            col_span: self.col_span,
            row_span: self.row_span,
            attributes: self.attributes,
        })
    }
}

macro_rules! impl_attributed {
    ($($name:ty),*) => {
        $(
            impl Attributed for $name {
                fn attributes_mut(&mut self) -> &mut AttributeSet {
                    &mut self.attributes
                }
            }
        )*
    };
}

impl_attributed!(ColumnBuilder, RowBuilder, CellBuilder);
impl_model_builder!(TableBuilder);

