use crate::table::index::{RowIndex, RowIndexDef, SourceRow};
use crate::table::model::{CellDef, Table};
use itertools::Itertools;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound::{Excluded, Unbounded};
use tabulate_source::DataSource;
use tabulate_style::{AttributeConstraints, AttributeSet, RowHeight};
use tabulate_types::{CellValue, ModelKind};

/// One cell of a resolved row, with its attributes merged for its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCell {
    pub column: usize,
    pub value: CellValue,
    pub attributes: AttributeSet,
    pub col_span: usize,
    pub row_span: usize,
}

/// A fully attributed row, ready to be laid out and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    pub index: RowIndex,
    /// Position of the backing record in the data source, if the row has one.
    pub ordinal: Option<usize>,
    pub attributes: AttributeSet,
    pub cells: Vec<ResolvedCell>,
}

impl ResolvedRow {
    pub fn cell(&self, column: usize) -> Option<&ResolvedCell> {
        self.cells.iter().find(|c| c.column == column)
    }

    /// Cell values as text, in column order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.value.to_text()).collect()
    }

    pub fn declared_height(&self) -> Option<f32> {
        self.attributes.get_as::<RowHeight>().map(|h| h.height)
    }
}

/// Merged declared rows, cached per set of matching definitions.
#[derive(Debug)]
struct SyntheticRow {
    row_attributes: AttributeSet,
    cells: BTreeMap<usize, CellDef>,
    cell_attributes: Vec<AttributeSet>,
}

/// Table and column attributes projected once onto rows and cells.
#[derive(Debug)]
struct BaseAttributes {
    constraints: AttributeConstraints,
    row: AttributeSet,
    cells: Vec<AttributeSet>,
}

impl SyntheticRow {
    fn new(table: &Table, definitions: &[usize], base: &BaseAttributes) -> Self {
        let rows = definitions.iter().map(|&i| &table.rows[i]);

        let row_attributes = AttributeSet::merge(
            std::iter::once(Some(&base.row)).chain(rows.clone().map(|r| Some(&r.attributes))),
        )
        .for_target(ModelKind::Row, &base.constraints);

        let row_cell_attributes = AttributeSet::merge(rows.clone().map(|r| Some(&r.cell_attributes)));

        let mut cells: BTreeMap<usize, CellDef> = BTreeMap::new();
        for row in rows {
            for (column, def) in &row.cells {
                let merged = match cells.get(column) {
                    Some(existing) => existing.merged_with(def),
                    None => def.clone(),
                };
                cells.insert(*column, merged);
            }
        }

        let cell_attributes = base
            .cells
            .iter()
            .enumerate()
            .map(|(column, column_level)| {
                AttributeSet::merge([
                    Some(column_level),
                    Some(&row_cell_attributes),
                    cells.get(&column).map(|def| &def.attributes),
                ])
                .for_target(ModelKind::Cell, &base.constraints)
            })
            .collect();

        Self {
            row_attributes,
            cells,
            cell_attributes,
        }
    }
}

/// Grid positions hidden by a spanning cell.
#[derive(Debug, Default, Clone)]
pub(crate) struct SpanTracker {
    covered: BTreeMap<usize, BTreeSet<usize>>,
}

impl SpanTracker {
    fn register(&mut self, row: usize, column: usize, col_span: usize, row_span: usize) {
        for r in row..row + row_span {
            for c in column..column + col_span {
                if (r, c) != (row, column) {
                    self.covered.entry(r).or_default().insert(c);
                }
            }
        }
    }

    fn is_covered(&self, row: usize, column: usize) -> bool {
        self.covered.get(&row).is_some_and(|cols| cols.contains(&column))
    }

    /// Forgets rows before `row`; they can no longer be requested.
    fn prune(&mut self, row: usize) {
        self.covered = self.covered.split_off(&row);
    }
}

/// Reconciles a table's declared rows with its data source, one requested index at a time.
///
/// Stateful and sequential: it owns the forward progress through the source and must be
/// called with increasing indices.
#[derive(Debug)]
pub struct TableResolver {
    positional: BTreeMap<RowIndexDef, Vec<usize>>,
    predicated: Vec<usize>,
    base: BaseAttributes,
    synthetic: HashMap<Vec<usize>, SyntheticRow>,
    next_ordinal: usize,
    spans: SpanTracker,
}

impl TableResolver {
    pub fn new(table: &Table, table_attributes: &AttributeSet, constraints: &AttributeConstraints) -> Self {
        let mut positional: BTreeMap<RowIndexDef, Vec<usize>> = BTreeMap::new();
        let mut predicated = Vec::new();
        for (i, row) in table.rows.iter().enumerate() {
            match row.positions() {
                Some(indices) => {
                    for index in indices {
                        positional.entry(*index).or_default().push(i);
                    }
                }
                None => predicated.push(i),
            }
        }

        let table_cells = table_attributes.for_target(ModelKind::Cell, constraints);
        let base = BaseAttributes {
            constraints: constraints.clone(),
            row: table_attributes.for_target(ModelKind::Row, constraints),
            cells: table
                .columns
                .iter()
                .map(|column| {
                    table_cells.merged_with(&column.attributes.for_target(ModelKind::Cell, constraints))
                })
                .collect(),
        };

        Self {
            positional,
            predicated,
            base,
            synthetic: HashMap::new(),
            next_ordinal: 0,
            spans: SpanTracker::default(),
        }
    }

    /// Number of records consumed so far.
    pub fn consumed(&self) -> usize {
        self.next_ordinal
    }

    /// Produces the row for `requested`, or `None` when no rows remain.
    ///
    /// A declared row at exactly `requested` is materialized without touching the source.
    /// Otherwise the next record is pulled. With the source exhausted, the index fast-forwards
    /// to the next declared row, so the returned row's index may be greater than `requested`.
    pub fn resolve(
        &mut self,
        table: &Table,
        requested: RowIndex,
        source: &mut dyn DataSource,
    ) -> Option<ResolvedRow> {
        if self.positional.contains_key(&requested.def()) {
            return Some(self.materialize(table, requested, None));
        }

        if let Some(record) = source.next() {
            let ordinal = self.next_ordinal;
            self.next_ordinal += 1;
            return Some(self.materialize(table, requested, Some((record, ordinal))));
        }

        let next = self
            .positional
            .range((Excluded(requested.def()), Unbounded))
            .next()
            .map(|(def, _)| *def)?;
        let index = requested.advance_to(next);
        log::debug!(
            "Table {}: source exhausted at row {}, fast-forwarding to declared row {} (absolute {})",
            table.id,
            requested.value,
            next,
            index.value
        );
        Some(self.materialize(table, index, None))
    }

    fn materialize(
        &mut self,
        table: &Table,
        index: RowIndex,
        record: Option<(Value, usize)>,
    ) -> ResolvedRow {
        let (record, ordinal) = match &record {
            Some((value, ordinal)) => (Some(value), Some(*ordinal)),
            None => (None, None),
        };
        let source_row = SourceRow::new(index, record, ordinal);

        let matched: Vec<usize> = self
            .positional
            .get(&index.def())
            .into_iter()
            .flatten()
            .copied()
            .chain(
                self.predicated
                    .iter()
                    .copied()
                    .filter(|&i| table.rows[i].matches(&source_row)),
            )
            .sorted()
            .dedup()
            .collect();

        let Self {
            synthetic,
            base,
            spans,
            ..
        } = self;
        let row = synthetic.entry(matched).or_insert_with_key(|definitions| {
            log::trace!("Table {}: caching synthetic row for definitions {:?}", table.id, definitions);
            SyntheticRow::new(table, definitions, base)
        });

        spans.prune(index.value);
        let mut cells = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let position = column.position;
            if spans.is_covered(index.value, position) {
                continue;
            }
            let def = row.cells.get(&position);
            let explicit = def
                .and_then(|d| d.value.as_ref())
                .and_then(|source| source.evaluate(&source_row));
            let value = explicit.or_else(|| {
                record.zip(column.accessor.as_ref())
                    .and_then(|(record, accessor)| accessor.read(record))
            });
            let Some(value) = value else {
                continue;
            };

            let col_span = def.and_then(|d| d.col_span).unwrap_or(1).max(1);
            let row_span = def.and_then(|d| d.row_span).unwrap_or(1).max(1);
            if col_span > 1 || row_span > 1 {
                spans.register(index.value, position, col_span, row_span);
            }
            cells.push(ResolvedCell {
                column: position,
                value: CellValue::new(value, def.and_then(|d| d.cell_type)),
                attributes: row.cell_attributes.get(position).cloned().unwrap_or_default(),
                col_span,
                row_span,
            });
        }

        ResolvedRow {
            index,
            ordinal,
            attributes: row.row_attributes.clone(),
            cells,
        }
    }
}
