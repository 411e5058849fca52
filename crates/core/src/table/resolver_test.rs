use super::*;
use crate::build::BuildContext;
use crate::model::{Attributed, Model};
use crate::test_utils::init_logger;
use serde_json::{Value, json};
use tabulate_source::VecDataSource;
use tabulate_style::{AttributeConstraints, Background, FillPattern, RowHeight};
use tabulate_types::{CellType, Color};

fn build(builder: TableBuilder) -> Model {
    builder.build(&mut BuildContext::new()).unwrap()
}

/// Resolves every row of the table, requesting indices the way the exporter does.
fn resolve_all(model: &Model, records: Vec<Value>) -> Vec<ResolvedRow> {
    let table = model.as_table().unwrap();
    let mut resolver = TableResolver::new(table, model.attributes(), AttributeConstraints::standard());
    let mut source = VecDataSource::new(records);
    let mut rows = Vec::new();
    let mut next = RowIndex::default();
    while let Some(row) = resolver.resolve(table, next, &mut source) {
        next = row.index.next();
        rows.push(row);
        assert!(rows.len() < 100, "resolution does not terminate");
    }
    rows
}

fn products() -> Vec<Value> {
    vec![
        json!({"code": "a", "name": "Alpha"}),
        json!({"code": "b", "name": "Beta"}),
    ]
}

#[test]
fn test_header_row_then_records() {
    init_logger();
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_field("name")
            .with_header(["Code", "Name"]),
    );

    let rows = resolve_all(&model, products());
    let texts: Vec<Vec<String>> = rows.iter().map(ResolvedRow::texts).collect();
    assert_eq!(texts, vec![vec!["Code", "Name"], vec!["a", "Alpha"], vec!["b", "Beta"]]);

    let indices: Vec<usize> = rows.iter().map(|r| r.index.value).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let ordinals: Vec<Option<usize>> = rows.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals, vec![None, Some(0), Some(1)]);
}

#[test]
fn test_sparse_declared_row_fast_forwards() {
    init_logger();
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_row(RowBuilder::at(10).with_cell("code", CellBuilder::new().with_value("total"))),
    );

    let rows = resolve_all(&model, Vec::new());
    assert_eq!(rows.len(), 1, "rows 0..9 must not be materialized");
    assert_eq!(rows[0].index.value, 10);
    assert_eq!(rows[0].texts(), vec!["total"]);
}

#[test]
fn test_records_fill_rows_before_a_sparse_declared_row() {
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_row(RowBuilder::at(5).with_cell("code", CellBuilder::new().with_value("five"))),
    );

    let rows = resolve_all(&model, products());
    let indices: Vec<usize> = rows.iter().map(|r| r.index.value).collect();
    assert_eq!(indices, vec![0, 1, 5]);
    assert_eq!(rows[2].texts(), vec!["five"]);
}

#[test]
fn test_literal_cell_wins_over_accessor() {
    let with_literal = build(
        TableBuilder::new()
            .with_field("code")
            .with_field("name")
            .with_row(
                RowBuilder::matching(|row| row.ordinal == Some(0))
                    .with_cell("name", CellBuilder::new().with_value("override")),
            ),
    );
    let rows = resolve_all(&with_literal, products());
    assert_eq!(rows[0].texts(), vec!["a", "override"]);
    assert_eq!(rows[1].texts(), vec!["b", "Beta"]);

    let without_literal = build(
        TableBuilder::new()
            .with_field("code")
            .with_field("name")
            .with_row(RowBuilder::matching(|row| row.ordinal == Some(0)).with_cell("name", CellBuilder::new())),
    );
    let rows = resolve_all(&without_literal, products());
    assert_eq!(rows[0].texts(), vec!["a", "Alpha"]);
}

#[test]
fn test_computed_cells_see_the_source_row() {
    let model = build(
        TableBuilder::new()
            .with_column(ColumnBuilder::new().with_id("label").with_accessor(|r| r.get("code").cloned()))
            .with_column(ColumnBuilder::new().with_id("row"))
            .with_row(RowBuilder::matching(|row| row.has_record()).with_cell(
                "row",
                CellBuilder::new()
                    .with_expression(|row| Some(json!(format!("#{}", row.row_index()))))
                    .with_type(CellType::String),
            )),
    );

    let rows = resolve_all(&model, products());
    assert_eq!(rows[0].texts(), vec!["a", "#0"]);
    assert_eq!(rows[1].texts(), vec!["b", "#1"]);
    assert_eq!(rows[1].cell(1).unwrap().value.cell_type, Some(CellType::String));
}

#[test]
fn test_missing_field_omits_the_cell() {
    let model = build(TableBuilder::new().with_field("code").with_field("name"));
    let rows = resolve_all(&model, vec![json!({"code": "a"}), json!({"code": "b", "name": null})]);

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.cells.len(), 1, "only the code cell resolves for {:?}", row.index);
        assert!(row.cell(1).is_none());
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_field("name")
            .with_header(["Code", "Name"])
            .with_row(RowBuilder::matching(|row| row.row_index() % 2 == 0).with_background(Color::gray(230)))
            .with_row(RowBuilder::trailing(0).with_cell(0usize, CellBuilder::new().with_value("end"))),
    );

    let first = resolve_all(&model, products());
    let second = resolve_all(&model, products());
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_trailing_row_follows_the_data() {
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_row(RowBuilder::trailing(0).with_cell("code", CellBuilder::new().with_value("Total"))),
    );

    let rows = resolve_all(&model, products());
    assert_eq!(rows.len(), 3);
    let footer = &rows[2];
    assert_eq!(footer.index.value, 2);
    assert_eq!(footer.index.step, Step::Trailing);
    assert_eq!(footer.texts(), vec!["Total"]);
    assert_eq!(footer.ordinal, None);
}

#[test]
fn test_spans_hide_covered_cells() {
    let model = build(
        TableBuilder::new()
            .with_field("a")
            .with_field("b")
            .with_field("c")
            .with_row(RowBuilder::at(0).with_cell("a", CellBuilder::new().with_value("Title").with_col_span(2)))
            .with_row(
                RowBuilder::matching(|row| row.ordinal == Some(0))
                    .with_cell("a", CellBuilder::new().with_row_span(2)),
            ),
    );
    let records = vec![json!({"a": 1, "b": 2, "c": 3}), json!({"a": 4, "b": 5, "c": 6})];

    let rows = resolve_all(&model, records);
    let columns = |row: &ResolvedRow| row.cells.iter().map(|c| c.column).collect::<Vec<_>>();

    assert_eq!(columns(&rows[0]), vec![0], "b is covered and c has no value");
    assert_eq!(rows[0].cells[0].col_span, 2);
    assert_eq!(columns(&rows[1]), vec![0, 1, 2]);
    assert_eq!(rows[1].cells[0].row_span, 2);
    assert_eq!(columns(&rows[2]), vec![1, 2], "a is covered by the row span above");
}

#[test]
fn test_column_background_overrides_only_the_fields_it_sets() {
    let model = build(
        TableBuilder::new()
            .with_attribute(Background::color(Color::BLACK).with_fill(FillPattern::Striped))
            .with_column(ColumnBuilder::new().with_path("code").with_background(Color::WHITE))
            .with_field("name"),
    );

    let rows = resolve_all(&model, products());
    let code = rows[0].cell(0).unwrap().attributes.get_as::<Background>().unwrap();
    assert_eq!(code, &Background::color(Color::WHITE).with_fill(FillPattern::Striped));
    let name = rows[0].cell(1).unwrap().attributes.get_as::<Background>().unwrap();
    assert_eq!(name, &Background::color(Color::BLACK).with_fill(FillPattern::Striped));
}

#[test]
fn test_cell_attribute_levels_merge_coarse_to_fine() {
    let model = build(
        TableBuilder::new()
            .with_attribute(Background::color(Color::BLACK).with_fill(FillPattern::Dotted))
            .with_field("code")
            .with_field("name")
            .with_row(RowBuilder::matching(|_| true).with_cell_attribute(Background::color(Color::RED)))
            .with_row(
                RowBuilder::matching(|row| row.ordinal == Some(1))
                    .with_cell("name", CellBuilder::new().with_background(Color::BLUE)),
            ),
    );

    let rows = resolve_all(&model, products());
    let background = |row: &ResolvedRow, column: usize| {
        cell_background(row, column).expect("cell has a background")
    };
    assert_eq!(background(&rows[0], 0).color, Some(Color::RED));
    assert_eq!(background(&rows[0], 1).color, Some(Color::RED));
    assert_eq!(background(&rows[1], 1).color, Some(Color::BLUE));
    assert_eq!(background(&rows[1], 1).fill, Some(FillPattern::Dotted));
}

fn cell_background(row: &ResolvedRow, column: usize) -> Option<Background> {
    row.cell(column)?.attributes.get_as::<Background>().cloned()
}

#[test]
fn test_row_attributes_stay_off_cells() {
    let model = build(
        TableBuilder::new()
            .with_attribute(RowHeight::new(20.0))
            .with_field("code")
            .with_row(RowBuilder::at(0).with_attribute(RowHeight::new(30.0)).with_cell(0usize, CellBuilder::new().with_value("Code"))),
    );

    let rows = resolve_all(&model, products());
    assert_eq!(rows[0].declared_height(), Some(30.0));
    assert_eq!(rows[1].declared_height(), Some(20.0));
    assert!(rows[1].cell(0).unwrap().attributes.get_as::<RowHeight>().is_none());
}

#[test]
fn test_unknown_column_reference_is_a_configuration_error() {
    let result = TableBuilder::new()
        .with_field("code")
        .with_row(RowBuilder::at(0).with_cell("nope", CellBuilder::new().with_value("x")))
        .build(&mut BuildContext::new());
    assert!(matches!(result, Err(crate::error::ExportError::Config(_))));
}

#[test]
fn test_explicit_column_index_reorders_columns() {
    let model = build(
        TableBuilder::new()
            .with_field("code")
            .with_column(ColumnBuilder::new().with_path("name").with_index(0)),
    );
    let table = model.as_table().unwrap();
    let ids: Vec<&str> = table.columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["name", "code"]);

    let rows = resolve_all(&model, products());
    assert_eq!(rows[0].texts(), vec!["Alpha", "a"]);
}
