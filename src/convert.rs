//! Exporting a plain array of JSON records as a single table.

use crate::backends::csv::{self, CsvBackend, CsvOptions};
use serde_json::Value;
use std::io::Write;
use tabulate_core::{
    BuildContext, ColumnBuilder, DataSources, DocumentBuilder, ExportError, Exporter, Model,
    TableBuilder,
};
use tabulate_source::VecDataSource;

/// Parses `json` as an array of records.
pub fn parse_records(json: &str) -> Result<Vec<Value>, ExportError> {
    match serde_json::from_str(json)? {
        Value::Array(records) => Ok(records),
        other => Err(ExportError::Config(format!(
            "Expected a JSON array of records, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Field names of the first record, in document order.
pub fn columns_of(records: &[Value]) -> Result<Vec<String>, ExportError> {
    match records.first() {
        Some(Value::Object(fields)) => Ok(fields.keys().cloned().collect()),
        Some(other) => Err(ExportError::Config(format!(
            "Records must be objects, the first one is {}",
            type_name(other)
        ))),
        None => Err(ExportError::Config("There are no records to export".to_string())),
    }
}

/// A document holding one table with a column per field of the first record and a
/// header row naming them.
///
/// Fields are read by exact key, so keys containing dots are not treated as paths.
pub fn records_document(records: &[Value]) -> Result<Model, ExportError> {
    let columns = columns_of(records)?;
    let table = columns
        .iter()
        .fold(TableBuilder::new().with_name("records"), |table, key| {
            let field = key.clone();
            table.with_column(
                ColumnBuilder::new()
                    .with_id(key.clone())
                    .with_accessor(move |record| {
                        record.get(&field).filter(|v| !v.is_null()).cloned()
                    }),
            )
        })
        .with_header(columns);

    DocumentBuilder::new()
        .with_child(table)
        .build(&mut BuildContext::new())
}

/// Writes `records` to `output` as CSV, header line first.
pub fn export_csv(
    records: Vec<Value>,
    output: Box<dyn Write>,
    options: CsvOptions,
) -> Result<(), ExportError> {
    let document = records_document(&records)?;
    log::debug!("Exporting {} record(s) as CSV", records.len());
    let exporter = Exporter::builder()
        .with_backend(csv::FORMAT, CsvBackend::with_options(options).factory())
        // Sheets have no page limit.
        .with_max_pages(usize::MAX)
        .build()?;
    exporter.export(
        &document,
        DataSources::single(VecDataSource::new(records)),
        output,
    )
}
