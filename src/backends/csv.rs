//! Delimited-text output: one line per rendered table row.
//!
//! Only rows are written. Pages, texts and images have no CSV form and are ignored;
//! consecutive tables are separated by an empty line.

use itertools::Itertools;
use std::borrow::Cow;
use std::io::{BufWriter, Write};
use tabulate_render_core::{
    Backend, BackendProvider, DocumentBackend, EntityKind, OperationRegistry, OutputBinding,
    RenderError, RenderableEntity,
};
use tabulate_types::DocumentFormat;

pub const FORMAT: &str = "csv";

#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub separator: char,
    pub line_ending: &'static str,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            line_ending: "\n",
        }
    }
}

/// Quotes `field` when it contains the separator, a quote or a line break.
pub fn quote(field: &str, separator: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == separator || c == '"' || c == '\n' || c == '\r');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// The rendering context of the CSV backend.
pub struct CsvWriter {
    out: BufWriter<Box<dyn Write>>,
    options: CsvOptions,
    columns: usize,
    fields: Vec<String>,
    lines: usize,
}

impl CsvWriter {
    pub fn new(output: Box<dyn Write>, options: CsvOptions) -> Self {
        Self {
            out: BufWriter::new(output),
            options,
            columns: 0,
            fields: Vec::new(),
            lines: 0,
        }
    }

    /// Lines written so far, table separators included.
    pub fn lines(&self) -> usize {
        self.lines
    }

    fn start_table(&mut self) -> Result<(), RenderError> {
        if self.lines > 0 {
            self.out.write_all(self.options.line_ending.as_bytes())?;
            self.lines += 1;
        }
        self.columns = 0;
        Ok(())
    }

    fn start_row(&mut self) {
        self.fields.clear();
        self.fields.resize(self.columns, String::new());
    }

    /// Places each cell at its column. Columns covered by a span stay empty.
    fn end_row(&mut self, row: &RenderableEntity) -> Result<(), RenderError> {
        for cell in &row.cells {
            let Some(column) = cell.coordinates.and_then(|c| c.column) else {
                continue;
            };
            if column >= self.fields.len() {
                self.fields.resize(column + 1, String::new());
            }
            self.fields[column] = cell.text();
        }

        let separator = self.options.separator;
        let line = self
            .fields
            .iter()
            .map(|field| quote(field, separator))
            .join(&separator.to_string());
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(self.options.line_ending.as_bytes())?;
        self.lines += 1;
        Ok(())
    }
}

impl OutputBinding for CsvWriter {
    fn flush(&mut self) -> Result<(), RenderError> {
        log::debug!("Flushing {} CSV line(s)", self.lines);
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvBackend {
    options: CsvOptions,
}

impl CsvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.options.separator = separator;
        self
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// A factory for `FormatRegistry` or `ExporterBuilder::with_backend`.
    pub fn factory(
        &self,
    ) -> impl Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError> + 'static {
        let backend = self.clone();
        move |output| {
            let writer = CsvWriter::new(output, backend.options.clone());
            Ok(Backend::new(&backend, writer).boxed())
        }
    }
}

impl BackendProvider for CsvBackend {
    type Context = CsvWriter;

    fn format(&self) -> DocumentFormat {
        FORMAT.into()
    }

    fn register(&self, registry: &mut OperationRegistry<CsvWriter>) {
        registry
            .on(EntityKind::TableStart, |ctx, _| ctx.start_table())
            .on(EntityKind::ColumnStart, |ctx, _| {
                ctx.columns += 1;
                Ok(())
            })
            .on(EntityKind::RowStart, |ctx, _| {
                ctx.start_row();
                Ok(())
            })
            .on(EntityKind::RowEnd, |ctx, row| ctx.end_row(row))
            .require(EntityKind::RowEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tabulate_render_core::Coordinates;
    use tabulate_types::{CellValue, ModelId};

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn entity(kind: EntityKind) -> RenderableEntity {
        RenderableEntity::new(kind, ModelId::new(1))
    }

    fn row(cells: &[(usize, &str)]) -> RenderableEntity {
        let cells = cells
            .iter()
            .map(|(column, text)| {
                entity(EntityKind::Cell)
                    .with_value(Some(CellValue::from(*text)))
                    .at(Coordinates::cell(0, *column))
            })
            .collect();
        entity(EntityKind::RowEnd).with_cells(cells)
    }

    #[test]
    fn test_quote_only_when_needed() {
        assert_eq!(quote("plain", ','), "plain");
        assert_eq!(quote("a,b", ','), "\"a,b\"");
        assert_eq!(quote("a,b", ';'), "a,b");
        assert_eq!(quote("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("two\nlines", ','), "\"two\nlines\"");
    }

    #[test]
    fn test_rows_are_padded_to_the_column_count() {
        let shared = Shared::default();
        let mut backend = CsvBackend::new().factory()(Box::new(shared.clone())).unwrap();

        backend.dispatch(&entity(EntityKind::TableStart)).unwrap();
        for _ in 0..3 {
            backend.dispatch(&entity(EntityKind::ColumnStart)).unwrap();
        }
        backend.dispatch(&entity(EntityKind::RowStart)).unwrap();
        backend.dispatch(&row(&[(0, "Total"), (2, "1,5")])).unwrap();
        backend.dispatch(&entity(EntityKind::RowStart)).unwrap();
        backend.dispatch(&row(&[(1, "x")])).unwrap();
        backend.flush().unwrap();

        let written = String::from_utf8(shared.0.borrow().clone()).unwrap();
        assert_eq!(written, "Total,,\"1,5\"\n,x,\n");
    }

    #[test]
    fn test_tables_are_separated_by_an_empty_line() {
        let shared = Shared::default();
        let backend = CsvBackend::new().with_separator(';');
        let mut backend = backend.factory()(Box::new(shared.clone())).unwrap();

        for value in ["a", "b"] {
            backend.dispatch(&entity(EntityKind::TableStart)).unwrap();
            backend.dispatch(&entity(EntityKind::ColumnStart)).unwrap();
            backend.dispatch(&entity(EntityKind::RowStart)).unwrap();
            backend.dispatch(&row(&[(0, value)])).unwrap();
            backend.dispatch(&entity(EntityKind::TableEnd)).unwrap();
        }
        backend.flush().unwrap();

        let written = String::from_utf8(shared.0.borrow().clone()).unwrap();
        assert_eq!(written, "a\n\nb\n");
    }
}
