pub mod fixtures;

use std::fs::File;
use std::io::Read;
use tabulate::backends::{CsvBackend, RecordedExport, RecordingBackend};
use tabulate::{BuildContext, DataSources, ExportConfig, ExportError, Exporter, Model, ModelBuilder};
use tempfile::NamedTempFile;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn build(builder: impl ModelBuilder + 'static) -> Result<Model, ExportError> {
    Box::new(builder).build_model(&mut BuildContext::new())
}

/// Exports `document` through the CSV backend into a temporary file and reads it back.
pub fn export_csv_file(
    document: &Model,
    sources: DataSources,
    backend: CsvBackend,
) -> Result<String, Box<dyn std::error::Error>> {
    let file = NamedTempFile::new()?;
    let exporter = Exporter::builder()
        .with_backend("csv", backend.factory())
        .build()?;
    exporter.export(document, sources, Box::new(file.reopen()?))?;

    let mut written = String::new();
    File::open(file.path())?.read_to_string(&mut written)?;
    Ok(written)
}

/// Exports `document` through the recording backend and returns its log.
pub fn export_recorded(
    document: &Model,
    sources: DataSources,
    config: ExportConfig,
) -> Result<RecordedExport, ExportError> {
    let backend = RecordingBackend::new();
    let handle = backend.handle();
    let exporter = Exporter::builder()
        .with_config(config)
        .with_backend("recording", backend.factory())
        .build()?;
    exporter.export(document, sources, Box::new(std::io::sink()))?;
    Ok(handle.take())
}
