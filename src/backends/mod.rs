//! Format backends bundled with the crate.

pub mod csv;
pub mod recording;

pub use csv::{CsvBackend, CsvOptions, CsvWriter};
pub use recording::{AttributeCall, RecordedExport, RecordingBackend, RecordingHandle};
