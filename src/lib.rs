//! # tabulate
//!
//! Exports document models (pages, containers, tables, text) to pluggable formats.
//!
//! The engine lives in `tabulate-core` and is re-exported here. This crate adds the
//! backends it ships with:
//! - **csv**: table rows as delimited lines
//! - **recording**: an in-memory log of every dispatched entity, for verification
//!
//! ## Example
//!
//! ```ignore
//! use tabulate::{DataSources, DocumentBuilder, Exporter, TableBuilder, BuildContext};
//! use tabulate::backends::CsvBackend;
//!
//! let document = DocumentBuilder::new()
//!     .with_child(TableBuilder::new().with_field("code").with_field("name"))
//!     .build(&mut BuildContext::new())?;
//! let exporter = Exporter::builder()
//!     .with_backend("csv", CsvBackend::new().factory())
//!     .build()?;
//! exporter.export(&document, DataSources::single(records), Box::new(file))?;
//! ```

pub mod backends;
pub mod convert;

pub use tabulate_core::*;

use backends::{CsvBackend, RecordingBackend};
use tabulate_render_core::FormatRegistry;

/// A registry holding every backend bundled with this crate.
pub fn default_registry() -> FormatRegistry {
    FormatRegistry::new()
        .with(backends::csv::FORMAT, CsvBackend::new().factory())
        .with(backends::recording::FORMAT, RecordingBackend::new().factory())
}
