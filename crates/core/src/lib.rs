//! # tabulate-core
//!
//! The export engine: the model tree, the measure/export protocol its nodes implement,
//! table row resolution and pagination.
//!
//! This crate provides:
//! - **build**: `BuildContext`, the explicit id counter and name registry threaded through builders
//! - **model**: the closed set of model variants and their builders
//! - **table**: columns, declared rows and the streaming row resolver
//! - **template**: the `ExportTemplate` protocol and the per-export `ExportContext`
//! - **state**: the per-model export state machine
//! - **export**: `Exporter`, which binds a document to data sources and a backend
//!
//! ## Design Principle
//!
//! Backends are reached only through `tabulate-render-core` traits. The engine never
//! inspects a rendering context and performs no I/O of its own.

// Re-export foundation crates
pub use tabulate_layout as layout;
pub use tabulate_render_core as render;
pub use tabulate_source as source;
pub use tabulate_style as style;
pub use tabulate_types as types;

pub mod build;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod state;
pub mod table;
pub mod template;

#[cfg(test)]
pub(crate) mod test_utils;

pub use build::BuildContext;
pub use config::ExportConfig;
pub use error::ExportError;
pub use export::{DataSources, Exporter, ExporterBuilder};
pub use model::{
    Attributed, ContainerBuilder, DocumentBuilder, ImageBuilder, MarginsBuilder, Model,
    ModelBuilder, ModelHeader, Node, PageBuilder, SpacingBuilder, TextBuilder, WrapperBuilder,
};
pub use state::ModelState;
pub use table::{CellBuilder, ColumnBuilder, ColumnRef, RowBuilder, TableBuilder};
pub use template::{
    ExportContext, ExportStatus, ExportTemplate, PAGE_NAME, PAGE_NUMBER, SHEET_NAME,
    TemplateContext,
};
