// src/error.rs
//! Defines the top-level error type for building and exporting documents.

use tabulate_layout::LayoutError;
use tabulate_render_core::RenderError;
use tabulate_style::AttributeError;
use thiserror::Error;

/// The main error enum for all high-level operations within the engine.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Other export error: {0}")]
    Other(String),
}

impl ExportError {
    pub(crate) fn missing(builder: &str, field: &str) -> Self {
        ExportError::Config(format!("{builder} requires '{field}'"))
    }
}
