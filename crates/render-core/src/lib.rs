//! Operation dispatch for the export engine.
//!
//! This crate holds the seams between the engine and format backends:
//! - `RenderableEntity`, the render-time projection handed to operations
//! - `OperationRegistry` and `Dispatcher`, the per-format callback tables
//! - `BackendProvider`, `DocumentBackend` and `FormatRegistry`, which bind a format
//!   identifier to a rendering context and its output
//! - `ValueCache`, for memoizing values backends derive from attributes

mod backend;
mod cache;
mod dispatch;
mod entity;
mod error;
mod operation;

pub use backend::{
    Backend, BackendFactory, BackendProvider, DocumentBackend, FormatRegistry, OutputBinding,
};
pub use cache::ValueCache;
pub use dispatch::Dispatcher;
pub use entity::{Coordinates, EntityKind, RenderableEntity};
pub use error::RenderError;
pub use operation::{
    AttributeOperation, AttributeOperationFn, DEFAULT_PRIORITY, MeasureOperation, Operation,
    OperationRegistry,
};
