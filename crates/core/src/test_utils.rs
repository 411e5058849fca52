//! Shared fixtures for engine tests: an in-memory backend that records every entity.

use crate::build::BuildContext;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::export::{DataSources, Exporter};
use crate::model::{Model, ModelBuilder};
use std::cell::RefCell;
use std::rc::Rc;
use tabulate_layout::Size;
use tabulate_render_core::{
    Backend, BackendProvider, EntityKind, OperationRegistry, OutputBinding, RenderError,
    RenderableEntity,
};
use tabulate_style::PageSize;
use tabulate_types::DocumentFormat;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What a recording backend saw during one export.
#[derive(Debug, Default)]
pub struct Recording {
    pub entities: Vec<RenderableEntity>,
    pub flushes: usize,
}

impl Recording {
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.entities.iter().map(|e| e.kind).collect()
    }

    pub fn of_kind(&self, kind: EntityKind) -> Vec<&RenderableEntity> {
        self.entities.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.of_kind(kind).len()
    }

    /// Cell texts of every rendered row, from the cells carried by `RowEnd`.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.of_kind(EntityKind::RowEnd)
            .into_iter()
            .map(|row| row.cells.iter().map(RenderableEntity::text).collect())
            .collect()
    }

    /// Page of every rendered row.
    pub fn row_pages(&self) -> Vec<usize> {
        self.of_kind(EntityKind::RowEnd)
            .into_iter()
            .map(|row| row.page.unwrap_or_default())
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.of_kind(EntityKind::Text)
            .into_iter()
            .map(RenderableEntity::text)
            .collect()
    }

    pub fn named(&self, name: &str) -> Vec<&RenderableEntity> {
        self.entities
            .iter()
            .filter(|e| e.name.as_deref() == Some(name))
            .collect()
    }
}

pub struct Recorder {
    recording: Rc<RefCell<Recording>>,
}

impl OutputBinding for Recorder {
    fn flush(&mut self) -> Result<(), RenderError> {
        self.recording.borrow_mut().flushes += 1;
        Ok(())
    }
}

/// Records every entity kind. When `text_height` is set, text and cells measure as
/// 6pt per character at that height.
#[derive(Default)]
pub struct RecorderProvider {
    pub text_height: Option<f32>,
}

impl BackendProvider for RecorderProvider {
    type Context = Recorder;

    fn format(&self) -> DocumentFormat {
        "recording".into()
    }

    fn register(&self, registry: &mut OperationRegistry<Recorder>) {
        for kind in EntityKind::ALL {
            registry.on(kind, |ctx, entity| {
                ctx.recording.borrow_mut().entities.push(entity.clone());
                Ok(())
            });
        }
        if let Some(height) = self.text_height {
            for kind in [EntityKind::Text, EntityKind::Cell] {
                registry.measure(kind, move |_, entity| {
                    let chars = entity.text().chars().count() as f32;
                    Ok(Some(Size::new(chars * 6.0, height)))
                });
            }
        }
    }
}

/// Builds `builder` as a document and exports it to a fresh recording.
pub fn record<B: ModelBuilder + 'static>(
    builder: B,
    sources: DataSources,
    config: ExportConfig,
) -> Result<Recording, ExportError> {
    let document = Box::new(builder).build_model(&mut BuildContext::new())?;
    record_model(&document, sources, config)
}

pub fn record_model(
    document: &Model,
    sources: DataSources,
    config: ExportConfig,
) -> Result<Recording, ExportError> {
    let recording = Rc::new(RefCell::new(Recording::default()));
    record_into(document, sources, config, &recording)?;
    Ok(recording.take())
}

/// Like `record_model`, but keeps what was recorded even when the export fails.
pub fn record_into(
    document: &Model,
    sources: DataSources,
    config: ExportConfig,
    recording: &Rc<RefCell<Recording>>,
) -> Result<(), ExportError> {
    let shared = recording.clone();
    let exporter = Exporter::builder()
        .with_config(config)
        .with_backend("recording", move |_| {
            let context = Recorder {
                recording: shared.clone(),
            };
            Ok(Backend::new(&RecorderProvider::default(), context).boxed())
        })
        .build()?;
    exporter.export(document, sources, Box::new(std::io::sink()))
}

/// A small page, so pagination kicks in after a handful of rows.
pub fn small_page(width: f32, height: f32) -> ExportConfig {
    ExportConfig {
        page_size: PageSize::Custom { width, height },
        default_row_height: 10.0,
        default_column_width: 50.0,
        ..ExportConfig::default()
    }
}
