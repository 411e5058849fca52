//! An in-memory backend that keeps a log of everything dispatched to it.
//!
//! Entities are recorded as JSON, in dispatch order, together with every attribute
//! operation invocation. On flush the entity log is written to the output as JSON lines.

use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tabulate_render_core::{
    Backend, BackendProvider, DocumentBackend, EntityKind, OperationRegistry, OutputBinding,
    RenderError, RenderableEntity, ValueCache,
};
use tabulate_style::AttributeKind;
use tabulate_types::{DocumentFormat, ModelId, Size};

pub const FORMAT: &str = "recording";

/// One attribute operation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeCall {
    pub entity: EntityKind,
    pub model: ModelId,
    pub attribute: AttributeKind,
}

#[derive(Debug, Default)]
pub struct RecordedExport {
    pub entities: Vec<serde_json::Value>,
    pub attribute_calls: Vec<AttributeCall>,
    /// Distinct attribute sets seen across all entities.
    pub styles: Vec<serde_json::Value>,
    pub flushes: usize,
}

impl RecordedExport {
    /// The `kind` field of every recorded entity.
    pub fn kinds(&self) -> Vec<String> {
        self.entities
            .iter()
            .filter_map(|e| e.get("kind").and_then(|k| k.as_str()).map(str::to_string))
            .collect()
    }

    pub fn of_kind(&self, kind: EntityKind) -> Vec<&serde_json::Value> {
        let name = serde_json::to_value(kind).ok();
        self.entities
            .iter()
            .filter(|e| e.get("kind") == name.as_ref())
            .collect()
    }
}

/// A cloneable view of the log that stays readable after the export consumed the backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandle(Rc<RefCell<RecordedExport>>);

impl RecordingHandle {
    pub fn take(&self) -> RecordedExport {
        self.0.take()
    }

    pub fn with<T>(&self, f: impl FnOnce(&RecordedExport) -> T) -> T {
        f(&self.0.borrow())
    }
}

pub struct Recorder {
    log: RecordingHandle,
    styles: ValueCache<serde_json::Value>,
    out: Box<dyn Write>,
}

impl OutputBinding for Recorder {
    fn flush(&mut self) -> Result<(), RenderError> {
        let mut log = self.log.0.borrow_mut();
        for entity in &log.entities {
            serde_json::to_writer(&mut self.out, entity)
                .map_err(|e| RenderError::Backend(e.to_string()))?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        log.flushes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    handle: RecordingHandle,
    char_size: Option<Size>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures text and cells as `width` points per character, `height` points tall.
    pub fn with_text_measure(mut self, width: f32, height: f32) -> Self {
        self.char_size = Some(Size::new(width, height));
        self
    }

    pub fn handle(&self) -> RecordingHandle {
        self.handle.clone()
    }

    pub fn factory(
        &self,
    ) -> impl Fn(Box<dyn Write>) -> Result<Box<dyn DocumentBackend>, RenderError> + 'static {
        let backend = self.clone();
        move |out| {
            let recorder = Recorder {
                log: backend.handle(),
                styles: ValueCache::new(),
                out,
            };
            Ok(Backend::new(&backend, recorder).boxed())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, RenderError> {
    serde_json::to_value(value).map_err(|e| RenderError::Backend(e.to_string()))
}

fn record(ctx: &mut Recorder, entity: &RenderableEntity) -> Result<(), RenderError> {
    let value = to_json(entity)?;
    let mut log = ctx.log.0.borrow_mut();
    log.entities.push(value);

    if !entity.attributes.is_empty() {
        let key = entity.cache_key();
        let fresh = ctx.styles.get(key).is_none();
        let style = ctx
            .styles
            .get_or_try_insert_with(key, || to_json(&entity.attributes))?;
        if fresh {
            log.styles.push(style.clone());
        }
    }
    Ok(())
}

impl BackendProvider for RecordingBackend {
    type Context = Recorder;

    fn format(&self) -> DocumentFormat {
        FORMAT.into()
    }

    fn register(&self, registry: &mut OperationRegistry<Recorder>) {
        for kind in EntityKind::ALL {
            registry.on(kind, record);
        }
        for attribute in AttributeKind::ALL {
            registry.on_attribute(attribute, move |ctx, entity, _| {
                ctx.log.0.borrow_mut().attribute_calls.push(AttributeCall {
                    entity: entity.kind,
                    model: entity.model,
                    attribute,
                });
                Ok(())
            });
        }
        if let Some(unit) = self.char_size {
            for kind in [EntityKind::Text, EntityKind::Cell] {
                registry.measure(kind, move |_, entity| {
                    let chars = entity.text().chars().count() as f32;
                    Ok(Some(Size::new(chars * unit.width, unit.height)))
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabulate_style::{AttributeSet, Background, Borders};
    use tabulate_types::{CellValue, Color};

    #[test]
    fn test_entities_and_attribute_calls_are_logged() {
        let backend = RecordingBackend::new();
        let handle = backend.handle();
        let mut open = backend.factory()(Box::new(std::io::sink())).unwrap();

        let cell = RenderableEntity::new(EntityKind::Cell, ModelId::new(3))
            .with_value(Some(CellValue::from("a")))
            .with_attributes(
                AttributeSet::new()
                    .with(Background::color(Color::RED))
                    .with(Borders::default()),
            );
        open.dispatch(&cell).unwrap();
        open.flush().unwrap();

        let log = handle.take();
        assert_eq!(log.kinds(), vec!["cell"]);
        assert_eq!(log.entities[0]["value"], json!({"value": "a", "cellType": "string"}));
        let attributes: Vec<AttributeKind> =
            log.attribute_calls.iter().map(|c| c.attribute).collect();
        assert_eq!(attributes, vec![AttributeKind::Background, AttributeKind::Borders]);
        assert_eq!(log.flushes, 1);
    }

    #[test]
    fn test_each_attribute_set_is_serialized_once() {
        let backend = RecordingBackend::new();
        let handle = backend.handle();
        let mut open = backend.factory()(Box::new(std::io::sink())).unwrap();

        let red = AttributeSet::new().with(Background::color(Color::RED));
        for attributes in [red.clone(), AttributeSet::new(), red, AttributeSet::new().with(Borders::default())] {
            let cell = RenderableEntity::new(EntityKind::Cell, ModelId::new(1)).with_attributes(attributes);
            open.dispatch(&cell).unwrap();
        }

        let log = handle.take();
        assert_eq!(log.entities.len(), 4);
        assert_eq!(log.styles.len(), 2);
    }

    #[test]
    fn test_text_is_measured_by_character_count() {
        let backend = RecordingBackend::new().with_text_measure(6.0, 12.0);
        let mut open = backend.factory()(Box::new(std::io::sink())).unwrap();
        let text = RenderableEntity::new(EntityKind::Text, ModelId::new(1))
            .with_value(Some(CellValue::from("four")));

        assert_eq!(open.measure(&text).unwrap(), Some(Size::new(24.0, 12.0)));
        let image = RenderableEntity::new(EntityKind::Image, ModelId::new(2));
        assert_eq!(open.measure(&image).unwrap(), None);
    }
}
