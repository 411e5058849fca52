//! The export template protocol and the context threaded through one export call.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::export::DataSources;
use crate::model::ModelHeader;
use crate::state::ExportStates;
use serde_json::Value;
use std::collections::HashMap;
use tabulate_layout::{LayoutError, LayoutStack, Rect, Size};
use tabulate_render_core::{DocumentBackend, RenderableEntity};
use tabulate_style::{AttributeConstraints, Overflow, OverflowPolicy};

pub const PAGE_NUMBER: &str = "_pageNumber";
pub const PAGE_NAME: &str = "_pageName";
pub const SHEET_NAME: &str = "_sheetName";

/// Outcome of exporting one model on one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// Everything the model owns was rendered.
    Finished,
    /// Some content was deferred under RETRY; the model re-enters on the next pass.
    Suspended,
    /// Overflow under STOP: the model and its remaining siblings are abandoned.
    Stopped,
}

/// One export template per model variant. Templates are stateless; all progress lives
/// in the [`ExportContext`].
pub trait ExportTemplate {
    /// Natural size of the model given the space its parent has left.
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError>;

    /// Exports the model into the innermost open layout scope.
    ///
    /// The model has been measured into that scope before this is called.
    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError>;
}

/// A string-keyed side channel shared by every model of one export call.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, Value>,
}

impl TemplateContext {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Everything a template needs while exporting: the backend, the layout scopes of the
/// current pass, per-model state and the side channel.
pub struct ExportContext<'a> {
    pub backend: &'a mut dyn DocumentBackend,
    pub config: &'a ExportConfig,
    pub constraints: &'a AttributeConstraints,
    pub sources: &'a mut DataSources,
    pub layouts: LayoutStack,
    pub states: ExportStates,
    pub values: TemplateContext,
    page: usize,
    rendered: usize,
    retried_height: Option<f32>,
}

impl<'a> ExportContext<'a> {
    pub fn new(
        backend: &'a mut dyn DocumentBackend,
        config: &'a ExportConfig,
        constraints: &'a AttributeConstraints,
        sources: &'a mut DataSources,
    ) -> Self {
        let page = config.page_size.dimensions_pt();
        Self {
            backend,
            config,
            constraints,
            sources,
            layouts: LayoutStack::new(Rect::new(0.0, 0.0, page.width, page.height)),
            states: ExportStates::new(),
            values: TemplateContext::default(),
            page: 0,
            rendered: 0,
            retried_height: None,
        }
    }

    /// One-based number of the page being exported; zero before the first page starts.
    pub fn page(&self) -> usize {
        self.page
    }

    pub(crate) fn start_page(&mut self) -> usize {
        self.page += 1;
        self.page
    }

    /// Count of content units rendered so far. Pagination uses it to detect passes that
    /// make no progress.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub(crate) fn record_rendered(&mut self) {
        self.rendered += 1;
    }

    /// Remembers the height of the last unit deferred under RETRY.
    pub(crate) fn record_retry(&mut self, height: f32) {
        self.retried_height = Some(height);
    }

    pub(crate) fn take_retried_height(&mut self) -> Option<f32> {
        self.retried_height.take()
    }

    /// Stamps the entity with the current page and hands it to the backend.
    pub fn emit(&mut self, entity: RenderableEntity) -> Result<(), ExportError> {
        let entity = entity.on_page(self.page);
        self.backend.dispatch(&entity)?;
        Ok(())
    }

    /// Asks the backend for the natural size of an entity, if it can tell.
    pub fn measure_entity(&mut self, entity: &RenderableEntity) -> Result<Option<Size>, ExportError> {
        Ok(self.backend.measure(entity)?)
    }

    /// The vertical overflow policy of a model: its own `Overflow` attribute, else the
    /// configured default for its kind.
    pub fn overflow_policy(&self, header: &ModelHeader) -> OverflowPolicy {
        header
            .attributes
            .get_as::<Overflow>()
            .and_then(|overflow| overflow.vertical)
            .unwrap_or_else(|| self.config.overflow_for(header.kind))
    }

    /// The horizontal policy, used by tables whose columns run past the right edge.
    pub fn horizontal_overflow_policy(&self, header: &ModelHeader) -> Option<OverflowPolicy> {
        header
            .attributes
            .get_as::<Overflow>()
            .and_then(|overflow| overflow.horizontal)
    }

    pub fn current_bounds(&self) -> Result<Rect, LayoutError> {
        Ok(self.layouts.current()?.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_side_channel_values() {
        let mut values = TemplateContext::default();
        values.set(PAGE_NUMBER, 3);
        values.set(SHEET_NAME, "orders");
        assert_eq!(values.get(PAGE_NUMBER), Some(&json!(3)));
        assert_eq!(values.get_str(SHEET_NAME), Some("orders"));
        assert!(values.contains(SHEET_NAME));
        assert_eq!(values.remove(SHEET_NAME), Some(json!("orders")));
        assert_eq!(values.get_str(SHEET_NAME), None);
    }
}
