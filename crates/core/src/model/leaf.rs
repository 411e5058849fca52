use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::builder::impl_model_builder;
use crate::model::{Model, ModelHeader, Node, declared_or, place_leaf};
use crate::template::{ExportContext, ExportStatus, ExportTemplate, TemplateContext};
use std::fmt;
use std::sync::Arc;
use tabulate_layout::Size;
use tabulate_render_core::{EntityKind, RenderableEntity};
use tabulate_style::AttributeSet;
use tabulate_types::{CellValue, ModelKind};

/// Text content, either fixed or computed from the side channel at render time
/// (e.g. a page number in a footer).
#[derive(Clone)]
pub enum TextValue {
    Literal(String),
    Computed(Arc<dyn Fn(&TemplateContext) -> String + Send + Sync>),
}

impl TextValue {
    pub fn resolve(&self, values: &TemplateContext) -> String {
        match self {
            TextValue::Literal(text) => text.clone(),
            TextValue::Computed(f) => f(values),
        }
    }
}

impl fmt::Debug for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextValue::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            TextValue::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Natural size of a leaf: what the backend reports, else the available width at the
/// default row height. Declared `Width`/`Height` win either way.
fn leaf_size(
    header: &ModelHeader,
    ctx: &mut ExportContext<'_>,
    entity: &RenderableEntity,
    available: Size,
) -> Result<Size, ExportError> {
    let natural = match ctx.measure_entity(entity)? {
        Some(size) => size,
        None => Size::new(available.width, ctx.config.default_row_height),
    };
    Ok(declared_or(header, available, natural))
}

#[derive(Debug, Clone)]
pub struct Text {
    pub value: TextValue,
}

impl Text {
    fn entity(&self, header: &ModelHeader, values: &TemplateContext) -> RenderableEntity {
        header
            .entity(EntityKind::Text)
            .with_attributes(header.attributes.clone())
            .with_value(Some(CellValue::from(self.value.resolve(values))))
    }
}

impl ExportTemplate for Text {
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let entity = self.entity(header, &ctx.values);
        leaf_size(header, ctx, &entity, available)
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        place_leaf(header, ctx, |ctx, bbox, clipped| {
            let entity = self
                .entity(header, &ctx.values)
                .with_bbox(bbox)
                .with_clipped(clipped);
            ctx.emit(entity)
        })
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    /// Path or URI; backends decide how to load it.
    pub source: String,
}

impl Image {
    fn entity(&self, header: &ModelHeader) -> RenderableEntity {
        header
            .entity(EntityKind::Image)
            .with_attributes(header.attributes.clone())
            .with_value(Some(CellValue::from(self.source.as_str())))
    }
}

impl ExportTemplate for Image {
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        leaf_size(header, ctx, &self.entity(header), available)
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        place_leaf(header, ctx, |ctx, bbox, clipped| {
            ctx.emit(self.entity(header).with_bbox(bbox).with_clipped(clipped))
        })
    }
}

pub struct TextBuilder {
    name: Option<String>,
    value: TextValue,
    attributes: AttributeSet,
}

impl TextBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            name: None,
            value: TextValue::Literal(text.into()),
            attributes: AttributeSet::new(),
        }
    }

    /// Text computed when rendered, from the values of the export's side channel.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&TemplateContext) -> String + Send + Sync + 'static,
    {
        Self {
            name: None,
            value: TextValue::Computed(Arc::new(f)),
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let header = ctx.header(ModelKind::Text, self.name.as_deref(), self.attributes)?;
        Ok(Model {
            header,
            node: Node::Text(Text { value: self.value }),
        })
    }
}

#[derive(Default)]
pub struct ImageBuilder {
    name: Option<String>,
    source: Option<String>,
    attributes: AttributeSet,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ExportError::missing("ImageBuilder", "source"))?;
        let header = ctx.header(ModelKind::Image, self.name.as_deref(), self.attributes)?;
        Ok(Model {
            header,
            node: Node::Image(Image { source }),
        })
    }
}

impl_model_builder!(TextBuilder, ImageBuilder);
