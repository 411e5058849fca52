//! Composite models that only arrange their children: containers, margins, spacing
//! and aligned wrappers.

use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::builder::{ModelBuilder, build_all, impl_model_builder};
use crate::model::{Model, ModelHeader, Node, declared_or, export_children, open_scope};
use crate::template::{ExportContext, ExportStatus, ExportTemplate};
use tabulate_layout::{Position, Rect, Size};
use tabulate_style::{Alignment, AttributeSet, Margins};
use tabulate_types::{ModelKind, Orientation};

/// Natural size of children flowing in `orientation`.
fn flow_size(
    children: &[Model],
    orientation: Orientation,
    ctx: &mut ExportContext<'_>,
    available: Size,
) -> Result<Size, ExportError> {
    let mut total = Size::zero();
    for child in children {
        let size = child.measure(ctx, available)?;
        total = match orientation {
            Orientation::Vertical => {
                Size::new(total.width.max(size.width), total.height + size.height)
            }
            Orientation::Horizontal => {
                Size::new(total.width + size.width, total.height.max(size.height))
            }
        };
    }
    Ok(total)
}

#[derive(Debug, Clone)]
pub struct Container {
    pub orientation: Orientation,
    pub children: Vec<Model>,
}

impl ExportTemplate for Container {
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let natural = flow_size(&self.children, self.orientation, ctx, available)?;
        Ok(declared_or(header, available, natural))
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        open_scope(header, ctx, self.orientation)?;
        let status = export_children(&self.children, ctx)?;
        ctx.layouts.close()?;
        Ok(status)
    }
}

/// A single child offset by the model's `Margins` attribute.
#[derive(Debug, Clone)]
pub struct MarginBox {
    pub orientation: Orientation,
    pub child: Box<Model>,
}

impl ExportTemplate for MarginBox {
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let offset = header
            .attributes
            .get_as::<Margins>()
            .map(Margins::offset)
            .unwrap_or_default();
        let inner = Size::new(
            (available.width - offset.width).max(0.0),
            (available.height - offset.height).max(0.0),
        );
        let child = self.child.measure(ctx, inner)?;
        Ok(Size::new(child.width + offset.width, child.height + offset.height))
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        open_scope(header, ctx, self.orientation)?;
        let status = self.child.export(ctx)?;
        ctx.layouts.close()?;
        Ok(status)
    }
}

/// A fixed gap, optionally followed by a child placed past it on both axes.
#[derive(Debug, Clone)]
pub struct Spacing {
    pub size: Size,
    pub child: Option<Box<Model>>,
}

impl ExportTemplate for Spacing {
    fn measure(
        &self,
        _header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let child = match &self.child {
            Some(child) => child.measure(ctx, available)?,
            None => Size::zero(),
        };
        Ok(Size::new(
            self.size.width + child.width,
            self.size.height + child.height,
        ))
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        let parent = ctx.layouts.current_mut()?;
        let measured = parent.measured(header.id).unwrap_or(self.size);
        let position = parent.next_position(measured.width);

        let Some(child) = &self.child else {
            parent.allocate(Rect::at(position, self.size));
            return Ok(ExportStatus::Finished);
        };

        let start = Position::new(position.x + self.size.width, position.y + self.size.height);
        let region = parent.remaining_region(start);
        ctx.layouts.open(header.id, Orientation::Vertical, Some(region));
        let status = child.export(ctx)?;
        ctx.layouts.close()?;
        Ok(status)
    }
}

/// Aligns its child inside the wrapper's declared box. The wrapper always occupies the
/// whole box.
#[derive(Debug, Clone)]
pub struct Wrapper {
    pub child: Box<Model>,
}

impl ExportTemplate for Wrapper {
    fn measure(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        available: Size,
    ) -> Result<Size, ExportError> {
        let natural = self.child.measure(ctx, available)?;
        Ok(declared_or(header, available, natural))
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        let parent = ctx.layouts.current_mut()?;
        let size = parent.measured(header.id).unwrap_or_default();
        let position = parent.next_position(size.width);
        let limit = parent.max_right_bottom();
        let outer = Rect::at(position, size);

        let child_size = self.child.measure(ctx, size)?;
        let alignment = header
            .attributes
            .get_as::<Alignment>()
            .cloned()
            .unwrap_or_default();
        let inner = alignment.align(outer, child_size);
        log::trace!("Wrapper '{}' aligns its child at {:?}", header.name, inner);

        let region = Rect::from_corners(inner.left_top(), outer.right_bottom().min(limit));
        ctx.layouts.open(header.id, Orientation::Vertical, Some(region));
        let status = self.child.export(ctx)?;
        ctx.layouts.close()?;
        ctx.layouts.current_mut()?.allocate(outer.clip_to(limit));
        Ok(status)
    }
}

pub struct ContainerBuilder {
    name: Option<String>,
    orientation: Orientation,
    attributes: AttributeSet,
    children: Vec<Box<dyn ModelBuilder>>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            orientation: Orientation::Vertical,
            attributes: AttributeSet::new(),
            children: Vec::new(),
        }
    }

    pub fn horizontal() -> Self {
        Self::new().with_orientation(Orientation::Horizontal)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_child(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let header = ctx.header(ModelKind::Container, self.name.as_deref(), self.attributes)?;
        let children = build_all(self.children, ctx)?;
        Ok(Model {
            header,
            node: Node::Container(Container {
                orientation: self.orientation,
                children,
            }),
        })
    }
}

#[derive(Default)]
pub struct MarginsBuilder {
    name: Option<String>,
    orientation: Orientation,
    attributes: AttributeSet,
    child: Option<Box<dyn ModelBuilder>>,
}

impl MarginsBuilder {
    pub fn new(left: f32, top: f32) -> Self {
        Self {
            attributes: AttributeSet::new().with(Margins::new(left, top)),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_child(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let child = self
            .child
            .ok_or_else(|| ExportError::missing("MarginsBuilder", "child"))?;
        let header = ctx.header(ModelKind::Margins, self.name.as_deref(), self.attributes)?;
        let child = child.build_model(ctx)?;
        Ok(Model {
            header,
            node: Node::Margins(MarginBox {
                orientation: self.orientation,
                child: Box::new(child),
            }),
        })
    }
}

pub struct SpacingBuilder {
    name: Option<String>,
    size: Size,
    attributes: AttributeSet,
    child: Option<Box<dyn ModelBuilder>>,
}

impl SpacingBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            name: None,
            size: Size::new(width, height),
            attributes: AttributeSet::new(),
            child: None,
        }
    }

    pub fn vertical(height: f32) -> Self {
        Self::new(0.0, height)
    }

    pub fn horizontal(width: f32) -> Self {
        Self::new(width, 0.0)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_child(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        if self.size.width < 0.0 || self.size.height < 0.0 {
            return Err(ExportError::Config(format!(
                "Spacing cannot be negative: {:?}",
                self.size
            )));
        }
        let header = ctx.header(ModelKind::Spacing, self.name.as_deref(), self.attributes)?;
        let child = match self.child {
            Some(child) => Some(Box::new(child.build_model(ctx)?)),
            None => None,
        };
        Ok(Model {
            header,
            node: Node::Spacing(Spacing {
                size: self.size,
                child,
            }),
        })
    }
}

#[derive(Default)]
pub struct WrapperBuilder {
    name: Option<String>,
    attributes: AttributeSet,
    child: Option<Box<dyn ModelBuilder>>,
}

impl WrapperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_child(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let child = self
            .child
            .ok_or_else(|| ExportError::missing("WrapperBuilder", "child"))?;
        let header = ctx.header(ModelKind::Wrapper, self.name.as_deref(), self.attributes)?;
        let child = child.build_model(ctx)?;
        Ok(Model {
            header,
            node: Node::Wrapper(Wrapper {
                child: Box::new(child),
            }),
        })
    }
}

impl_model_builder!(ContainerBuilder, MarginsBuilder, SpacingBuilder, WrapperBuilder);
