//! The document model tree.
//!
//! A [`Model`] is a closed set of variants, each with one payload type implementing
//! [`ExportTemplate`]. Composite payloads own their children; nothing points back up.

pub mod builder;
pub mod container;
pub mod document;
pub mod leaf;
pub mod page;

use crate::error::ExportError;
use crate::table::Table;
use crate::template::{ExportContext, ExportStatus, ExportTemplate};
use tabulate_layout::{Fit, OverflowAction, Position, Rect, Size};
use tabulate_render_core::{EntityKind, RenderableEntity};
use tabulate_style::{AttributeSet, Height, Margins, Width};
use tabulate_types::{ModelId, ModelKind, Orientation};

pub use builder::{Attributed, ModelBuilder};
pub use container::{Container, ContainerBuilder, MarginBox, MarginsBuilder, Spacing, SpacingBuilder, Wrapper, WrapperBuilder};
pub use document::{Document, DocumentBuilder};
pub use leaf::{Image, ImageBuilder, Text, TextBuilder, TextValue};
pub use page::{Page, PageBuilder};

/// Identity and attributes shared by every model variant.
#[derive(Debug, Clone)]
pub struct ModelHeader {
    pub id: ModelId,
    pub kind: ModelKind,
    pub name: String,
    pub attributes: AttributeSet,
}

impl ModelHeader {
    /// A fresh entity of `kind` naming this model.
    pub fn entity(&self, kind: EntityKind) -> RenderableEntity {
        RenderableEntity::new(kind, self.id).with_name(self.name.clone())
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Document(Document),
    Page(Page),
    Container(Container),
    Table(Table),
    Text(Text),
    Image(Image),
    Margins(MarginBox),
    Spacing(Spacing),
    Wrapper(Wrapper),
}

#[derive(Debug, Clone)]
pub struct Model {
    pub header: ModelHeader,
    pub node: Node,
}

impl Model {
    pub fn id(&self) -> ModelId {
        self.header.id
    }

    pub fn kind(&self) -> ModelKind {
        self.header.kind
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.header.attributes
    }

    fn template(&self) -> &dyn ExportTemplate {
        match &self.node {
            Node::Document(document) => document,
            Node::Page(page) => page,
            Node::Container(container) => container,
            Node::Table(table) => table,
            Node::Text(text) => text,
            Node::Image(image) => image,
            Node::Margins(margins) => margins,
            Node::Spacing(spacing) => spacing,
            Node::Wrapper(wrapper) => wrapper,
        }
    }

    /// Direct children, in export order.
    pub fn children(&self) -> Vec<&Model> {
        match &self.node {
            Node::Document(document) => document.pages.iter().collect(),
            Node::Page(page) => page
                .header
                .iter()
                .map(|m| &**m)
                .chain(page.content.iter())
                .chain(page.footer.iter().map(|m| &**m))
                .collect(),
            Node::Container(container) => container.children.iter().collect(),
            Node::Margins(margins) => vec![&*margins.child],
            Node::Spacing(spacing) => spacing.child.iter().map(|m| &**m).collect(),
            Node::Wrapper(wrapper) => vec![&*wrapper.child],
            Node::Table(_) | Node::Text(_) | Node::Image(_) => Vec::new(),
        }
    }

    /// This model and all of its descendants, depth first.
    pub fn descendants(&self) -> Vec<&Model> {
        let mut models = vec![self];
        for child in self.children() {
            models.extend(child.descendants());
        }
        models
    }

    /// Ids of this model and all of its descendants, depth first.
    pub fn ids(&self) -> Vec<ModelId> {
        let mut ids = vec![self.id()];
        for child in self.children() {
            ids.extend(child.ids());
        }
        ids
    }

    /// Depth-first search by model name.
    pub fn find(&self, name: &str) -> Option<&Model> {
        if self.name() == name {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.find(name))
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.node {
            Node::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn measure(&self, ctx: &mut ExportContext<'_>, available: Size) -> Result<Size, ExportError> {
        ctx.states.begin_measure(self.id());
        self.template().measure(&self.header, ctx, available)
    }

    /// Exports this model as a child of the innermost open layout scope.
    ///
    /// Finished models are skipped. A model is measured into the parent scope before
    /// its first export in that scope.
    pub fn export(&self, ctx: &mut ExportContext<'_>) -> Result<ExportStatus, ExportError> {
        let id = self.id();
        if ctx.states.is_finished(id) {
            return Ok(ExportStatus::Finished);
        }

        if ctx.layouts.depth() > 0 && ctx.layouts.current()?.measured(id).is_none() {
            let available = ctx.layouts.current()?.available_size();
            let size = self.measure(ctx, available)?;
            ctx.layouts.current_mut()?.record_measure(id, size);
        }

        ctx.states.begin_export(id)?;
        let status = self.template().export(&self.header, ctx)?;
        match status {
            ExportStatus::Suspended => {
                ctx.states.suspend(id)?;
                ctx.layouts.suspend(id);
            }
            ExportStatus::Finished | ExportStatus::Stopped => ctx.states.finish(id)?,
        }
        log::trace!("{} '{}' exported: {:?}", self.kind().as_str(), self.name(), status);
        Ok(status)
    }
}

/// Exports `children` in order until one of them suspends.
///
/// A suspended child suspends the parent and ends the pass for its later siblings.
/// A stopped child abandons its later siblings; the parent itself is done.
pub(crate) fn export_children(
    children: &[Model],
    ctx: &mut ExportContext<'_>,
) -> Result<ExportStatus, ExportError> {
    for child in children {
        match child.export(ctx)? {
            ExportStatus::Finished => {}
            ExportStatus::Suspended => return Ok(ExportStatus::Suspended),
            ExportStatus::Stopped => {
                log::debug!("'{}' stopped; skipping its remaining siblings", child.name());
                break;
            }
        }
    }
    Ok(ExportStatus::Finished)
}

/// Opens the layout scope of a composite model at the parent's next position.
///
/// The scope is offset by the model's `Margins` and limited to its declared size.
pub(crate) fn open_scope(
    header: &ModelHeader,
    ctx: &mut ExportContext<'_>,
    orientation: Orientation,
) -> Result<(), ExportError> {
    let parent = ctx.layouts.current_mut()?;
    let measured = parent.measured(header.id).unwrap_or_default();
    let position = parent.next_position(measured.width);
    let offset = header
        .attributes
        .get_as::<Margins>()
        .map(Margins::offset)
        .unwrap_or_default();
    let start = Position::new(position.x + offset.width, position.y + offset.height);
    let mut region = parent.remaining_region(start);

    let declared = tabulate_style::declared_size(
        header.attributes.get_as::<Width>(),
        header.attributes.get_as::<Height>(),
        region.size(),
        region.size(),
    );
    region.width = region.width.min(declared.width);
    region.height = region.height.min(declared.height);

    ctx.layouts.open(header.id, orientation, Some(region));
    Ok(())
}

/// Places a measured leaf in the innermost scope and applies its overflow policy.
///
/// `render` receives the box to render into and whether it was clipped.
pub(crate) fn place_leaf<F>(
    header: &ModelHeader,
    ctx: &mut ExportContext<'_>,
    render: F,
) -> Result<ExportStatus, ExportError>
where
    F: FnOnce(&mut ExportContext<'_>, Rect, bool) -> Result<(), ExportError>,
{
    let policy = ctx.overflow_policy(header);
    let layout = ctx.layouts.current_mut()?;
    let placement = layout.place(header.id)?;
    if placement.fit == Fit::HorizontalOverflow {
        log::trace!("'{}' wrapped to a new line", header.name);
    }
    if !placement.overflows() {
        render(ctx, placement.bbox, false)?;
        ctx.record_rendered();
        return Ok(ExportStatus::Finished);
    }

    match layout.resolve_overflow(header.id, &placement, policy) {
        OverflowAction::Stop => Ok(ExportStatus::Stopped),
        OverflowAction::RenderAndFinish(clipped) | OverflowAction::RenderAndContinue(clipped) => {
            render(ctx, clipped, true)?;
            ctx.record_rendered();
            Ok(ExportStatus::Finished)
        }
        OverflowAction::Retry(_) => {
            ctx.record_retry(placement.bbox.height);
            Ok(ExportStatus::Suspended)
        }
    }
}

/// Declared width/height of a model, falling back to `natural` per axis.
pub(crate) fn declared_or(header: &ModelHeader, available: Size, natural: Size) -> Size {
    tabulate_style::declared_size(
        header.attributes.get_as::<Width>(),
        header.attributes.get_as::<Height>(),
        available,
        natural,
    )
}
