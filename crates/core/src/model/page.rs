//! Pages: the unit of pagination.
//!
//! A page is exported in passes. Each pass renders one physical page: header, as much
//! content as fits, footer. Passes repeat while content is suspended under RETRY.

use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::builder::{ModelBuilder, build_all, impl_model_builder};
use crate::model::{Model, ModelHeader, Node, export_children};
use crate::template::{ExportContext, ExportStatus, ExportTemplate, PAGE_NAME, PAGE_NUMBER, SHEET_NAME};
use tabulate_layout::{LayoutError, Position, Rect, Size};
use tabulate_render_core::EntityKind;
use tabulate_style::{AttributeSet, Margins};
use tabulate_types::{ModelKind, Orientation};

#[derive(Debug, Clone)]
pub struct Page {
    /// Sheet name for backends that have sheets; defaults to the model name.
    pub name: Option<String>,
    pub header: Option<Box<Model>>,
    pub footer: Option<Box<Model>>,
    pub content: Vec<Model>,
}

impl Page {
    /// The printable area: the page size less the page margins on every side.
    fn area(&self, header: &ModelHeader, ctx: &ExportContext<'_>) -> Rect {
        let size = ctx.config.page_size.dimensions_pt();
        let margins = header
            .attributes
            .get_as::<Margins>()
            .map(Margins::offset)
            .unwrap_or_default();
        Rect::new(
            margins.width,
            margins.height,
            (size.width - 2.0 * margins.width).max(0.0),
            (size.height - 2.0 * margins.height).max(0.0),
        )
    }

    /// Exports a header or footer into `region`; returns the extent it used.
    fn export_decoration(
        model: &Model,
        owner: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        region: Rect,
    ) -> Result<Rect, ExportError> {
        ctx.layouts.open(owner.id, Orientation::Vertical, Some(region));
        if model.export(ctx)? != ExportStatus::Finished {
            log::warn!(
                "Page decoration '{}' does not fit the page and was cut",
                model.name()
            );
        }
        Ok(ctx.layouts.close()?.used_rect())
    }

    /// One physical page. Reports whether any content unit was rendered.
    fn export_pass(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        area: Rect,
    ) -> Result<(ExportStatus, bool), ExportError> {
        let mut top = area.y;
        if let Some(decoration) = &self.header {
            ctx.states.reset(decoration.ids());
            let used = Self::export_decoration(decoration, header, ctx, area)?;
            top = top.max(used.bottom());
        }

        let footer_height = match &self.footer {
            Some(footer) => {
                ctx.states.reset(footer.ids());
                footer.measure(ctx, area.size())?.height.min(area.height)
            }
            None => 0.0,
        };
        let bottom = (area.bottom() - footer_height).max(top);

        let content_area = Rect::from_corners(
            Position::new(area.x, top),
            Position::new(area.right(), bottom),
        );
        ctx.layouts.open(header.id, Orientation::Vertical, Some(content_area));
        let rendered_before = ctx.rendered();
        let status = export_children(&self.content, ctx)?;
        let made_progress = ctx.rendered() > rendered_before;
        ctx.layouts.close()?;

        if let Some(footer) = &self.footer {
            let region = Rect::new(area.x, bottom, area.width, footer_height);
            Self::export_decoration(footer, header, ctx, region)?;
        }

        Ok((status, made_progress))
    }
}

impl ExportTemplate for Page {
    fn measure(
        &self,
        _header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
        _available: Size,
    ) -> Result<Size, ExportError> {
        Ok(ctx.config.page_size.dimensions_pt())
    }

    fn export(
        &self,
        header: &ModelHeader,
        ctx: &mut ExportContext<'_>,
    ) -> Result<ExportStatus, ExportError> {
        let area = self.area(header, ctx);
        let sheet = self.name.clone().unwrap_or_else(|| header.name.clone());

        loop {
            let number = ctx.start_page();
            if number > ctx.config.max_pages {
                return Err(ExportError::Config(format!(
                    "Export exceeded the maximum of {} pages",
                    ctx.config.max_pages
                )));
            }
            ctx.layouts.reset_layouts(area);
            for id in ctx.layouts.resume_suspended() {
                ctx.states.resume(id)?;
            }
            ctx.take_retried_height();
            ctx.values.set(PAGE_NUMBER, number);
            ctx.values.set(PAGE_NAME, header.name.clone());
            ctx.values.set(SHEET_NAME, sheet.clone());
            log::debug!("Exporting page {} of '{}'", number, header.name);

            ctx.emit(
                header
                    .entity(EntityKind::PageStart)
                    .with_name(sheet.clone())
                    .with_attributes(header.attributes.clone()),
            )?;
            let (status, made_progress) = self.export_pass(header, ctx, area)?;
            ctx.emit(header.entity(EntityKind::PageEnd).with_name(sheet.clone()))?;

            match status {
                ExportStatus::Suspended if !made_progress => {
                    let height = ctx.take_retried_height().unwrap_or(area.height);
                    return Err(LayoutError::ElementTooLarge(height, area.height).into());
                }
                ExportStatus::Suspended => {
                    log::debug!("Page {} ended with suspended content; continuing", number);
                }
                ExportStatus::Finished | ExportStatus::Stopped => return Ok(ExportStatus::Finished),
            }
        }
    }
}

#[derive(Default)]
pub struct PageBuilder {
    name: Option<String>,
    attributes: AttributeSet,
    header: Option<Box<dyn ModelBuilder>>,
    footer: Option<Box<dyn ModelBuilder>>,
    content: Vec<Box<dyn ModelBuilder>>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_header(mut self, header: impl ModelBuilder + 'static) -> Self {
        self.header = Some(Box::new(header));
        self
    }

    pub fn with_footer(mut self, footer: impl ModelBuilder + 'static) -> Self {
        self.footer = Some(Box::new(footer));
        self
    }

    pub fn with_content(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.content.push(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let header = ctx.header(ModelKind::Page, self.name.as_deref(), self.attributes)?;
        let decoration = match self.header {
            Some(builder) => Some(Box::new(builder.build_model(ctx)?)),
            None => None,
        };
        let content = build_all(self.content, ctx)?;
        let footer = match self.footer {
            Some(builder) => Some(Box::new(builder.build_model(ctx)?)),
            None => None,
        };
        Ok(Model {
            header,
            node: Node::Page(Page {
                name: self.name,
                header: decoration,
                footer,
                content,
            }),
        })
    }
}

impl_model_builder!(PageBuilder);
