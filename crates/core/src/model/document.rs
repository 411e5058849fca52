use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::builder::{ModelBuilder, build_all, impl_model_builder};
use crate::model::page::PageBuilder;
use crate::model::{Model, ModelHeader, Node};
use crate::template::{ExportContext, ExportStatus, ExportTemplate};
use tabulate_layout::Size;
use tabulate_render_core::EntityKind;
use tabulate_style::AttributeSet;
use tabulate_types::ModelKind;

/// The root of a model tree. Its children are always pages.
#[derive(Debug, Clone)]
pub struct Document {
    pub pages: Vec<Model>,
}

impl ExportTemplate for Document {
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
        log::info!("Exporting document '{}' ({} page model(s))", header.name, self.pages.len());
        ctx.emit(
            header
                .entity(EntityKind::DocumentStart)
                .with_attributes(header.attributes.clone()),
        )?;
        for page in &self.pages {
            page.export(ctx)?;
        }
        ctx.emit(header.entity(EntityKind::DocumentEnd))?;
        log::info!("Document '{}' exported on {} page(s)", header.name, ctx.page());
        Ok(ExportStatus::Finished)
    }
}

#[derive(Default)]
pub struct DocumentBuilder {
    name: Option<String>,
    attributes: AttributeSet,
    children: Vec<Box<dyn ModelBuilder>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a page, or any other model. Consecutive non-page models share one implicit page.
    pub fn with_child(mut self, child: impl ModelBuilder + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn build(self, ctx: &mut BuildContext) -> Result<Model, ExportError> {
        let header = ctx.header(ModelKind::Document, self.name.as_deref(), self.attributes)?;

        let mut pages = Vec::new();
        let mut loose: Vec<Model> = Vec::new();
        for model in build_all(self.children, ctx)? {
            if model.kind() == ModelKind::Page {
                if !loose.is_empty() {
                    pages.push(implicit_page(std::mem::take(&mut loose), ctx)?);
                }
                pages.push(model);
            } else {
                loose.push(model);
            }
        }
        if !loose.is_empty() {
            pages.push(implicit_page(loose, ctx)?);
        }

        Ok(Model {
            header,
            node: Node::Document(Document { pages }),
        })
    }
}

fn implicit_page(content: Vec<Model>, ctx: &mut BuildContext) -> Result<Model, ExportError> {
    content
        .into_iter()
        .fold(PageBuilder::new(), |page, model| page.with_content(model))
        .build(ctx)
}

impl_model_builder!(DocumentBuilder);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextBuilder;

    #[test]
    fn test_loose_children_are_grouped_into_implicit_pages() {
        let mut ctx = BuildContext::new();
        let document = DocumentBuilder::new()
            .with_child(TextBuilder::new("a"))
            .with_child(TextBuilder::new("b"))
            .with_child(PageBuilder::new().with_name("Explicit"))
            .with_child(TextBuilder::new("c"))
            .build(&mut ctx)
            .unwrap();

        let pages = document.children();
        let kinds: Vec<ModelKind> = pages.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ModelKind::Page; 3]);
        assert_eq!(pages[0].children().len(), 2);
        assert_eq!(pages[1].name(), "explicit");
        assert_eq!(pages[2].children()[0].name(), "text-5");
    }
}
