//! The fluent builder traits shared by every model builder.

use crate::build::BuildContext;
use crate::error::ExportError;
use crate::model::Model;
use tabulate_style::{
    Alignment, Attribute, AttributeSet, Background, Borders, Height, Margins, Overflow,
    OverflowPolicy, TextStyles, Width,
};
use tabulate_types::Color;

/// Any builder that produces a model, so composite builders can hold heterogeneous children.
pub trait ModelBuilder {
    /// Consumes the builder, allocating ids from `ctx`.
    fn build_model(self: Box<Self>, ctx: &mut BuildContext) -> Result<Model, ExportError>;
}

/// An already built model can stand in wherever a child builder is expected.
impl ModelBuilder for Model {
    fn build_model(self: Box<Self>, _ctx: &mut BuildContext) -> Result<Model, ExportError> {
        Ok(*self)
    }
}

/// Fluent attribute setters. Attributes are validated against the model kind on `build`.
pub trait Attributed: Sized {
    fn attributes_mut(&mut self) -> &mut AttributeSet;

    fn with_attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes_mut().insert(attribute);
        self
    }

    /// Merges a whole set in; attributes already present are overridden field by field.
    fn with_attributes(mut self, attributes: &AttributeSet) -> Self {
        let merged = self.attributes_mut().merged_with(attributes);
        *self.attributes_mut() = merged;
        self
    }

    fn with_background(self, color: Color) -> Self {
        self.with_attribute(Background::color(color))
    }

    fn with_borders(self, borders: Borders) -> Self {
        self.with_attribute(borders)
    }

    fn with_alignment(self, alignment: Alignment) -> Self {
        self.with_attribute(alignment)
    }

    fn with_text_styles(self, styles: TextStyles) -> Self {
        self.with_attribute(styles)
    }

    fn with_width(self, width: f32) -> Self {
        self.with_attribute(Width::pt(width))
    }

    fn with_height(self, height: f32) -> Self {
        self.with_attribute(Height::pt(height))
    }

    fn with_margins(self, left: f32, top: f32) -> Self {
        self.with_attribute(Margins::new(left, top))
    }

    fn with_overflow(self, policy: OverflowPolicy) -> Self {
        self.with_attribute(Overflow::vertical(policy))
    }
}

/// Implements [`Attributed`] over an `attributes` field and [`ModelBuilder`] over the
/// builder's own `build`.
macro_rules! impl_model_builder {
    ($($name:ty),* $(,)?) => {
        $(
            impl $crate::model::builder::Attributed for $name {
                fn attributes_mut(&mut self) -> &mut tabulate_style::AttributeSet {
                    &mut self.attributes
                }
            }

            impl $crate::model::builder::ModelBuilder for $name {
                fn build_model(
                    self: Box<Self>,
                    ctx: &mut $crate::build::BuildContext,
                ) -> Result<$crate::model::Model, $crate::error::ExportError> {
                    (*self).build(ctx)
                }
            }
        )*
    };
}

pub(crate) use impl_model_builder;

/// Builds boxed child builders in order.
pub(crate) fn build_all(
    children: Vec<Box<dyn ModelBuilder>>,
    ctx: &mut BuildContext,
) -> Result<Vec<Model>, ExportError> {
    children.into_iter().map(|child| child.build_model(ctx)).collect()
}
