//! Which attribute kinds may be attached to which model kinds.

use crate::AttributeError;
use crate::attribute::AttributeKind;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use tabulate_types::ModelKind;

use AttributeKind as A;

/// Attributes shared by everything that paints a box.
const VISUAL: &[AttributeKind] = &[A::Background, A::Borders, A::Alignment, A::TextStyles];

static STANDARD: Lazy<AttributeConstraints> = Lazy::new(|| {
    let mut constraints = AttributeConstraints::empty();
    for kind in ModelKind::ALL {
        let extra: &[AttributeKind] = match kind {
            ModelKind::Document => &[A::TemplateFile],
            ModelKind::Page => &[A::Background, A::Margins],
            ModelKind::Container => &[A::Width, A::Height, A::Margins, A::Overflow],
            ModelKind::Table => &[A::Width, A::Height, A::Margins, A::Overflow, A::TemplateFile],
            ModelKind::Column => &[A::ColumnWidth],
            ModelKind::Row => &[A::RowHeight],
            ModelKind::Cell => &[],
            ModelKind::Text => &[A::Width, A::Height, A::Margins, A::Overflow],
            ModelKind::Image => &[A::Width, A::Height, A::Margins, A::Overflow],
            ModelKind::Wrapper => &[A::Width, A::Height, A::Margins, A::Alignment],
            ModelKind::Margins | ModelKind::Spacing => &[A::Margins, A::Overflow],
        };
        let base: &[AttributeKind] = match kind {
            ModelKind::Document
            | ModelKind::Page
            | ModelKind::Margins
            | ModelKind::Spacing
            | ModelKind::Wrapper => &[],
            _ => VISUAL,
        };
        for attribute in base.iter().chain(extra) {
            constraints = constraints.enable(kind, *attribute);
        }
    }
    constraints
});

/// A per-model-kind allow list, consulted before an attribute is attached to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConstraints {
    allowed: HashMap<ModelKind, BTreeSet<AttributeKind>>,
}

impl Default for AttributeConstraints {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl AttributeConstraints {
    /// The built-in table.
    pub fn standard() -> &'static AttributeConstraints {
        &STANDARD
    }

    /// A table that allows nothing.
    pub fn empty() -> Self {
        Self {
            allowed: HashMap::new(),
        }
    }

    pub fn enable(mut self, model: ModelKind, attribute: AttributeKind) -> Self {
        self.allowed.entry(model).or_default().insert(attribute);
        self
    }

    pub fn disable(mut self, model: ModelKind, attribute: AttributeKind) -> Self {
        if let Some(kinds) = self.allowed.get_mut(&model) {
            kinds.remove(&attribute);
        }
        self
    }

    pub fn is_allowed(&self, model: ModelKind, attribute: AttributeKind) -> bool {
        self.allowed
            .get(&model)
            .is_some_and(|kinds| kinds.contains(&attribute))
    }

    pub fn check(&self, model: ModelKind, attribute: AttributeKind) -> Result<(), AttributeError> {
        if self.is_allowed(model, attribute) {
            Ok(())
        } else {
            log::debug!(
                "Rejecting attribute {} on model kind {}",
                attribute.as_str(),
                model.as_str()
            );
            Err(AttributeError::NotAllowed {
                attribute: attribute.as_str(),
                model: model.as_str(),
            })
        }
    }

    pub fn allowed_on(&self, model: ModelKind) -> impl Iterator<Item = AttributeKind> + '_ {
        self.allowed.get(&model).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = AttributeConstraints::standard();
        assert!(table.is_allowed(ModelKind::Cell, A::Background));
        assert!(table.is_allowed(ModelKind::Row, A::RowHeight));
        assert!(table.is_allowed(ModelKind::Table, A::Overflow));
        assert!(!table.is_allowed(ModelKind::Cell, A::RowHeight));
        assert!(!table.is_allowed(ModelKind::Cell, A::ColumnWidth));
        assert!(!table.is_allowed(ModelKind::Page, A::TextStyles));
    }

    #[test]
    fn test_disable_on_model() {
        let table = AttributeConstraints::default().disable(ModelKind::Text, A::Borders);
        assert!(!table.is_allowed(ModelKind::Text, A::Borders));
        assert!(table.is_allowed(ModelKind::Container, A::Borders));
        let err = table.check(ModelKind::Text, A::Borders).unwrap_err();
        assert!(err.to_string().contains("Borders"));
    }
}
