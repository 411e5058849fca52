//! The explicit state threaded through model builders.

use crate::error::ExportError;
use std::collections::HashSet;
use tabulate_style::{AttributeConstraints, AttributeSet};
use tabulate_types::{ModelId, ModelKind};

/// Hands out model ids and names, and validates attribute attachment.
///
/// One context builds one document tree; ids are unique within it.
#[derive(Debug, Clone)]
pub struct BuildContext {
    next_id: u64,
    constraints: AttributeConstraints,
    names: HashSet<String>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    pub fn new() -> Self {
        Self::with_constraints(AttributeConstraints::standard().clone())
    }

    pub fn with_constraints(constraints: AttributeConstraints) -> Self {
        Self {
            next_id: 0,
            constraints,
            names: HashSet::new(),
        }
    }

    pub fn constraints(&self) -> &AttributeConstraints {
        &self.constraints
    }

    pub fn next_id(&mut self) -> ModelId {
        self.next_id += 1;
        ModelId::new(self.next_id)
    }

    /// A stable, unique name for a model.
    ///
    /// Caller-provided names are slugified; a clash gets the id appended. Unnamed
    /// models are named after their kind and id.
    pub fn name(&mut self, kind: ModelKind, id: ModelId, provided: Option<&str>) -> String {
        let base = match provided.map(slug::slugify) {
            Some(slug) if !slug.is_empty() => slug,
            _ => format!("{}-{}", slug::slugify(kind.as_str()), id.value()),
        };
        let name = if self.names.contains(&base) {
            format!("{}-{}", base, id.value())
        } else {
            base
        };
        self.names.insert(name.clone());
        name
    }

    /// Fails on the first attribute the constraint table forbids on `kind`.
    pub fn check(&self, kind: ModelKind, attributes: &AttributeSet) -> Result<(), ExportError> {
        for attribute in attributes.kinds() {
            self.constraints.check(kind, attribute)?;
        }
        Ok(())
    }

    /// Allocates the id, name and checked attribute set shared by every model builder.
    pub(crate) fn header(
        &mut self,
        kind: ModelKind,
        name: Option<&str>,
        attributes: AttributeSet,
    ) -> Result<crate::model::ModelHeader, ExportError> {
        self.check(kind, &attributes)?;
        let id = self.next_id();
        let name = self.name(kind, id, name);
        log::trace!("Built {} '{}' ({})", kind.as_str(), name, id);
        Ok(crate::model::ModelHeader {
            id,
            kind,
            name,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulate_style::{AttributeKind, ColumnWidth, RowHeight, Width};

    #[test]
    fn test_ids_are_sequential_per_context() {
        let mut first = BuildContext::new();
        let mut second = BuildContext::new();
        assert_eq!(first.next_id(), ModelId::new(1));
        assert_eq!(first.next_id(), ModelId::new(2));
        assert_eq!(second.next_id(), ModelId::new(1));
    }

    #[test]
    fn test_names_are_slugified_and_unique() {
        let mut ctx = BuildContext::new();
        let a = ctx.name(ModelKind::Table, ModelId::new(1), Some("Sales Report"));
        let b = ctx.name(ModelKind::Table, ModelId::new(2), Some("sales report"));
        let c = ctx.name(ModelKind::Text, ModelId::new(3), None);
        assert_eq!(a, "sales-report");
        assert_eq!(b, "sales-report-2");
        assert_eq!(c, "text-3");
    }

    #[test]
    fn test_forbidden_attribute_is_a_configuration_error() {
        let ctx = BuildContext::new();
        let row_only = AttributeSet::new().with(RowHeight::new(20.0));
        assert!(ctx.check(ModelKind::Row, &row_only).is_ok());
        let err = ctx.check(ModelKind::Text, &row_only).unwrap_err();
        assert!(matches!(err, ExportError::Attribute(_)), "got {err}");

        let relaxed = BuildContext::with_constraints(
            AttributeConstraints::standard()
                .clone()
                .enable(ModelKind::Text, AttributeKind::RowHeight)
                .disable(ModelKind::Text, AttributeKind::Width),
        );
        assert!(relaxed.check(ModelKind::Text, &row_only).is_ok());
        let width = AttributeSet::new().with(Width::pt(10.0));
        assert!(relaxed.check(ModelKind::Text, &width).is_err());
        let column = AttributeSet::new().with(ColumnWidth::fixed(30.0));
        assert!(relaxed.check(ModelKind::Column, &column).is_ok());
    }
}
