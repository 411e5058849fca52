use crate::entity::{EntityKind, RenderableEntity};
use crate::error::RenderError;
use std::collections::{BTreeSet, HashMap};
use tabulate_style::{Attribute, AttributeKind};
use tabulate_types::Size;

/// Renders one entity kind for one format.
pub type Operation<R> = Box<dyn Fn(&mut R, &RenderableEntity) -> Result<(), RenderError>>;

/// Applies one attribute of an entity, independently of the other attributes.
pub type AttributeOperationFn<R> =
    Box<dyn Fn(&mut R, &RenderableEntity, &Attribute) -> Result<(), RenderError>>;

/// Reports the natural size of an entity, or `None` when the backend cannot tell.
pub type MeasureOperation<R> =
    Box<dyn Fn(&mut R, &RenderableEntity) -> Result<Option<Size>, RenderError>>;

pub const DEFAULT_PRIORITY: i32 = 0;

pub struct AttributeOperation<R> {
    kind: AttributeKind,
    priority: i32,
    apply: AttributeOperationFn<R>,
}

impl<R> AttributeOperation<R> {
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn apply(
        &self,
        context: &mut R,
        entity: &RenderableEntity,
        attribute: &Attribute,
    ) -> Result<(), RenderError> {
        (self.apply)(context, entity, attribute)
    }
}

/// The callback tables one backend registers for its format.
///
/// Filled by a `BackendProvider` at startup and read-only afterwards.
pub struct OperationRegistry<R> {
    operations: HashMap<EntityKind, Vec<Operation<R>>>,
    attribute_operations: Vec<AttributeOperation<R>>,
    attribute_kind_order: Vec<AttributeKind>,
    measures: HashMap<EntityKind, MeasureOperation<R>>,
    mandatory: BTreeSet<EntityKind>,
}

impl<R> Default for OperationRegistry<R> {
    fn default() -> Self {
        Self {
            operations: HashMap::new(),
            attribute_operations: Vec::new(),
            attribute_kind_order: Vec::new(),
            measures: HashMap::new(),
            mandatory: BTreeSet::new(),
        }
    }
}

impl<R> OperationRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation for `kind`. Operations run in registration order.
    pub fn on<F>(&mut self, kind: EntityKind, operation: F) -> &mut Self
    where
        F: Fn(&mut R, &RenderableEntity) -> Result<(), RenderError> + 'static,
    {
        self.operations
            .entry(kind)
            .or_default()
            .push(Box::new(operation));
        self
    }

    /// Registers an attribute operation with the default priority.
    pub fn on_attribute<F>(&mut self, kind: AttributeKind, operation: F) -> &mut Self
    where
        F: Fn(&mut R, &RenderableEntity, &Attribute) -> Result<(), RenderError> + 'static,
    {
        self.on_attribute_with_priority(kind, DEFAULT_PRIORITY, operation)
    }

    pub fn on_attribute_with_priority<F>(
        &mut self,
        kind: AttributeKind,
        priority: i32,
        operation: F,
    ) -> &mut Self
    where
        F: Fn(&mut R, &RenderableEntity, &Attribute) -> Result<(), RenderError> + 'static,
    {
        if !self.attribute_kind_order.contains(&kind) {
            self.attribute_kind_order.push(kind);
        }
        self.attribute_operations.push(AttributeOperation {
            kind,
            priority,
            apply: Box::new(operation),
        });
        self
    }

    /// Replaces the measure operation for `kind`.
    pub fn measure<F>(&mut self, kind: EntityKind, operation: F) -> &mut Self
    where
        F: Fn(&mut R, &RenderableEntity) -> Result<Option<Size>, RenderError> + 'static,
    {
        self.measures.insert(kind, Box::new(operation));
        self
    }

    /// Declares that dispatching `kind` without any registered operation is a contract violation.
    pub fn require(&mut self, kind: EntityKind) -> &mut Self {
        self.mandatory.insert(kind);
        self
    }

    pub fn is_mandatory(&self, kind: EntityKind) -> bool {
        self.mandatory.contains(&kind)
    }

    pub fn operations(&self, kind: EntityKind) -> &[Operation<R>] {
        self.operations.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn measure_operation(&self, kind: EntityKind) -> Option<&MeasureOperation<R>> {
        self.measures.get(&kind)
    }

    pub fn attribute_operations(&self) -> &[AttributeOperation<R>] {
        &self.attribute_operations
    }

    /// Indices into `attribute_operations()` in execution order.
    ///
    /// Higher priority runs first. Equal priorities keep the order in which their
    /// attribute kinds were first registered, then the order of registration.
    pub fn attribute_execution_order(&self) -> Vec<usize> {
        let rank = |kind: AttributeKind| {
            self.attribute_kind_order
                .iter()
                .position(|k| *k == kind)
                .unwrap_or(usize::MAX)
        };
        let mut order: Vec<usize> = (0..self.attribute_operations.len()).collect();
        order.sort_by_key(|&i| {
            let op = &self.attribute_operations[i];
            (std::cmp::Reverse(op.priority), rank(op.kind))
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Vec<String>, _: &RenderableEntity, _: &Attribute) -> Result<(), RenderError> {
        Ok(())
    }

    #[test]
    fn test_attribute_order_prefers_priority_then_registration() {
        let mut registry: OperationRegistry<Vec<String>> = OperationRegistry::new();
        registry
            .on_attribute(AttributeKind::Borders, noop)
            .on_attribute(AttributeKind::Background, noop)
            .on_attribute_with_priority(AttributeKind::Alignment, 10, noop)
            .on_attribute(AttributeKind::Borders, noop);

        let kinds: Vec<AttributeKind> = registry
            .attribute_execution_order()
            .into_iter()
            .map(|i| registry.attribute_operations()[i].kind())
            .collect();

        assert_eq!(
            kinds,
            vec![
                AttributeKind::Alignment,
                AttributeKind::Borders,
                AttributeKind::Borders,
                AttributeKind::Background,
            ]
        );
    }

    #[test]
    fn test_unregistered_kind_has_empty_chain() {
        let registry: OperationRegistry<()> = OperationRegistry::new();
        assert!(registry.operations(EntityKind::Image).is_empty());
        assert!(!registry.is_mandatory(EntityKind::Image));
    }
}
