use crate::entity::{EntityKind, RenderableEntity};
use crate::error::RenderError;
use crate::operation::OperationRegistry;
use std::collections::HashMap;
use tabulate_types::{DocumentFormat, Size};

/// What the dispatcher resolved for one entity kind the first time it saw it.
#[derive(Debug, Clone, Copy)]
struct DispatchPlan {
    operations: usize,
    mandatory: bool,
}

/// Routes entities of one format to their registered operations.
pub struct Dispatcher<R> {
    format: DocumentFormat,
    registry: OperationRegistry<R>,
    attribute_order: Vec<usize>,
    plans: HashMap<EntityKind, DispatchPlan>,
}

impl<R> Dispatcher<R> {
    pub fn new(format: DocumentFormat, registry: OperationRegistry<R>) -> Self {
        let attribute_order = registry.attribute_execution_order();
        Self {
            format,
            registry,
            attribute_order,
            plans: HashMap::new(),
        }
    }

    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }

    fn plan(&mut self, kind: EntityKind) -> DispatchPlan {
        let registry = &self.registry;
        let format = &self.format;
        *self.plans.entry(kind).or_insert_with(|| {
            let plan = DispatchPlan {
                operations: registry.operations(kind).len(),
                mandatory: registry.is_mandatory(kind),
            };
            log::debug!(
                "Dispatch plan for '{}' in '{}': {} operation(s){}",
                kind.as_str(),
                format,
                plan.operations,
                if plan.mandatory { ", mandatory" } else { "" }
            );
            plan
        })
    }

    /// Runs the entity's operations, then its attribute operations in priority order.
    ///
    /// A kind without operations renders nothing unless the backend declared it mandatory.
    pub fn dispatch(&mut self, context: &mut R, entity: &RenderableEntity) -> Result<(), RenderError> {
        let plan = self.plan(entity.kind);
        if plan.operations == 0 && plan.mandatory {
            return Err(RenderError::EmptyOperationChain {
                format: self.format.to_string(),
                kind: entity.kind.as_str(),
            });
        }

        for operation in self.registry.operations(entity.kind) {
            operation(context, entity)?;
        }

        if entity.attributes.is_empty() {
            return Ok(());
        }
        let attribute_operations = self.registry.attribute_operations();
        for &index in &self.attribute_order {
            let operation = &attribute_operations[index];
            if let Some(attribute) = entity.attributes.get(operation.kind()) {
                operation.apply(context, entity, attribute)?;
            }
        }
        Ok(())
    }

    pub fn measure(
        &mut self,
        context: &mut R,
        entity: &RenderableEntity,
    ) -> Result<Option<Size>, RenderError> {
        match self.registry.measure_operation(entity.kind) {
            Some(measure) => measure(context, entity),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabulate_style::{
        Alignment, AttributeKind, AttributeSet, Background, HorizontalAlignment, VerticalAlignment,
    };
    use tabulate_types::{Color, ModelId};

    fn entity(kind: EntityKind) -> RenderableEntity {
        RenderableEntity::new(kind, ModelId::new(1))
    }

    #[test]
    fn test_missing_operations_are_silent() {
        let mut dispatcher = Dispatcher::new("txt".into(), OperationRegistry::<Vec<String>>::new());
        let mut log = Vec::new();
        dispatcher.dispatch(&mut log, &entity(EntityKind::Image)).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_mandatory_kind_without_operations_fails() {
        let mut registry = OperationRegistry::<Vec<String>>::new();
        registry.require(EntityKind::RowEnd);
        let mut dispatcher = Dispatcher::new("csv".into(), registry);

        let err = dispatcher
            .dispatch(&mut Vec::new(), &entity(EntityKind::RowEnd))
            .unwrap_err();
        assert!(
            matches!(err, RenderError::EmptyOperationChain { kind: "row-end", .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_attribute_operations_only_run_for_present_attributes() {
        let mut registry = OperationRegistry::<Vec<String>>::new();
        registry
            .on(EntityKind::Cell, |log, e| {
                log.push(format!("cell:{}", e.text()));
                Ok(())
            })
            .on_attribute(AttributeKind::Background, |log, _, _| {
                log.push("background".into());
                Ok(())
            })
            .on_attribute_with_priority(AttributeKind::Alignment, 5, |log, _, _| {
                log.push("alignment".into());
                Ok(())
            })
            .on_attribute(AttributeKind::Borders, |log, _, _| {
                log.push("borders".into());
                Ok(())
            });
        let mut dispatcher = Dispatcher::new("test".into(), registry);

        let styled = entity(EntityKind::Cell)
            .with_value(Some("x".into()))
            .with_attributes(
                AttributeSet::new()
                    .with(Background::color(Color::BLUE))
                    .with(Alignment::new(HorizontalAlignment::Center, VerticalAlignment::Top)),
            );
        let mut log = Vec::new();
        dispatcher.dispatch(&mut log, &styled).unwrap();

        assert_eq!(log, vec!["cell:x", "alignment", "background"]);
    }

    #[test]
    fn test_measure_defaults_to_unknown() {
        let mut registry = OperationRegistry::<()>::new();
        registry.measure(EntityKind::Text, |_, e| {
            Ok(Some(Size::new(e.text().len() as f32, 1.0)))
        });
        let mut dispatcher = Dispatcher::new("test".into(), registry);

        let text = entity(EntityKind::Text).with_value(Some("abc".into()));
        assert_eq!(dispatcher.measure(&mut (), &text).unwrap(), Some(Size::new(3.0, 1.0)));
        assert_eq!(dispatcher.measure(&mut (), &entity(EntityKind::Image)).unwrap(), None);
    }
}
