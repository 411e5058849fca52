use crate::attribute::{Attribute, AttributeKind, AttributePayload};
use crate::constraints::AttributeConstraints;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use tabulate_types::ModelKind;

/// An unordered set of attributes holding at most one instance per [`AttributeKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: BTreeMap<AttributeKind, Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute. A second instance of the same type is merged into the first.
    pub fn insert(&mut self, attribute: impl Into<Attribute>) {
        let attribute = attribute.into();
        let kind = attribute.kind();
        let merged = match self.attributes.get(&kind) {
            Some(existing) => existing.override_with(&attribute),
            None => attribute,
        };
        self.attributes.insert(kind, merged);
    }

    pub fn with(mut self, attribute: impl Into<Attribute>) -> Self {
        self.insert(attribute);
        self
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attributes.get(&kind)
    }

    /// Typed lookup, e.g. `set.get_as::<Background>()`.
    pub fn get_as<T: AttributePayload>(&self) -> Option<&T> {
        self.attributes.get(&T::KIND).and_then(T::from_attribute)
    }

    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.attributes.contains_key(&kind)
    }

    pub fn remove(&mut self, kind: AttributeKind) -> Option<Attribute> {
        self.attributes.remove(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
        self.attributes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Right-biased merge: `other` overrides `self` per type and per field.
    pub fn merged_with(&self, other: &AttributeSet) -> AttributeSet {
        let mut result = self.clone();
        for attribute in other.iter() {
            result.insert(attribute.clone());
        }
        result
    }

    /// Folds levels ordered coarsest to finest. Absent levels are no-ops.
    pub fn merge<'a, I>(levels: I) -> AttributeSet
    where
        I: IntoIterator<Item = Option<&'a AttributeSet>>,
    {
        levels
            .into_iter()
            .flatten()
            .fold(AttributeSet::new(), |acc, level| acc.merged_with(level))
    }

    /// Keeps only the attributes the constraint table allows on `target`.
    pub fn for_target(&self, target: ModelKind, constraints: &AttributeConstraints) -> AttributeSet {
        AttributeSet {
            attributes: self
                .attributes
                .iter()
                .filter(|(kind, _)| constraints.is_allowed(target, **kind))
                .map(|(kind, attribute)| (*kind, attribute.clone()))
                .collect(),
        }
    }

    /// A stable hash of the whole set, used to memoize derived backend values.
    pub fn cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl<A: Into<Attribute>> FromIterator<A> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let mut set = AttributeSet::new();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}

impl Add for AttributeSet {
    type Output = AttributeSet;

    fn add(self, rhs: AttributeSet) -> AttributeSet {
        self.merged_with(&rhs)
    }
}

impl<'a> Add<&'a AttributeSet> for &'a AttributeSet {
    type Output = AttributeSet;

    fn add(self, rhs: &'a AttributeSet) -> AttributeSet {
        self.merged_with(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Background, Borders, Border, BorderStyle, FillPattern, RowHeight, TextStyles};
    use tabulate_types::Color;

    #[test]
    fn test_merge_is_right_biased_per_field() {
        let table = AttributeSet::new().with(Background::color(Color::BLACK).with_fill(FillPattern::Dotted));
        let column = AttributeSet::new().with(Background::color(Color::WHITE));

        let merged = AttributeSet::merge([Some(&table), Some(&column)]);
        let background = merged.get_as::<Background>().unwrap();
        assert_eq!(background.color, Some(Color::WHITE));
        assert_eq!(background.fill, Some(FillPattern::Dotted));
    }

    #[test]
    fn test_three_levels_equal_pairwise_fold() {
        let a = AttributeSet::new()
            .with(Background::color(Color::BLACK))
            .with(RowHeight::new(10.0));
        let b = AttributeSet::new().with(TextStyles {
            font_size: Some(9.0),
            ..Default::default()
        });
        let c = AttributeSet::new()
            .with(Background {
                color: None,
                fill: Some(FillPattern::Bricks),
            })
            .with(RowHeight::new(14.0));

        let folded = AttributeSet::merge([Some(&a), Some(&b), Some(&c)]);
        let pairwise = &(&a + &b) + &c;
        assert_eq!(folded, pairwise);
        assert_eq!(folded.get_as::<RowHeight>(), Some(&RowHeight::new(14.0)));
        assert_eq!(
            folded.get_as::<Background>().unwrap().color,
            Some(Color::BLACK),
            "color from the coarsest level survives"
        );
    }

    #[test]
    fn test_absent_levels_are_identity() {
        let a = AttributeSet::new().with(Background::color(Color::RED));
        assert_eq!(AttributeSet::merge([None, Some(&a), None]), a);
        assert!(AttributeSet::merge([None, None]).is_empty());
    }

    #[test]
    fn test_insert_same_kind_merges() {
        let mut set = AttributeSet::new();
        set.insert(Borders {
            left: Some(Border::new(1.0, BorderStyle::Solid, Color::BLACK)),
            ..Default::default()
        });
        set.insert(Borders {
            right: Some(Border::new(2.0, BorderStyle::Dashed, Color::BLUE)),
            ..Default::default()
        });
        assert_eq!(set.len(), 1);
        let borders = set.get_as::<Borders>().unwrap();
        assert!(borders.left.is_some() && borders.right.is_some());
    }

    #[test]
    fn test_for_target_filters_disallowed_kinds() {
        let set = AttributeSet::new()
            .with(Background::color(Color::RED))
            .with(crate::ColumnWidth::fixed(40.0));
        let cell = set.for_target(ModelKind::Cell, AttributeConstraints::standard());
        assert!(cell.contains(AttributeKind::Background));
        assert!(!cell.contains(AttributeKind::ColumnWidth));
    }

    #[test]
    fn test_cache_key_is_stable_for_equal_sets() {
        let a = AttributeSet::new().with(Background::color(Color::RED));
        let b = AttributeSet::new().with(Background::color(Color::RED));
        let c = AttributeSet::new().with(Background::color(Color::BLUE));
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
    }
}
