use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tabulate_source::lookup;

/// An export phase a row index can be relative to.
///
/// `Dataset` indices are absolute. `Trailing` indices count from the first row after
/// the data source is exhausted, which is how footers are declared without knowing the
/// size of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Dataset,
    Trailing,
}

/// A declared row position. Orders by step first, then by index within the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIndexDef {
    pub step: Step,
    pub index: usize,
}

impl RowIndexDef {
    pub const fn at(index: usize) -> Self {
        Self {
            step: Step::Dataset,
            index,
        }
    }

    pub const fn trailing(index: usize) -> Self {
        Self {
            step: Step::Trailing,
            index,
        }
    }
}

impl fmt::Display for RowIndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Step::Dataset => write!(f, "{}", self.index),
            Step::Trailing => write!(f, "trailing+{}", self.index),
        }
    }
}

/// The index the resolver is asked for: an absolute row index plus the step it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIndex {
    pub value: usize,
    pub step: Step,
    /// Absolute index at which `step` began.
    pub step_start: usize,
}

impl Default for RowIndex {
    fn default() -> Self {
        Self {
            value: 0,
            step: Step::Dataset,
            step_start: 0,
        }
    }
}

impl RowIndex {
    pub fn new(value: usize) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// The declared position this absolute index corresponds to.
    pub fn def(&self) -> RowIndexDef {
        RowIndexDef {
            step: self.step,
            index: self.value - self.step_start,
        }
    }

    pub fn next(&self) -> RowIndex {
        RowIndex {
            value: self.value + 1,
            ..*self
        }
    }

    /// Moves forward to a declared position at or after this one.
    ///
    /// Entering a new step starts it at the current absolute index.
    pub fn advance_to(&self, target: RowIndexDef) -> RowIndex {
        if target.step == self.step {
            RowIndex {
                value: self.step_start + target.index,
                ..*self
            }
        } else {
            RowIndex {
                value: self.value + target.index,
                step: target.step,
                step_start: self.value,
            }
        }
    }
}

/// The transient descriptor passed through row resolution and to row predicates.
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a> {
    pub index: RowIndex,
    pub record: Option<&'a Value>,
    /// Position of `record` in the data source.
    pub ordinal: Option<usize>,
}

impl<'a> SourceRow<'a> {
    pub fn new(index: RowIndex, record: Option<&'a Value>, ordinal: Option<usize>) -> Self {
        Self {
            index,
            record,
            ordinal,
        }
    }

    /// Absolute index of the row in the rendered table.
    pub fn row_index(&self) -> usize {
        self.index.value
    }

    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }

    /// Reads a field of the record by dotted path or JSON pointer.
    pub fn field(&self, path: &str) -> Option<&'a Value> {
        self.record.and_then(|record| lookup(record, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_defs_order_dataset_before_trailing() {
        let mut defs = vec![
            RowIndexDef::trailing(0),
            RowIndexDef::at(10),
            RowIndexDef::at(2),
            RowIndexDef::trailing(1),
        ];
        defs.sort();
        assert_eq!(
            defs,
            vec![
                RowIndexDef::at(2),
                RowIndexDef::at(10),
                RowIndexDef::trailing(0),
                RowIndexDef::trailing(1),
            ]
        );
    }

    #[test]
    fn test_entering_trailing_step_keeps_absolute_position() {
        let index = RowIndex::new(3);
        let footer = index.advance_to(RowIndexDef::trailing(0));
        assert_eq!(footer.value, 3);
        assert_eq!(footer.def(), RowIndexDef::trailing(0));

        let after = footer.next();
        assert_eq!(after.value, 4);
        assert_eq!(after.def(), RowIndexDef::trailing(1));

        let skipped = after.advance_to(RowIndexDef::trailing(5));
        assert_eq!(skipped.value, 8);
    }

    #[test]
    fn test_fast_forward_within_dataset_step() {
        let index = RowIndex::new(0).advance_to(RowIndexDef::at(10));
        assert_eq!(index.value, 10);
        assert_eq!(index.def(), RowIndexDef::at(10));
    }
}
