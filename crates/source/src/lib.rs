//! Data source abstractions for the export engine.
//!
//! This module provides the `DataSource` trait and implementations for
//! feeding records into table exports. Sources are pull-based, single-pass and
//! single-consumer: a table resolver drains one source at a time and never rewinds it.
//!
//! ## Available Sources
//!
//! - `IteratorDataSource`: Wraps any iterator
//! - `VecDataSource`: In-memory vector of records
//!
//! ## Example
//!
//! ```ignore
//! use tabulate_source::{DataSource, VecDataSource};
//! use serde_json::json;
//!
//! let data = vec![json!({"id": 1}), json!({"id": 2})];
//! let mut source = VecDataSource::new(data);
//!
//! while let Some(item) = source.next() {
//!     println!("Processing: {:?}", item);
//! }
//! ```

use serde::Serialize;
use serde_json::Value;

/// A trait for sources that feed records into a table export.
///
/// Records are plain JSON values; typed records enter through
/// [`VecDataSource::from_serializable`].
pub trait DataSource: Send {
    /// Get the next record, if available.
    ///
    /// Returns `None` when the source is exhausted.
    fn next(&mut self) -> Option<Value>;

    /// Hint about the total number of records.
    ///
    /// Returns `None` if the size is unknown or unbounded.
    fn size_hint(&self) -> Option<usize> {
        None
    }

    /// Check if the source has a known size.
    fn has_known_size(&self) -> bool {
        self.size_hint().is_some()
    }
}

/// Wraps any iterator as a DataSource.
pub struct IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    inner: I,
    size_hint: Option<usize>,
}

impl<I> IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    /// Create a new data source from an iterator.
    pub fn new(inner: I) -> Self {
        let (lower, upper) = inner.size_hint();
        let size_hint = if upper == Some(lower) {
            Some(lower)
        } else {
            None
        };
        Self { inner, size_hint }
    }
}

impl<I> DataSource for IteratorDataSource<I>
where
    I: Iterator<Item = Value> + Send,
{
    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> Option<usize> {
        self.size_hint
    }
}

/// A data source backed by an in-memory vector.
///
/// Records are handed out by value; each one is yielded exactly once.
pub struct VecDataSource {
    data: std::vec::IntoIter<Value>,
    len: usize,
}

impl VecDataSource {
    /// Create a new data source from a vector.
    pub fn new(data: Vec<Value>) -> Self {
        let len = data.len();
        Self {
            data: data.into_iter(),
            len,
        }
    }

    /// Serializes typed records into JSON values.
    pub fn from_serializable<T: Serialize>(items: &[T]) -> Result<Self, serde_json::Error> {
        let data = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(data))
    }

    /// Get the total number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of records remaining.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl DataSource for VecDataSource {
    fn next(&mut self) -> Option<Value> {
        self.data.next()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl DataSource for Box<dyn DataSource> {
    fn next(&mut self) -> Option<Value> {
        (**self).next()
    }

    fn size_hint(&self) -> Option<usize> {
        (**self).size_hint()
    }
}

/// Reads a field off a record.
///
/// `path` is either a JSON pointer (`/customer/name`) or a dotted path
/// (`customer.name`, `lines.0.amount`). A missing field yields `None`, never an error.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.starts_with('/') {
        return record.pointer(path);
    }
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
