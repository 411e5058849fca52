use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Memoizes backend-specific values derived from an entity's attributes.
///
/// Keyed by `RenderableEntity::cache_key`. A value is computed once per key and
/// read many times; the cache lives as long as one export.
#[derive(Debug)]
pub struct ValueCache<V> {
    entries: HashMap<u64, V>,
    hits: usize,
    misses: usize,
}

impl<V> Default for ValueCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<V> ValueCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.entries.get(&key)
    }

    pub fn get_or_insert_with<F>(&mut self, key: u64, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries.entry(key).or_insert_with(compute)
    }

    /// Like `get_or_insert_with`, but a failed computation leaves the cache untouched.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: u64, compute: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let value = compute()?;
                self.misses += 1;
                Ok(&*entry.insert(value))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
