//! Newtype wrappers for identifiers.
//!
//! These keep model identifiers and document format keys from being mixed up
//! with plain integers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies one model node within a built document tree.
///
/// Ids are handed out by the build context in creation order, so they are
/// unique per tree and stable across export passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(u64);

impl ModelId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stable key selecting a backend (e.g. "csv", "xlsx", "pdf").
///
/// Keys are compared case-insensitively by normalizing to lower case on creation.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DocumentFormat(Arc<str>);

impl DocumentFormat {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentFormat {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for DocumentFormat {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
