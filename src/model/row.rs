//! Row identity.
//!
//! The grid never looks inside a row except through column accessors. What it
//! does need is identity: a stable key to track a row across re-windowing, and a
//! fingerprint to tell whether a row with a known key still renders the same.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Ordered sequence of rows handed to the grid by the data source.
///
/// Insertion order is display order. The grid only holds the `Arc` it was last
/// given and never relies on its identity persisting across updates.
pub type RowSequence<R> = Arc<[R]>;

/// Stable row key: the row's natural unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(String);

impl RowKey {
    /// Create a key from its textual form.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Textual form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RowKey {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RowKey {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A record that can be displayed by the grid.
pub trait Row {
    /// Stable identity of this row. Must be unique within a sequence.
    fn key(&self) -> RowKey;

    /// Content fingerprint. Two rows with the same key and fingerprint are
    /// assumed to render identically, so the previous render is reused.
    fn fingerprint(&self) -> u64;
}

/// Fingerprint any hashable value.
///
/// Convenience for `Row::fingerprint` implementations on plain structs.
pub fn fingerprint_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
