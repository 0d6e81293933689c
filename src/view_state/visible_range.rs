//! Visible range calculation result

use std::ops::Range;

/// Half-open range of row indices to materialize: visible rows plus overscan.
///
/// Derived from the viewport and the row count; never stored as authoritative state.
///
/// # Invariants
/// - `start_index <= end_index`
/// - `end_index <= row count` at the time of computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    /// Index of first materialized row (inclusive).
    pub start_index: usize,
    /// Index past the last materialized row (exclusive).
    pub end_index: usize,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start_index > end_index.
    pub fn new(start_index: usize, end_index: usize) -> Self {
        debug_assert!(
            start_index <= end_index,
            "start_index {} > end_index {}",
            start_index,
            end_index
        );
        Self {
            start_index,
            end_index,
        }
    }

    /// The empty range `[0, 0)`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Iterate over row indices in the range.
    pub fn indices(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Check if a specific row index is in the range.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Clamp to a row count that may have shrunk since this range was computed.
    pub fn clamp_to(&self, row_count: usize) -> Self {
        let end_index = self.end_index.min(row_count);
        let start_index = self.start_index.min(end_index);
        Self {
            start_index,
            end_index,
        }
    }
}
