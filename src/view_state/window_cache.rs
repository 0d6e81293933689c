//! Row window cache: rendered output for exactly the rows in the visible range.
//!
//! Reuse is keyed by stable row key, never by position, so inserting or removing
//! rows ahead of the window cannot pair a cached render with the wrong row. A
//! cached render is only reused if the row's fingerprint is unchanged.
//!
//! Eviction is eager. After every [`RowWindowCache::materialize`] the cache holds
//! the current window and nothing else, so memory is bounded by the window size
//! regardless of how many rows the sequence has.

use super::visible_range::VisibleRange;
use crate::model::{ColumnModel, RenderedCell, Row, RowKey};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One materialized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Stable key, so the presentation layer can keep row-local UI state.
    pub key: RowKey,
    /// Position in the row sequence at the time of materialization.
    pub index: usize,
    /// One cell per column, left to right.
    pub cells: Vec<RenderedCell>,
    fingerprint: u64,
}

impl RenderedRow {
    fn render<R>(key: RowKey, index: usize, fingerprint: u64, row: &R, columns: &ColumnModel<R>) -> Self {
        Self {
            key,
            index,
            cells: columns.render_row(row),
            fingerprint,
        }
    }

    /// Height in text lines: the tallest cell.
    pub fn line_count(&self) -> u32 {
        let lines = self.cells.iter().map(RenderedCell::line_count).max().unwrap_or(1);
        u32::try_from(lines).unwrap_or(u32::MAX)
    }
}

/// Counters for render reuse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Rows served from a previous render.
    pub reused: u64,
    /// Rows rendered through the column accessors.
    pub rendered: u64,
}

/// Rendered rows for the current window.
#[derive(Debug, Default)]
pub struct RowWindowCache {
    rows: Vec<RenderedRow>,
    range: VisibleRange,
    stats: CacheStats,
}

impl RowWindowCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce rendered rows for `range`, reusing unchanged rows.
    ///
    /// The range is re-clamped to `rows.len()` first: it may have been computed
    /// against a longer sequence than the one now supplied.
    pub fn materialize<R: Row>(
        &mut self,
        rows: &[R],
        range: VisibleRange,
        columns: &ColumnModel<R>,
    ) -> &[RenderedRow] {
        let window = range.clamp_to(rows.len());
        if window != range {
            debug!(
                requested = ?range,
                clamped = ?window,
                row_count = rows.len(),
                "Re-clamped stale visible range"
            );
        }

        let mut previous: HashMap<RowKey, RenderedRow> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| (row.key.clone(), row))
            .collect();
        let mut seen = HashSet::with_capacity(window.len());
        let mut next = Vec::with_capacity(window.len());

        for index in window.indices() {
            let row = &rows[index];
            let key = row.key();
            let fingerprint = row.fingerprint();

            if !seen.insert(key.clone()) {
                warn!(%key, index, "Duplicate row key in window, rendering without reuse");
            }

            let rendered = match previous.remove(&key) {
                Some(mut cached) if cached.fingerprint == fingerprint => {
                    self.stats.reused += 1;
                    cached.index = index;
                    cached
                }
                _ => {
                    self.stats.rendered += 1;
                    RenderedRow::render(key, index, fingerprint, row, columns)
                }
            };
            next.push(rendered);
        }

        // Anything left in `previous` fell out of the window and is dropped here.
        self.rows = next;
        self.range = window;
        &self.rows
    }

    /// Rows of the last materialization, in display order.
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    /// Range of the last materialization (after clamping).
    pub fn range(&self) -> VisibleRange {
        self.range
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are cached.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cached row by key. Linear in the window size.
    pub fn get(&self, key: &RowKey) -> Option<&RenderedRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    /// Reuse counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every cached row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.range = VisibleRange::empty();
    }
}
