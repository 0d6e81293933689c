//! Viewport tracking: scroll offset and container height to row window.
//!
//! The tracker only records events. Recomputing the window is the caller's
//! decision, so a burst of scroll events costs one store each and a single
//! range computation per frame.

use super::height_index::HeightIndex;
use super::types::{RowHeight, RowHeightMode};
use super::visible_range::VisibleRange;
use tracing::trace;

/// Overscan used when none is configured.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Scroll and size state of one mounted grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    /// Distance from the top of the content to the top of the viewport.
    pub scroll_offset: u64,
    /// Height of the body viewport (header excluded).
    pub container_height: u32,
    /// Fixed row height, or the estimate for unmeasured rows.
    pub estimated_row_height: RowHeight,
    /// Extra rows materialized beyond each visible edge.
    pub overscan_count: usize,
}

impl ViewportState {
    /// State at the top of an empty viewport.
    pub fn new(estimated_row_height: RowHeight, overscan_count: usize) -> Self {
        Self {
            scroll_offset: 0,
            container_height: 0,
            estimated_row_height,
            overscan_count,
        }
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(total_height: u64, container_height: u32) -> u64 {
    total_height.saturating_sub(u64::from(container_height))
}

/// Window for uniform row heights.
///
/// `first = floor(offset / h)`, `start = max(0, first - overscan)`,
/// `end = min(row_count, first + visible + overscan)` where
/// `visible = ceil((offset % h + container) / h)`: a viewport that starts part
/// way into a row also reaches part way into the row past `ceil(container / h)`.
/// Offsets past the content clamp to the last full window.
pub fn compute_visible_range(
    state: &ViewportState,
    row_count: usize,
    row_height: RowHeight,
) -> VisibleRange {
    if row_count == 0 {
        return VisibleRange::empty();
    }

    let h = u64::from(row_height.get());
    let total = h.saturating_mul(row_count as u64);
    let offset = state
        .scroll_offset
        .min(max_scroll_offset(total, state.container_height));

    let first = usize::try_from(offset / h).unwrap_or(usize::MAX).min(row_count);
    let visible_rows = usize::try_from((offset % h + u64::from(state.container_height)).div_ceil(h))
        .unwrap_or(usize::MAX);

    let start = first.saturating_sub(state.overscan_count);
    let end = first
        .saturating_add(visible_rows)
        .saturating_add(state.overscan_count)
        .min(row_count);
    VisibleRange::new(start, end)
}

/// Window for measured/estimated row heights, using the cumulative-offset index.
///
/// Covers every row intersecting `[offset, offset + container)` plus overscan.
pub fn compute_visible_range_variable(state: &ViewportState, heights: &HeightIndex) -> VisibleRange {
    let row_count = heights.len();
    if row_count == 0 {
        return VisibleRange::empty();
    }

    let offset = state
        .scroll_offset
        .min(max_scroll_offset(heights.total(), state.container_height));

    let first = heights.lower_bound(offset).unwrap_or(row_count);
    let visible_end = if state.container_height == 0 {
        first
    } else {
        let bottom = offset + u64::from(state.container_height) - 1;
        heights.lower_bound(bottom).map_or(row_count, |i| i + 1)
    };

    let start = first.saturating_sub(state.overscan_count);
    let end = visible_end
        .saturating_add(state.overscan_count)
        .min(row_count);
    VisibleRange::new(start, end.max(start))
}

/// Owns the viewport state and the row height model.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    state: ViewportState,
    mode: RowHeightMode,
    /// Per-row heights; only populated in variable mode.
    heights: HeightIndex,
    row_count: usize,
}

impl ViewportTracker {
    /// Tracker with no rows and a zero-height container.
    pub fn new(mode: RowHeightMode, overscan_count: usize) -> Self {
        Self {
            state: ViewportState::new(mode.estimate(), overscan_count),
            mode,
            heights: HeightIndex::new(),
            row_count: 0,
        }
    }

    /// Recorded scroll and size state.
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Fixed or variable row heights.
    pub fn mode(&self) -> RowHeightMode {
        self.mode
    }

    /// Rows the window is computed against.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Record a new row count.
    ///
    /// In variable mode new rows enter the height index at the estimate; measured
    /// heights of rows that still exist are kept (they are positional).
    pub fn set_row_count(&mut self, row_count: usize) {
        if self.mode.is_variable() {
            self.heights.resize(row_count, self.state.estimated_row_height.get());
        }
        self.row_count = row_count;
    }

    /// Record a scroll position. Does not recompute anything.
    pub fn on_scroll(&mut self, offset: u64) {
        self.state.scroll_offset = offset;
    }

    /// Scroll relative to the effective offset, clamped to the content.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = self.effective_offset().saturating_add_signed(delta);
        self.state.scroll_offset = target.min(self.max_scroll());
    }

    /// Record a container height. Does not recompute anything.
    pub fn on_resize(&mut self, container_height: u32) {
        self.state.container_height = container_height;
    }

    /// Total content height.
    pub fn total_height(&self) -> u64 {
        match self.mode {
            RowHeightMode::Fixed(h) => u64::from(h.get()).saturating_mul(self.row_count as u64),
            RowHeightMode::Variable { .. } => self.heights.total(),
        }
    }

    /// Largest offset that still fills the viewport.
    pub fn max_scroll(&self) -> u64 {
        max_scroll_offset(self.total_height(), self.state.container_height)
    }

    /// Scroll offset after clamping to the content.
    pub fn effective_offset(&self) -> u64 {
        self.state.scroll_offset.min(self.max_scroll())
    }

    /// Compute the window for the current state. O(1) fixed, O(log n) variable.
    pub fn visible_range(&self) -> VisibleRange {
        match self.mode {
            RowHeightMode::Fixed(h) => compute_visible_range(&self.state, self.row_count, h),
            RowHeightMode::Variable { .. } => {
                compute_visible_range_variable(&self.state, &self.heights)
            }
        }
    }

    /// Top offset of a row, clamped to the end of the content.
    pub fn offset_of(&self, index: usize) -> u64 {
        let index = index.min(self.row_count);
        match self.mode {
            RowHeightMode::Fixed(h) => u64::from(h.get()).saturating_mul(index as u64),
            RowHeightMode::Variable { .. } => self.heights.offset_of(index),
        }
    }

    /// Current height of a row (fixed, measured or estimated).
    pub fn row_height(&self, index: usize) -> u32 {
        match self.mode {
            RowHeightMode::Fixed(h) => h.get(),
            RowHeightMode::Variable { estimate } => {
                if index < self.heights.len() {
                    self.heights.height(index)
                } else {
                    estimate.get()
                }
            }
        }
    }

    /// Feed back the measured height of a rendered row (variable mode only).
    ///
    /// A row entirely above the viewport shifts the scroll offset by its height
    /// change, so the rows on screen stay where they are.
    ///
    /// Returns true if the height index changed.
    pub fn record_height(&mut self, index: usize, height: u32) -> bool {
        if !self.mode.is_variable() || index >= self.heights.len() {
            return false;
        }
        let height = height.max(1);
        let old = self.heights.height(index);
        if old == height {
            return false;
        }

        let anchor = self.effective_offset();
        let row_bottom = self.heights.offset_of(index + 1);
        self.heights.set(index, height);

        if row_bottom <= anchor {
            let delta = i64::from(height) - i64::from(old);
            self.state.scroll_offset = anchor.saturating_add_signed(delta);
            trace!(index, old, height, "Anchored scroll offset to measured row above viewport");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn height(h: u32) -> RowHeight {
        RowHeight::new(h).unwrap()
    }

    fn state(offset: u64, container: u32, overscan: usize) -> ViewportState {
        ViewportState {
            scroll_offset: offset,
            container_height: container,
            estimated_row_height: height(40),
            overscan_count: overscan,
        }
    }

    mod fixed {
        use super::*;

        #[test]
        fn empty_sequence_is_empty_range() {
            let range = compute_visible_range(&state(0, 500, 2), 0, height(40));
            assert_eq!(range, VisibleRange::new(0, 0));
        }

        #[test]
        fn initial_window_clamps_top_overscan() {
            // 500 / 40 = 12.5 -> 13 visible, + 2 overscan below, none above row 0
            let range = compute_visible_range(&state(0, 500, 2), 100, height(40));
            assert_eq!(range, VisibleRange::new(0, 15));
        }

        #[test]
        fn mid_scroll_window_has_overscan_on_both_sides() {
            // first visible row = 1000 / 40 = 25
            let range = compute_visible_range(&state(1000, 500, 2), 100, height(40));
            assert_eq!(range, VisibleRange::new(23, 40));
            assert_eq!(range.len(), 13 + 2 * 2);
        }

        #[test]
        fn short_sequence_is_clamped_at_end() {
            let range = compute_visible_range(&state(0, 500, 2), 5, height(40));
            assert_eq!(range, VisibleRange::new(0, 5));
        }

        #[test]
        fn offset_past_content_clamps_to_last_window() {
            // total 4000, max offset 3500 -> first 87
            let range = compute_visible_range(&state(1_000_000, 500, 2), 100, height(40));
            assert_eq!(range, VisibleRange::new(85, 100));
        }

        #[test]
        fn unaligned_offset_includes_partially_visible_last_row() {
            // rows of 2 lines, viewport lines [3, 7): rows 1 (2-3), 2 (4-5) and 3 (6-7)
            let s = ViewportState {
                scroll_offset: 3,
                container_height: 4,
                estimated_row_height: height(2),
                overscan_count: 0,
            };
            let range = compute_visible_range(&s, 100, height(2));
            assert_eq!(range, VisibleRange::new(1, 4));
        }

        #[test]
        fn zero_container_only_materializes_overscan() {
            let range = compute_visible_range(&state(400, 0, 2), 100, height(40));
            assert_eq!(range, VisibleRange::new(8, 12));
        }
    }

    mod variable {
        use super::*;

        #[test]
        fn uniform_heights_match_fixed_window_at_aligned_offsets() {
            let heights = HeightIndex::from_heights(&[40; 100]);
            for offset in [0u64, 40, 400, 1000, 3480] {
                let s = state(offset, 480, 2);
                assert_eq!(
                    compute_visible_range_variable(&s, &heights),
                    compute_visible_range(&s, 100, height(40)),
                    "offset {offset}"
                );
            }
        }

        #[test]
        fn uniform_heights_match_fixed_window_at_unaligned_offsets() {
            let heights = HeightIndex::from_heights(&[40; 100]);
            for offset in [1u64, 20, 1020, 3519] {
                let s = state(offset, 480, 2);
                assert_eq!(
                    compute_visible_range_variable(&s, &heights),
                    compute_visible_range(&s, 100, height(40)),
                    "offset {offset}"
                );
            }
        }

        #[test]
        fn window_covers_partially_visible_rows() {
            // rows: [0,10) [10,30) [30,35) [35,60) [60,70)
            let heights = HeightIndex::from_heights(&[10, 20, 5, 25, 10]);
            let range = compute_visible_range_variable(&state(15, 20, 0), &heights);
            // [15, 35) touches rows 1 and 2
            assert_eq!(range, VisibleRange::new(1, 3));
        }

        #[test]
        fn empty_index_is_empty_range() {
            let range = compute_visible_range_variable(&state(0, 100, 2), &HeightIndex::new());
            assert!(range.is_empty());
        }
    }

    mod tracker {
        use super::*;

        #[test]
        fn scroll_and_resize_only_store_values() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Fixed(height(40)), 2);
            tracker.set_row_count(100);
            tracker.on_scroll(1000);
            tracker.on_resize(500);
            assert_eq!(tracker.state().scroll_offset, 1000);
            assert_eq!(tracker.state().container_height, 500);
        }

        #[test]
        fn scroll_by_clamps_to_content() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Fixed(height(1)), 2);
            tracker.set_row_count(50);
            tracker.on_resize(10);
            tracker.scroll_by(1_000);
            assert_eq!(tracker.state().scroll_offset, 40);
            tracker.scroll_by(-5);
            assert_eq!(tracker.state().scroll_offset, 35);
            tracker.scroll_by(-1_000);
            assert_eq!(tracker.state().scroll_offset, 0);
        }

        #[test]
        fn variable_mode_starts_rows_at_estimate() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Variable { estimate: height(2) }, 0);
            tracker.set_row_count(10);
            assert_eq!(tracker.total_height(), 20);
            assert_eq!(tracker.row_height(3), 2);
        }

        #[test]
        fn record_height_is_ignored_in_fixed_mode() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Fixed(height(1)), 0);
            tracker.set_row_count(10);
            assert!(!tracker.record_height(0, 5));
            assert_eq!(tracker.total_height(), 10);
        }

        #[test]
        fn record_height_above_viewport_anchors_scroll() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Variable { estimate: height(1) }, 0);
            tracker.set_row_count(100);
            tracker.on_resize(10);
            tracker.on_scroll(20);
            let first_before = tracker.visible_range().start_index;

            // row 5 sits entirely above offset 20 and grows by 3
            assert!(tracker.record_height(5, 4));

            assert_eq!(tracker.state().scroll_offset, 23);
            assert_eq!(tracker.visible_range().start_index, first_before);
        }

        #[test]
        fn record_height_inside_viewport_keeps_offset() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Variable { estimate: height(1) }, 0);
            tracker.set_row_count(100);
            tracker.on_resize(10);
            tracker.on_scroll(20);

            assert!(tracker.record_height(22, 3));

            assert_eq!(tracker.state().scroll_offset, 20);
            assert_eq!(tracker.total_height(), 102);
        }

        #[test]
        fn shrinking_row_count_keeps_existing_measurements() {
            let mut tracker = ViewportTracker::new(RowHeightMode::Variable { estimate: height(1) }, 0);
            tracker.set_row_count(10);
            tracker.record_height(2, 5);
            tracker.set_row_count(4);
            assert_eq!(tracker.row_height(2), 5);
            assert_eq!(tracker.total_height(), 8);
        }
    }
}
