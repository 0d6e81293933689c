//! Property-based tests for the window computation and the window cache.
//!
//! Properties under test:
//! - the window is always a valid sub-range of the row sequence
//! - the window size depends on the viewport, never on the row count
//! - every row touching the viewport is in the window, including a partial last row
//! - recomputing from identical state yields an identical window
//! - scrolling one row past the overscan region shifts the window by one
//! - the cache never holds more rows than the window
//! - the variable-height window matches a linear scan over the heights

use proptest::prelude::*;
use rowport::model::{fingerprint_of, ColumnDescriptor, Row, RowKey, RowSequence};
use rowport::view_state::{
    compute_visible_range, compute_visible_range_variable, GridConfig, HeightIndex, RowHeight,
    ViewportState, VirtualGrid,
};

// ===== Helpers =====

#[derive(Debug, Clone)]
struct Item {
    id: u64,
}

impl Row for Item {
    fn key(&self) -> RowKey {
        RowKey::from(self.id)
    }

    fn fingerprint(&self) -> u64 {
        fingerprint_of(&self.id)
    }
}

fn items(n: u64) -> RowSequence<Item> {
    (0..n).map(|id| Item { id }).collect::<Vec<_>>().into()
}

fn state(offset: u64, container: u32, h: u32, overscan: usize) -> ViewportState {
    ViewportState {
        scroll_offset: offset,
        container_height: container,
        estimated_row_height: RowHeight::new(h).unwrap(),
        overscan_count: overscan,
    }
}

/// Upper bound on the window size for a uniform row height: a viewport that
/// starts part way into a row touches one extra row at the bottom.
fn window_capacity(container: u32, h: u32, overscan: usize) -> usize {
    (container + h - 1).div_ceil(h) as usize + 2 * overscan
}

fn grid(n: u64, container: u32, h: u32, overscan: usize) -> VirtualGrid<Item> {
    let columns = vec![ColumnDescriptor::new("ID", 8, |i: &Item| {
        Ok(i64::try_from(i.id).unwrap_or(i64::MAX).into())
    })];
    let mut grid = VirtualGrid::new(columns, GridConfig::new(overscan, h, false).unwrap()).unwrap();
    grid.set_rows(items(n));
    grid.on_resize(container);
    grid.on_frame();
    grid
}

// ===== Fixed Height =====

proptest! {
    #[test]
    fn window_is_within_bounds(
        n in 0usize..10_000,
        offset in 0u64..1_000_000,
        container in 0u32..2_000,
        h in 1u32..100,
        overscan in 0usize..10,
    ) {
        let range = compute_visible_range(&state(offset, container, h, overscan), n, RowHeight::new(h).unwrap());
        prop_assert!(range.start_index <= range.end_index);
        prop_assert!(range.end_index <= n);
    }

    #[test]
    fn window_size_never_exceeds_capacity(
        n in 0usize..100_000,
        offset in 0u64..10_000_000,
        container in 0u32..2_000,
        h in 1u32..100,
        overscan in 0usize..10,
    ) {
        let range = compute_visible_range(&state(offset, container, h, overscan), n, RowHeight::new(h).unwrap());
        prop_assert!(range.len() <= window_capacity(container, h, overscan));
        prop_assert!(range.len() <= n);
    }

    #[test]
    fn mid_content_window_is_visible_rows_plus_overscan(
        n in 10_000usize..1_000_000,
        container in 1u32..500,
        h in 1u32..20,
        overscan in 0usize..10,
        position in 0.1f64..0.9,
    ) {
        let total = u64::from(h) * n as u64;
        let offset = (total as f64 * position) as u64;
        let range = compute_visible_range(&state(offset, container, h, overscan), n, RowHeight::new(h).unwrap());

        let into_row = (offset % u64::from(h)) as u32;
        let visible = (into_row + container).div_ceil(h) as usize;
        prop_assert_eq!(range.len(), visible + 2 * overscan);
    }

    #[test]
    fn every_row_touching_the_viewport_is_in_the_window(
        n in 1usize..5_000,
        offset in 0u64..50_000,
        container in 1u32..200,
        h in 1u32..10,
    ) {
        let height = RowHeight::new(h).unwrap();
        let range = compute_visible_range(&state(offset, container, h, 0), n, height);

        let total = u64::from(h) * n as u64;
        let top = offset.min(total.saturating_sub(u64::from(container)));
        let bottom = (top + u64::from(container)).min(total);
        let first = (top / u64::from(h)) as usize;
        let last = ((bottom - 1) / u64::from(h)) as usize;

        prop_assert_eq!(range.start_index, first);
        prop_assert_eq!(range.end_index, last + 1);
    }

    #[test]
    fn recomputation_is_idempotent(
        n in 0usize..10_000,
        offset in 0u64..1_000_000,
        container in 0u32..2_000,
        h in 1u32..100,
        overscan in 0usize..10,
    ) {
        let s = state(offset, container, h, overscan);
        let height = RowHeight::new(h).unwrap();
        prop_assert_eq!(compute_visible_range(&s, n, height), compute_visible_range(&s, n, height));
    }

    #[test]
    fn scrolling_one_row_shifts_window_by_one(
        first in 10usize..5_000,
        container in 1u32..200,
        h in 1u32..10,
        overscan in 0usize..10,
    ) {
        // enough rows below that neither window is clamped at the end
        let n = first + container as usize + 2 * overscan + 10;
        let height = RowHeight::new(h).unwrap();
        let offset = u64::from(h) * first as u64;

        let before = compute_visible_range(&state(offset, container, h, overscan), n, height);
        let after = compute_visible_range(&state(offset + u64::from(h), container, h, overscan), n, height);

        prop_assert_eq!(after.start_index, before.start_index + 1);
        prop_assert_eq!(after.end_index, before.end_index + 1);
    }

    #[test]
    fn cache_holds_at_most_the_window(
        n in 0u64..5_000,
        offset in 0u64..50_000,
        container in 0u32..100,
        h in 1u32..5,
        overscan in 0usize..5,
    ) {
        let mut g = grid(n, container, h, overscan);
        g.on_scroll(offset);
        g.on_frame();
        let rendered = g.render().rows.len();

        prop_assert_eq!(rendered, g.cached_row_count());
        prop_assert!(g.cached_row_count() <= window_capacity(container, h, overscan));
    }
}

// ===== Variable Height =====

/// Window computed by scanning the heights one row at a time.
fn linear_window(heights: &[u32], offset: u64, container: u32, overscan: usize) -> (usize, usize) {
    let n = heights.len();
    let total: u64 = heights.iter().map(|&h| u64::from(h)).sum();
    let offset = offset.min(total.saturating_sub(u64::from(container)));
    let bottom = offset + u64::from(container);

    let mut top = 0u64;
    let mut first = n;
    let mut last_visible = None;
    for (i, &h) in heights.iter().enumerate() {
        let row_bottom = top + u64::from(h);
        if first == n && row_bottom > offset {
            first = i;
        }
        if top < bottom {
            last_visible = Some(i);
        }
        top = row_bottom;
    }

    let visible_end = last_visible.map_or(first, |i| i + 1);
    let start = first.saturating_sub(overscan);
    let end = (visible_end + overscan).min(n).max(start);
    (start, end)
}

proptest! {
    #[test]
    fn variable_window_matches_linear_scan(
        heights in prop::collection::vec(1u32..6, 1..300),
        offset in 0u64..2_000,
        container in 1u32..60,
        overscan in 0usize..4,
    ) {
        let index = HeightIndex::from_heights(&heights);
        let range = compute_visible_range_variable(&state(offset, container, 1, overscan), &index);
        let (start, end) = linear_window(&heights, offset, container, overscan);

        prop_assert_eq!(range.start_index, start);
        prop_assert_eq!(range.end_index, end);
    }

    #[test]
    fn variable_offsets_match_prefix_sums(
        heights in prop::collection::vec(1u32..50, 0..500),
    ) {
        let index = HeightIndex::from_heights(&heights);
        let mut expected = 0u64;
        for (i, &h) in heights.iter().enumerate() {
            prop_assert_eq!(index.offset_of(i), expected);
            expected += u64::from(h);
        }
        prop_assert_eq!(index.total(), expected);
    }
}

// ===== Row Count Independence =====

#[test]
fn window_size_is_independent_of_row_count() {
    let mut small = grid(10, 5, 1, 2);
    let mut huge = grid(1_000_000, 5, 1, 2);
    huge.on_scroll(500_000);
    huge.on_frame();

    let small_rows = small.render().rows.len();
    let huge_rows = huge.render().rows.len();

    assert_eq!(small_rows, 7);
    assert_eq!(huge_rows, 9);
    assert!(huge.cached_row_count() <= window_capacity(5, 1, 2));
}

#[test]
fn zero_rows_yield_empty_window() {
    let range = compute_visible_range(&state(1_000, 500, 40, 2), 0, RowHeight::new(40).unwrap());
    assert!(range.is_empty());
}

#[test]
fn fewer_rows_than_window_yield_all_rows() {
    let range = compute_visible_range(&state(0, 500, 40, 2), 5, RowHeight::new(40).unwrap());
    assert_eq!((range.start_index, range.end_index), (0, 5));
}
