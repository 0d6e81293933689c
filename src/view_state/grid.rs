//! Composition root: the virtualized grid.
//!
//! [`VirtualGrid`] wires the viewport tracker to the row window cache and owns
//! the frame scheduler. Hosts feed it events (`set_rows`, `on_scroll`,
//! `on_resize`), call [`VirtualGrid::on_frame`] once per frame, and paint the
//! [`GridFrame`] returned by [`VirtualGrid::render`].
//!
//! # Phases
//!
//! - `Empty`: no rows; only the header renders.
//! - `Windowing`: steady state.
//! - `Resizing`: a resize arrived; the new height is held until the next frame so
//!   a burst of resize events costs one recomputation.

use super::header::{HeaderBlock, StickyHeader};
use super::scheduler::{FrameScheduler, Invalidation, Reason};
use super::types::{RowHeight, RowHeightMode};
use super::viewport::{ViewportState, ViewportTracker, DEFAULT_OVERSCAN};
use super::visible_range::VisibleRange;
use super::window_cache::{CacheStats, RenderedRow, RowWindowCache};
use crate::model::{ColumnDescriptor, ColumnModel, ColumnSpan, GridError, Row, RowSequence};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Upper bound on window recomputations inside one render in variable mode.
pub const MAX_SETTLE_PASSES: usize = 32;

/// Construction-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Rows materialized beyond each visible edge.
    pub overscan: usize,
    /// Fixed or variable row heights.
    pub row_height: RowHeightMode,
}

impl GridConfig {
    /// Build from raw numbers.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroRowHeight`] if `row_height` is 0.
    pub fn new(overscan: usize, row_height: u32, variable: bool) -> Result<Self, GridError> {
        let height = RowHeight::new(row_height).map_err(|_| GridError::ZeroRowHeight)?;
        let row_height = if variable {
            RowHeightMode::Variable { estimate: height }
        } else {
            RowHeightMode::Fixed(height)
        };
        Ok(Self {
            overscan,
            row_height,
        })
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            overscan: DEFAULT_OVERSCAN,
            row_height: RowHeightMode::default(),
        }
    }
}

/// Lifecycle phase of a mounted grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPhase {
    /// No rows; only the header renders.
    Empty,
    /// Rows present and the window is current.
    Windowing,
    /// A resize is pending until the next frame.
    Resizing,
}

/// A materialized row with its vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRow<'a> {
    /// The rendered row.
    pub row: &'a RenderedRow,
    /// Top edge relative to the top of the body viewport. Negative for overscan
    /// rows above the viewport.
    pub top: i64,
    /// Height in viewport units.
    pub height: u32,
}

/// Everything a host needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrame<'a> {
    /// Sticky header, rendered once per grid.
    pub header: &'a HeaderBlock,
    /// Column geometry shared by header and body.
    pub spans: &'a [ColumnSpan],
    /// Materialized rows in display order.
    pub rows: Vec<PlacedRow<'a>>,
    /// Window the rows were materialized for, clamped to the row count.
    pub range: VisibleRange,
    /// Horizontal scroll, applied to header and body alike.
    pub horizontal_offset: u16,
    /// Phase at the time of rendering.
    pub phase: GridPhase,
}

/// Virtualized table over a row sequence.
pub struct VirtualGrid<R: Row> {
    columns: ColumnModel<R>,
    header: StickyHeader,
    tracker: ViewportTracker,
    cache: RowWindowCache,
    scheduler: FrameScheduler,
    rows: RowSequence<R>,
    range: VisibleRange,
    phase: GridPhase,
    pending_height: Option<u32>,
    horizontal_offset: u16,
}

impl<R: Row> VirtualGrid<R> {
    /// Mount a grid. Scroll position starts at the top.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the column list is invalid.
    pub fn new(columns: Vec<ColumnDescriptor<R>>, config: GridConfig) -> Result<Self, GridError> {
        let columns = ColumnModel::new(columns)?;
        info!(
            columns = columns.len(),
            overscan = config.overscan,
            row_height = ?config.row_height,
            "Mounted grid"
        );
        Ok(Self {
            columns,
            header: StickyHeader::new(),
            tracker: ViewportTracker::new(config.row_height, config.overscan),
            cache: RowWindowCache::new(),
            scheduler: FrameScheduler::new(),
            rows: Arc::from(Vec::new()),
            range: VisibleRange::empty(),
            phase: GridPhase::Empty,
            pending_height: None,
            horizontal_offset: 0,
        })
    }

    /// Replace the row sequence.
    ///
    /// The window is recomputed on the next frame. Cached renders of rows whose
    /// key and fingerprint are unchanged survive the replacement.
    pub fn set_rows(&mut self, rows: RowSequence<R>) {
        let previous = self.rows.len();
        self.rows = rows;
        self.tracker.set_row_count(self.rows.len());
        self.scheduler.request(Reason::Rows);
        if self.phase != GridPhase::Resizing {
            self.transition(self.settled_phase());
        }
        debug!(previous, current = self.rows.len(), "Row sequence replaced");
    }

    /// Record an absolute scroll offset.
    pub fn on_scroll(&mut self, offset: u64) {
        self.tracker.on_scroll(offset);
        self.scheduler.request(Reason::Scroll);
    }

    /// Scroll relative to the current position, clamped to the content.
    pub fn scroll_by(&mut self, delta: i64) {
        self.tracker.scroll_by(delta);
        self.scheduler.request(Reason::Scroll);
    }

    /// Record a new body container height. Applied on the next frame.
    pub fn on_resize(&mut self, container_height: u32) {
        self.pending_height = Some(container_height);
        self.scheduler.request(Reason::Resize);
        self.transition(GridPhase::Resizing);
    }

    /// Set the horizontal scroll. Moves header and body together; no recomputation.
    pub fn on_horizontal_scroll(&mut self, offset: u16) {
        self.horizontal_offset = offset.min(self.columns.total_width().saturating_sub(1));
    }

    /// Horizontal scroll relative to the current position.
    pub fn scroll_horizontal_by(&mut self, delta: i32) {
        let target = (i32::from(self.horizontal_offset) + delta).clamp(0, i32::from(u16::MAX));
        self.on_horizontal_scroll(u16::try_from(target).unwrap_or(u16::MAX));
    }

    /// Run one frame: apply pending resize and recompute the window at most once.
    ///
    /// Returns true if anything was recomputed.
    pub fn on_frame(&mut self) -> bool {
        let Some(work) = self.scheduler.take_frame() else {
            return false;
        };

        if work.resize {
            if let Some(height) = self.pending_height.take() {
                self.tracker.on_resize(height);
            }
        }

        self.range = self.tracker.visible_range();
        trace!(?work, range = ?self.range, "Recomputed visible range");

        if self.phase == GridPhase::Resizing {
            self.transition(self.settled_phase());
        }
        true
    }

    /// Materialize the current window and place it relative to the viewport.
    ///
    /// In variable-height mode rendered rows report their height back to the
    /// tracker. When that moves the window, the window is recomputed and
    /// materialized again until it settles (at most [`MAX_SETTLE_PASSES`] times),
    /// so a poor estimate does not leave the viewport part empty. Any measured
    /// change still schedules a recomputation for the next frame.
    pub fn render(&mut self) -> GridFrame<'_> {
        self.cache.materialize(&self.rows, self.range, &self.columns);

        if self.tracker.mode().is_variable() && self.record_heights() {
            self.scheduler.request(Reason::Measure);
            for _ in 0..MAX_SETTLE_PASSES {
                let settled = self.tracker.visible_range();
                if settled == self.range {
                    break;
                }
                trace!(from = ?self.range, to = ?settled, "Window moved by measurement");
                self.range = settled;
                self.cache.materialize(&self.rows, self.range, &self.columns);
                if !self.record_heights() {
                    break;
                }
            }
        }

        let origin = self.tracker.effective_offset();
        let tracker = &self.tracker;
        let placed = self
            .cache
            .rows()
            .iter()
            .map(|row| PlacedRow {
                row,
                top: tracker.offset_of(row.index) as i64 - origin as i64,
                height: tracker.row_height(row.index),
            })
            .collect();

        GridFrame {
            header: self.header.block(&self.columns),
            spans: self.columns.spans(),
            rows: placed,
            range: self.cache.range(),
            horizontal_offset: self.horizontal_offset,
            phase: self.phase,
        }
    }

    /// Feed the heights of the cached rows back to the tracker.
    ///
    /// Returns true if any height changed.
    fn record_heights(&mut self) -> bool {
        let mut measured = false;
        for row in self.cache.rows() {
            measured |= self.tracker.record_height(row.index, row.line_count());
        }
        measured
    }

    /// Tear down. Pending work is discarded and returned for inspection.
    pub fn unmount(mut self) -> Invalidation {
        let discarded = self.scheduler.pending();
        self.scheduler.cancel();
        info!(?discarded, "Unmounted grid");
        discarded
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    /// Window as of the last frame.
    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    /// Applied scroll and size state.
    pub fn viewport(&self) -> &ViewportState {
        self.tracker.state()
    }

    /// Container height including a resize that has not been applied yet.
    pub fn container_height(&self) -> u32 {
        self.pending_height
            .unwrap_or(self.tracker.state().container_height)
    }

    /// Length of the current row sequence.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The current row sequence.
    pub fn rows(&self) -> &RowSequence<R> {
        &self.rows
    }

    /// The column model fixed at construction.
    pub fn columns(&self) -> &ColumnModel<R> {
        &self.columns
    }

    /// The sticky header controller.
    pub fn header(&self) -> &StickyHeader {
        &self.header
    }

    /// Horizontal scroll in display columns.
    pub fn horizontal_offset(&self) -> u16 {
        self.horizontal_offset
    }

    /// Total content height.
    pub fn total_height(&self) -> u64 {
        self.tracker.total_height()
    }

    /// Scroll offset after clamping to the content.
    pub fn effective_offset(&self) -> u64 {
        self.tracker.effective_offset()
    }

    /// Rows currently held by the window cache.
    pub fn cached_row_count(&self) -> usize {
        self.cache.len()
    }

    /// Reuse counters of the window cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Recomputations performed so far.
    pub fn recomputations(&self) -> u64 {
        self.scheduler.recomputations()
    }

    /// True if the next frame will recompute.
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_pending()
    }

    fn settled_phase(&self) -> GridPhase {
        if self.rows.is_empty() {
            GridPhase::Empty
        } else {
            GridPhase::Windowing
        }
    }

    fn transition(&mut self, next: GridPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "Grid phase transition");
            self.phase = next;
        }
    }
}
