//! Frame scheduler: coalesces recomputation requests into one pass per frame.
//!
//! Scroll, resize and data events only mark work as pending. The host calls
//! [`FrameScheduler::take_frame`] once per frame and performs at most one
//! recomputation for everything that arrived since the previous frame.

use tracing::trace;

/// Source of a recomputation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Scroll offset changed.
    Scroll,
    /// Container height changed.
    Resize,
    /// Row sequence replaced.
    Rows,
    /// A rendered row reported a new height (variable mode).
    Measure,
}

/// Set of reasons accumulated between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidation {
    /// Scroll offset changed.
    pub scroll: bool,
    /// Container height changed.
    pub resize: bool,
    /// Row sequence replaced.
    pub rows: bool,
    /// Measured row heights changed.
    pub measure: bool,
}

impl Invalidation {
    fn add(&mut self, reason: Reason) {
        match reason {
            Reason::Scroll => self.scroll = true,
            Reason::Resize => self.resize = true,
            Reason::Rows => self.rows = true,
            Reason::Measure => self.measure = true,
        }
    }

    /// True if nothing was requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-grid scheduler. Single-threaded; owned by the grid.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Invalidation,
    frame: u64,
    requests: u64,
    recomputations: u64,
    cancelled: bool,
}

impl FrameScheduler {
    /// Scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark work for the next frame. Ignored after [`cancel`](Self::cancel).
    pub fn request(&mut self, reason: Reason) {
        if self.cancelled {
            trace!(?reason, "Ignoring request on cancelled scheduler");
            return;
        }
        self.requests += 1;
        self.pending.add(reason);
    }

    /// True if the next frame will recompute.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Reasons pending for the next frame, without consuming them.
    pub fn pending(&self) -> Invalidation {
        self.pending
    }

    /// Advance one frame and take everything requested since the last one.
    ///
    /// Returns `None` when there is nothing to do (or the scheduler was cancelled).
    pub fn take_frame(&mut self) -> Option<Invalidation> {
        self.frame += 1;
        if self.cancelled || self.pending.is_empty() {
            return None;
        }
        self.recomputations += 1;
        Some(std::mem::take(&mut self.pending))
    }

    /// Discard pending work and refuse further requests.
    pub fn cancel(&mut self) {
        if self.is_pending() {
            trace!(pending = ?self.pending, "Discarding scheduled recomputation");
        }
        self.pending = Invalidation::default();
        self.cancelled = true;
    }

    /// True once cancelled; later requests are ignored.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Frames elapsed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Requests received (before coalescing).
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Recomputations handed out (after coalescing).
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
