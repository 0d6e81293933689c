//! View-state layer: windowing, caching and scheduling for the virtual grid.
//!
//! # Module Structure
//!
//! - `types`: row height newtypes and the fixed/variable mode
//! - `height_index`: O(log n) cumulative row offsets via Fenwick tree
//! - `visible_range`: half-open window of row indices
//! - `viewport`: scroll/size state and the window computation
//! - `scheduler`: per-frame coalescing of recomputation requests
//! - `window_cache`: rendered rows for the current window, keyed by row key
//! - `header`: sticky column header
//! - `grid`: `VirtualGrid`, the composition root

pub mod grid;
pub mod header;
pub mod height_index;
pub mod scheduler;
pub mod types;
pub mod viewport;
pub mod visible_range;
pub mod window_cache;

pub use grid::{GridConfig, GridFrame, GridPhase, PlacedRow, VirtualGrid};
pub use header::{HeaderBlock, HeaderCell, StickyHeader};
pub use height_index::HeightIndex;
pub use scheduler::{FrameScheduler, Invalidation, Reason};
pub use types::{InvalidRowHeight, RowHeight, RowHeightMode};
pub use viewport::{
    compute_visible_range, compute_visible_range_variable, ViewportState, ViewportTracker,
    DEFAULT_OVERSCAN,
};
pub use visible_range::VisibleRange;
pub use window_cache::{CacheStats, RenderedRow, RowWindowCache};
