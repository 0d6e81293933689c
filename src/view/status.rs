//! Status line below the grid.

use super::styles::TableStyles;
use crate::view_state::VisibleRange;
use ratatui::text::{Line, Span};

const LIVE_MARKER: &str = "[LIVE] ";

/// Row count, window position, skipped input and the live marker.
///
/// Stateless: everything is passed in each frame.
#[derive(Debug, Clone, Copy)]
pub struct StatusLine {
    /// Rows received so far.
    pub row_count: usize,
    /// Current window.
    pub range: VisibleRange,
    /// Input lines that failed to decode.
    pub skipped: usize,
    /// True while the source may still deliver rows.
    pub live: bool,
}

impl StatusLine {
    /// Render as a single styled line.
    pub fn render(&self, styles: &TableStyles) -> Line<'static> {
        let mut spans = Vec::with_capacity(3);
        if self.live {
            spans.push(Span::styled(LIVE_MARKER, styles.live));
        }

        let window = if self.range.is_empty() {
            "no rows".to_string()
        } else {
            format!(
                "rows {}-{} of {}",
                self.range.start_index + 1,
                self.range.end_index,
                self.row_count
            )
        };
        spans.push(Span::styled(window, styles.status));

        if self.skipped > 0 {
            spans.push(Span::styled(format!(" · {} skipped", self.skipped), styles.status));
        }
        Line::from(spans)
    }
}
