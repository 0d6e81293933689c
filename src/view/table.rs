//! Grid widget: paints a [`GridFrame`] into a ratatui buffer.
//!
//! The first line of the area is the sticky header; the rest is the body
//! viewport. Rows are drawn at their placed offsets and clipped to the body, so
//! overscan rows above or below the viewport never leak into the header.

use super::styles::TableStyles;
use crate::model::{Align, ColumnSpan, RenderedCell};
use crate::view_state::{GridFrame, StickyHeader};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker for text cut at the right edge of a cell.
const ELLIPSIS: char = '…';

/// Widget over one rendered frame.
pub struct GridView<'a> {
    frame: &'a GridFrame<'a>,
    styles: &'a TableStyles,
}

impl<'a> GridView<'a> {
    /// Widget painting `frame` with `styles`.
    pub fn new(frame: &'a GridFrame<'a>, styles: &'a TableStyles) -> Self {
        Self { frame, styles }
    }

    /// Draw one cell line at table row `y`, honoring the horizontal offset.
    fn draw_cell(&self, buf: &mut Buffer, area: Rect, y: u16, span: ColumnSpan, text: &str, style: Style) {
        let offset = self.frame.horizontal_offset;
        let view_end = offset.saturating_add(area.width);
        let cell_end = span.x.saturating_add(span.width);

        let visible_start = span.x.max(offset);
        let visible_end = cell_end.min(view_end);
        if visible_start >= visible_end {
            return;
        }

        let fitted = fit(text, span.width, span.align);
        let clipped = slice_columns(
            &fitted,
            usize::from(visible_start - span.x),
            usize::from(visible_end - visible_start),
        );
        let x = area.x + (visible_start - offset);
        buf.set_stringn(x, y, clipped, usize::from(visible_end - visible_start), style);
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for cell in &self.frame.header.cells {
            self.draw_cell(buf, area, area.y, cell.span, &cell.label, self.styles.header);
        }

        let body_top = i64::from(area.y) + i64::from(StickyHeader::HEIGHT);
        let body_bottom = i64::from(area.bottom());

        for placed in &self.frame.rows {
            for line in 0..placed.height {
                let y = body_top + placed.top + i64::from(line);
                if y < body_top {
                    continue;
                }
                if y >= body_bottom {
                    break;
                }
                let Ok(y) = u16::try_from(y) else { break };
                let line_index = usize::try_from(line).unwrap_or(usize::MAX);

                for (cell, span) in placed.row.cells.iter().zip(self.frame.spans) {
                    let text = cell.text.lines().nth(line_index).unwrap_or("");
                    self.draw_cell(buf, area, y, *span, text, self.cell_style(cell));
                }
            }
        }
    }
}

impl GridView<'_> {
    fn cell_style(&self, cell: &RenderedCell) -> Style {
        if cell.placeholder {
            self.styles.placeholder
        } else {
            self.styles.cell
        }
    }
}

/// Lay `text` out in exactly `width` display columns.
///
/// The last column is a gap separating neighbours (unless the column is a single
/// column wide). Text that does not fit is cut with an ellipsis.
pub fn fit(text: &str, width: u16, align: Align) -> String {
    let width = usize::from(width);
    let content = if width > 1 { width - 1 } else { width };
    let shown = truncate(text, content);
    let pad = content.saturating_sub(shown.width());
    let gap = width - content;

    let mut out = String::with_capacity(width + shown.len());
    match align {
        Align::Left => {
            out.push_str(&shown);
            out.extend(std::iter::repeat(' ').take(pad + gap));
        }
        Align::Right => {
            out.extend(std::iter::repeat(' ').take(pad));
            out.push_str(&shown);
            out.extend(std::iter::repeat(' ').take(gap));
        }
    }
    out
}

/// Cut `text` to at most `max` display columns, ending in an ellipsis if cut.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}

/// Display columns `[start, start + len)` of `text`. Wide characters cut by
/// either edge become spaces.
fn slice_columns(text: &str, start: usize, len: usize) -> String {
    let end = start + len;
    let mut out = String::new();
    let mut col = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        let (from, to) = (col, col + w);
        col = to;
        if w == 0 {
            if from >= start && from < end {
                out.push(c);
            }
            continue;
        }
        if to <= start {
            continue;
        }
        if from >= end {
            break;
        }
        if from >= start && to <= end {
            out.push(c);
        } else {
            let overlap = to.min(end) - from.max(start);
            out.extend(std::iter::repeat(' ').take(overlap));
        }
    }
    out
}
