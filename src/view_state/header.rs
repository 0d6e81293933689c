//! Sticky header: column labels rendered once per column model.

use crate::model::{ColumnModel, ColumnSpan};
use tracing::debug;

/// Header cell: label plus the same span the body cells of that column use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Column label as shown.
    pub label: String,
    /// Horizontal placement, shared with the body cells of the column.
    pub span: ColumnSpan,
}

/// Rendered header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    /// One cell per column, left to right.
    pub cells: Vec<HeaderCell>,
}

/// Header controller.
///
/// The block is rendered from the column model the first time it is asked for
/// and kept for the lifetime of the grid: scrolling, resizing and row updates
/// do not touch it. Changing columns means constructing a new grid, which gets
/// a new header.
#[derive(Debug, Default)]
pub struct StickyHeader {
    block: Option<HeaderBlock>,
    render_count: u64,
}

impl StickyHeader {
    /// Lines the header occupies above the body.
    pub const HEIGHT: u16 = 1;

    /// Controller with nothing rendered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The header block, rendering it on first use.
    pub fn block<R>(&mut self, columns: &ColumnModel<R>) -> &HeaderBlock {
        let render_count = &mut self.render_count;
        self.block.get_or_insert_with(|| {
            *render_count += 1;
            render(columns)
        })
    }

    /// The header block if it has been rendered.
    pub fn rendered(&self) -> Option<&HeaderBlock> {
        self.block.as_ref()
    }

    /// How many times the header has been rendered.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

fn render<R>(columns: &ColumnModel<R>) -> HeaderBlock {
    let cells = columns
        .columns()
        .iter()
        .zip(columns.spans())
        .map(|(column, span)| HeaderCell {
            label: column.label().to_string(),
            span: *span,
        })
        .collect::<Vec<_>>();
    debug!(columns = cells.len(), "Rendered sticky header");
    HeaderBlock { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Align, ColumnDescriptor};

    fn model() -> ColumnModel<u32> {
        ColumnModel::new(vec![
            ColumnDescriptor::new("ID", 8, |n: &u32| Ok(i64::from(*n).into())).with_align(Align::Right),
            ColumnDescriptor::new("Name", 12, |_: &u32| Ok("x".into())),
        ])
        .unwrap()
    }

    #[test]
    fn header_cells_follow_column_order() {
        let mut header = StickyHeader::new();
        let labels: Vec<_> = header
            .block(&model())
            .cells
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["ID", "Name"]);
    }

    #[test]
    fn header_spans_are_the_body_spans() {
        let model = model();
        let mut header = StickyHeader::new();
        let spans: Vec<_> = header.block(&model).cells.iter().map(|c| c.span).collect();
        assert_eq!(spans, model.spans());
    }

    #[test]
    fn nothing_is_rendered_before_first_use() {
        let header = StickyHeader::new();
        assert!(header.rendered().is_none());
        assert_eq!(header.render_count(), 0);
    }

    #[test]
    fn repeated_requests_reuse_the_rendered_block() {
        let model = model();
        let mut header = StickyHeader::new();
        let first: *const HeaderBlock = header.block(&model);
        let second: *const HeaderBlock = header.block(&model);
        assert!(std::ptr::eq(first, second));
        assert_eq!(header.render_count(), 1);
    }
}
