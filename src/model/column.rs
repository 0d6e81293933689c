//! Column descriptors and the column model.
//!
//! A column is a label, a fixed width, an alignment and an accessor that pulls a
//! displayable value out of a row. The set of columns is fixed for the lifetime of
//! a grid; changing columns means building a new grid.

use super::error::{AccessorError, GridError};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Text shown in place of a value the accessor could not resolve.
pub const PLACEHOLDER: &str = "—";

/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Text starts at the left edge of the column.
    #[default]
    Left,
    /// Text ends at the right edge of the column (numeric columns).
    Right,
}

/// Value returned by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Preformatted text.
    Text(String),
    /// Whole number, displayed in decimal.
    Integer(i64),
    /// Floating point number. Non-finite values are rejected at render time.
    Decimal(f64),
}

impl CellValue {
    /// Convert to display text, rejecting values that cannot be displayed.
    fn into_text(self) -> Result<String, AccessorError> {
        match self {
            CellValue::Text(text) => Ok(text),
            CellValue::Integer(n) => Ok(n.to_string()),
            CellValue::Decimal(x) if x.is_finite() => Ok(x.to_string()),
            CellValue::Decimal(x) => Err(AccessorError::InvalidValue(x.to_string())),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Decimal(x)
    }
}

/// Accessor closure: row -> displayable value.
pub type Accessor<R> = Arc<dyn Fn(&R) -> Result<CellValue, AccessorError> + Send + Sync>;

/// Static description of one column.
pub struct ColumnDescriptor<R> {
    label: String,
    width: u16,
    align: Align,
    accessor: Accessor<R>,
}

impl<R> ColumnDescriptor<R> {
    /// Create a left-aligned column.
    pub fn new<F>(label: impl Into<String>, width: u16, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<CellValue, AccessorError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            width,
            align: Align::Left,
            accessor: Arc::new(accessor),
        }
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Header label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width in display columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Horizontal alignment.
    pub fn align(&self) -> Align {
        self.align
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            width: self.width,
            align: self.align,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

/// Horizontal placement of a column, shared by header and body.
///
/// Both the header and every body row are laid out from the same spans, so a
/// header cell and the body cells below it always have identical geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Left edge, in columns from the table's left edge.
    pub x: u16,
    /// Width in columns.
    pub width: u16,
    /// Alignment within the span.
    pub align: Align,
}

/// Output of rendering one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    /// Display text. May contain newlines in variable-height mode.
    pub text: String,
    /// True when the accessor failed and [`PLACEHOLDER`] is shown instead.
    pub placeholder: bool,
}

impl RenderedCell {
    fn placeholder() -> Self {
        Self {
            text: PLACEHOLDER.to_string(),
            placeholder: true,
        }
    }

    /// Number of text lines in this cell (at least 1).
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

/// Validated, ordered column list.
pub struct ColumnModel<R> {
    columns: Vec<ColumnDescriptor<R>>,
    spans: Vec<ColumnSpan>,
}

impl<R> ColumnModel<R> {
    /// Validate the descriptor list and compute column spans.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the list is empty, or if any column has an empty
    /// label or zero width.
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Result<Self, GridError> {
        if columns.is_empty() {
            return Err(GridError::NoColumns);
        }

        let mut spans = Vec::with_capacity(columns.len());
        let mut x: u16 = 0;
        for (index, column) in columns.iter().enumerate() {
            if column.label.trim().is_empty() {
                return Err(GridError::EmptyLabel { index });
            }
            if column.width == 0 {
                return Err(GridError::ZeroWidth {
                    index,
                    label: column.label.clone(),
                });
            }
            spans.push(ColumnSpan {
                x,
                width: column.width,
                align: column.align,
            });
            x = x.saturating_add(column.width);
        }

        Ok(Self { columns, spans })
    }

    /// Number of columns (always >= 1).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false: construction rejects empty column lists.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Descriptors in display order.
    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    /// Horizontal placement of each column.
    pub fn spans(&self) -> &[ColumnSpan] {
        &self.spans
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> u16 {
        self.spans
            .last()
            .map(|span| span.x.saturating_add(span.width))
            .unwrap_or(0)
    }

    /// Render one cell. Never fails: accessor errors become the placeholder.
    pub fn render(&self, column: usize, row: &R) -> RenderedCell {
        let Some(descriptor) = self.columns.get(column) else {
            warn!(column, "Render requested for unknown column");
            return RenderedCell::placeholder();
        };

        match (descriptor.accessor)(row).and_then(CellValue::into_text) {
            Ok(text) => RenderedCell {
                text,
                placeholder: false,
            },
            Err(error) => {
                warn!(
                    column = %descriptor.label,
                    %error,
                    "Column accessor failed, rendering placeholder"
                );
                RenderedCell::placeholder()
            }
        }
    }

    /// Render every column of a row, left to right.
    pub fn render_row(&self, row: &R) -> Vec<RenderedCell> {
        (0..self.columns.len())
            .map(|column| self.render(column, row))
            .collect()
    }
}

impl<R> fmt::Debug for ColumnModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnModel")
            .field("columns", &self.columns)
            .field("spans", &self.spans)
            .finish()
    }
}
