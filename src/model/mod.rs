//! Domain model types (pure).
//!
//! Rows, columns and the error taxonomy. Nothing here knows about viewports or
//! terminals.

pub mod column;
pub mod error;
pub mod json_row;
pub mod row;

pub use column::{
    Accessor, Align, CellValue, ColumnDescriptor, ColumnModel, ColumnSpan, RenderedCell,
    PLACEHOLDER,
};
pub use error::{AccessorError, AppError, DecodeError, GridError, InputError};
pub use json_row::JsonRow;
pub use row::{fingerprint_of, Row, RowKey, RowSequence};
