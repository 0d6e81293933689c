//! rowport: virtualized tabular rendering.
//!
//! The library core (`model`, `view_state`) turns a row sequence, a column list
//! and a scroll position into the minimal set of rendered rows. The terminal
//! shell (`view`, `source`, `config`, `logging`) hosts one grid over JSON rows.
//!
//! ```
//! use rowport::model::{fingerprint_of, ColumnDescriptor, Row, RowKey, RowSequence};
//! use rowport::view_state::{GridConfig, VirtualGrid};
//!
//! struct Product { id: u64, name: String }
//!
//! impl Row for Product {
//!     fn key(&self) -> RowKey { RowKey::from(self.id) }
//!     fn fingerprint(&self) -> u64 { fingerprint_of(&self.name) }
//! }
//!
//! let columns = vec![ColumnDescriptor::new("Name", 20, |p: &Product| Ok(p.name.as_str().into()))];
//! let mut grid = VirtualGrid::new(columns, GridConfig::default()).unwrap();
//!
//! let rows: RowSequence<Product> = (0..10_000)
//!     .map(|id| Product { id, name: format!("Product {id}") })
//!     .collect::<Vec<_>>()
//!     .into();
//! grid.set_rows(rows);
//! grid.on_resize(20);
//! grid.on_scroll(5_000);
//! grid.on_frame();
//!
//! let frame = grid.render();
//! assert_eq!(frame.rows.len(), 24);
//! assert_eq!(frame.rows[2].row.index, 5_000);
//! ```

pub mod config;
pub mod integration;
pub mod logging;
pub mod model;
pub mod source;
pub mod view;
pub mod view_state;
