//! Excel access for the updater
//!
//! Two views of the same uploaded bytes:
//! - [`TabularView`]: read-only rows under a flattened header, for lookups
//! - [`WorkbookEditor`]: mutable cell grid that keeps styles and formulas

pub mod address;
mod editor;
mod header;
pub mod number_format;
mod table;

pub use address::{column_letter, CellAddress, HEADER_ROWS};
pub use editor::{apply_increments, WorkbookEditor};
pub use header::HeaderSchema;
pub use table::{open_tabular_view, render_cell, TabularView};
