//! # sheetxml-core
//!
//! Core data structures shared by the sheetxml crates.
//!
//! This crate provides:
//! - [`Workbook`], [`Worksheet`], [`Row`] - the tabular model
//! - [`CellValue`] and [`CellType`] - native cell values and their type codes
//! - [`TypeTag`] - the three-valued type registry used by the tree format
//! - [`format_number`] - the canonical number-to-text rule
//!
//! ## Example
//!
//! ```rust
//! use sheetxml_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Prices");
//!
//! sheet.set_cell_value("A1", "Apples").unwrap();
//! sheet.set_cell_value_at(0, 1, 1.25).unwrap();
//! sheet.set_row_height(0, 400);
//!
//! assert_eq!(sheet.get_value_at(0, 1), &CellValue::Number(1.25));
//! ```

pub mod cell;
pub mod error;
pub mod number;
pub mod row;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellError, CellType, CellValue, TypeTag};
pub use error::{Error, Result};
pub use number::format_number;
pub use row::Row;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Row height in twips used when a source does not record one (15 points).
pub const DEFAULT_ROW_HEIGHT: i16 = 300;

/// Twips per typographic point.
pub const TWIPS_PER_POINT: f64 = 20.0;
