//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellType`] - The native type code of a value
//! - [`TypeTag`] - The type tag carried by the tree format
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod tag;
mod value;

pub use address::CellAddress;
pub use tag::TypeTag;
pub use value::{CellError, CellType, CellValue};
