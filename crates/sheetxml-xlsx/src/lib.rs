//! # sheetxml-xlsx
//!
//! XLSX (Office Open XML) reader and writer for sheetxml.
//!
//! Only cell values and row heights are read and written. Styles, merged
//! regions and other sheet features are ignored.

pub mod error;
pub mod reader;
pub mod writer;

mod escape;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
