//! # sheetxml-xls
//!
//! Reader for the legacy Excel binary format (.xls): BIFF8 records inside a
//! Compound File Binary container. Cell values and row heights are read;
//! formatting records are skipped. There is no writer.

pub mod biff;
pub mod error;
pub mod reader;

pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
