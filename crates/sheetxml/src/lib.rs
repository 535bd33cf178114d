//! # sheetxml
//!
//! Turns spreadsheet workbooks into plain XML that diffs and merges cleanly
//! under version control, and turns that XML back into a workbook.
//!
//! ## Features
//!
//! - Read XLSX/XLSM files and write XLSX files
//! - Read legacy XLS (BIFF8) files (`xls` feature, on by default)
//! - Cell values classified as `Number`, `Boolean` or `String`
//! - Row heights kept in twips
//!
//! ## Example
//!
//! ```rust
//! use sheetxml::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Inventory");
//! sheet.set_cell_value("A1", "Widgets").unwrap();
//! sheet.set_cell_value("B1", 1000.0).unwrap();
//!
//! let document = to_tree(&workbook);
//! let xml = XmlWriter::to_string(&document, &XmlWriteOptions::default()).unwrap();
//! assert!(xml.contains(r#"<Data type="Number">1000</Data>"#));
//!
//! let back = to_workbook(&XmlReader::read_str(&xml).unwrap()).unwrap();
//! assert_eq!(back.worksheet(0).unwrap().get_value("B1").unwrap(), &CellValue::Number(1000.0));
//! ```

pub mod convert;
pub mod error;
pub mod io;
pub mod prelude;

pub use convert::{to_tree, to_workbook};
pub use error::{CodecError, ConvertError, ConvertResult, Stage};
pub use io::{
    excel_to_xml, open_workbook, read_document, save_workbook, write_document, xml_to_excel,
    WorkbookFormat,
};

// Re-export core types
pub use sheetxml_core::{
    format_number, CellError, CellType, CellValue, Row, TypeTag, Workbook, Worksheet,
    DEFAULT_ROW_HEIGHT,
};

// Re-export codecs
pub use sheetxml_tree::{Document, Element, TreeError, XmlReader, XmlWriteOptions, XmlWriter};
#[cfg(feature = "xls")]
pub use sheetxml_xls::{XlsError, XlsReader};
pub use sheetxml_xlsx::{XlsxError, XlsxReader, XlsxWriter};
