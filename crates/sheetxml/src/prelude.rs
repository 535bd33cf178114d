//! Common imports
//!
//! ```rust
//! use sheetxml::prelude::*;
//! ```

pub use crate::{
    // Conversion
    excel_to_xml,
    open_workbook,
    save_workbook,
    to_tree,
    to_workbook,
    xml_to_excel,
    // Errors
    ConvertError,
    ConvertResult,
    Stage,
    // Tabular model
    CellValue,
    Row,
    TypeTag,
    Workbook,
    Worksheet,
    // Tree
    Document,
    Element,
    XmlReader,
    XmlWriteOptions,
    XmlWriter,
    // Codecs
    XlsxReader,
    XlsxWriter,
};
