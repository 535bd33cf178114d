//! File-level conversion.
//!
//! The tabular codec is chosen from the file extension: `.xlsx` and `.xlsm`
//! go through the XLSX codec, `.xls` through the BIFF8 reader. Workbooks are
//! only ever written as `.xlsx`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sheetxml_core::Workbook;
use sheetxml_tree::{Document, XmlReader, XmlWriteOptions, XmlWriter};
use sheetxml_xlsx::{XlsxReader, XlsxWriter};

use crate::convert::{to_tree, to_workbook};
use crate::error::{CodecError, ConvertError, ConvertResult};

/// Tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Office Open XML (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Legacy BIFF8 (`.xls`), read-only
    Xls,
}

impl WorkbookFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Some(WorkbookFormat::Xlsx),
            Some("xls") => Some(WorkbookFormat::Xls),
            _ => None,
        }
    }
}

/// Open a workbook, choosing the reader from the extension
pub fn open_workbook<P: AsRef<Path>>(path: P) -> ConvertResult<Workbook> {
    let path = path.as_ref();
    match WorkbookFormat::from_path(path) {
        Some(WorkbookFormat::Xlsx) => Ok(XlsxReader::read_file(path)?),
        #[cfg(feature = "xls")]
        Some(WorkbookFormat::Xls) => Ok(sheetxml_xls::XlsReader::read_file(path)?),
        _ => Err(ConvertError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Save a workbook as `.xlsx`
pub fn save_workbook<P: AsRef<Path>>(workbook: &Workbook, path: P) -> ConvertResult<()> {
    let path = path.as_ref();
    ensure_writable_format(path)?;
    XlsxWriter::write_file(workbook, path).map_err(|e| ConvertError::Save(CodecError::Xlsx(e)))
}

/// Parse an XML file into a tree document
pub fn read_document<P: AsRef<Path>>(path: P) -> ConvertResult<Document> {
    XmlReader::read_file(path).map_err(ConvertError::Parse)
}

/// Serialize a tree document to an XML file, creating or truncating it
pub fn write_document<P: AsRef<Path>>(
    document: &Document,
    path: P,
    options: &XmlWriteOptions,
) -> ConvertResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    XmlWriter::write(document, &mut out, options).map_err(ConvertError::Serialize)?;
    out.flush()?;
    Ok(())
}

/// Convert a spreadsheet file into an XML file
pub fn excel_to_xml<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &XmlWriteOptions,
) -> ConvertResult<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let workbook = open_workbook(input)?;
    let document = to_tree(&workbook);
    write_document(&document, output, options)?;
    log::info!("converted {} to {}", input.display(), output.display());
    Ok(())
}

/// Convert an XML file into an `.xlsx` file
///
/// Nothing is written unless the whole document converts.
pub fn xml_to_excel<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> ConvertResult<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    ensure_writable_format(output)?;
    let document = read_document(input)?;
    let workbook = to_workbook(&document)?;
    save_workbook(&workbook, output)?;
    log::info!("converted {} to {}", input.display(), output.display());
    Ok(())
}

fn ensure_writable_format(path: &Path) -> ConvertResult<()> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedFormat(path.to_path_buf()))
    }
}
