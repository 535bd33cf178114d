//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors raised while reading or writing an XLSX package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container could not be read or written
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error inside a package part
    #[error("XML error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Not an XLSX package
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A cell refers past the end of the shared strings table
    #[error("Shared string index {index} out of bounds ({count} strings)")]
    SharedStringIndex { index: usize, count: usize },

    /// Unparsable cell content
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetxml_core::Error),
}

impl XlsxError {
    pub(crate) fn xml(part: &str, source: quick_xml::Error) -> Self {
        XlsxError::Xml {
            part: part.to_string(),
            source,
        }
    }
}
