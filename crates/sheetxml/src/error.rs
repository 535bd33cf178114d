//! Conversion error types

use std::path::PathBuf;

use sheetxml_tree::TreeError;
use sheetxml_xlsx::XlsxError;
use thiserror::Error;

/// Result type for conversions
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Failure inside one of the tabular codecs
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    #[cfg(feature = "xls")]
    #[error(transparent)]
    Xls(#[from] sheetxml_xls::XlsError),
}

/// The step of a conversion that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Opening or decoding the tabular source
    Open,
    /// Parsing the tree document
    Parse,
    /// Walking a parsed tree that does not have the expected shape
    Structural,
    /// Persisting the result
    Write,
}

/// Errors that can occur while converting between workbooks and trees
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The tabular source could not be read
    #[error("Failed to open workbook: {0}")]
    Open(#[from] CodecError),

    /// The tree document could not be parsed
    #[error("Failed to parse XML document: {0}")]
    Parse(#[source] TreeError),

    /// A tree node is missing a required attribute or carries an unreadable value
    #[error("Structural defect at {path}: {reason}")]
    Structural { path: String, reason: String },

    /// A file extension no codec handles
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The converted workbook could not be written
    #[error("Failed to save workbook: {0}")]
    Save(#[source] CodecError),

    /// The tree document could not be serialized
    #[error("Failed to write XML document: {0}")]
    Serialize(#[source] TreeError),

    /// IO error on an output file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn structural(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The step of the conversion that failed
    pub fn stage(&self) -> Stage {
        match self {
            ConvertError::Open(_) | ConvertError::UnsupportedFormat(_) => Stage::Open,
            ConvertError::Parse(_) => Stage::Parse,
            ConvertError::Structural { .. } => Stage::Structural,
            ConvertError::Save(_) | ConvertError::Serialize(_) | ConvertError::Io(_) => {
                Stage::Write
            }
        }
    }
}

impl From<XlsxError> for ConvertError {
    fn from(err: XlsxError) -> Self {
        ConvertError::Open(err.into())
    }
}

#[cfg(feature = "xls")]
impl From<sheetxml_xls::XlsError> for ConvertError {
    fn from(err: sheetxml_xls::XlsError) -> Self {
        ConvertError::Open(err.into())
    }
}
