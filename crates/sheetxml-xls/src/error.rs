//! XLS error types

use thiserror::Error;

/// Result type for XLS operations
pub type XlsResult<T> = std::result::Result<T, XlsError>;

/// Errors that can occur while reading an XLS file
#[derive(Debug, Error)]
pub enum XlsError {
    /// IO error (the cfb crate reports container errors as io::Error too)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not a BIFF8 workbook
    #[error("Invalid XLS format: {0}")]
    InvalidFormat(String),

    /// A BIFF version other than BIFF8
    #[error("Unsupported XLS version: {0}")]
    UnsupportedVersion(String),

    /// A record body is shorter than its layout requires
    #[error("Truncated {record} record at stream offset {offset}: {message}")]
    Truncated {
        record: &'static str,
        offset: u64,
        message: String,
    },

    /// Low-level parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetxml_core::Error),
}
