//! Tree document error types

use thiserror::Error;

/// Result type for tree document operations
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while reading or writing a tree document
#[derive(Debug, Error)]
pub enum TreeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Markup that parses but does not form a single-rooted document
    #[error("Malformed document at byte {position}: {message}")]
    Malformed { position: usize, message: String },
}
