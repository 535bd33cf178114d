//! # sheetxml-tree
//!
//! In-memory element tree plus an XML reader and writer built on quick-xml.

pub mod document;
pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use document::{Document, Element};
pub use error::{TreeError, TreeResult};
pub use options::XmlWriteOptions;
pub use reader::XmlReader;
pub use writer::XmlWriter;
