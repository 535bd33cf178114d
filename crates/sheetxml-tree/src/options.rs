//! Writer options

/// Options for writing a tree document as XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlWriteOptions {
    /// Character repeated for each indentation level
    pub indent_char: u8,
    /// Characters per indentation level; 0 writes everything on one line
    pub indent_size: usize,
}

impl XmlWriteOptions {
    /// Single-line output
    pub fn compact() -> Self {
        Self {
            indent_size: 0,
            ..Self::default()
        }
    }
}

impl Default for XmlWriteOptions {
    fn default() -> Self {
        Self {
            indent_char: b' ',
            indent_size: 4,
        }
    }
}
