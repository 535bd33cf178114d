//! Cell value types

use std::fmt;

use crate::number::format_number;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Blank cell (present in the sheet, no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers stored as f64, including dates)
    Number(f64),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// Formula with cached result
    Formula {
        /// Formula text without the leading `=` (e.g., "SUM(A1:A10)")
        text: String,
        /// Last calculated value (if any)
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Create a new formula value without a cached result
    pub fn formula<S: Into<String>>(text: S) -> Self {
        CellValue::Formula {
            text: text.into(),
            cached_value: None,
        }
    }

    /// Native type code of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Empty => CellType::Blank,
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Number(_) => CellType::Numeric,
            CellValue::String(_) => CellType::String,
            CellValue::Error(_) => CellType::Error,
            CellValue::Formula { .. } => CellType::Formula,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The text a spreadsheet application would show for this cell.
    ///
    /// Formulas show their cached result; a formula that was never
    /// calculated shows its own text with a leading `=`.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Error(e) => e.as_str().to_string(),
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => v.display_text(),
            CellValue::Formula { text, .. } => {
                if text.starts_with('=') {
                    text.clone()
                } else {
                    format!("={}", text)
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Native type code of a cell.
///
/// Mirrors the value kinds the binary codecs can surface. Only `Numeric`,
/// `Boolean` and `String` have a type tag of their own in the tree format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    Numeric,
    Boolean,
    String,
    Formula,
    Blank,
    Error,
}

impl CellType {
    /// Lowercase name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            CellType::Numeric => "number",
            CellType::Boolean => "boolean",
            CellType::String => "string",
            CellType::Formula => "formula",
            CellType::Blank => "blank",
            CellType::Error => "error",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error values a cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
}

impl CellError {
    /// Each error with its display text and BIFF code
    const TABLE: [(CellError, &'static str, u8); 7] = [
        (CellError::Null, "#NULL!", 0x00),
        (CellError::Div0, "#DIV/0!", 0x07),
        (CellError::Value, "#VALUE!", 0x0F),
        (CellError::Ref, "#REF!", 0x17),
        (CellError::Name, "#NAME?", 0x1D),
        (CellError::Num, "#NUM!", 0x24),
        (CellError::Na, "#N/A", 0x2A),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(e, _, _)| e == self)
            .map_or("#VALUE!", |(_, text, _)| *text)
    }

    /// Parse display text, ignoring ASCII case
    pub fn parse(s: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, text, _)| text.eq_ignore_ascii_case(s))
            .map(|(e, _, _)| *e)
    }

    /// Decode a BIFF error code; unknown codes read as `#VALUE!`
    pub fn from_code(code: u8) -> Self {
        Self::TABLE
            .iter()
            .find(|(_, _, c)| *c == code)
            .map_or(CellError::Value, |(e, _, _)| *e)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(3.14), CellValue::Number(3.14));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from("hello"), CellValue::String("hello".into()));
    }

    #[test]
    fn test_cell_type_codes() {
        assert_eq!(CellValue::Empty.cell_type(), CellType::Blank);
        assert_eq!(CellValue::Number(1.0).cell_type(), CellType::Numeric);
        assert_eq!(CellValue::Boolean(false).cell_type(), CellType::Boolean);
        assert_eq!(CellValue::string("x").cell_type(), CellType::String);
        assert_eq!(CellValue::Error(CellError::Na).cell_type(), CellType::Error);
        assert_eq!(CellValue::formula("A1+1").cell_type(), CellType::Formula);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Empty.display_text(), "");
        assert_eq!(CellValue::Number(1000.0).display_text(), "1000");
        assert_eq!(CellValue::Boolean(true).display_text(), "TRUE");
        assert_eq!(CellValue::Error(CellError::Div0).display_text(), "#DIV/0!");
    }

    #[test]
    fn test_formula_display_text() {
        let cached = CellValue::Formula {
            text: "SUM(A1:A3)".into(),
            cached_value: Some(Box::new(CellValue::Number(6.0))),
        };
        assert_eq!(cached.display_text(), "6");
        assert_eq!(CellValue::formula("SUM(A1:A3)").display_text(), "=SUM(A1:A3)");
        assert_eq!(CellValue::formula("=B2").display_text(), "=B2");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!(CellError::parse("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::parse("#n/a"), Some(CellError::Na));
        assert_eq!(CellError::parse("invalid"), None);
    }

    #[test]
    fn test_cell_error_codes() {
        assert_eq!(CellError::from_code(0x07), CellError::Div0);
        assert_eq!(CellError::from_code(0x2A), CellError::Na);
        assert_eq!(CellError::from_code(0x99), CellError::Value);
    }
}
