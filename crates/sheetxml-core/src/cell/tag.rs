//! Type tags carried by the tree format.
//!
//! The tree format knows three value kinds. [`TypeTag`] maps them to and from
//! the native [`CellType`] codes; everything that is not a number or a
//! boolean travels as `String`.

use std::fmt;

use super::value::{CellType, CellValue};
use crate::error::{Error, Result};
use crate::number::format_number;

/// Semantic type of a cell in the tree format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    Number,
    Boolean,
    #[default]
    String,
}

impl TypeTag {
    /// The literal written to the `type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::String => "String",
        }
    }

    /// Decode a `type` attribute.
    ///
    /// Matching is exact. Unknown, empty and absent tags decode as
    /// [`TypeTag::String`]; this never fails.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Number") => TypeTag::Number,
            Some("Boolean") => TypeTag::Boolean,
            Some(_) | None => TypeTag::String,
        }
    }

    /// Native type code a tag reconstructs into
    pub fn cell_type(&self) -> CellType {
        match self {
            TypeTag::Number => CellType::Numeric,
            TypeTag::Boolean => CellType::Boolean,
            TypeTag::String => CellType::String,
        }
    }

    /// Native type code for a `type` attribute, `String` unless recognized
    pub fn native_type(tag: Option<&str>) -> CellType {
        Self::from_tag(tag).cell_type()
    }

    /// Tag emitted for a native type code.
    ///
    /// Formula, blank and error cells have no tag of their own and travel
    /// as `String` carrying their display text.
    pub fn for_cell_type(cell_type: CellType) -> Self {
        match cell_type {
            CellType::Numeric => TypeTag::Number,
            CellType::Boolean => TypeTag::Boolean,
            CellType::String => TypeTag::String,
            CellType::Formula => TypeTag::String,
            CellType::Blank => TypeTag::String,
            CellType::Error => TypeTag::String,
        }
    }

    /// Classify a native value into its tag and canonical text.
    ///
    /// Numbers go through [`format_number`], booleans render as
    /// `true`/`false`, everything else renders its display text.
    pub fn classify(value: &CellValue) -> (Self, String) {
        let tag = Self::for_cell_type(value.cell_type());
        let text = match (tag, value) {
            (TypeTag::Number, CellValue::Number(n)) => format_number(*n),
            (TypeTag::Boolean, CellValue::Boolean(b)) => b.to_string(),
            (_, other) => other.display_text(),
        };
        (tag, text)
    }

    /// Read tagged text back into a native value.
    ///
    /// `Number` text must parse as `f64` and `Boolean` text must be `true` or
    /// `false` (ASCII case-insensitive); surrounding whitespace is ignored for
    /// both. `String` text is kept verbatim.
    pub fn parse_value(&self, text: &str) -> Result<CellValue> {
        match self {
            TypeTag::Number => text
                .trim()
                .parse::<f64>()
                .map(CellValue::Number)
                .map_err(|_| self.invalid(text)),
            TypeTag::Boolean => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(CellValue::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(CellValue::Boolean(false))
                } else {
                    Err(self.invalid(text))
                }
            }
            TypeTag::String => Ok(CellValue::String(text.to_string())),
        }
    }

    fn invalid(&self, text: &str) -> Error {
        Error::InvalidTypedValue {
            tag: self.as_str(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
