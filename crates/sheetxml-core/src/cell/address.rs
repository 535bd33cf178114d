//! A1-style cell addresses

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A cell position, written `B7` in A1 notation
///
/// `$` markers are accepted when parsing and dropped; only the position is
/// kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// 0-based row
    pub row: u32,
    /// 0-based column (A = 0)
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse A1 notation
    ///
    /// ```
    /// use sheetxml_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::parse("C7").unwrap(), CellAddress::new(6, 2));
    /// assert_eq!(CellAddress::parse("$AA$10").unwrap(), CellAddress::new(9, 26));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |why: &str| Error::InvalidAddress(format!("{why} in '{s}'"));

        let text = s.trim();
        let text = text.strip_prefix('$').unwrap_or(text);
        let digits_at = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (letters, digits) = text.split_at(digits_at);
        let digits = digits.strip_prefix('$').unwrap_or(digits);

        if letters.is_empty() {
            return Err(invalid("no column letters"));
        }
        if digits.is_empty() {
            return Err(invalid("no row number"));
        }

        let col = Self::letters_to_column(letters)?;
        let row_number: u32 = digits.parse().map_err(|_| invalid("bad row number"))?;
        let row = row_number
            .checked_sub(1)
            .ok_or_else(|| invalid("row numbers start at 1"))?;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Column letters for a 0-based index (26 -> "AA")
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = u32::from(col) + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// 0-based index for column letters, case-insensitive ("AA" -> 26)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        letters.chars().try_fold(0u32, |acc, c| {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("'{c}' is not a column letter")));
            }
            let next = acc * 26 + u32::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            if next > u32::from(MAX_COLS) {
                return Err(Error::ColumnOutOfBounds(next - 1, MAX_COLS - 1));
            }
            Ok(next)
        })
        .map(|n| (n - 1) as u16)
    }

    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(MAX_ROWS - 1, MAX_COLS - 1)
        );
    }

    #[test]
    fn test_parse_lowercase_and_absolute() {
        assert_eq!(CellAddress::parse("b3").unwrap(), CellAddress::new(2, 1));
        assert_eq!(CellAddress::parse("$B$3").unwrap(), CellAddress::new(2, 1));
        assert_eq!(CellAddress::parse(" B3 ").unwrap(), CellAddress::new(2, 1));
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["", "A", "12", "A0", "XFE1", "A1048577", "A1B"] {
            assert!(CellAddress::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_column_letters_both_ways() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (702, "AAA")] {
            assert_eq!(CellAddress::column_to_letters(col), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap(), col);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CellAddress::new(9, 27).to_string(), "AB10");
    }
}
