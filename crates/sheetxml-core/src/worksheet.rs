//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::row::Row;
use crate::{MAX_COLS, MAX_ROWS};

static EMPTY: CellValue = CellValue::Empty;

/// A worksheet (single sheet in a workbook)
///
/// Rows are stored sparsely by index. A row index with no entry is a hole,
/// which is normal for spreadsheets read from disk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Rows keyed by 0-based index
    rows: BTreeMap<u32, Row>,
    /// Height given to rows created implicitly by a cell write
    default_row_height: i16,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            default_row_height: crate::DEFAULT_ROW_HEIGHT,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height in twips given to rows created by cell writes
    pub fn default_row_height(&self) -> i16 {
        self.default_row_height
    }

    /// Set the height given to rows created by cell writes
    pub fn set_default_row_height(&mut self, height: i16) {
        self.default_row_height = height;
    }

    // === Row Access ===

    /// Get a row by index
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// Get a row, creating it with the default height if it does not exist
    pub fn row_or_create(&mut self, index: u32) -> &mut Row {
        let height = self.default_row_height;
        self.rows
            .entry(index)
            .or_insert_with(|| Row::with_height(height))
    }

    /// Insert a row, replacing any row at that index
    pub fn insert_row(&mut self, index: u32, row: Row) -> Result<()> {
        if index >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(index, MAX_ROWS - 1));
        }
        self.rows.insert(index, row);
        Ok(())
    }

    /// Set a row's height in twips, creating the row if needed
    pub fn set_row_height(&mut self, index: u32, height: i16) {
        self.row_or_create(index).height = height;
    }

    /// One past the last row index present (0 for a sheet without rows)
    pub fn row_end(&self) -> u32 {
        self.rows.keys().next_back().map_or(0, |&index| index + 1)
    }

    /// Number of rows present
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over present rows in index order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(&index, row)| (index, row))
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // === Cell Access ===

    /// Get a cell value by address string (e.g., "A1")
    pub fn get_value(&self, address: &str) -> Result<&CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get a cell value by row and column indices; holes read as empty
    pub fn get_value_at(&self, row: u32, col: u16) -> &CellValue {
        self.cell_at(row, col).unwrap_or(&EMPTY)
    }

    /// Get a cell by row and column indices, `None` for holes
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.cell(col))
    }

    /// Set a cell value by address string (e.g., "A1")
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
        }
        self.row_or_create(row).set_cell(col, value.into());
        Ok(())
    }

    /// Total number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(Row::cell_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_ROW_HEIGHT;

    #[test]
    fn test_set_and_get() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell_value("B2", 7.5).unwrap();
        assert_eq!(ws.get_value("B2").unwrap(), &CellValue::Number(7.5));
        assert_eq!(ws.get_value_at(1, 1), &CellValue::Number(7.5));
        assert_eq!(ws.get_value_at(0, 0), &CellValue::Empty);
        assert_eq!(ws.cell_at(0, 0), None);
    }

    #[test]
    fn test_row_end_and_holes() {
        let mut ws = Worksheet::new("Sparse");
        assert_eq!(ws.row_end(), 0);

        ws.set_cell_value_at(0, 0, "a").unwrap();
        ws.set_cell_value_at(4, 0, "e").unwrap();
        assert_eq!(ws.row_end(), 5);
        assert_eq!(ws.row_count(), 2);
        assert!(ws.row(2).is_none());
    }

    #[test]
    fn test_implicit_rows_use_default_height() {
        let mut ws = Worksheet::new("S");
        ws.set_default_row_height(255);
        ws.set_cell_value_at(3, 0, 1.0).unwrap();
        assert_eq!(ws.row(3).unwrap().height, 255);

        let ws = Worksheet::new("T");
        assert_eq!(ws.default_row_height(), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_set_row_height_creates_empty_row() {
        let mut ws = Worksheet::new("S");
        ws.set_row_height(2, 600);
        assert_eq!(ws.row(2).unwrap().height, 600);
        assert!(ws.row(2).unwrap().is_empty());
        assert_eq!(ws.row_end(), 3);
    }

    #[test]
    fn test_bounds() {
        let mut ws = Worksheet::new("S");
        assert!(matches!(
            ws.set_cell_value_at(MAX_ROWS, 0, 1.0),
            Err(Error::RowOutOfBounds(..))
        ));
        assert!(matches!(
            ws.set_cell_value_at(0, MAX_COLS, 1.0),
            Err(Error::ColumnOutOfBounds(..))
        ));
        assert!(ws.insert_row(MAX_ROWS, Row::new()).is_err());
    }
}
