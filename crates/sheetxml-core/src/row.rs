//! Row type

use std::collections::BTreeMap;

use crate::cell::CellValue;
use crate::DEFAULT_ROW_HEIGHT;

/// A row: its height and its cells, keyed by column index.
///
/// Cells are sparse. A column with no entry is a hole; a column holding
/// [`CellValue::Empty`] is a blank cell that exists in the source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Height in twips (1/20 point)
    pub height: i16,
    cells: BTreeMap<u16, CellValue>,
}

impl Row {
    /// Create an empty row with the default height
    pub fn new() -> Self {
        Self::with_height(DEFAULT_ROW_HEIGHT)
    }

    /// Create an empty row with the given height in twips
    pub fn with_height(height: i16) -> Self {
        Self {
            height,
            cells: BTreeMap::new(),
        }
    }

    /// Height in points
    pub fn height_points(&self) -> f64 {
        self.height as f64 / crate::TWIPS_PER_POINT
    }

    /// Get a cell by column index
    pub fn cell(&self, col: u16) -> Option<&CellValue> {
        self.cells.get(&col)
    }

    /// Set a cell, replacing whatever was at that column
    pub fn set_cell(&mut self, col: u16, value: CellValue) {
        self.cells.insert(col, value);
    }

    /// One past the last occupied column index (0 for a row without cells)
    pub fn cell_end(&self) -> u32 {
        self.cells
            .keys()
            .next_back()
            .map_or(0, |&col| col as u32 + 1)
    }

    /// Iterate over occupied cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &CellValue)> {
        self.cells.iter().map(|(&col, value)| (col, value))
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row() {
        let row = Row::new();
        assert_eq!(row.height, DEFAULT_ROW_HEIGHT);
        assert_eq!(row.cell_end(), 0);
        assert!(row.is_empty());
    }

    #[test]
    fn test_cell_end_counts_past_last_column() {
        let mut row = Row::with_height(255);
        row.set_cell(0, CellValue::Number(1.0));
        row.set_cell(4, CellValue::string("x"));
        assert_eq!(row.cell_end(), 5);
        assert_eq!(row.cell_count(), 2);
        assert_eq!(row.cell(2), None);
    }

    #[test]
    fn test_cell_end_at_max_column() {
        let mut row = Row::new();
        row.set_cell(u16::MAX, CellValue::Empty);
        assert_eq!(row.cell_end(), u16::MAX as u32 + 1);
    }

    #[test]
    fn test_height_points() {
        assert_eq!(Row::with_height(300).height_points(), 15.0);
    }
}
