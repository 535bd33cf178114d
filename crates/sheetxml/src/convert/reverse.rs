//! Tree to workbook.
//!
//! Indices come from document order: the n-th `Row` child of a sheet is row
//! n and the n-th `Cell` child of a row is column n. Children with any other
//! name are ignored and do not advance the index. A missing or unreadable
//! attribute aborts the whole conversion with a [`ConvertError::Structural`]
//! naming the node, e.g. `WorkSheet[1]/Row[3]`.

use sheetxml_core::{CellValue, Row, TypeTag, Workbook, Worksheet, MAX_COLS};
use sheetxml_tree::{Document, Element};

use super::{ATTR_HEIGHT, ATTR_NAME, ATTR_TYPE, CELL, DATA, ROW, WORKBOOK, WORKSHEET};
use crate::error::{ConvertError, ConvertResult};

/// Rebuild a workbook from its tree form.
///
/// The root element's own name is not checked.
pub fn to_workbook(document: &Document) -> ConvertResult<Workbook> {
    let root = document.root();
    if root.name() != WORKBOOK {
        log::debug!("root element is <{}>, reading it as <{WORKBOOK}>", root.name());
    }

    let mut workbook = Workbook::new();
    let mut sheet_index = 0;
    for child in root.children() {
        if child.name() != WORKSHEET {
            log::debug!("ignoring <{}> under the root", child.name());
            continue;
        }

        let path = format!("{WORKSHEET}[{sheet_index}]");
        let name = required_attribute(child, ATTR_NAME, &path)?;
        let sheet = workbook.add_worksheet(name);
        read_rows(child, sheet, &path)?;
        sheet_index += 1;
    }

    log::debug!("rebuilt workbook with {} sheets", workbook.sheet_count());
    Ok(workbook)
}

fn read_rows(element: &Element, sheet: &mut Worksheet, path: &str) -> ConvertResult<()> {
    let mut row_index: u32 = 0;
    for child in element.children() {
        if child.name() != ROW {
            log::debug!("{path}: ignoring <{}>", child.name());
            continue;
        }

        let row_path = format!("{path}/{ROW}[{row_index}]");
        let raw_height = required_attribute(child, ATTR_HEIGHT, &row_path)?;
        let height: i16 = raw_height.parse().map_err(|_| {
            ConvertError::structural(
                &row_path,
                format!("{ATTR_HEIGHT} {raw_height:?} is not a 16-bit integer"),
            )
        })?;

        let mut row = Row::with_height(height);
        read_cells(child, &mut row, &row_path)?;
        sheet
            .insert_row(row_index, row)
            .map_err(|e| ConvertError::structural(&row_path, e.to_string()))?;
        row_index += 1;
    }
    Ok(())
}

fn read_cells(element: &Element, row: &mut Row, path: &str) -> ConvertResult<()> {
    let mut col: u16 = 0;
    for child in element.children() {
        if child.name() != CELL {
            log::debug!("{path}: ignoring <{}>", child.name());
            continue;
        }

        let cell_path = format!("{path}/{CELL}[{col}]");
        if col >= MAX_COLS {
            return Err(ConvertError::structural(
                cell_path,
                format!("more than {MAX_COLS} cells in a row"),
            ));
        }

        row.set_cell(col, cell_value(child, &cell_path)?);
        col += 1;
    }
    Ok(())
}

fn cell_value(cell: &Element, path: &str) -> ConvertResult<CellValue> {
    let Some(data) = cell.child(DATA) else {
        log::debug!("{path}: no <{DATA}>, reading as empty text");
        return Ok(CellValue::String(String::new()));
    };

    TypeTag::from_tag(data.attribute(ATTR_TYPE))
        .parse_value(data.text())
        .map_err(|e| ConvertError::structural(format!("{path}/{DATA}"), e.to_string()))
}

fn required_attribute<'a>(element: &'a Element, name: &str, path: &str) -> ConvertResult<&'a str> {
    element
        .attribute(name)
        .ok_or_else(|| ConvertError::structural(path, format!("missing attribute '{name}'")))
}
