//! Workbook to tree.

use sheetxml_core::{CellValue, Row, TypeTag, Workbook, Worksheet};
use sheetxml_tree::{Document, Element};

use super::{ATTR_HEIGHT, ATTR_NAME, ATTR_TYPE, CELL, DATA, ROW, WORKBOOK, WORKSHEET};

/// Build the tree form of a workbook.
///
/// Sheets keep their order. Absent rows and cells produce no node, so the
/// tree of a sparse sheet is shorter than the sheet's extent; the reverse
/// direction reassigns indices from document order.
pub fn to_tree(workbook: &Workbook) -> Document {
    let mut root = Element::new(WORKBOOK);
    for sheet in workbook.worksheets() {
        root.add_child(sheet_element(sheet));
    }
    log::debug!("built tree for {} sheets", workbook.sheet_count());
    Document::new(root)
}

fn sheet_element(sheet: &Worksheet) -> Element {
    let mut element = Element::new(WORKSHEET).with_attribute(ATTR_NAME, sheet.name());

    let mut expected = 0;
    for (index, row) in sheet.rows() {
        if index > expected {
            log::debug!(
                "sheet '{}': rows {}..{} absent",
                sheet.name(),
                expected,
                index
            );
        }
        element.add_child(row_element(row));
        expected = index + 1;
    }

    element
}

fn row_element(row: &Row) -> Element {
    let mut element = Element::new(ROW).with_attribute(ATTR_HEIGHT, row.height.to_string());
    for (_, value) in row.cells() {
        element.add_child(cell_element(value));
    }
    element
}

fn cell_element(value: &CellValue) -> Element {
    let (tag, text) = TypeTag::classify(value);
    Element::new(CELL).with_child(
        Element::new(DATA)
            .with_attribute(ATTR_TYPE, tag.as_str())
            .with_text(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetxml_core::CellError;

    fn data_of(doc: &Document, sheet: usize, row: usize, cell: usize) -> &Element {
        doc.root().children()[sheet].children()[row].children()[cell]
            .child(DATA)
            .unwrap()
    }

    #[test]
    fn test_cell_kinds() {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet("Kinds");
        ws.set_cell_value_at(0, 0, 1000.0).unwrap();
        ws.set_cell_value_at(0, 1, true).unwrap();
        ws.set_cell_value_at(0, 2, "text").unwrap();
        ws.set_cell_value_at(0, 3, CellValue::Error(CellError::Na)).unwrap();
        ws.set_cell_value_at(0, 4, CellValue::Empty).unwrap();
        ws.set_cell_value_at(0, 5, CellValue::formula("SUM(A1:A2)")).unwrap();

        let doc = to_tree(&wb);
        let seen: Vec<(&str, &str)> = (0..6)
            .map(|i| {
                let data = data_of(&doc, 0, 0, i);
                (data.attribute(ATTR_TYPE).unwrap(), data.text())
            })
            .collect();

        assert_eq!(
            seen,
            vec![
                ("Number", "1000"),
                ("Boolean", "true"),
                ("String", "text"),
                ("String", "#N/A"),
                ("String", ""),
                ("String", "=SUM(A1:A2)"),
            ]
        );
    }

    #[test]
    fn test_sheet_and_row_attributes() {
        let mut wb = Workbook::new();
        wb.add_worksheet("First").set_row_height(0, 420);
        wb.add_worksheet("Second");

        let doc = to_tree(&wb);
        let root = doc.root();
        assert_eq!(root.name(), WORKBOOK);
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].attribute(ATTR_NAME), Some("First"));
        assert_eq!(root.children()[1].attribute(ATTR_NAME), Some("Second"));
        assert!(!root.children()[1].has_children());

        let row = &root.children()[0].children()[0];
        assert_eq!(row.attribute(ATTR_HEIGHT), Some("420"));
        assert!(!row.has_children());
    }

    #[test]
    fn test_holes_are_skipped() {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet("Sparse");
        ws.set_cell_value_at(0, 0, "a").unwrap();
        ws.set_cell_value_at(0, 3, "b").unwrap();
        ws.set_cell_value_at(4, 0, "c").unwrap();

        let doc = to_tree(&wb);
        let sheet = &doc.root().children()[0];
        assert_eq!(sheet.children().len(), 2);
        assert_eq!(sheet.children()[0].children().len(), 2);
        assert_eq!(data_of(&doc, 0, 0, 1).text(), "b");
        assert_eq!(data_of(&doc, 0, 1, 0).text(), "c");
    }

    #[test]
    fn test_empty_workbook() {
        let doc = to_tree(&Workbook::new());
        assert_eq!(doc.root().name(), WORKBOOK);
        assert!(!doc.root().has_children());
    }
}
