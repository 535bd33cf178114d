//! Behavior of the forward and reverse converters on in-memory documents

use pretty_assertions::assert_eq;
use sheetxml::prelude::*;
use sheetxml::{CellError, CellType};

fn sheet_xml(rows: &str) -> String {
    format!(r#"<Workbook><WorkSheet name="S">{rows}</WorkSheet></Workbook>"#)
}

fn reverse(xml: &str) -> ConvertResult<Workbook> {
    to_workbook(&XmlReader::read_str(xml).unwrap())
}

#[test]
fn dense_workbook_survives_tree_round_trip() {
    let mut wb = Workbook::new();
    let first = wb.add_worksheet("Budget");
    first.set_cell_value("A1", "Item").unwrap();
    first.set_cell_value("B1", "Cost").unwrap();
    first.set_cell_value("A2", "Paint").unwrap();
    first.set_cell_value("B2", 12.75).unwrap();
    first.set_cell_value("C2", true).unwrap();
    first.set_row_height(1, 600);
    wb.add_worksheet("Budget").set_cell_value("A1", -4.0).unwrap();

    let xml = XmlWriter::to_string(&to_tree(&wb), &XmlWriteOptions::default()).unwrap();
    let back = reverse(&xml).unwrap();

    assert_eq!(back, wb);
}

#[test]
fn every_native_type_gets_a_tag() {
    let expected = [
        (CellType::Numeric, "Number"),
        (CellType::Boolean, "Boolean"),
        (CellType::String, "String"),
        (CellType::Formula, "String"),
        (CellType::Blank, "String"),
        (CellType::Error, "String"),
    ];
    for (cell_type, tag) in expected {
        assert_eq!(TypeTag::for_cell_type(cell_type).as_str(), tag);
    }
}

#[test]
fn error_and_formula_cells_travel_as_display_text() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet("S");
    ws.set_cell_value("A1", CellError::Div0).unwrap();
    ws.set_cell_value(
        "B1",
        CellValue::Formula {
            text: "A2&\"x\"".into(),
            cached_value: Some(Box::new(CellValue::string("yx"))),
        },
    )
    .unwrap();

    let back = to_workbook(&to_tree(&wb)).unwrap();
    let ws = back.worksheet(0).unwrap();
    assert_eq!(ws.get_value("A1").unwrap(), &CellValue::string("#DIV/0!"));
    assert_eq!(ws.get_value("B1").unwrap(), &CellValue::string("yx"));
}

#[test]
fn numbers_render_canonically() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet("S");
    ws.set_cell_value("A1", 1000.0).unwrap();
    ws.set_cell_value("B1", 1000).unwrap();
    ws.set_cell_value("C1", 0.1).unwrap();

    let doc = to_tree(&wb);
    let texts: Vec<&str> = doc.root().children()[0].children()[0]
        .children()
        .iter()
        .map(|cell| cell.child("Data").unwrap().text())
        .collect();
    assert_eq!(texts, vec!["1000", "1000", "0.1"]);
}

#[test]
fn missing_row_is_skipped() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet("S");
    for row in [0, 1, 3, 4] {
        ws.set_cell_value_at(row, 0, row as f64).unwrap();
    }

    let doc = to_tree(&wb);
    let rows = doc.root().children()[0].children();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2].child("Cell").unwrap().child("Data").unwrap().text(), "3");
}

#[test]
fn non_numeric_height_is_structural() {
    let err = reverse(&sheet_xml(r#"<Row Height="tall"/>"#)).unwrap_err();
    assert_eq!(err.stage(), Stage::Structural);
    assert!(matches!(err, ConvertError::Structural { ref path, .. } if path == "WorkSheet[0]/Row[0]"));
}

#[test]
fn missing_height_is_structural() {
    let err = reverse(&sheet_xml("<Row/>")).unwrap_err();
    assert_eq!(err.stage(), Stage::Structural);
}

#[test]
fn document_order_assigns_columns() {
    let wb = reverse(&sheet_xml(
        r#"<Row Height="300">
            <Cell><Data type="String">first</Data></Cell>
            <Cell><Data type="String">second</Data></Cell>
            <Cell><Data type="String">third</Data></Cell>
        </Row>"#,
    ))
    .unwrap();

    let ws = wb.worksheet(0).unwrap();
    assert_eq!(ws.get_value("A1").unwrap(), &CellValue::string("first"));
    assert_eq!(ws.get_value("B1").unwrap(), &CellValue::string("second"));
    assert_eq!(ws.get_value("C1").unwrap(), &CellValue::string("third"));
}

#[test]
fn sparse_sheet_is_compacted_on_the_way_back() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet("S");
    ws.set_cell_value("A1", "a").unwrap();
    ws.set_cell_value("D1", "d").unwrap();
    ws.set_cell_value("A5", "e").unwrap();

    let back = to_workbook(&to_tree(&wb)).unwrap();
    let ws = back.worksheet(0).unwrap();
    assert_eq!(ws.get_value("B1").unwrap(), &CellValue::string("d"));
    assert_eq!(ws.get_value("A2").unwrap(), &CellValue::string("e"));
    assert_eq!(ws.row_end(), 2);
}

#[test]
fn unknown_type_tag_reads_as_text() {
    let wb = reverse(&sheet_xml(
        r#"<Row Height="300">
            <Cell><Data type="Currency">12.50</Data></Cell>
            <Cell><Data>7</Data></Cell>
        </Row>"#,
    ))
    .unwrap();

    let ws = wb.worksheet(0).unwrap();
    assert_eq!(ws.get_value("A1").unwrap(), &CellValue::string("12.50"));
    assert_eq!(ws.get_value("B1").unwrap(), &CellValue::string("7"));
}

#[test]
fn malformed_boolean_is_structural() {
    let err = reverse(&sheet_xml(
        r#"<Row Height="300"><Cell><Data type="Boolean">maybe</Data></Cell></Row>"#,
    ))
    .unwrap_err();
    assert_eq!(err.stage(), Stage::Structural);
}
