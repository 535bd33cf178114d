//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use sheetxml_core::{CellAddress, CellError, CellValue, Row, Workbook, Worksheet, TWIPS_PER_POINT};

/// XLSX file reader
pub struct XlsxReader;

/// Where text inside `<sheetData>` is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Formula,
    Inline,
}

/// A `<c>` element whose children are still being read
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    kind: Option<String>,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
}

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let path = path.as_ref();
        log::debug!("reading XLSX workbook from {}", path.display());
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::new();
        for (name, r_id) in &sheet_info {
            match sheet_paths.get(r_id) {
                Some(path) => {
                    let worksheet = workbook.add_worksheet(name.as_str());
                    Self::read_worksheet(&mut archive, path, worksheet, &shared_strings)?;
                    log::debug!(
                        "read sheet '{}' from {}: {} rows, {} cells",
                        name,
                        path,
                        worksheet.row_count(),
                        worksheet.cell_count()
                    );
                }
                None => log::warn!(
                    "sheet '{}' has no worksheet relationship {}, skipping",
                    name,
                    r_id
                ),
            }
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    ///
    /// Rich text runs are concatenated; phonetic runs (`rPh`) are skipped.
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        const PART: &str = "xl/sharedStrings.xml";
        let mut strings = Vec::new();

        let file = match archive.by_name(PART) {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader
                .read_event_into(&mut buf)
                .map_err(|e| XlsxError::xml(PART, e))?
            {
                Event::Start(e) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                // <si><t/></si> is an empty string
                Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Event::End(e) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => {
                    let text = e.unescape().map_err(|e| XlsxError::xml(PART, e))?;
                    current.push_str(&text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        log::trace!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in sheet order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        const PART: &str = "xl/workbook.xml";
        let file = archive
            .by_name(PART)
            .map_err(|_| XlsxError::MissingPart(PART.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader
                .read_event_into(&mut buf)
                .map_err(|e| XlsxError::xml(PART, e))?
            {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) = (attr(&e, b"name"), attr(&e, b"r:id")) {
                        sheets.push((name, r_id));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet part paths by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        const PART: &str = "xl/_rels/workbook.xml.rels";
        let file = archive
            .by_name(PART)
            .map_err(|_| XlsxError::MissingPart(PART.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader
                .read_event_into(&mut buf)
                .map_err(|e| XlsxError::xml(PART, e))?
            {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                    let id = attr(&e, b"Id");
                    let target = attr(&e, b"Target");
                    let rel_type = attr(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Relative targets resolve against xl/
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read one worksheet part: row heights and cell values
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        // Cell text may carry meaningful leading/trailing whitespace
        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut row_index: u32 = 0;
        let mut next_row: u32 = 0;
        let mut next_col: u16 = 0;
        let mut cell: Option<PendingCell> = None;
        let mut target = TextTarget::None;
        let mut in_inline = false;
        let mut in_phonetic = false;

        loop {
            let event = xml_reader
                .read_event_into(&mut buf)
                .map_err(|e| XlsxError::xml(path, e))?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.name().as_ref() {
                        b"sheetFormatPr" => {
                            if let Some(points) = attr(e, b"defaultRowHeight")
                                .and_then(|s| s.parse::<f64>().ok())
                            {
                                worksheet.set_default_row_height(points_to_twips(points));
                            }
                        }
                        b"row" => {
                            row_index = match attr(e, b"r").and_then(|s| s.parse::<u32>().ok()) {
                                Some(r) => r.saturating_sub(1), // 1-based to 0-based
                                None => next_row,
                            };
                            let height = attr(e, b"ht")
                                .and_then(|s| s.parse::<f64>().ok())
                                .map(points_to_twips)
                                .unwrap_or_else(|| worksheet.default_row_height());
                            worksheet.insert_row(row_index, Row::with_height(height))?;
                            next_row = row_index.saturating_add(1);
                            next_col = 0;
                        }
                        b"c" => {
                            let pending = PendingCell {
                                reference: attr(e, b"r"),
                                kind: attr(e, b"t"),
                                ..PendingCell::default()
                            };
                            if is_empty {
                                Self::finish_cell(
                                    worksheet,
                                    pending,
                                    row_index,
                                    &mut next_col,
                                    shared_strings,
                                )?;
                            } else {
                                cell = Some(pending);
                            }
                        }
                        // Shared formula references (<f t="shared" si="0"/>) carry no
                        // text; the cell reads as its cached value.
                        b"v" if !is_empty && cell.is_some() => target = TextTarget::Value,
                        b"f" if !is_empty && cell.is_some() => target = TextTarget::Formula,
                        b"is" if !is_empty && cell.is_some() => {
                            in_inline = true;
                            if let Some(pending) = cell.as_mut() {
                                pending.inline.get_or_insert_with(String::new);
                            }
                        }
                        b"rPh" if !is_empty => in_phonetic = true,
                        b"t" if !is_empty && in_inline && !in_phonetic => {
                            target = TextTarget::Inline
                        }
                        _ => {}
                    }
                }
                Event::Text(ref e) if target != TextTarget::None => {
                    let text = e.unescape().map_err(|e| XlsxError::xml(path, e))?;
                    if let Some(pending) = cell.as_mut() {
                        let slot = match target {
                            TextTarget::Value => &mut pending.value,
                            TextTarget::Formula => &mut pending.formula,
                            TextTarget::Inline | TextTarget::None => &mut pending.inline,
                        };
                        slot.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::End(ref e) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            Self::finish_cell(
                                worksheet,
                                pending,
                                row_index,
                                &mut next_col,
                                shared_strings,
                            )?;
                        }
                        target = TextTarget::None;
                        in_inline = false;
                    }
                    b"v" | b"f" | b"t" => target = TextTarget::None,
                    b"is" => in_inline = false,
                    b"rPh" => in_phonetic = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Store a completed cell in the worksheet
    fn finish_cell(
        worksheet: &mut Worksheet,
        cell: PendingCell,
        row_index: u32,
        next_col: &mut u16,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let (row, col) = match cell.reference.as_deref() {
            Some(reference) => {
                let addr = CellAddress::parse(reference).map_err(|e| {
                    XlsxError::Parse(format!("Invalid cell reference '{}': {}", reference, e))
                })?;
                (addr.row, addr.col)
            }
            None => (row_index, *next_col),
        };
        *next_col = col.saturating_add(1);

        let value = Self::cell_value(cell, shared_strings)?;
        worksheet.set_cell_value_at(row, col, value)?;
        Ok(())
    }

    /// Decode a cell's value from its type attribute and collected text
    fn cell_value(cell: PendingCell, shared_strings: &[String]) -> XlsxResult<CellValue> {
        let value = match (cell.kind.as_deref(), cell.value.as_deref(), cell.inline) {
            (Some("inlineStr"), _, Some(text)) => CellValue::String(decode_excel_escapes(&text)),
            (_, None, _) => CellValue::Empty,
            (kind, Some(raw), _) => Self::typed_value(kind.unwrap_or("n"), raw, shared_strings)?,
        };

        match cell.formula {
            Some(text) if !text.is_empty() => {
                let text = text.strip_prefix('=').unwrap_or(&text).to_string();
                let cached_value = (!value.is_empty()).then(|| Box::new(value));
                Ok(CellValue::Formula { text, cached_value })
            }
            _ => Ok(value),
        }
    }

    fn typed_value(kind: &str, raw: &str, shared_strings: &[String]) -> XlsxResult<CellValue> {
        let value = match kind {
            // Shared string
            "s" => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", raw))
                })?;
                let s = shared_strings
                    .get(index)
                    .ok_or(XlsxError::SharedStringIndex {
                        index,
                        count: shared_strings.len(),
                    })?;
                CellValue::String(s.clone())
            }

            "b" => {
                let raw = raw.trim();
                CellValue::Boolean(raw == "1" || raw.eq_ignore_ascii_case("true"))
            }

            "e" => CellError::parse(raw.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::String(raw.to_string())),

            "str" | "inlineStr" => CellValue::String(decode_excel_escapes(raw)),

            "n" => match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(raw.to_string()),
            },

            // ISO dates (t="d") and unknown types keep their text
            _ => CellValue::String(raw.to_string()),
        };
        Ok(value)
    }
}

/// First value of an attribute, unescaped. Malformed attributes are skipped.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Convert a height in points to twips, saturating at the i16 range
pub(crate) fn points_to_twips(points: f64) -> i16 {
    (points * TWIPS_PER_POINT)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    const WORKSHEET_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

    /// Build a package with one sheet and an optional shared strings part
    fn package(sheet_xml: &str, shared_strings: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data &amp; more" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(
                format!(
                    r#"<?xml version="1.0"?><Relationships><Relationship Id="rId1" Type="{}" Target="worksheets/sheet1.xml"/></Relationships>"#,
                    WORKSHEET_REL
                )
                .as_bytes(),
            )
            .unwrap();

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();

            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_value_types() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1">
                <c r="A1" t="s"><v>1</v></c>
                <c r="B1"><v>2.5</v></c>
                <c r="C1" t="b"><v>1</v></c>
                <c r="D1" t="e"><v>#DIV/0!</v></c>
                <c r="E1" t="inlineStr"><is><t xml:space="preserve"> padded </t></is></c>
                <c r="F1" t="str"><f>A1&amp;"x"</f><v>rich textx</v></c>
                <c r="G1"><f>B1*2</f><v>5</v></c>
                <c r="H1" s="3"/>
            </row>
        </sheetData></worksheet>"#;
        let sst = r#"<sst><si><t>first</t></si><si><r><t>rich </t></r><r><t>text</t></r><rPh><t>ignored</t></rPh></si></sst>"#;

        let wb = XlsxReader::read(Cursor::new(package(sheet, Some(sst)))).unwrap();
        let ws = wb.worksheet(0).unwrap();
        assert_eq!(ws.name(), "Data & more");

        assert_eq!(ws.get_value_at(0, 0), &CellValue::string("rich text"));
        assert_eq!(ws.get_value_at(0, 1), &CellValue::Number(2.5));
        assert_eq!(ws.get_value_at(0, 2), &CellValue::Boolean(true));
        assert_eq!(ws.get_value_at(0, 3), &CellValue::Error(CellError::Div0));
        assert_eq!(ws.get_value_at(0, 4), &CellValue::string(" padded "));
        assert_eq!(
            ws.get_value_at(0, 5),
            &CellValue::Formula {
                text: "A1&\"x\"".to_string(),
                cached_value: Some(Box::new(CellValue::string("rich textx"))),
            }
        );
        assert_eq!(ws.get_value_at(0, 6).display_text(), "5");
        assert_eq!(ws.cell_at(0, 7), Some(&CellValue::Empty));
        assert_eq!(ws.row(0).unwrap().cell_end(), 8);
    }

    #[test]
    fn test_read_row_heights_and_holes() {
        let sheet = r#"<worksheet>
            <sheetFormatPr defaultRowHeight="12.75"/>
            <sheetData>
                <row r="1" ht="30" customHeight="1"><c r="A1"><v>1</v></c></row>
                <row r="3"><c r="C3"><v>3</v></c></row>
                <row r="4" ht="18.5" customHeight="1"/>
            </sheetData>
        </worksheet>"#;

        let wb = XlsxReader::read(Cursor::new(package(sheet, None))).unwrap();
        let ws = wb.worksheet(0).unwrap();

        assert_eq!(ws.default_row_height(), 255);
        assert_eq!(ws.row(0).unwrap().height, 600);
        assert!(ws.row(1).is_none());
        assert_eq!(ws.row(2).unwrap().height, 255);
        assert_eq!(ws.row(2).unwrap().cell(2), Some(&CellValue::Number(3.0)));
        assert_eq!(ws.row(3).unwrap().height, 370);
        assert!(ws.row(3).unwrap().is_empty());
        assert_eq!(ws.row_end(), 4);
    }

    #[test]
    fn test_read_cells_without_references() {
        let sheet = r#"<worksheet><sheetData>
            <row><c><v>1</v></c><c><v>2</v></c></row>
            <row><c t="inlineStr"><is><t>x</t></is></c></row>
        </sheetData></worksheet>"#;

        let wb = XlsxReader::read(Cursor::new(package(sheet, None))).unwrap();
        let ws = wb.worksheet(0).unwrap();
        assert_eq!(ws.get_value_at(0, 1), &CellValue::Number(2.0));
        assert_eq!(ws.get_value_at(1, 0), &CellValue::string("x"));
    }

    #[test]
    fn test_shared_string_out_of_bounds() {
        let sheet = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>9</v></c></row></sheetData></worksheet>"#;
        let err = XlsxReader::read(Cursor::new(package(sheet, Some("<sst/>")))).unwrap_err();
        assert!(
            matches!(err, XlsxError::SharedStringIndex { index: 9, count: 0 }),
            "{err:?}"
        );
    }

    #[test]
    fn test_not_a_package() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }
        assert!(matches!(
            XlsxReader::read(Cursor::new(buf)),
            Err(XlsxError::InvalidFormat(_))
        ));
        assert!(matches!(
            XlsxReader::read(Cursor::new(b"not a zip".to_vec())),
            Err(XlsxError::Zip(_))
        ));
    }

    #[test]
    fn test_points_to_twips() {
        assert_eq!(points_to_twips(15.0), 300);
        assert_eq!(points_to_twips(12.75), 255);
        assert_eq!(points_to_twips(1e9), i16::MAX);
    }
}
