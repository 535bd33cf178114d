//! XLSX writer
//!
//! Writes the smallest package Excel accepts: content types, package and
//! workbook relationships, a default stylesheet, the workbook part and one
//! part per worksheet. Strings are written inline so no shared strings
//! table is needed.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use crate::escape::{encode_excel_escapes, escape_xml};
use sheetxml_core::{format_number, CellAddress, CellValue, Workbook, Worksheet, TWIPS_PER_POINT};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Sheet name used when a workbook without worksheets is written
const PLACEHOLDER_SHEET: &str = "Sheet1";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        log::debug!("writing XLSX workbook to {}", path.display());
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    ///
    /// A package must contain at least one sheet, so a workbook without
    /// worksheets is written with a single empty one.
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let placeholder;
        let sheets: Vec<&Worksheet> = if workbook.is_empty() {
            log::warn!(
                "workbook has no worksheets; writing an empty '{}'",
                PLACEHOLDER_SHEET
            );
            placeholder = Worksheet::new(PLACEHOLDER_SHEET);
            vec![&placeholder]
        } else {
            workbook.worksheets().collect()
        };

        let mut seen = HashSet::new();
        for sheet in &sheets {
            if !seen.insert(sheet.name()) {
                log::warn!(
                    "duplicate sheet name '{}'; spreadsheet applications may refuse the file",
                    sheet.name()
                );
            }
        }

        let mut zip = zip::ZipWriter::new(writer);

        Self::write_content_types(&mut zip, sheets.len())?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, &sheets)?;
        Self::write_workbook_rels(&mut zip, sheets.len())?;
        Self::write_styles_xml(&mut zip)?;

        for (index, sheet) in sheets.iter().enumerate() {
            Self::write_worksheet(&mut zip, sheet, index)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn start_part<W: Write + Seek>(zip: &mut zip::ZipWriter<W>, name: String) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_count: usize,
    ) -> XlsxResult<()> {
        Self::start_part(zip, "[Content_Types].xml".to_string())?;

        let mut content = format!(
            r#"{XML_HEADER}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#
        );

        for i in 1..=sheet_count {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }

        content.push_str("\n</Types>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        Self::start_part(zip, "_rels/.rels".to_string())?;

        let content = format!(
            r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheets: &[&Worksheet],
    ) -> XlsxResult<()> {
        Self::start_part(zip, "xl/workbook.xml".to_string())?;

        let mut content = format!(
            r#"{XML_HEADER}
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">
    <sheets>"#
        );

        for (i, sheet) in sheets.iter().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str("\n    </sheets>\n</workbook>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_count: usize,
    ) -> XlsxResult<()> {
        Self::start_part(zip, "xl/_rels/workbook.xml.rels".to_string())?;

        let mut content = format!(
            r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
        );

        for i in 1..=sheet_count {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            ));
        }

        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/>
</Relationships>"#,
            sheet_count + 1
        ));

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        Self::start_part(zip, "xl/styles.xml".to_string())?;

        let content = format!(
            r#"{XML_HEADER}
<styleSheet xmlns="{MAIN_NS}">
    <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
    <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
    ) -> XlsxResult<()> {
        Self::start_part(zip, format!("xl/worksheets/sheet{}.xml", index + 1))?;

        let default_height = sheet.default_row_height();
        let mut content = format!(
            r#"{XML_HEADER}
<worksheet xmlns="{MAIN_NS}">
    <sheetFormatPr defaultRowHeight="{}"/>"#,
            format_number(default_height as f64 / TWIPS_PER_POINT)
        );

        if sheet.is_empty() {
            content.push_str("\n    <sheetData/>");
        } else {
            content.push_str("\n    <sheetData>");

            // Every stored row is written, even without cells, so the row
            // and its height survive a read-back.
            for (row_index, row) in sheet.rows() {
                let mut attrs = format!("r=\"{}\"", row_index + 1);
                if row.height != default_height {
                    attrs.push_str(&format!(
                        " ht=\"{}\" customHeight=\"1\"",
                        format_number(row.height_points())
                    ));
                }

                if row.is_empty() {
                    content.push_str(&format!("\n        <row {}/>", attrs));
                    continue;
                }

                content.push_str(&format!("\n        <row {}>", attrs));
                for (col, value) in row.cells() {
                    let cell_ref = CellAddress::new(row_index, col).to_a1_string();
                    Self::write_cell(&mut content, &cell_ref, value);
                }
                content.push_str("\n        </row>");
            }

            content.push_str("\n    </sheetData>");
        }

        content.push_str("\n</worksheet>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_cell(content: &mut String, cell_ref: &str, value: &CellValue) {
        content.push_str("\n            ");
        match value {
            CellValue::Empty => {
                // Blank cells are kept so the column still exists on read
                content.push_str(&format!("<c r=\"{}\"/>", cell_ref));
            }
            CellValue::Number(n) if !n.is_finite() => {
                log::warn!("{} holds {}, which XLSX cannot store; writing #NUM!", cell_ref, n);
                content.push_str(&format!("<c r=\"{}\" t=\"e\"><v>#NUM!</v></c>", cell_ref));
            }
            CellValue::Number(n) => {
                content.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", cell_ref, format_number(*n)));
            }
            CellValue::String(s) => {
                content.push_str(&format!(
                    "<c r=\"{}\" t=\"inlineStr\"><is>{}</is></c>",
                    cell_ref,
                    text_element(s)
                ));
            }
            CellValue::Boolean(b) => {
                content.push_str(&format!(
                    "<c r=\"{}\" t=\"b\"><v>{}</v></c>",
                    cell_ref,
                    if *b { 1 } else { 0 }
                ));
            }
            CellValue::Error(e) => {
                content.push_str(&format!(
                    "<c r=\"{}\" t=\"e\"><v>{}</v></c>",
                    cell_ref,
                    escape_xml(e.as_str())
                ));
            }
            CellValue::Formula { text, cached_value } => {
                let formula = escape_xml(text.strip_prefix('=').unwrap_or(text));
                let (kind, cached) = match cached_value.as_deref() {
                    Some(CellValue::Number(n)) if n.is_finite() => ("", Some(format_number(*n))),
                    Some(CellValue::Boolean(b)) => (" t=\"b\"", Some(u8::from(*b).to_string())),
                    Some(CellValue::String(s)) => {
                        (" t=\"str\"", Some(escape_xml(&encode_excel_escapes(s))))
                    }
                    Some(CellValue::Error(e)) => (" t=\"e\"", Some(escape_xml(e.as_str()))),
                    _ => ("", None),
                };
                content.push_str(&format!("<c r=\"{}\"{}><f>{}</f>", cell_ref, kind, formula));
                if let Some(v) = cached {
                    content.push_str(&format!("<v>{}</v>", v));
                }
                content.push_str("</c>");
            }
        }
    }
}

/// A `<t>` element, preserving leading and trailing whitespace
fn text_element(s: &str) -> String {
    let escaped = escape_xml(&encode_excel_escapes(s));
    if s.trim() != s {
        format!("<t xml:space=\"preserve\">{}</t>", escaped)
    } else {
        format!("<t>{}</t>", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_worksheet_markup() {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet("S");
        ws.set_cell_value("A1", 1000.0).unwrap();
        ws.set_cell_value("B1", " a<b ").unwrap();
        ws.set_cell_value("C1", false).unwrap();
        ws.set_row_height(2, 600);

        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buf).unwrap();
        let sheet = part(buf.get_ref(), "xl/worksheets/sheet1.xml");

        assert!(sheet.contains(r#"<sheetFormatPr defaultRowHeight="15"/>"#));
        assert!(sheet.contains(r#"<c r="A1"><v>1000</v></c>"#));
        assert!(sheet.contains(
            r#"<c r="B1" t="inlineStr"><is><t xml:space="preserve"> a&lt;b </t></is></c>"#
        ));
        assert!(sheet.contains(r#"<c r="C1" t="b"><v>0</v></c>"#));
        assert!(sheet.contains(r#"<row r="3" ht="30" customHeight="1"/>"#));
    }

    #[test]
    fn test_sheet_names_are_escaped() {
        let mut wb = Workbook::new();
        wb.add_worksheet("R&D \"2024\"");

        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buf).unwrap();
        let workbook = part(buf.get_ref(), "xl/workbook.xml");
        assert!(workbook.contains(r#"name="R&amp;D &quot;2024&quot;""#));
    }

    #[test]
    fn test_empty_workbook_gets_placeholder_sheet() {
        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&Workbook::new(), &mut buf).unwrap();
        let workbook = part(buf.get_ref(), "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#));
    }

    #[test]
    fn test_formula_with_cached_string() {
        let mut content = String::new();
        XlsxWriter::write_cell(
            &mut content,
            "A1",
            &CellValue::Formula {
                text: "=UPPER(\"x\")".to_string(),
                cached_value: Some(Box::new(CellValue::string("X"))),
            },
        );
        assert_eq!(
            content.trim(),
            r#"<c r="A1" t="str"><f>UPPER(&quot;x&quot;)</f><v>X</v></c>"#
        );
    }
}
