//! XML writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::document::{Document, Element};
use crate::error::{TreeError, TreeResult};
use crate::options::XmlWriteOptions;

/// Serializes a [`Document`] as UTF-8 XML
pub struct XmlWriter;

impl XmlWriter {
    /// Write a document to a file, creating or truncating it
    pub fn write_file<P: AsRef<Path>>(
        document: &Document,
        path: P,
        options: &XmlWriteOptions,
    ) -> TreeResult<()> {
        let path = path.as_ref();
        log::debug!("writing XML document to {}", path.display());
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        Self::write(document, &mut out, options)?;
        out.flush()?;
        Ok(())
    }

    /// Write a document to a string
    pub fn to_string(document: &Document, options: &XmlWriteOptions) -> TreeResult<String> {
        let mut buf = Vec::new();
        Self::write(document, &mut buf, options)?;
        String::from_utf8(buf).map_err(|e| TreeError::Malformed {
            position: e.utf8_error().valid_up_to(),
            message: "serialized document is not UTF-8".to_string(),
        })
    }

    /// Write a document to any writer
    ///
    /// Elements without children or text are written self-closing. Text is
    /// written inline with its element so leaf whitespace survives a
    /// read-back.
    pub fn write<W: Write>(
        document: &Document,
        out: W,
        options: &XmlWriteOptions,
    ) -> TreeResult<()> {
        let mut writer = if options.indent_size > 0 {
            Writer::new_with_indent(out, options.indent_char, options.indent_size)
        } else {
            Writer::new(out)
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, document.root())?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> TreeResult<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key, value));
    }

    if !element.has_children() && element.text().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !element.text().is_empty() {
        writer.write_event(Event::Text(BytesText::new(element.text())))?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::new(
            Element::new("Workbook").with_child(
                Element::new("WorkSheet")
                    .with_attribute("name", "S")
                    .with_child(
                        Element::new("Row").with_attribute("Height", "300").with_child(
                            Element::new("Cell").with_child(
                                Element::new("Data")
                                    .with_attribute("type", "String")
                                    .with_text("a < b"),
                            ),
                        ),
                    ),
            ),
        )
    }

    #[test]
    fn test_indented_output() {
        let xml = XmlWriter::to_string(&sample(), &XmlWriteOptions::default()).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<Workbook>
    <WorkSheet name="S">
        <Row Height="300">
            <Cell>
                <Data type="String">a &lt; b</Data>
            </Cell>
        </Row>
    </WorkSheet>
</Workbook>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_compact_output() {
        let doc = Document::new(
            Element::new("a")
                .with_child(Element::new("b"))
                .with_child(Element::new("c").with_text(" x ")),
        );
        let xml = XmlWriter::to_string(&doc, &XmlWriteOptions::compact()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a><b/><c> x </c></a>\n"
        );
    }
}
