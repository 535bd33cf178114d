//! XML reader

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::document::{Document, Element};
use crate::error::{TreeError, TreeResult};

/// Parses XML markup into a [`Document`]
pub struct XmlReader;

impl XmlReader {
    /// Read a document from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> TreeResult<Document> {
        let path = path.as_ref();
        log::debug!("reading XML document from {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a document from a string
    pub fn read_str(xml: &str) -> TreeResult<Document> {
        Self::read(xml.as_bytes())
    }

    /// Read a document from a buffered reader
    ///
    /// Text inside an element that has child elements is dropped when it is
    /// whitespace only; text of leaf elements is kept exactly, after entity
    /// unescaping. Comments, processing instructions and the XML declaration
    /// are skipped.
    pub fn read<R: BufRead>(reader: R) -> TreeResult<Document> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = xml_reader.buffer_position();
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed(position, "more than one root element"));
                    }
                    stack.push(Self::open_element(&xml_reader, &e)?);
                }
                Event::Empty(e) => {
                    let element = Self::open_element(&xml_reader, &e)?;
                    Self::attach(element, &mut stack, &mut root, position)?;
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| malformed(position, "closing tag without opening tag"))?;
                    if element.has_children() && element.text().trim().is_empty() {
                        element.set_text(String::new());
                    }
                    Self::attach(element, &mut stack, &mut root, position)?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed(position, "text outside the root element")),
                    }
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = xml_reader.decoder().decode(&bytes)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(&text),
                        None => return Err(malformed(position, "CDATA outside the root element")),
                    }
                }
                Event::Eof => break,
                // Declaration, comments, processing instructions, doctype
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(malformed(
                xml_reader.buffer_position(),
                &format!("unclosed element <{}>", open.name()),
            ));
        }

        log::trace!("parsed XML document ({} bytes)", xml_reader.buffer_position());
        root.map(Document::new).ok_or_else(|| {
            malformed(xml_reader.buffer_position(), "document has no root element")
        })
    }

    fn open_element<R>(xml_reader: &Reader<R>, start: &BytesStart<'_>) -> TreeResult<Element> {
        let decoder = xml_reader.decoder();
        let qname = start.name();
        let name = decoder.decode(qname.as_ref())?;
        let mut element = Element::new(name.as_ref());

        for attr in start.attributes() {
            let attr = attr?;
            let key = decoder.decode(attr.key.as_ref())?;
            let value = attr.unescape_value()?;
            element.set_attribute(key.as_ref(), value.as_ref());
        }

        Ok(element)
    }

    fn attach(
        element: Element,
        stack: &mut [Element],
        root: &mut Option<Element>,
        position: usize,
    ) -> TreeResult<()> {
        match stack.last_mut() {
            Some(parent) => parent.add_child(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(malformed(position, "more than one root element")),
        }
        Ok(())
    }
}

fn malformed(position: usize, message: &str) -> TreeError {
    TreeError::Malformed {
        position,
        message: message.to_string(),
    }
}
