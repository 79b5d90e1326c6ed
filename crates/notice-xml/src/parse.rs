use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::document::{Attribute, Element, NodeId, NodeKind, XmlDocument};
use crate::error::XmlError;
use crate::text::utf8;

impl XmlDocument {
    /// Parses a document keeping every comment, whitespace run and escape
    /// sequence so that writing it back is lossless.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut doc = XmlDocument::new();
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Malformed {
                position: reader.error_position() as u64,
                message: e.to_string(),
            })?;
            let parent = open.last().copied().unwrap_or_else(|| doc.root());
            match event {
                Event::Start(start) => {
                    let element = read_element(&start, false, reader.buffer_position() as u64)?;
                    let id = doc.create(NodeKind::Element(element));
                    doc.append_child(parent, id);
                    open.push(id);
                }
                Event::Empty(start) => {
                    let element = read_element(&start, true, reader.buffer_position() as u64)?;
                    let id = doc.create(NodeKind::Element(element));
                    doc.append_child(parent, id);
                }
                Event::End(end) => {
                    let found = utf8(end.name().as_ref(), "closing tag")?.to_string();
                    let Some(closed) = open.pop() else {
                        return Err(XmlError::UnbalancedEnd {
                            found,
                            expected: None,
                        });
                    };
                    let expected = doc.name(closed).unwrap_or_default();
                    if expected != found {
                        return Err(XmlError::UnbalancedEnd {
                            found,
                            expected: Some(expected.to_string()),
                        });
                    }
                }
                Event::Text(text) => {
                    push_raw_text(&mut doc, parent, utf8(&text, "text")?);
                }
                Event::GeneralRef(reference) => {
                    let name = utf8(&reference, "entity reference")?;
                    push_raw_text(&mut doc, parent, &format!("&{name};"));
                }
                Event::CData(cdata) => {
                    let content = utf8(&cdata, "CDATA section")?.to_string();
                    let id = doc.create(NodeKind::CData(content));
                    doc.append_child(parent, id);
                }
                Event::Comment(comment) => {
                    let content = utf8(&comment, "comment")?.to_string();
                    let id = doc.create(NodeKind::Comment(content));
                    doc.append_child(parent, id);
                }
                Event::Decl(decl) => {
                    let content = utf8(&decl, "declaration")?.to_string();
                    let id = doc.create(NodeKind::Declaration(content));
                    doc.append_child(parent, id);
                }
                Event::PI(pi) => {
                    let content = utf8(&pi, "processing instruction")?.to_string();
                    let id = doc.create(NodeKind::ProcessingInstruction(content));
                    doc.append_child(parent, id);
                }
                Event::DocType(doctype) => {
                    let content = utf8(&doctype, "doctype")?.to_string();
                    let id = doc.create(NodeKind::DocType(content));
                    doc.append_child(parent, id);
                }
                Event::Eof => break,
            }
        }

        if let Some(&unclosed) = open.last() {
            return Err(XmlError::Malformed {
                position: xml.len() as u64,
                message: format!(
                    "element <{}> is never closed",
                    doc.name(unclosed).unwrap_or_default()
                ),
            });
        }
        if doc.document_element().is_none() {
            return Err(XmlError::MissingRoot);
        }
        debug!(nodes = doc.len(), "parsed XML document");
        Ok(doc)
    }
}

fn read_element(start: &BytesStart<'_>, self_closing: bool, position: u64) -> Result<Element, XmlError> {
    let name = utf8(start.name().as_ref(), "element name")?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed {
            position,
            message: format!("attribute of <{name}>: {e}"),
        })?;
        attributes.push(Attribute {
            name: utf8(attr.key.as_ref(), "attribute name")?.to_string(),
            raw_value: utf8(&attr.value, "attribute value")?.to_string(),
        });
    }
    Ok(Element {
        name,
        attributes,
        self_closing,
    })
}

/// Entity references split text into several events; they are joined back
/// into the preceding text node.
fn push_raw_text(doc: &mut XmlDocument, parent: NodeId, raw: &str) {
    if let Some(&last) = doc.children(parent).last() {
        if let NodeKind::Text(existing) = doc.kind_mut(last) {
            existing.push_str(raw);
            return;
        }
    }
    let id = doc.create(NodeKind::Text(raw.to_string()));
    doc.append_child(parent, id);
}
