use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::document::{NodeId, NodeKind, XmlDocument};
use crate::error::XmlError;

impl XmlDocument {
    /// Serialises the document. Nothing is re-indented: whitespace text
    /// nodes are written as they are.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        for &child in self.children(self.root()) {
            self.write_node(&mut writer, child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write {
            message: e.to_string(),
        })
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<(), XmlError> {
        match self.kind(id) {
            NodeKind::Document => {
                for &child in self.children(id) {
                    self.write_node(writer, child)?;
                }
            }
            NodeKind::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for attr in &element.attributes {
                    // Values from single-quoted attributes may hold a bare `"`.
                    let value = attr.raw_value.replace('"', "&quot;");
                    start.push_attribute((attr.name.as_bytes(), value.as_bytes()));
                }
                let children = self.children(id);
                if children.is_empty() && element.self_closing {
                    write_event(writer, Event::Empty(start))?;
                } else {
                    write_event(writer, Event::Start(start))?;
                    for &child in children {
                        self.write_node(writer, child)?;
                    }
                    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))?;
                }
            }
            NodeKind::Text(raw) => {
                write_event(writer, Event::Text(BytesText::from_escaped(raw.as_str())))?;
            }
            NodeKind::CData(content) => {
                write_event(writer, Event::CData(BytesCData::new(content.as_str())))?;
            }
            NodeKind::Comment(raw) => {
                write_event(writer, Event::Comment(BytesText::from_escaped(raw.as_str())))?;
            }
            NodeKind::Declaration(raw) | NodeKind::ProcessingInstruction(raw) => {
                writer.get_mut().extend_from_slice(format!("<?{raw}?>").as_bytes());
            }
            NodeKind::DocType(raw) => {
                writer
                    .get_mut()
                    .extend_from_slice(format!("<!DOCTYPE {raw}>").as_bytes());
            }
        }
        Ok(())
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer.write_event(event).map_err(|e| XmlError::Write {
        message: e.to_string(),
    })
}
