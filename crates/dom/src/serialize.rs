//! Writes a [`Document`] back out with quick-xml.

use crate::document::{Document, NodeId, NodeKind};
use crate::error::DomError;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

type XmlWriter = Writer<Vec<u8>>;

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), DomError> {
    writer
        .write_event(event)
        .map_err(|e| DomError::Serialize(e.to_string()))
}

pub(crate) fn document_to_string(doc: &Document) -> Result<String, DomError> {
    let mut writer = Writer::new(Vec::new());
    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
    for &child in doc.children(doc.root()) {
        write_node(&mut writer, doc, child)?;
        if !doc.is_text(child) {
            write(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
        }
    }
    finish(writer)
}

pub(crate) fn node_to_string(doc: &Document, id: NodeId) -> Result<String, DomError> {
    let mut writer = Writer::new(Vec::new());
    if id == doc.root() {
        for &child in doc.children(id) {
            write_node(&mut writer, doc, child)?;
        }
    } else {
        write_node(&mut writer, doc, id)?;
    }
    finish(writer)
}

fn finish(writer: XmlWriter) -> Result<String, DomError> {
    String::from_utf8(writer.into_inner()).map_err(|e| DomError::Serialize(e.to_string()))
}

fn write_node(writer: &mut XmlWriter, doc: &Document, id: NodeId) -> Result<(), DomError> {
    let Some(kind) = doc.kind(id) else {
        return Err(DomError::InvalidNode(id));
    };
    match kind {
        NodeKind::Root => {
            for &child in doc.children(id) {
                write_node(writer, doc, child)?;
            }
        }
        NodeKind::Element {
            name,
            attributes,
            namespaces,
        } => {
            let mut start = BytesStart::new(name.as_str());
            for ns in namespaces {
                let key = match &ns.prefix {
                    Some(p) => format!("xmlns:{p}"),
                    None => "xmlns".to_string(),
                };
                start.push_attribute((key.as_str(), ns.uri.as_str()));
            }
            for attr in attributes {
                start.push_attribute((attr.name.as_str(), attr.value.as_str()));
            }
            let children = doc.children(id);
            if children.is_empty() {
                write(writer, Event::Empty(start))?;
            } else {
                write(writer, Event::Start(start))?;
                for &child in children {
                    write_node(writer, doc, child)?;
                }
                write(writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
        NodeKind::Text(text) => {
            write(writer, Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))?;
        }
        NodeKind::Comment(text) => {
            write(writer, Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
        NodeKind::ProcessingInstruction { target, value } => {
            let content = match value {
                Some(v) => format!("{target} {v}"),
                None => target.clone(),
            };
            write(writer, Event::PI(BytesPI::new(content)))?;
        }
    }
    Ok(())
}
