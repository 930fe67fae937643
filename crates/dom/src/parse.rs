//! Builds a [`Document`] from text via roxmltree.

use crate::document::{Attribute, Document, NamespaceDecl, NodeId, NodeKind, XML_NAMESPACE};
use crate::error::DomError;
use roxmltree::ParsingOptions;

pub(crate) fn parse(text: &str) -> Result<Document, DomError> {
    let options = ParsingOptions {
        // TEI dictionaries usually start with a DOCTYPE.
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let source = roxmltree::Document::parse_with_options(text, options)?;
    let mut doc = Document::new();
    let root = doc.root();
    for child in source.root().children() {
        import(&mut doc, root, child)?;
    }
    log::debug!("Parsed document with {} nodes", doc.nodes.len());
    Ok(doc)
}

fn import(doc: &mut Document, parent: NodeId, node: roxmltree::Node) -> Result<(), DomError> {
    let kind = match node.node_type() {
        roxmltree::NodeType::Root => return Ok(()),
        roxmltree::NodeType::Element => NodeKind::Element {
            name: qualified_name(node, node.tag_name().namespace(), node.tag_name().name(), false),
            attributes: node
                .attributes()
                .map(|a| Attribute {
                    name: qualified_name(node, a.namespace(), a.name(), true),
                    value: a.value().to_string(),
                })
                .collect(),
            namespaces: declared_here(node),
        },
        roxmltree::NodeType::Text => NodeKind::Text(node.text().unwrap_or_default().to_string()),
        roxmltree::NodeType::Comment => NodeKind::Comment(node.text().unwrap_or_default().to_string()),
        roxmltree::NodeType::PI => match node.pi() {
            Some(pi) => NodeKind::ProcessingInstruction {
                target: pi.target.to_string(),
                value: pi.value.map(str::to_string),
            },
            None => return Ok(()),
        },
    };
    let id = doc.create_node(kind);
    doc.append_child(parent, id)?;
    for child in node.children() {
        import(doc, id, child)?;
    }
    Ok(())
}

/// Rebuilds `prefix:local` from an expanded name. Attributes never take
/// the default namespace, so only a named binding will do for them.
fn qualified_name(node: roxmltree::Node, uri: Option<&str>, local: &str, is_attribute: bool) -> String {
    let Some(uri) = uri else {
        return local.to_string();
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{local}");
    }
    let prefix = if is_attribute {
        node.namespaces()
            .find(|ns| ns.uri() == uri && ns.name().is_some())
            .and_then(|ns| ns.name())
    } else {
        node.lookup_prefix(uri).filter(|p| !p.is_empty())
    };
    match prefix {
        Some(p) => format!("{p}:{local}"),
        None => local.to_string(),
    }
}

/// The namespace bindings introduced by this element rather than inherited.
fn declared_here(node: roxmltree::Node) -> Vec<NamespaceDecl> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE)
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| NamespaceDecl {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}
