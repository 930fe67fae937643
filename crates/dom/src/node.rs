//! [`DataSourceNode`] over a [`Document`].

use crate::document::{Document, NodeId, NodeKind};
use freedict_xpath1::{DataSourceNode, NodeType, QName};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A node of a [`Document`], or one of an element's attributes.
#[derive(Clone, Copy)]
pub struct DomNode<'a> {
    doc: &'a Document,
    id: NodeId,
    attr: Option<usize>,
}

impl<'a> DomNode<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id, attr: None }
    }

    /// The owning tree node. For an attribute this is its element.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_attribute(&self) -> bool {
        self.attr.is_some()
    }

    fn sort_key(&self) -> (usize, usize) {
        (self.doc.order_of(self.id), self.attr.map_or(0, |i| i + 1))
    }
}

impl std::fmt::Debug for DomNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.attr {
            Some(i) => write!(f, "DomNode({:?}@{})", self.id, i),
            None => write!(f, "DomNode({:?})", self.id),
        }
    }
}

impl PartialEq for DomNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id && self.attr == other.attr
    }
}
impl Eq for DomNode<'_> {}

impl Hash for DomNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.attr.hash(state);
    }
}

impl PartialOrd for DomNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DomNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

fn split_qname(name: &str) -> QName<'_> {
    match name.split_once(':') {
        Some((prefix, local_part)) => QName {
            prefix: Some(prefix),
            local_part,
        },
        None => QName {
            prefix: None,
            local_part: name,
        },
    }
}

impl<'a> DataSourceNode<'a> for DomNode<'a> {
    fn node_type(&self) -> NodeType {
        if self.attr.is_some() {
            return NodeType::Attribute;
        }
        match self.doc.kind(self.id) {
            Some(NodeKind::Root) | None => NodeType::Root,
            Some(NodeKind::Element { .. }) => NodeType::Element,
            Some(NodeKind::Text(_)) => NodeType::Text,
            Some(NodeKind::Comment(_)) => NodeType::Comment,
            Some(NodeKind::ProcessingInstruction { .. }) => NodeType::ProcessingInstruction,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        let doc: &'a Document = self.doc;
        match self.attr {
            Some(i) => doc.attributes(self.id).get(i).map(|a| split_qname(&a.name)),
            None => doc.name(self.id).map(split_qname),
        }
    }

    fn string_value(&self) -> String {
        match self.attr {
            Some(i) => self
                .doc
                .attributes(self.id)
                .get(i)
                .map(|a| a.value.clone())
                .unwrap_or_default(),
            None => self.doc.text_content(self.id),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        if self.attr.is_some() {
            return Box::new(std::iter::empty());
        }
        let doc = self.doc;
        let id = self.id;
        Box::new((0..doc.attributes(id).len()).map(move |i| DomNode {
            doc,
            id,
            attr: Some(i),
        }))
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        if self.attr.is_some() {
            return Box::new(std::iter::empty());
        }
        let doc: &'a Document = self.doc;
        Box::new(doc.children(self.id).iter().map(move |&c| DomNode::new(doc, c)))
    }

    fn parent(&self) -> Option<Self> {
        match self.attr {
            Some(_) => Some(DomNode::new(self.doc, self.id)),
            None => self.doc.parent(self.id).map(|p| DomNode::new(self.doc, p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freedict_xpath1::{EvaluationContext, FunctionRegistry, XPathValue, evaluate, parse_expression};

    const XML: &str = r#"<entry id="e1"><form><orth>cat</orth><orth>kitty</orth></form><sense><cit type="trans"><quote>Katze</quote></cit></sense></entry>"#;

    fn select<'a>(doc: &'a Document, context: NodeId, xpath: &str) -> Vec<DomNode<'a>> {
        let expr = parse_expression(xpath).unwrap();
        let funcs = FunctionRegistry::new();
        let root = doc.node(doc.root());
        let ctx = EvaluationContext::new(doc.node(context), root, &funcs);
        match evaluate(&expr, &ctx).unwrap() {
            XPathValue::NodeSet(nodes) => nodes,
            other => panic!("expected node-set, got {:?}", other),
        }
    }

    #[test]
    fn test_paths_over_parsed_document() {
        let doc = Document::parse(XML).unwrap();
        let orths = select(&doc, doc.root(), "/entry/form/orth");
        let words: Vec<_> = orths.iter().map(|n| n.string_value()).collect();
        assert_eq!(words, vec!["cat", "kitty"]);

        let attr = select(&doc, doc.root(), "//entry/@id");
        assert_eq!(attr.len(), 1);
        assert_eq!(attr[0].node_type(), NodeType::Attribute);
        assert_eq!(attr[0].string_value(), "e1");
        assert_eq!(attr[0].parent().map(|p| p.id()), doc.document_element());

        let quotes = select(&doc, doc.root(), "//cit[@type='trans']/quote");
        assert_eq!(quotes[0].string_value(), "Katze");
    }

    #[test]
    fn test_document_order_follows_edits() {
        let mut doc = Document::parse(XML).unwrap();
        let entry = doc.document_element().unwrap();
        let form = doc.children(entry)[0];
        // Move <form> after <sense>.
        doc.detach(form).unwrap();
        doc.append_child(entry, form).unwrap();
        let names: Vec<_> = select(&doc, entry, "*")
            .iter()
            .filter_map(|n| n.name().map(|q| q.local_part))
            .collect();
        assert_eq!(names, vec!["sense", "form"]);
        assert!(doc.node(doc.children(entry)[0]) < doc.node(form));
    }

    #[test]
    fn test_detached_node_has_no_parent() {
        let mut doc = Document::parse(XML).unwrap();
        let entry = doc.document_element().unwrap();
        let form = doc.children(entry)[0];
        doc.detach(form).unwrap();
        assert!(doc.node(form).parent().is_none());
        assert_eq!(select(&doc, form, "orth").len(), 2);
    }

    #[test]
    fn test_prefixed_names_split() {
        let doc = Document::parse(r#"<t:a xmlns:t="urn:t" xml:lang="de"/>"#).unwrap();
        let a = doc.node(doc.document_element().unwrap());
        assert_eq!(
            a.name(),
            Some(QName {
                prefix: Some("t"),
                local_part: "a"
            })
        );
        let lang = a.attributes().next().unwrap();
        assert_eq!(lang.name().unwrap().prefix, Some("xml"));
    }
}
