//! The arena, navigation and editing.

use crate::error::DomError;
use crate::node::DomNode;
use std::path::Path;
use std::sync::OnceLock;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether `name` is a valid XML qualified name: an NCName, optionally
/// preceded by an NCName prefix and a colon.
pub fn is_valid_name(name: &str) -> bool {
    fn is_ncname(part: &str) -> bool {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | '\u{B7}'))
    }
    match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    }
}

/// An attribute with its name as written, e.g. `type` or `xml:lang`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An `xmlns` or `xmlns:prefix` declaration on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element {
        /// Qualified name as written, e.g. `entry` or `tei:entry`.
        name: String,
        attributes: Vec<Attribute>,
        namespaces: Vec<NamespaceDecl>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        value: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// An XML document. Node 0 is the document node.
#[derive(Debug)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    /// Pre-order position of every node, rebuilt lazily after edits.
    order: OnceLock<Vec<usize>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            order: OnceLock::new(),
        }
    }
}

impl Document {
    /// An empty document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: vec![],
            }],
            order: OnceLock::new(),
        }
    }

    /// A document whose document element is a new, empty `name` element.
    pub fn new_with_root(name: &str) -> Self {
        let mut doc = Self::new();
        let element = doc.create_element(name);
        doc.nodes[0].children.push(element);
        doc.nodes[element.0].parent = Some(doc.root());
        doc
    }

    pub fn parse(text: &str) -> Result<Self, DomError> {
        crate::parse::parse(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded {} bytes from {}", text.len(), path.as_ref().display());
        Self::parse(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DomError> {
        std::fs::write(path, self.to_xml_string()?)?;
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single element child of the document node, if any.
    pub fn document_element(&self) -> Option<NodeId> {
        self.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn check(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.nodes.get(id.0).ok_or(DomError::InvalidNode(id))
    }

    // Readers take ids from any document. An id this document does not
    // hold reads as an empty, detached node.

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|d| &d.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|d| d.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |d| d.children.as_slice())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    /// The element name, or the target of a processing instruction.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    /// The element name without its prefix.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.name(id)
            .map(|n| n.rsplit_once(':').map_or(n, |(_, local)| local))
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn namespace_decls(&self, id: NodeId) -> &[NamespaceDecl] {
        match self.kind(id) {
            Some(NodeKind::Element { namespaces, .. }) => namespaces,
            _ => &[],
        }
    }

    /// The string value: text content for text, comments and processing
    /// instructions; concatenated descendant text for elements and the root.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Text(t) | NodeKind::Comment(t)) => t.clone(),
            Some(NodeKind::ProcessingInstruction { value, .. }) => value.clone().unwrap_or_default(),
            Some(NodeKind::Root | NodeKind::Element { .. }) => {
                let mut out = String::new();
                self.collect_text(id, &mut out);
                out
            }
            None => String::new(),
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match &self.nodes[child.0].kind {
                NodeKind::Text(t) => out.push_str(t),
                NodeKind::Element { .. } => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    /// A handle for XPath evaluation.
    pub fn node(&self, id: NodeId) -> DomNode<'_> {
        DomNode::new(self, id)
    }

    /// Whether the node is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = id;
        loop {
            if current.0 == 0 {
                return true;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Namespace declarations in scope at `id`, nearest first, one per prefix.
    pub fn in_scope_namespaces(&self, id: NodeId) -> Vec<NamespaceDecl> {
        let mut found: Vec<NamespaceDecl> = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            for decl in self.namespace_decls(c) {
                if !found.iter().any(|d| d.prefix == decl.prefix) {
                    found.push(decl.clone());
                }
            }
            current = self.parent(c);
        }
        found
    }

    // --- Document order ---

    pub(crate) fn order_of(&self, id: NodeId) -> usize {
        self.order
            .get_or_init(|| self.compute_order())
            .get(id.0)
            .copied()
            .unwrap_or(usize::MAX)
    }

    /// Pre-order numbering of the attached tree, then of every detached
    /// subtree in arena order.
    fn compute_order(&self) -> Vec<usize> {
        let mut order = vec![usize::MAX; self.nodes.len()];
        let mut next = 0;
        for (index, data) in self.nodes.iter().enumerate() {
            if data.parent.is_none() {
                let mut stack = vec![NodeId(index)];
                while let Some(id) = stack.pop() {
                    order[id.0] = next;
                    next += 1;
                    stack.extend(self.nodes[id.0].children.iter().rev());
                }
            }
        }
        order
    }

    fn touch(&mut self) {
        self.order = OnceLock::new();
    }

    // --- Editing ---

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: vec![],
        });
        self.touch();
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push_node(NodeKind::Element {
            name: name.to_string(),
            attributes: vec![],
            namespaces: vec![],
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    pub(crate) fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.push_node(kind)
    }

    /// Ok when `id` can take children.
    fn check_container(&self, id: NodeId) -> Result<(), DomError> {
        match self.check(id)?.kind {
            NodeKind::Root | NodeKind::Element { .. } => Ok(()),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Appends a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_container(parent)?;
        let child_data = self.check(child)?;
        if child.0 == 0 {
            return Err(DomError::Cycle { parent, child });
        }
        if child_data.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(DomError::Cycle { parent, child });
            }
            ancestor = self.nodes[a.0].parent;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.touch();
        Ok(())
    }

    /// Appends a new `name` element to `parent`, with `content` as its text.
    /// Nothing is added to the arena when `parent` or `name` is rejected.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: &str,
        content: Option<&str>,
    ) -> Result<NodeId, DomError> {
        self.check_container(parent)?;
        if !is_valid_name(name) {
            return Err(DomError::InvalidName(name.to_string()));
        }
        let element = self.create_element(name);
        self.append_child(parent, element)?;
        if let Some(text) = content.filter(|t| !t.is_empty()) {
            let text = self.create_text(text);
            self.append_child(element, text)?;
        }
        Ok(element)
    }

    /// Appends text to `parent`, extending its last child when that is
    /// already a text node. Returns the text node written to, or `None` for
    /// empty input.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<Option<NodeId>, DomError> {
        self.check(parent)?;
        if text.is_empty() {
            return Ok(None);
        }
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return Ok(Some(last));
        }
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(Some(node))
    }

    /// Sets or replaces an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.check(id)?;
        if !is_valid_name(name) {
            return Err(DomError::InvalidName(name.to_string()));
        }
        let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind else {
            return Err(DomError::NotAnElement(id));
        };
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        self.touch();
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let NodeKind::Element { attributes, .. } = &mut self.nodes.get_mut(id.0)?.kind else {
            return None;
        };
        let pos = attributes.iter().position(|a| a.name == name)?;
        let removed = attributes.remove(pos).value;
        self.touch();
        Some(removed)
    }

    pub fn declare_namespace(&mut self, id: NodeId, prefix: Option<&str>, uri: &str) -> Result<(), DomError> {
        self.check(id)?;
        let NodeKind::Element { namespaces, .. } = &mut self.nodes[id.0].kind else {
            return Err(DomError::NotAnElement(id));
        };
        namespaces.retain(|d| d.prefix.as_deref() != prefix);
        namespaces.push(NamespaceDecl {
            prefix: prefix.map(str::to_string),
            uri: uri.to_string(),
        });
        Ok(())
    }

    /// Unlinks `id` from its parent. The node and its subtree stay in the
    /// arena and can be read or appended elsewhere.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.check(id)?.parent else {
            return Ok(());
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.nodes[id.0].parent = None;
        self.touch();
        Ok(())
    }

    /// Deep-copies `node` of `src` into this document as a detached subtree.
    /// A copied element keeps the namespace declarations it had in scope.
    pub fn import_subtree(&mut self, src: &Document, node: NodeId) -> Result<NodeId, DomError> {
        src.check(node)?;
        let copy = self.copy_recursive(src, node);
        if src.is_element(node) {
            let in_scope = src.in_scope_namespaces(node);
            if let NodeKind::Element { namespaces, .. } = &mut self.nodes[copy.0].kind {
                for decl in in_scope {
                    if !namespaces.iter().any(|d| d.prefix == decl.prefix) {
                        namespaces.push(decl);
                    }
                }
            }
        }
        Ok(copy)
    }

    fn copy_recursive(&mut self, src: &Document, node: NodeId) -> NodeId {
        let kind = match &src.nodes[node.0].kind {
            // A copied document node becomes a plain container of its children.
            NodeKind::Root => NodeKind::Element {
                name: "document".to_string(),
                attributes: vec![],
                namespaces: vec![],
            },
            other => other.clone(),
        };
        let copy = self.push_node(kind);
        for &child in &src.nodes[node.0].children {
            let child_copy = self.copy_recursive(src, child);
            self.nodes[copy.0].children.push(child_copy);
            self.nodes[child_copy.0].parent = Some(copy);
        }
        copy
    }

    /// A new document whose content is a deep copy of `node`.
    pub fn from_subtree(src: &Document, node: NodeId) -> Result<Document, DomError> {
        let mut doc = Document::new();
        if node.0 == 0 {
            for &child in src.children(node) {
                let copy = doc.import_subtree(src, child)?;
                doc.append_child(doc.root(), copy)?;
            }
        } else {
            let copy = doc.import_subtree(src, node)?;
            doc.append_child(doc.root(), copy)?;
        }
        Ok(doc)
    }

    pub fn to_xml_string(&self) -> Result<String, DomError> {
        crate::serialize::document_to_string(self)
    }

    /// Serializes one node and its subtree, without an XML declaration.
    pub fn node_to_xml_string(&self, id: NodeId) -> Result<String, DomError> {
        self.check(id)?;
        crate::serialize::node_to_string(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new_with_root("entry");
        let entry = doc.document_element().unwrap();
        let form = doc.append_element(entry, "form", None).unwrap();
        doc.append_element(form, "orth", Some("cat")).unwrap();
        (doc, entry, form)
    }

    #[test]
    fn test_append_and_read() {
        let (doc, entry, form) = sample();
        assert_eq!(doc.name(entry), Some("entry"));
        assert_eq!(doc.children(entry), &[form]);
        assert_eq!(doc.text_content(entry), "cat");
        assert!(doc.is_attached(form));
    }

    #[test]
    fn test_append_text_merges_adjacent_text() {
        let (mut doc, entry, _) = sample();
        let first = doc.append_text(entry, "a").unwrap().unwrap();
        let second = doc.append_text(entry, "b").unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.kind(first), Some(&NodeKind::Text("ab".into())));
        assert_eq!(doc.append_text(entry, "").unwrap(), None);
    }

    #[test]
    fn test_detach_keeps_node_readable() {
        let (mut doc, entry, form) = sample();
        doc.detach(form).unwrap();
        assert!(doc.children(entry).is_empty());
        assert!(!doc.is_attached(form));
        assert_eq!(doc.text_content(form), "cat");
        // Detaching twice is harmless.
        doc.detach(form).unwrap();
        doc.append_child(entry, form).unwrap();
        assert!(doc.is_attached(form));
    }

    #[test]
    fn test_append_child_rejects_bad_moves() {
        let (mut doc, entry, form) = sample();
        assert!(matches!(
            doc.append_child(entry, form),
            Err(DomError::AlreadyAttached(_))
        ));
        doc.detach(entry).unwrap();
        assert!(matches!(
            doc.append_child(form, entry),
            Err(DomError::Cycle { .. })
        ));
        let text = doc.create_text("x");
        let elem = doc.create_element("y");
        assert!(matches!(
            doc.append_child(text, elem),
            Err(DomError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_foreign_ids_read_as_empty() {
        let (doc, _, _) = sample();
        let foreign = NodeId(999);
        assert_eq!(doc.kind(foreign), None);
        assert_eq!(doc.parent(foreign), None);
        assert!(doc.children(foreign).is_empty());
        assert!(!doc.is_element(foreign));
        assert_eq!(doc.name(foreign), None);
        assert!(doc.attributes(foreign).is_empty());
        assert_eq!(doc.text_content(foreign), "");
        assert!(!doc.is_attached(foreign));
        assert!(doc.in_scope_namespaces(foreign).is_empty());
        assert!(matches!(
            doc.node_to_xml_string(foreign),
            Err(DomError::InvalidNode(_))
        ));
    }

    #[test]
    fn test_rejected_append_element_adds_nothing() {
        let (mut doc, entry, form) = sample();
        let count = doc.nodes.len();
        assert!(matches!(
            doc.append_element(NodeId(999), "sense", None),
            Err(DomError::InvalidNode(_))
        ));
        let text = doc.children(doc.children(form)[0])[0];
        assert!(matches!(
            doc.append_element(text, "sense", None),
            Err(DomError::NotAnElement(_))
        ));
        assert!(matches!(
            doc.append_element(entry, "a<b", Some("x")),
            Err(DomError::InvalidName(_))
        ));
        assert_eq!(doc.nodes.len(), count);
        assert_eq!(doc.children(entry), &[form]);
    }

    #[test]
    fn test_valid_names() {
        for name in ["entry", "tei:entry", "_x", "gram-grp.2", "xml:lang"] {
            assert!(is_valid_name(name), "{name}");
        }
        for name in ["", "a<b", "1st", "a b", ":x", "x:", "a:b:c", "-x"] {
            assert!(!is_valid_name(name), "{name}");
        }
    }

    #[test]
    fn test_attributes() {
        let (mut doc, entry, _) = sample();
        doc.set_attribute(entry, "type", "a").unwrap();
        doc.set_attribute(entry, "type", "b").unwrap();
        assert_eq!(doc.attribute(entry, "type"), Some("b"));
        assert_eq!(doc.attributes(entry).len(), 1);
        assert_eq!(doc.remove_attribute(entry, "type"), Some("b".into()));
        assert_eq!(doc.attribute(entry, "type"), None);
        assert!(matches!(
            doc.set_attribute(entry, "a b", "c"),
            Err(DomError::InvalidName(_))
        ));
    }

    #[test]
    fn test_from_subtree_copies_deeply() {
        let (mut doc, _, form) = sample();
        let copy = Document::from_subtree(&doc, form).unwrap();
        let copy_root = copy.document_element().unwrap();
        assert_eq!(copy.name(copy_root), Some("form"));
        assert_eq!(copy.text_content(copy_root), "cat");

        // The copy is independent of the source.
        doc.append_text(form, "!").unwrap();
        assert_eq!(copy.text_content(copy_root), "cat");
    }

    #[test]
    fn test_from_subtree_carries_namespaces_in_scope() {
        let mut doc = Document::new_with_root("TEI");
        let tei = doc.document_element().unwrap();
        doc.declare_namespace(tei, None, "http://www.tei-c.org/ns/1.0")
            .unwrap();
        let entry = doc.append_element(tei, "entry", None).unwrap();
        let copy = Document::from_subtree(&doc, entry).unwrap();
        let root = copy.document_element().unwrap();
        assert_eq!(
            copy.namespace_decls(root),
            &[NamespaceDecl {
                prefix: None,
                uri: "http://www.tei-c.org/ns/1.0".into()
            }]
        );
    }
}
