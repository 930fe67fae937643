//! Leaf node checks and small tree edits.

use super::session::XPathSession;
use crate::error::EditorError;
use freedict_dom::{Document, NodeId, is_valid_name};

/// An attribute a leaf may carry. `value: None` accepts any content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedAttr {
    pub name: String,
    pub value: Option<String>,
}

impl AllowedAttr {
    pub fn any(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn exact(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    fn admits(&self, name: &str, value: &str) -> bool {
        self.name == name && self.value.as_deref().is_none_or(|v| v == value)
    }
}

/// True when every attribute of `node` is admitted by `allowed` and every
/// child is a text node. The attribute check applies to elements only.
pub fn has_only_text_children_and_allowed_attrs(
    doc: &Document,
    node: NodeId,
    allowed: &[AllowedAttr],
) -> bool {
    if doc.is_element(node) {
        for attr in doc.attributes(node) {
            log::debug!("element attr '{}': value='{}'", attr.name, attr.value);
            if !allowed.iter().any(|a| a.admits(&attr.name, &attr.value)) {
                return false;
            }
        }
    }
    doc.children(node).iter().all(|&child| doc.is_text(child))
}

/// What [`XPathSession::unlink_leaf_node_with_attr`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafLookup {
    /// The expression matched nothing.
    NotFound,
    /// A node matched but has element children or disallowed attributes.
    /// The document is unchanged.
    NotALeaf,
    /// The matched leaf, now detached from the tree.
    Unlinked(NodeId),
}

impl XPathSession {
    /// Finds the node `xpath` selects and, when it is a leaf carrying only
    /// `allowed` attributes, unlinks it.
    pub fn unlink_leaf_node_with_attr(
        &self,
        doc: &mut Document,
        xpath: &str,
        allowed: &[AllowedAttr],
    ) -> Result<LeafLookup, EditorError> {
        let Some(node) = self.find_single_node(doc, xpath)? else {
            return Ok(LeafLookup::NotFound);
        };
        if !has_only_text_children_and_allowed_attrs(doc, node, allowed) {
            return Ok(LeafLookup::NotALeaf);
        }
        doc.detach(node)?;
        Ok(LeafLookup::Unlinked(node))
    }
}

/// Appends `before`, a new `name` element holding `content`, then `after`
/// to `parent`. Returns the new element.
pub fn string_to_xml_node(
    doc: &mut Document,
    parent: NodeId,
    before: Option<&str>,
    name: &str,
    content: Option<&str>,
    after: Option<&str>,
) -> Result<NodeId, EditorError> {
    if !is_valid_name(name) {
        return Err(EditorError::InvalidElementName(name.to_string()));
    }
    if let Some(text) = before {
        doc.append_text(parent, text)?;
    }
    let element = doc.append_element(parent, name, content)?;
    if let Some(text) = after {
        doc.append_text(parent, text)?;
    }
    Ok(element)
}

/// A new document holding a deep copy of `node`.
pub fn copy_node_to_doc(doc: &Document, node: NodeId) -> Result<Document, EditorError> {
    Ok(Document::from_subtree(doc, node)?)
}
