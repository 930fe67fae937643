//! The navigation contract the engine evaluates against.
use std::hash::Hash;

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

/// Node kinds of the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// A cheap, copyable handle to a node of some tree.
///
/// `Ord` must follow document order: a node sorts before its attributes,
/// its attributes before its children. The engine relies on this to return
/// node-sets in document order.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// Element or attribute name, or the target of a processing instruction.
    fn name(&self) -> Option<QName<'a>>;

    /// The XPath `string()` value: concatenated descendant text for elements
    /// and the root, the literal content for everything else.
    fn string_value(&self) -> String;

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// `None` for the root and for detached nodes.
    fn parent(&self) -> Option<Self>;
}

/// An in-memory tree for exercising the engine without a real XML parser.
pub mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct MockNodeData {
        node_type: NodeType,
        name: Option<QName<'static>>,
        content: String,
        parent: Option<usize>,
        children: Vec<usize>,
        attributes: Vec<usize>,
    }

    /// Node ids are handed out in creation order, so building the tree
    /// top-down (attributes before children) makes id order document order.
    #[derive(Debug)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree,
    }

    impl PartialEq for MockNode<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for MockNode<'_> {}

    impl PartialOrd for MockNode<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for MockNode<'_> {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl Hash for MockNode<'_> {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl Default for MockTree {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTree {
        pub fn new() -> Self {
            Self {
                nodes: vec![MockNodeData {
                    node_type: NodeType::Root,
                    name: None,
                    content: String::new(),
                    parent: None,
                    children: vec![],
                    attributes: vec![],
                }],
            }
        }

        fn push(&mut self, parent: usize, data: MockNodeData, as_attribute: bool) -> usize {
            let id = self.nodes.len();
            self.nodes.push(data);
            if as_attribute {
                self.nodes[parent].attributes.push(id);
            } else {
                self.nodes[parent].children.push(id);
            }
            id
        }

        fn leaf(
            node_type: NodeType,
            name: Option<QName<'static>>,
            content: &str,
            parent: usize,
        ) -> MockNodeData {
            MockNodeData {
                node_type,
                name,
                content: content.to_string(),
                parent: Some(parent),
                children: vec![],
                attributes: vec![],
            }
        }

        pub fn element(&mut self, parent: usize, name: &'static str) -> usize {
            let qname = match name.split_once(':') {
                Some((prefix, local_part)) => QName {
                    prefix: Some(prefix),
                    local_part,
                },
                None => QName {
                    prefix: None,
                    local_part: name,
                },
            };
            let data = Self::leaf(NodeType::Element, Some(qname), "", parent);
            self.push(parent, data, false)
        }

        pub fn attribute(&mut self, owner: usize, name: &'static str, value: &str) -> usize {
            let qname = QName {
                prefix: None,
                local_part: name,
            };
            let data = Self::leaf(NodeType::Attribute, Some(qname), value, owner);
            self.push(owner, data, true)
        }

        pub fn text(&mut self, parent: usize, value: &str) -> usize {
            let data = Self::leaf(NodeType::Text, None, value, parent);
            self.push(parent, data, false)
        }

        pub fn comment(&mut self, parent: usize, value: &str) -> usize {
            let data = Self::leaf(NodeType::Comment, None, value, parent);
            self.push(parent, data, false)
        }

        pub fn node(&self, id: usize) -> MockNode<'_> {
            MockNode { id, tree: self }
        }

        pub fn root(&self) -> MockNode<'_> {
            self.node(0)
        }

        fn collect_text(&self, id: usize, out: &mut String) {
            for &child in &self.nodes[id].children {
                match self.nodes[child].node_type {
                    NodeType::Text => out.push_str(&self.nodes[child].content),
                    NodeType::Element => self.collect_text(child, out),
                    _ => {}
                }
            }
        }
    }

    impl<'a> DataSourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            self.tree.nodes[self.id].name
        }

        fn string_value(&self) -> String {
            match self.node_type() {
                NodeType::Root | NodeType::Element => {
                    let mut out = String::new();
                    self.tree.collect_text(self.id, &mut out);
                    out
                }
                _ => self.tree.nodes[self.id].content.clone(),
            }
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .attributes
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .children
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id]
                .parent
                .map(|id| MockNode { id, tree: self.tree })
        }
    }

    /// Ids of the nodes in [`create_test_tree`].
    pub mod ids {
        pub const ROOT: usize = 0;
        pub const ENTRY1: usize = 1;
        pub const ENTRY1_ID: usize = 2;
        pub const FORM1: usize = 3;
        pub const ORTH_CAT: usize = 4;
        pub const ORTH_CAT_TEXT: usize = 5;
        pub const ORTH_KITTY: usize = 6;
        pub const ORTH_KITTY_TEXT: usize = 7;
        pub const SENSE1: usize = 8;
        pub const COMMENT: usize = 9;
        pub const TR_KATZE: usize = 10;
        pub const TR_KATZE_TEXT: usize = 11;
        pub const ENTRY2: usize = 12;
        pub const FORM2: usize = 13;
        pub const ORTH_DOG: usize = 14;
        pub const ORTH_DOG_TEXT: usize = 15;
    }

    /// Two dictionary entries:
    /// ```text
    /// <entry id="e1">
    ///   <form><orth>cat (n)</orth><orth>kitty</orth></form>
    ///   <sense><!-- check --><tr>Katze</tr></sense>
    /// </entry>
    /// <entry><form><orth>dog]</orth></form></entry>
    /// ```
    pub fn create_test_tree() -> MockTree {
        let mut t = MockTree::new();
        let entry1 = t.element(0, "entry");
        t.attribute(entry1, "id", "e1");
        let form1 = t.element(entry1, "form");
        let orth1 = t.element(form1, "orth");
        t.text(orth1, "cat (n)");
        let orth2 = t.element(form1, "orth");
        t.text(orth2, "kitty");
        let sense = t.element(entry1, "sense");
        t.comment(sense, " check ");
        let tr = t.element(sense, "tr");
        t.text(tr, "Katze");
        let entry2 = t.element(0, "entry");
        let form2 = t.element(entry2, "form");
        let orth3 = t.element(form2, "orth");
        t.text(orth3, "dog]");
        t
    }
}
