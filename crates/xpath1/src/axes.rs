//! Node collection along each axis, in axis order.
//!
//! Forward axes yield document order; reverse axes yield nodes nearest to
//! the context node first, which is what positional predicates count on.

use crate::ast::Axis;
use crate::datasource::{DataSourceNode, NodeType};

pub fn collect<'a, N: DataSourceNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::SelfAxis => out.push(node),
        Axis::Child => out.extend(node.children()),
        Axis::Attribute => out.extend(node.attributes()),
        Axis::Descendant => push_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node);
            push_descendants(node, &mut out);
        }
        Axis::Parent => out.extend(node.parent()),
        Axis::Ancestor => push_ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node);
            push_ancestors(node, &mut out);
        }
        Axis::FollowingSibling => {
            if let Some(parent) = sibling_parent(node) {
                out.extend(parent.children().skip_while(|s| *s != node).skip(1));
            }
        }
        Axis::PrecedingSibling => {
            if let Some(parent) = sibling_parent(node) {
                out.extend(parent.children().take_while(|s| *s != node));
                out.reverse();
            }
        }
        Axis::Following => push_following(node, &mut out),
        Axis::Preceding => push_preceding(node, &mut out),
    }
    out
}

/// Attributes have a parent but no siblings.
fn sibling_parent<'a, N: DataSourceNode<'a>>(node: N) -> Option<N> {
    if node.node_type() == NodeType::Attribute {
        return None;
    }
    node.parent()
}

fn push_descendants<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    for child in node.children() {
        out.push(child);
        push_descendants(child, out);
    }
}

fn push_ancestors<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        out.push(p);
        current = p.parent();
    }
}

fn push_following<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    // For an attribute, "following" starts with its owner element's content.
    let mut current = node;
    if node.node_type() == NodeType::Attribute {
        match node.parent() {
            Some(owner) => {
                push_descendants(owner, out);
                current = owner;
            }
            None => return,
        }
    }
    while let Some(parent) = current.parent() {
        for sibling in parent.children().skip_while(|s| *s != current).skip(1) {
            out.push(sibling);
            push_descendants(sibling, out);
        }
        current = parent;
    }
}

fn push_preceding<'a, N: DataSourceNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = match node.node_type() {
        NodeType::Attribute => match node.parent() {
            Some(owner) => owner,
            None => return,
        },
        _ => node,
    };
    let mut in_doc_order = Vec::new();
    while let Some(parent) = current.parent() {
        let mut level = Vec::new();
        for sibling in parent.children().take_while(|s| *s != current) {
            level.push(sibling);
            push_descendants(sibling, &mut level);
        }
        level.append(&mut in_doc_order);
        in_doc_order = level;
        current = parent;
    }
    in_doc_order.reverse();
    out.extend(in_doc_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::tests::{create_test_tree, ids::*};

    fn ids<'a>(nodes: Vec<crate::datasource::tests::MockNode<'a>>) -> Vec<usize> {
        nodes.into_iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_child_and_attribute() {
        let tree = create_test_tree();
        assert_eq!(ids(collect(Axis::Child, tree.root())), vec![ENTRY1, ENTRY2]);
        assert_eq!(
            ids(collect(Axis::Attribute, tree.node(ENTRY1))),
            vec![ENTRY1_ID]
        );
        assert!(collect(Axis::Child, tree.node(ENTRY1_ID)).is_empty());
    }

    #[test]
    fn test_descendant_is_in_document_order() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::Descendant, tree.node(ENTRY1))),
            vec![
                FORM1,
                ORTH_CAT,
                ORTH_CAT_TEXT,
                ORTH_KITTY,
                ORTH_KITTY_TEXT,
                SENSE1,
                COMMENT,
                TR_KATZE,
                TR_KATZE_TEXT
            ]
        );
    }

    #[test]
    fn test_ancestor_is_nearest_first() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::Ancestor, tree.node(ORTH_KITTY_TEXT))),
            vec![ORTH_KITTY, FORM1, ENTRY1, ROOT]
        );
        assert_eq!(
            ids(collect(Axis::AncestorOrSelf, tree.node(FORM2))),
            vec![FORM2, ENTRY2, ROOT]
        );
    }

    #[test]
    fn test_siblings() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::FollowingSibling, tree.node(ORTH_CAT))),
            vec![ORTH_KITTY]
        );
        assert_eq!(
            ids(collect(Axis::PrecedingSibling, tree.node(TR_KATZE))),
            vec![COMMENT]
        );
        assert!(collect(Axis::FollowingSibling, tree.node(ENTRY1_ID)).is_empty());
    }

    #[test]
    fn test_following_and_preceding() {
        let tree = create_test_tree();
        assert_eq!(
            ids(collect(Axis::Following, tree.node(TR_KATZE))),
            vec![ENTRY2, FORM2, ORTH_DOG, ORTH_DOG_TEXT]
        );
        assert_eq!(
            ids(collect(Axis::Preceding, tree.node(SENSE1))),
            vec![ORTH_KITTY_TEXT, ORTH_KITTY, ORTH_CAT_TEXT, ORTH_CAT, FORM1]
        );
    }
}
