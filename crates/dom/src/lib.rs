//! An editable XML tree.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Unlinking a node keeps it in the arena, detached, so callers
//! can still read it or re-insert it elsewhere. [`DomNode`] exposes the tree
//! to the XPath engine.

pub mod document;
pub mod error;
pub mod node;
mod parse;
mod serialize;

pub use document::{Attribute, Document, NamespaceDecl, NodeId, NodeKind, is_valid_name};
pub use error::DomError;
pub use node::DomNode;
