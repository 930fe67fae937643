//! XML and XPath helpers for working on dictionary entries.

pub mod braces;
mod entry;
pub mod leaf;
pub mod session;

pub use braces::{DEFAULT_MAX_DEPTH, contains_unbalanced_braces};
pub use leaf::{AllowedAttr, LeafLookup, copy_node_to_doc, has_only_text_children_and_allowed_attrs, string_to_xml_node};
pub use session::{ActiveQuery, QueryMonitor, XPathSession};
