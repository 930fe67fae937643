//! Support code for editing FreeDict TEI dictionaries.
//!
//! The value tables behind the editor's menus live in [`values`]; XPath
//! lookups, leaf checks and headword extraction over a loaded
//! [`Document`] live in [`xml`]; [`sanity`] runs dictionary-wide checks
//! built on both.

pub mod config;
pub mod error;
pub mod sanity;
pub mod xml;

pub use config::EditorConfig;
pub use error::EditorError;
pub use xml::XPathSession;

pub use freedict_dom::{Document, DomError, NodeId};
pub use freedict_values as values;
pub use freedict_xpath1 as xpath;
