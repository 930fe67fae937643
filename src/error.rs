// src/error.rs
use freedict_dom::{DomError, NodeId};
use freedict_values::ValuesError;
use freedict_xpath1::XPathError;
use thiserror::Error;

/// Everything that can go wrong between loading a dictionary and reporting
/// on it.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Value table error: {0}")]
    Values(#[from] ValuesError),

    #[error("XPath error: {0}")]
    XPath(#[from] XPathError),

    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Expression '{xpath}' evaluated to a {found}, not a node-set")]
    NotANodeSet { xpath: String, found: &'static str },

    #[error("No nodes (form/orth)!")]
    NoOrthNodes(NodeId),

    #[error("'{0}' is not a valid element name")]
    InvalidElementName(String),
}
