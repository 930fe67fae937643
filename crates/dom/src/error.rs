use crate::document::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("XML serialization failed: {0}")]
    Serialize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Node {0:?} does not belong to this document")]
    InvalidNode(NodeId),

    #[error("'{0}' is not a valid XML name")]
    InvalidName(String),

    #[error("Node {0:?} cannot have children or attributes")]
    NotAnElement(NodeId),

    #[error("Node {0:?} is already attached; detach it first")]
    AlreadyAttached(NodeId),

    #[error("Appending {child:?} to {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}
