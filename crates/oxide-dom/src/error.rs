//! Error types for parsing and tree manipulation.

use crate::node::NodeId;

/// Markup that could not be turned into a document.
///
/// The HTML parser recovers from malformed markup the way a browser does, so
/// this is only raised for input that holds no markup at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates the error reported for an empty input string.
    #[must_use]
    pub fn empty_input() -> Self {
        Self::new("Empty markup supplied")
    }
}

/// Errors raised by structural tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node id does not belong to this document.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The reference node has no parent to insert into.
    #[error("node {0} is not attached to a parent")]
    Detached(NodeId),

    /// The mutation would make a node its own ancestor.
    #[error("cannot insert node {node} inside itself")]
    Cycle {
        /// The node being inserted.
        node: NodeId,
    },
}
