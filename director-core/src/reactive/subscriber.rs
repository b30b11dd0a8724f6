//! Dependents of a value node.
//!
//! A dependent is a node reading a value node through one of its value
//! links. The value node keeps its dependents so a write can be pushed to
//! every reader without scanning the script.

use crate::graph::NodeId;

/// A `(node, value link)` pair reading a value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependent {
    /// The reading node.
    pub node: NodeId,
    /// Position of the reading link in the node's value links.
    pub link: usize,
}

impl Dependent {
    /// Create a dependent entry.
    pub fn new(node: NodeId, link: usize) -> Self {
        Self { node, link }
    }
}
