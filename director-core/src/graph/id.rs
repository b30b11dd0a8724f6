//! Graph Identifiers
//!
//! Nodes and graphs live in generational arenas owned by a
//! [`Script`](super::Script). Their keys replace pointer back-references:
//! a key to a deleted node simply fails to resolve, it never dangles.
//! Links are addressed by their owning node plus their position in that
//! node's ordered link collection.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node in a director's script.
    pub struct NodeId;

    /// Identifies a graph (root or nested) in a director's script.
    pub struct GraphId;
}

/// Address of an activation input link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRef {
    /// Node that owns the link.
    pub node: NodeId,
    /// Position in the node's input links.
    pub index: usize,
}

impl InputRef {
    /// Address the `index`-th input of `node`.
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// Address of an activation output link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    /// Node that owns the link.
    pub node: NodeId,
    /// Position in the node's output links.
    pub index: usize,
}

impl OutputRef {
    /// Address the `index`-th output of `node`.
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}
