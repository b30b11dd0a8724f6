//! Error Types
//!
//! Every fallible operation in the crate reports a [`DirectorError`]. The
//! variants fall into four groups:
//!
//! - Structural errors: a script references a node kind, link or node that
//!   cannot be resolved. These fail loading/starting a script.
//! - Edit-time errors: a graph edit was rejected (incompatible value types,
//!   unknown link names, stale ids). These never reach the tick loop.
//! - Runtime soft errors: a node could not read or write a value while it
//!   ran. The director logs them and deactivates the node.
//! - Propagation overruns: an activation or value-change pass exceeded its
//!   configured bound and was truncated.

use std::fmt;

use crate::graph::{GraphId, NodeId};
use crate::reactive::DataType;

/// Which collection of a node a link name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// An activation input.
    Input,
    /// An activation output.
    Output,
    /// A data (value) link.
    Value,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
            Self::Value => f.write_str("value"),
        }
    }
}

/// Errors produced by graph edits, value access and script loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectorError {
    /// The registry has no node kind with this name.
    #[error("unknown node kind `{0}`")]
    UnknownNodeKind(String),

    /// A persisted script could not be turned into a graph.
    #[error("malformed script: {0}")]
    Structural(String),

    /// A value link and a value node disagree on their data type.
    #[error("cannot bind a {found} value to a {expected} link")]
    IncompatibleTypes {
        /// Type declared by the value link.
        expected: DataType,
        /// Type held by the value node.
        found: DataType,
    },

    /// The node kind refused to bind the value node to one of its links.
    #[error("node {node:?} rejected value node {value:?} on link `{link}`")]
    ConnectionRejected {
        /// Node owning the value link.
        node: NodeId,
        /// Name of the value link.
        link: String,
        /// The value node that was refused.
        value: NodeId,
    },

    /// A link name did not match any link of the node.
    #[error("node {node:?} has no {kind} link named `{name}`")]
    UnknownLink {
        /// Node that was searched.
        node: NodeId,
        /// Collection that was searched.
        kind: LinkKind,
        /// The name that was not found.
        name: String,
    },

    /// A property name did not match any property of the node.
    #[error("node {node:?} has no property named `{name}`")]
    UnknownProperty {
        /// Node that was searched.
        node: NodeId,
        /// The name that was not found.
        name: String,
    },

    /// The node id does not refer to a live node.
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The graph id does not refer to a live graph.
    #[error("graph {0:?} does not exist")]
    UnknownGraph(GraphId),

    /// The root graph of a director cannot be removed.
    #[error("the root graph cannot be removed")]
    RootGraph,

    /// The node has no activation entry point.
    #[error("node {0:?} cannot be triggered")]
    NotTriggerable(NodeId),

    /// The node does not hold a value.
    #[error("node {0:?} is not a value node")]
    NotAValueNode(NodeId),

    /// A value was read or written as the wrong type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the caller asked for.
        expected: DataType,
        /// Type actually held.
        found: DataType,
    },

    /// A required value link has no value node bound to it.
    #[error("required value link `{link}` on node {node:?} is not bound")]
    UnboundValue {
        /// Node owning the link.
        node: NodeId,
        /// Name of the unbound link.
        link: String,
    },

    /// A node or link referenced at tick time no longer exists.
    #[error("stale reference to node {0:?}")]
    StaleReference(NodeId),

    /// A value link was read past the number of bound values.
    #[error("index {index} out of range for link `{link}` ({count} values)")]
    IndexOutOfRange {
        /// Name of the link.
        link: String,
        /// Requested index.
        index: usize,
        /// Number of values available.
        count: usize,
    },

    /// A propagation pass hit its safety bound and was truncated.
    #[error("propagation overrun after {limit} steps")]
    PropagationOverrun {
        /// The configured bound that was reached.
        limit: usize,
    },

    /// A script or config could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for DirectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for DirectorError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for DirectorError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectorError>;
