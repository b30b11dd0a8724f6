//! Node Graph
//!
//! This module holds the structure a director executes: nodes, the links
//! between them, and the graphs that own them.
//!
//! # Overview
//!
//! - [`Node`] owns ordered collections of [`InputLink`]s, [`OutputLink`]s
//!   and value links, and the behaviour supplied by its node kind.
//! - [`DirectorGraph`] is a named container of nodes and nested graphs.
//! - [`Script`] is the arena holding every node and graph of one director,
//!   and the only place structural edits happen.
//! - [`ActivationQueue`] and [`ActiveSet`] are the two work lists the
//!   director drains every tick.
//! - [`ScriptRecord`] is the persisted form of a script.
//!
//! # Design Decisions
//!
//! 1. Nodes refer to each other by [`NodeId`] and link position rather
//!    than by pointer. A removed node's id stops resolving; nothing
//!    dangles, and tearing a script down is clearing two arenas.
//!
//! 2. Every connection is stored on both ends. The script updates both
//!    ends in the same call so the two views never disagree.
//!
//! 3. Activation is queued, never recursive, so graphs may contain cycles.

mod id;
mod link;
mod node;
mod record;
mod scheduler;
mod script;

pub use id::{GraphId, InputRef, NodeId, OutputRef};
pub use link::{InputLink, OutputLink};
pub use node::{Node, NodeState};
pub use record::{
    EdgeTarget, GraphRecord, LinkRecord, NodeRecord, OutputEdges, ScriptRecord, ValueEdges,
};
pub use scheduler::{Activation, ActivationQueue, ActiveSet};
pub use script::{DirectorGraph, Script};
