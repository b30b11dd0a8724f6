//! Activation Scheduling
//!
//! Firing an output never calls the connected nodes directly. Instead the
//! director pushes one [`Activation`] per connected input onto the
//! [`ActivationQueue`] and drains it after the active set has been
//! advanced.
//!
//! # Algorithm
//!
//! Each tick:
//!
//! 1. Take a snapshot of the [`ActiveSet`] and update every node in it
//!    with no input. Nodes that return false leave the set.
//! 2. Pop activations front to back. Activations pushed while draining
//!    land at the back, so the traversal is breadth-first in connection
//!    order.
//! 3. Stop once the per-tick ceiling is reached and drop what is left.
//!
//! Because nothing recurses, a cycle of activation links costs queue
//! entries, not stack frames, and the ceiling bounds the work per tick.

use std::collections::VecDeque;

use indexmap::IndexSet;

use super::id::{NodeId, OutputRef};

/// One pending delivery of control flow to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Node to update.
    pub node: NodeId,
    /// Input link it arrives on; `None` for a spontaneous trigger.
    pub input: Option<usize>,
    /// Output that fired it, re-checked at delivery.
    pub source: Option<OutputRef>,
}

impl Activation {
    /// A spontaneous trigger of `node`.
    pub fn spontaneous(node: NodeId) -> Self {
        Self {
            node,
            input: None,
            source: None,
        }
    }

    /// Delivery through `input` of `node`, fired by `source`.
    pub fn through(node: NodeId, input: usize, source: OutputRef) -> Self {
        Self {
            node,
            input: Some(input),
            source: Some(source),
        }
    }
}

/// FIFO worklist of activations for the current tick.
#[derive(Debug, Default)]
pub struct ActivationQueue {
    pending: VecDeque<Activation>,
}

impl ActivationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activation.
    pub fn push(&mut self, activation: Activation) {
        self.pending.push_back(activation);
    }

    /// Take the oldest activation.
    pub fn pop(&mut self) -> Option<Activation> {
        self.pending.pop_front()
    }

    /// Number of pending activations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything and return how many activations were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Drop every activation addressed to `node`.
    pub fn forget(&mut self, node: NodeId) {
        self.pending.retain(|a| a.node != node);
    }
}

/// Nodes whose last update asked to stay active, in activation order.
#[derive(Debug, Default)]
pub struct ActiveSet {
    nodes: IndexSet<NodeId>,
}

impl ActiveSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns false if it was already active.
    pub fn insert(&mut self, node: NodeId) -> bool {
        self.nodes.insert(node)
    }

    /// Remove a node, keeping the order of the others.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.nodes.shift_remove(&node)
    }

    /// Check if a node is active.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Copy of the members, for iteration while the set changes.
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.nodes.iter().copied().collect()
    }

    /// Number of active nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node is active.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deactivate everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
