//! Propagation Guard
//!
//! Value-change notifications are not queued: a write notifies every
//! reader synchronously, and a reader that recomputes its own value
//! notifies its readers in turn, depth first. The guard keeps the stack of
//! value nodes whose change is currently being pushed so this recursion
//! always terminates:
//!
//! - A value node that is already on the stack is a dependency cycle. The
//!   nested notification is dropped.
//! - A stack deeper than the configured limit is truncated.
//!
//! Both cases count as an overrun and are logged by the runtime.
//!
//! The guard also carries the "applying global value" flag so a write that
//! fans out to same-named global value nodes does not fan out again.

use crate::error::{DirectorError, Result};
use crate::graph::NodeId;

/// Tracks the value nodes whose change is currently propagating.
#[derive(Debug, Clone)]
pub struct PropagationGuard {
    stack: Vec<NodeId>,
    max_depth: usize,
    overruns: usize,
    applying_global: bool,
}

impl PropagationGuard {
    /// Create a guard allowing `max_depth` nested notifications.
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth: max_depth.max(1),
            overruns: 0,
            applying_global: false,
        }
    }

    /// Start propagating a change of `node`.
    ///
    /// Fails, and records an overrun, if `node` is already propagating or
    /// the depth limit is reached. A successful call must be paired with
    /// [`exit`](Self::exit).
    pub fn enter(&mut self, node: NodeId) -> Result<()> {
        if self.stack.len() >= self.max_depth || self.stack.contains(&node) {
            self.overruns += 1;
            return Err(DirectorError::PropagationOverrun {
                limit: self.max_depth,
            });
        }
        self.stack.push(node);
        Ok(())
    }

    /// Finish propagating a change of `node`.
    pub fn exit(&mut self, node: NodeId) {
        let popped = self.stack.pop();
        debug_assert_eq!(
            popped,
            Some(node),
            "PropagationGuard mismatch: expected {:?}, got {:?}",
            node,
            popped
        );
    }

    /// Check if a change of `node` is currently propagating.
    pub fn is_propagating(&self, node: NodeId) -> bool {
        self.stack.contains(&node)
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Configured depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of truncated notifications since the last [`take_overruns`](Self::take_overruns).
    pub fn overruns(&self) -> usize {
        self.overruns
    }

    /// Read and clear the overrun counter.
    pub fn take_overruns(&mut self) -> usize {
        std::mem::take(&mut self.overruns)
    }

    pub(crate) fn applying_global(&self) -> bool {
        self.applying_global
    }

    pub(crate) fn set_applying_global(&mut self, applying: bool) {
        self.applying_global = applying;
    }

    /// Drop all state. Used when a script (re)starts.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.overruns = 0;
        self.applying_global = false;
    }
}
