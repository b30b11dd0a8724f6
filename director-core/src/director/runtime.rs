//! The mutable state a tick works on.
//!
//! Split from [`Director`](super::Director) so node hooks can be handed a
//! [`NodeContext`] borrowing the runtime while the director keeps its
//! active set and registry to itself.

use super::context::{NodeContext, Outcome};
use crate::graph::{Activation, ActivationQueue, NodeId, OutputRef, Script};
use crate::kind::NodeBehavior;
use crate::reactive::PropagationGuard;

/// Time step of the tick in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Frame {
    pub sim_delta: f32,
    pub delta: f32,
    /// Number of the tick, counted from one across the director's life.
    pub tick: u64,
}

#[derive(Debug)]
pub(crate) struct Runtime {
    pub script: Script,
    pub queue: ActivationQueue,
    pub guard: PropagationGuard,
    pub frame: Frame,
    pub node_logging: bool,
}

impl Runtime {
    pub fn new(name: &str, max_propagation_depth: usize, node_logging: bool) -> Self {
        Self {
            script: Script::new(name),
            queue: ActivationQueue::new(),
            guard: PropagationGuard::new(max_propagation_depth),
            frame: Frame::default(),
            node_logging,
        }
    }

    /// Run one hook of `node`'s behaviour.
    ///
    /// The behaviour is taken out of the node for the duration of the call
    /// and put back afterwards. Returns `None` if the node is gone or its
    /// behaviour is already running further up the stack.
    pub fn with_behavior<R>(
        &mut self,
        node: NodeId,
        hook: impl FnOnce(&mut dyn NodeBehavior, &mut NodeContext<'_>) -> R,
    ) -> Option<(R, Outcome)> {
        let Some(mut behavior) = self.script.node_mut(node).ok()?.behavior.take() else {
            tracing::trace!(node = ?node, "re-entrant hook skipped");
            return None;
        };

        let mut ctx = NodeContext::new(self, node);
        let result = hook(behavior.as_mut(), &mut ctx);
        let outcome = ctx.finish();

        if let Ok(entry) = self.script.node_mut(node) {
            entry.behavior = Some(behavior);
        }
        Some((result, outcome))
    }

    /// Pulse an output and queue one activation per connected input.
    pub fn activate_output(&mut self, out: OutputRef) -> bool {
        let Some(link) = self
            .script
            .node_mut(out.node)
            .ok()
            .and_then(|n| n.outputs_mut().get_mut(out.index))
        else {
            return false;
        };
        link.pulse();
        let peers = link.peers().to_vec();

        for input in peers {
            self.queue
                .push(Activation::through(input.node, input.index, out));
        }
        true
    }
}
