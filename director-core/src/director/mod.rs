//! Director
//!
//! The director owns a script, drives it once per simulation tick, and is
//! the authoring surface for graph edits between ticks.
//!
//! # Tick
//!
//! [`Director::update`] runs in two phases:
//!
//! 1. Every node in the active set is updated with no input and
//!    `first_update == false`. A node that returns false leaves the set.
//! 2. The activation queue is drained front to back. Each activation
//!    updates its node with the input index it arrived on; a node that
//!    returns true joins the active set. Outputs fired along the way
//!    append to the queue, so delivery is breadth-first in connection
//!    order. At most `max_activations_per_tick` activations are delivered;
//!    the rest are logged and dropped.
//!
//! A node that completes without firing any output and without calling
//! [`NodeContext::suppress_out`] has its `Out` output fired for it.
//!
//! # Failure Policy
//!
//! `update` never fails. A node with an unbound required value link, a
//! node whose hook returns an error, and an activation that arrives for a
//! removed node are logged with the node's id and name, and the node is
//! deactivated. Sibling nodes are unaffected.

mod context;
mod runtime;

pub use context::NodeContext;
pub(crate) use runtime::Runtime;

use std::fmt;
use std::sync::Arc;

use crate::config::DirectorConfig;
use crate::error::{DirectorError, Result};
use crate::graph::{
    Activation, ActiveSet, DirectorGraph, GraphId, InputRef, Node, NodeId, NodeState, OutputRef,
    Script, ScriptRecord,
};
use crate::kind::{NodeRegistry, ENABLED, OUT};
use crate::nodes::{EVENT_NAME, REMOTE_EVENT};
use crate::reactive::{LinkTarget, Value};
use runtime::Frame;

/// What happened during one [`Director::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Node updates performed, continuing and newly triggered.
    pub updated: usize,
    /// Activations taken from the queue and delivered.
    pub activations: usize,
    /// Activations dropped because the per-tick ceiling was reached.
    pub dropped: usize,
    /// A safety bound truncated activation or value propagation.
    pub overrun: bool,
    /// Nodes left in the active set.
    pub active: usize,
}

/// How a node execution is described in node logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Execution {
    Executed,
    Began,
    Finished,
    Updated,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Executed => "Executed",
            Self::Began => "Began",
            Self::Finished => "Finished",
            Self::Updated => "Updated",
        })
    }
}

/// Owner and scheduler of one script.
#[derive(Debug)]
pub struct Director {
    registry: Arc<NodeRegistry>,
    config: DirectorConfig,
    runtime: Runtime,
    active: ActiveSet,
    started: bool,
    enabled: bool,
}

impl Director {
    /// Create a director with an empty root graph.
    pub fn new(registry: Arc<NodeRegistry>, config: DirectorConfig) -> Self {
        let runtime = Runtime::new("Director", config.max_propagation_depth, config.node_logging);
        Self {
            registry,
            config,
            runtime,
            active: ActiveSet::new(),
            started: false,
            enabled: true,
        }
    }

    /// The node kinds this director can instantiate.
    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// The configuration in use.
    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// The script: every node and graph.
    pub fn script(&self) -> &Script {
        &self.runtime.script
    }

    /// Name of the root graph.
    pub fn name(&self) -> &str {
        self.runtime
            .script
            .graph(self.runtime.script.root())
            .map(|g| g.name())
            .unwrap_or_default()
    }

    /// Rename the root graph.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let root = self.runtime.script.root();
        if let Ok(graph) = self.runtime.script.graph_mut(root) {
            graph.set_name(name);
        }
    }

    /// The root graph's id.
    pub fn root(&self) -> GraphId {
        self.runtime.script.root()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.runtime.script.node(id)
    }

    /// Look up a graph.
    pub fn graph(&self, id: GraphId) -> Result<&DirectorGraph> {
        self.runtime.script.graph(id)
    }

    /// Whether [`start`](Self::start) has run since the last stop.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether [`update`](Self::update) does anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the whole director.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether `node` is in the active set.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.active.contains(node)
    }

    /// Number of nodes in the active set.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of activations waiting for the next tick.
    pub fn pending_activations(&self) -> usize {
        self.runtime.queue.len()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Reset the script for a new run.
    ///
    /// Value nodes return to their initial values, the active set and the
    /// queue are emptied, link counters are cleared and every behaviour's
    /// `on_start` hook runs in tree order.
    pub fn start(&mut self) {
        self.runtime.queue.clear();
        self.begin();
    }

    /// Start without dropping activations queued before the first tick.
    fn begin(&mut self) {
        self.active.clear();
        self.runtime.guard.reset();

        let ids = self.runtime.script.node_ids();
        for node in self.runtime.script.nodes_mut() {
            node.set_state(NodeState::Inactive);
            node.reset_link_counters();
            if let Some(slot) = node.slot_mut() {
                slot.reset();
            }
        }
        for id in &ids {
            if let Some((Err(err), _)) = self
                .runtime
                .with_behavior(*id, |behavior, ctx| behavior.on_start(ctx))
            {
                self.warn_node(*id, &err, "start hook failed");
            }
        }

        self.started = true;
        tracing::info!(director = %self.name(), nodes = ids.len(), "director started");
    }

    /// Stop running: every node is deactivated and pending activations are
    /// dropped.
    pub fn stop(&mut self) {
        for id in self.active.snapshot() {
            self.deactivate(id);
        }
        let dropped = self.runtime.queue.clear();
        self.started = false;
        tracing::info!(director = %self.name(), dropped, "director stopped");
    }

    /// Advance the script by one tick.
    pub fn update(&mut self, sim_delta: f32, delta: f32) -> TickReport {
        let mut report = TickReport::default();
        if !self.enabled {
            report.active = self.active.len();
            return report;
        }
        if !self.started {
            self.begin();
        }
        let tick = self.runtime.frame.tick + 1;
        self.runtime.frame = Frame {
            sim_delta,
            delta,
            tick,
        };

        for id in self.active.snapshot() {
            if !self.active.contains(id) {
                continue;
            }
            if !self.runtime.script.contains_node(id) {
                tracing::warn!(node = ?id, err = %DirectorError::StaleReference(id), "active node removed");
                self.active.remove(id);
                continue;
            }
            if !self.node_enabled(id) {
                self.deactivate(id);
                continue;
            }
            self.run_node(id, None, false, &mut report);
        }

        let ceiling = self.config.max_activations_per_tick;
        while let Some(activation) = self.runtime.queue.pop() {
            if report.activations >= ceiling {
                report.dropped = 1 + self.runtime.queue.clear();
                report.overrun = true;
                tracing::warn!(
                    director = %self.name(),
                    limit = ceiling,
                    dropped = report.dropped,
                    "activation ceiling reached; dropping the rest of this tick"
                );
                break;
            }
            report.activations += 1;
            self.deliver(activation, &mut report);
        }

        report.overrun |= self.runtime.guard.take_overruns() > 0;
        report.active = self.active.len();
        tracing::trace!(
            updated = report.updated,
            activations = report.activations,
            active = report.active,
            "tick complete"
        );
        report
    }

    /// Queue a spontaneous activation of `node` for the next tick.
    pub fn trigger(&mut self, node: NodeId) -> Result<()> {
        if !self.runtime.script.node(node)?.capabilities().triggerable {
            return Err(DirectorError::NotTriggerable(node));
        }
        self.runtime.queue.push(Activation::spontaneous(node));
        Ok(())
    }

    /// Trigger every remote event node whose event name is `name`.
    ///
    /// Returns how many were triggered.
    pub fn fire_remote_event(&mut self, name: &str) -> usize {
        let matching: Vec<NodeId> = self
            .runtime
            .script
            .node_ids()
            .into_iter()
            .filter(|id| {
                self.runtime.script.node(*id).is_ok_and(|n| {
                    n.kind() == REMOTE_EVENT
                        && matches!(n.property(EVENT_NAME), Some(Value::String(s)) if s == name)
                })
            })
            .collect();
        for id in &matching {
            self.runtime.queue.push(Activation::spontaneous(*id));
        }
        matching.len()
    }

    fn deliver(&mut self, activation: Activation, report: &mut TickReport) {
        let id = activation.node;
        let Ok(node) = self.runtime.script.node(id) else {
            tracing::warn!(node = ?id, err = %DirectorError::StaleReference(id), "activation dropped");
            return;
        };
        if !node.capabilities().triggerable {
            tracing::warn!(node = ?id, name = %node.label(), "activation of a node without inputs dropped");
            return;
        }

        let input = activation.input.filter(|i| *i < node.inputs().len());
        if let (Some(source), Some(index)) = (activation.source, input) {
            if !self.runtime.script.is_connected(source, InputRef::new(id, index)) {
                tracing::trace!(node = ?id, input = index, "link disconnected before delivery");
                return;
            }
        }
        if !self.node_enabled(id) {
            tracing::trace!(node = ?id, "disabled node ignores activation");
            return;
        }

        if let Some(index) = input {
            if let Ok(node) = self.runtime.script.node_mut(id) {
                node.inputs_mut()[index].record_activation();
            }
        }
        let first_update = !self.active.contains(id);
        self.run_node(id, input, first_update, report);
    }

    fn run_node(
        &mut self,
        id: NodeId,
        input: Option<usize>,
        first_update: bool,
        report: &mut TickReport,
    ) {
        let Ok(node) = self.runtime.script.node(id) else {
            return;
        };
        let latent = node.capabilities().latent;
        if let Some(link) = node.unbound_required_link() {
            let err = DirectorError::UnboundValue {
                node: id,
                link: link.name().to_string(),
            };
            self.warn_node(id, &err, "node skipped");
            self.deactivate(id);
            return;
        }

        let Some((result, mut outcome)) = self
            .runtime
            .with_behavior(id, |behavior, ctx| behavior.update(ctx, input, first_update))
        else {
            return;
        };
        report.updated += 1;
        let was_active = self.active.contains(id);

        let stay = match result {
            Ok(true) if latent => true,
            Ok(true) => {
                tracing::warn!(node = ?id, "node is not latent and cannot stay active");
                false
            }
            Ok(false) => false,
            Err(err) => {
                self.warn_node(id, &err, "update failed");
                self.deactivate(id);
                return;
            }
        };

        if stay {
            self.activate(id);
        } else {
            self.deactivate(id);
            if outcome.fired.is_empty() && !outcome.suppress_out {
                if let Ok(index) = self.runtime.script.node(id).and_then(|n| n.output_index(OUT)) {
                    self.runtime.activate_output(OutputRef::new(id, index));
                    outcome.fired.push(index);
                }
            }
        }

        let execution = match (was_active, stay) {
            (false, false) => Some(Execution::Executed),
            (false, true) => Some(Execution::Began),
            (true, false) => Some(Execution::Finished),
            (true, true) if !outcome.fired.is_empty() => Some(Execution::Updated),
            (true, true) => None,
        };
        if let Some(execution) = execution {
            self.log_execution(id, execution, input, &outcome.fired);
        }
    }

    fn log_execution(&self, id: NodeId, execution: Execution, input: Option<usize>, fired: &[usize]) {
        if !self.config.node_logging {
            return;
        }
        let Ok(node) = self.runtime.script.node(id) else {
            return;
        };
        if !node.log_node() {
            return;
        }
        let input = input
            .and_then(|i| node.inputs().get(i))
            .map(|l| l.name())
            .unwrap_or("");
        let outputs: Vec<&str> = fired
            .iter()
            .filter_map(|i| node.outputs().get(*i))
            .map(|l| l.name())
            .collect();
        tracing::info!(
            node = ?id,
            name = %node.label(),
            kind = %node.full_kind(),
            input,
            outputs = ?outputs,
            comment = %node.comment(),
            "{execution}"
        );
    }

    fn warn_node(&self, id: NodeId, err: &DirectorError, message: &str) {
        let (name, kind) = self
            .runtime
            .script
            .node(id)
            .map(|n| (n.label().to_string(), n.kind().to_string()))
            .unwrap_or_default();
        tracing::warn!(node = ?id, name = %name, kind = %kind, %err, "{message}");
    }

    fn activate(&mut self, id: NodeId) {
        self.active.insert(id);
        if let Ok(node) = self.runtime.script.node_mut(id) {
            node.set_state(NodeState::Active);
        }
    }

    fn deactivate(&mut self, id: NodeId) {
        self.active.remove(id);
        if let Ok(node) = self.runtime.script.node_mut(id) {
            node.set_state(NodeState::Inactive);
        }
    }

    /// Whether `id` and every graph above it are enabled.
    ///
    /// A boolean value node bound to the node's `Enabled` link overrides
    /// the local property.
    fn node_enabled(&mut self, id: NodeId) -> bool {
        let Ok(node) = self.runtime.script.node(id) else {
            return false;
        };
        let mut graph = Some(node.graph());
        while let Some(g) = graph.and_then(|g| self.runtime.script.graph(g).ok()) {
            if !g.enabled() {
                return false;
            }
            graph = g.parent();
        }
        match node.property_target(ENABLED, 0) {
            Ok(LinkTarget::Bound(value)) => self
                .runtime
                .read_value(value)
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
            _ => node.enabled(),
        }
    }

    // ------------------------------------------------------------------
    // Graph edits
    // ------------------------------------------------------------------

    /// Create a node of the registered kind `kind` in `graph`.
    pub fn add_node(&mut self, graph: GraphId, kind: &str) -> Result<NodeId> {
        let kind = self.registry.kind(kind)?;
        self.runtime.script.insert_node(graph, kind)
    }

    /// Create a nested graph below `parent`.
    pub fn add_graph(&mut self, parent: GraphId, name: &str) -> Result<GraphId> {
        self.runtime.script.add_graph(parent, name)
    }

    /// Disconnect and delete a node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        self.runtime.script.remove_node(id)?;
        self.active.remove(id);
        self.runtime.queue.forget(id);
        Ok(())
    }

    /// Delete a nested graph with everything in it.
    pub fn remove_graph(&mut self, id: GraphId) -> Result<()> {
        self.runtime.script.remove_graph(id)?;
        for node in self.active.snapshot() {
            if !self.runtime.script.contains_node(node) {
                self.active.remove(node);
            }
        }
        Ok(())
    }

    /// Enable or disable a graph.
    pub fn set_graph_enabled(&mut self, id: GraphId, enabled: bool) -> Result<()> {
        self.runtime.script.graph_mut(id)?.set_enabled(enabled);
        Ok(())
    }

    /// Drop every node and nested graph.
    pub fn clear(&mut self) {
        self.runtime.script.clear();
        self.runtime.queue.clear();
        self.runtime.guard.reset();
        self.active.clear();
        self.started = false;
    }

    /// Connect output `output` of `from` to input `input` of `to`.
    pub fn connect(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) -> Result<bool> {
        let (out, inp) = self.activation_refs(from, output, to, input)?;
        self.runtime.script.connect(out, inp)
    }

    /// Disconnect output `output` of `from` from input `input` of `to`.
    pub fn disconnect(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) -> Result<bool> {
        let (out, inp) = self.activation_refs(from, output, to, input)?;
        self.runtime.script.disconnect(out, inp)
    }

    fn activation_refs(
        &self,
        from: NodeId,
        output: &str,
        to: NodeId,
        input: &str,
    ) -> Result<(OutputRef, InputRef)> {
        let out = OutputRef::new(from, self.runtime.script.node(from)?.output_index(output)?);
        let inp = InputRef::new(to, self.runtime.script.node(to)?.input_index(input)?);
        Ok((out, inp))
    }

    /// Bind value node `value` to the value link `link` of `reader`.
    pub fn connect_value(&mut self, reader: NodeId, link: &str, value: NodeId) -> Result<bool> {
        let index = self.runtime.script.node(reader)?.value_link_index(link)?;
        self.runtime.script.connect_value(reader, index, value)
    }

    /// Unbind `value`, or everything when `None`, from the value link `link`
    /// of `reader`.
    pub fn disconnect_value(
        &mut self,
        reader: NodeId,
        link: &str,
        value: Option<NodeId>,
    ) -> Result<bool> {
        let index = self.runtime.script.node(reader)?.value_link_index(link)?;
        self.runtime.script.disconnect_value(reader, index, value)
    }

    /// Remove every connection of a node.
    pub fn disconnect_all(&mut self, id: NodeId) -> Result<bool> {
        self.runtime.script.disconnect_node(id)
    }

    /// Append an input link.
    pub fn add_input_link(&mut self, node: NodeId, name: &str) -> Result<usize> {
        self.runtime.script.add_input_link(node, name)
    }

    /// Append an output link.
    pub fn add_output_link(&mut self, node: NodeId, name: &str) -> Result<usize> {
        self.runtime.script.add_output_link(node, name)
    }

    /// Remove the input link named `name`, re-indexing later inputs.
    ///
    /// Queued activations keep their old index; one that no longer names
    /// an input is delivered as spontaneous.
    pub fn remove_input_link(&mut self, node: NodeId, name: &str) -> Result<()> {
        let index = self.runtime.script.node(node)?.input_index(name)?;
        self.runtime.script.remove_input_link(node, index)
    }

    /// Remove the output link named `name`, re-indexing later outputs.
    pub fn remove_output_link(&mut self, node: NodeId, name: &str) -> Result<()> {
        let index = self.runtime.script.node(node)?.output_index(name)?;
        self.runtime.script.remove_output_link(node, index)
    }

    /// Create a copy of `source` in `graph`.
    ///
    /// Local properties, the name, value and link visibility are copied;
    /// connections are not.
    pub fn clone_node(&mut self, source: NodeId, graph: GraphId) -> Result<NodeId> {
        let kind = self.runtime.script.node(source)?.kind().to_string();
        let copy = self.add_node(graph, &kind)?;

        let script = &mut self.runtime.script;
        let original = script.node(source)?;
        let name = original.name().to_string();
        let properties: Vec<(String, Value)> = original
            .properties()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let slot = original.slot().cloned();
        let inputs: Vec<bool> = original.inputs().iter().map(|l| l.visible()).collect();
        let outputs: Vec<bool> = original.outputs().iter().map(|l| l.visible()).collect();
        let values: Vec<(bool, bool)> = original
            .values()
            .iter()
            .map(|l| (l.exposed(), l.visible()))
            .collect();

        let node = script.node_mut(copy)?;
        node.set_name(name);
        for (key, value) in properties {
            node.set_property(&key, value)?;
        }
        for (link, visible) in node.inputs_mut().iter_mut().zip(inputs) {
            link.set_visible(visible);
        }
        for (link, visible) in node.outputs_mut().iter_mut().zip(outputs) {
            link.set_visible(visible);
        }
        for (link, (exposed, visible)) in node.values_mut().iter_mut().zip(values) {
            link.set_exposed(exposed);
            link.set_visible(visible);
        }
        if let (Some(from), Some(to)) = (slot, node.slot_mut()) {
            to.set_initial(from.initial().clone())?;
            to.set(from.value().clone())?;
            to.set_global(from.is_global());
        }
        Ok(copy)
    }

    /// Rename a node.
    pub fn set_node_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.runtime.script.node_mut(id)?.set_name(name);
        Ok(())
    }

    /// Set a node's local property.
    pub fn set_property(&mut self, id: NodeId, name: &str, value: impl Into<Value>) -> Result<()> {
        self.runtime.script.node_mut(id)?.set_property(name, value.into())
    }

    /// Enable or disable a single node.
    pub fn set_node_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.set_property(id, ENABLED, enabled)?;
        if !enabled {
            self.deactivate(id);
        }
        Ok(())
    }

    /// Nodes named `name`, in tree order.
    pub fn find_nodes(&self, name: &str) -> Vec<NodeId> {
        self.runtime.script.find_nodes(name)
    }

    /// The first value node named `name`, in tree order.
    pub fn find_value_node(&self, name: &str) -> Option<NodeId> {
        self.runtime.script.find_value_node(name)
    }

    // ------------------------------------------------------------------
    // Values and instrumentation
    // ------------------------------------------------------------------

    /// Read a value node, letting it recompute first.
    pub fn value(&mut self, node: NodeId) -> Result<Value> {
        self.runtime.read_value(node)
    }

    /// Write a value node and notify everything reading it.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<Value>) -> Result<()> {
        self.runtime.write_value(node, value.into(), true)?;
        Ok(())
    }

    /// The value a node returns to on [`start`](Self::start).
    pub fn initial_value(&self, node: NodeId) -> Result<Value> {
        self.runtime
            .script
            .node(node)?
            .slot()
            .map(|s| s.initial().clone())
            .ok_or(DirectorError::NotAValueNode(node))
    }

    /// Set the initial value of a value node and of its global peers.
    pub fn set_initial_value(&mut self, node: NodeId, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let peers = self.runtime.script.global_peers(node);
        for id in std::iter::once(node).chain(peers) {
            self.runtime
                .script
                .node_mut(id)?
                .slot_mut()
                .ok_or(DirectorError::NotAValueNode(id))?
                .set_initial(value.clone())?;
        }
        Ok(())
    }

    /// Share a value node's value with same-named global value nodes.
    pub fn set_global(&mut self, node: NodeId, global: bool) -> Result<()> {
        self.runtime
            .script
            .node_mut(node)?
            .slot_mut()
            .ok_or(DirectorError::NotAValueNode(node))?
            .set_global(global);
        Ok(())
    }

    /// Read and clear the activation count of an output.
    pub fn output_test(&mut self, node: NodeId, output: &str) -> Result<u32> {
        let node = self.runtime.script.node_mut(node)?;
        let index = node.output_index(output)?;
        Ok(node.outputs_mut()[index].test())
    }

    /// Activations delivered through an input since the script started.
    pub fn input_activation_count(&self, node: NodeId, input: &str) -> Result<u32> {
        let node = self.runtime.script.node(node)?;
        let index = node.input_index(input)?;
        Ok(node.inputs()[index].activation_count())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Capture the script as a record.
    pub fn to_record(&self) -> ScriptRecord {
        self.runtime.script.to_record()
    }

    /// Replace the script with one built from `record`.
    ///
    /// On failure the director is left empty.
    pub fn load(&mut self, record: &ScriptRecord) -> Result<()> {
        self.clear();
        match Script::from_record(&self.registry, record) {
            Ok(script) => {
                tracing::debug!(director = %record.name, nodes = script.node_count(), "script loaded");
                self.runtime.script = script;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(director = %record.name, %err, "script not loaded");
                Err(err)
            }
        }
    }

    /// Encode the script as JSON.
    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    /// Replace the script with one decoded from JSON.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let record = ScriptRecord::from_json(json).inspect_err(|_| self.clear())?;
        self.load(&record)
    }

    /// Encode the script as MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_record().to_bytes()
    }

    /// Replace the script with one decoded from MessagePack.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let record = ScriptRecord::from_bytes(bytes).inspect_err(|_| self.clear())?;
        self.load(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> Director {
        Director::new(Arc::new(NodeRegistry::with_builtins()), DirectorConfig::default())
    }

    #[test]
    fn executions_display_their_names() {
        let names: Vec<String> = [
            Execution::Executed,
            Execution::Began,
            Execution::Finished,
            Execution::Updated,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["Executed", "Began", "Finished", "Updated"]);
    }

    #[test]
    fn start_drops_pending_triggers() {
        let mut director = director();
        let node = director.add_node(director.root(), "Log Message").unwrap();
        director.trigger(node).unwrap();
        director.start();

        assert_eq!(director.pending_activations(), 0);
        assert_eq!(director.update(0.1, 0.1).updated, 0);
    }

    #[test]
    fn first_update_keeps_pending_triggers() {
        let mut director = director();
        let node = director.add_node(director.root(), "Log Message").unwrap();
        director.trigger(node).unwrap();

        let report = director.update(0.1, 0.1);
        assert!(director.is_started());
        assert_eq!(report.activations, 1);
        assert_eq!(director.output_test(node, "Out").unwrap(), 1);
    }

    #[test]
    fn ticks_are_numbered_from_one() {
        let mut director = director();
        assert_eq!(director.runtime.frame.tick, 0);
        director.update(0.1, 0.2);
        director.update(0.1, 0.2);
        assert_eq!(director.runtime.frame.tick, 2);
        assert_eq!(director.runtime.frame.sim_delta, 0.1);
        assert_eq!(director.runtime.frame.delta, 0.2);

        director.set_enabled(false);
        assert_eq!(director.update(0.1, 0.2), TickReport::default());
        assert_eq!(director.runtime.frame.tick, 2);
    }

    #[test]
    fn disabling_a_node_deactivates_it() {
        let mut director = director();
        let delay = director.add_node(director.root(), "Delay").unwrap();
        director.trigger(delay).unwrap();
        director.update(0.1, 0.1);
        assert!(director.is_active(delay));

        director.set_node_enabled(delay, false).unwrap();
        assert!(!director.is_active(delay));
        assert_eq!(director.update(0.1, 0.1).updated, 0);
    }

    #[test]
    fn stop_empties_active_set_and_queue() {
        let mut director = director();
        let delay = director.add_node(director.root(), "Delay").unwrap();
        director.trigger(delay).unwrap();
        director.update(0.1, 0.1);
        director.trigger(delay).unwrap();

        director.stop();
        assert!(!director.is_started());
        assert_eq!(director.active_count(), 0);
        assert_eq!(director.pending_activations(), 0);
    }
}
