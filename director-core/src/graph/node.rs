//! Graph Nodes
//!
//! A node owns three ordered link collections (inputs, outputs, value
//! links), its local property table, an optional value slot and the
//! behaviour object supplied by its node kind.
//!
//! Link indices are stable for the life of the node; only the explicit
//! add/remove operations on [`Script`](super::Script) change them, and
//! those rewrite every peer reference.

use std::fmt;

use super::id::{GraphId, NodeId};
use super::link::{InputLink, OutputLink};
use crate::error::{DirectorError, LinkKind, Result};
use crate::kind::{Capabilities, NodeBehavior, NodeBuilder, NodeKind, COMMENT, ENABLED, LOG_NODE};
use crate::property::PropertyTable;
use crate::reactive::{LinkTarget, Value, ValueLink, ValueSlot};

/// Activation state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Not scheduled.
    #[default]
    Inactive,

    /// In the director's active set; updated every tick.
    Active,
}

/// A node in a director script.
pub struct Node {
    id: NodeId,
    graph: GraphId,
    kind: String,
    full_kind: String,
    name: String,
    inputs: Vec<InputLink>,
    outputs: Vec<OutputLink>,
    values: Vec<ValueLink>,
    properties: PropertyTable,
    slot: Option<ValueSlot>,
    capabilities: Capabilities,
    state: NodeState,
    /// Taken out while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
}

impl Node {
    /// Build a node of `kind` owned by `graph`.
    pub(crate) fn new(id: NodeId, graph: GraphId, kind: &NodeKind) -> Self {
        let behavior = kind.create();
        let mut builder = NodeBuilder::new();
        behavior.build(&mut builder);
        let capabilities = builder.capabilities();

        Self {
            id,
            graph,
            kind: kind.name().to_string(),
            full_kind: kind.full_name(),
            name: String::new(),
            inputs: builder.inputs,
            outputs: builder.outputs,
            values: builder.values,
            properties: builder.properties,
            slot: builder.slot,
            capabilities,
            state: NodeState::Inactive,
            behavior: Some(behavior),
        }
    }

    /// The node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The graph owning this node.
    pub fn graph(&self) -> GraphId {
        self.graph
    }

    /// Name of the node kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// `category::name` of the node kind.
    pub fn full_kind(&self) -> &str {
        &self.full_kind
    }

    /// Display name. Empty unless set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Display name, falling back to the kind name.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.kind
        } else {
            &self.name
        }
    }

    /// The `Comment` property.
    pub fn comment(&self) -> &str {
        match self.properties.get(COMMENT) {
            Some(Value::String(s)) => s,
            _ => "",
        }
    }

    /// The local `Enabled` property.
    ///
    /// A value node bound to the `Enabled` link overrides this; the
    /// director resolves that when deciding whether to run the node.
    pub fn enabled(&self) -> bool {
        !matches!(self.properties.get(ENABLED), Some(Value::Bool(false)))
    }

    /// The `LogNode` property.
    pub fn log_node(&self) -> bool {
        matches!(self.properties.get(LOG_NODE), Some(Value::Bool(true)))
    }

    /// What this node can take part in.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Activation state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Whether the node is in the active set.
    pub fn is_active(&self) -> bool {
        self.state == NodeState::Active
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    /// Input links in order.
    pub fn inputs(&self) -> &[InputLink] {
        &self.inputs
    }

    /// Output links in order.
    pub fn outputs(&self) -> &[OutputLink] {
        &self.outputs
    }

    /// Value links in order.
    pub fn values(&self) -> &[ValueLink] {
        &self.values
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut Vec<InputLink> {
        &mut self.inputs
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut Vec<OutputLink> {
        &mut self.outputs
    }

    pub(crate) fn values_mut(&mut self) -> &mut [ValueLink] {
        &mut self.values
    }

    /// Position of the input named `name`.
    pub fn input_index(&self, name: &str) -> Result<usize> {
        self.inputs
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| self.unknown_link(LinkKind::Input, name))
    }

    /// Position of the output named `name`.
    pub fn output_index(&self, name: &str) -> Result<usize> {
        self.outputs
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| self.unknown_link(LinkKind::Output, name))
    }

    /// Position of the value link named `name`.
    pub fn value_link_index(&self, name: &str) -> Result<usize> {
        self.values
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| self.unknown_link(LinkKind::Value, name))
    }

    /// The value link named `name`, if any.
    pub fn value_link(&self, name: &str) -> Option<&ValueLink> {
        self.values.iter().find(|l| l.name() == name)
    }

    fn unknown_link(&self, kind: LinkKind, name: &str) -> DirectorError {
        DirectorError::UnknownLink {
            node: self.id,
            kind,
            name: name.to_string(),
        }
    }

    /// Local property table.
    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// A property's local value.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set a property's local value.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.properties.set(self.id, name, value)
    }

    /// The value slot, for value nodes.
    pub fn slot(&self) -> Option<&ValueSlot> {
        self.slot.as_ref()
    }

    pub(crate) fn slot_mut(&mut self) -> Option<&mut ValueSlot> {
        self.slot.as_mut()
    }

    /// Number of values readable under `name`.
    ///
    /// One for a scalar value link or a plain property, the number of bound
    /// value nodes for an array link, zero for an unknown name.
    pub fn property_count(&self, name: &str) -> usize {
        match self.value_link(name) {
            Some(link) => link.property_count(),
            None if self.properties.contains(name) => 1,
            None => 0,
        }
    }

    /// Resolve where the `index`-th value of `name` lives.
    ///
    /// This is the redirection at the heart of value links: an unbound
    /// scalar link or plain property resolves to the node's own property,
    /// a bound link to the owning value node.
    pub fn property_target(&self, name: &str, index: usize) -> Result<LinkTarget> {
        if let Some(link) = self.value_link(name) {
            return link
                .target(index)
                .ok_or_else(|| DirectorError::IndexOutOfRange {
                    link: name.to_string(),
                    index,
                    count: link.property_count(),
                });
        }
        if !self.properties.contains(name) {
            return Err(DirectorError::UnknownProperty {
                node: self.id,
                name: name.to_string(),
            });
        }
        if index == 0 {
            Ok(LinkTarget::Local)
        } else {
            Err(DirectorError::IndexOutOfRange {
                link: name.to_string(),
                index,
                count: 1,
            })
        }
    }

    /// The first required value link with nothing bound, if any.
    pub fn unbound_required_link(&self) -> Option<&ValueLink> {
        self.values
            .iter()
            .find(|l| l.is_required() && !l.is_linked())
    }

    /// Accept activations once the node has an input.
    pub(crate) fn mark_triggerable(&mut self) {
        self.capabilities.triggerable = true;
    }

    /// Clear input activation counts and pending output pulses.
    pub(crate) fn reset_link_counters(&mut self) {
        for input in &mut self.inputs {
            input.reset_activations();
        }
        for output in &mut self.outputs {
            output.test();
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .field("values", &self.values.len())
            .finish()
    }
}
