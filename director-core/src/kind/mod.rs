//! Node Kinds
//!
//! The engine knows nothing about what a node does. Each node kind
//! supplies a [`NodeBehavior`], the plugin contract:
//!
//! - [`build`](NodeBehavior::build) declares the node's links, properties
//!   and (for value nodes) its value slot.
//! - [`update`](NodeBehavior::update) runs when the node is triggered, and
//!   once per tick while it stays active.
//! - [`can_connect_value`](NodeBehavior::can_connect_value) vets value
//!   bindings at edit time.
//! - [`on_link_value_changed`](NodeBehavior::on_link_value_changed) and
//!   [`on_value_retrieved`](NodeBehavior::on_value_retrieved) are the push
//!   and pull hooks of the dataflow layer.
//!
//! A kind is registered under a name in a [`NodeRegistry`] which is handed
//! to the director at construction.
//!
//! # Capabilities
//!
//! Instead of a class hierarchy (event, action, latent action, value,
//! mutator) a node is one type with a small capability set derived from
//! what its builder declared. See [`Capabilities`].

mod registry;

pub use registry::{NodeFactory, NodeKind, NodeRegistry};

use crate::director::NodeContext;
use crate::error::Result;
use crate::graph::{InputLink, OutputLink};
use crate::property::{PropertyDef, PropertyTable};
use crate::reactive::{DataType, Value, ValueLink, ValueSlot};

/// Name of the output fired by default when a node completes.
pub const OUT: &str = "Out";

/// Base property: disabled nodes ignore activations.
pub const ENABLED: &str = "Enabled";

/// Base property: free text shown by editors and node logging.
pub const COMMENT: &str = "Comment";

/// Base property: log every execution of this node.
pub const LOG_NODE: &str = "LogNode";

/// What a node can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Accepts activations (has inputs, or is a spontaneous event).
    pub triggerable: bool,
    /// Holds a value slot that other nodes can bind to.
    pub valued: bool,
    /// May stay active across ticks.
    pub latent: bool,
}

/// The behaviour of one node kind.
///
/// All hooks run inside the director's tick (or inside a graph edit for
/// `can_connect_value`) and must not block. Errors returned from a hook
/// are logged by the director with the node's id and name; they never
/// abort the tick.
pub trait NodeBehavior: Send {
    /// Declare links, properties and the value slot.
    fn build(&self, node: &mut NodeBuilder);

    /// Called for every node when the script starts.
    fn on_start(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Run the node.
    ///
    /// `input` is the index of the input link that fired, or `None` for a
    /// spontaneous trigger or a continuing latent update. `first_update`
    /// is true when the node goes from inactive to active.
    ///
    /// Return `Ok(true)` to stay active next tick. On `Ok(false)` the
    /// director fires the `Out` output unless this call fired an output
    /// itself or called [`NodeContext::suppress_out`]. An `Err` deactivates
    /// the node without firing anything.
    fn update(
        &mut self,
        _ctx: &mut NodeContext<'_>,
        _input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        Ok(false)
    }

    /// Check if `value` may be bound to `link`.
    fn can_connect_value(&self, link: &ValueLink, value: &ValueSlot) -> bool {
        !link.type_checking() || value.can_be_type(link.data_type())
    }

    /// A value bound to the link named `link` changed.
    fn on_link_value_changed(&mut self, _ctx: &mut NodeContext<'_>, _link: &str) -> Result<()> {
        Ok(())
    }

    /// This node's own value is about to be read.
    fn on_value_retrieved(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Collects what a node kind declares while a node is created.
#[derive(Debug)]
pub struct NodeBuilder {
    pub(crate) inputs: Vec<InputLink>,
    pub(crate) outputs: Vec<OutputLink>,
    pub(crate) values: Vec<ValueLink>,
    pub(crate) properties: PropertyTable,
    pub(crate) slot: Option<ValueSlot>,
    triggerable: bool,
    latent: bool,
}

impl NodeBuilder {
    /// A builder pre-populated with the base properties every node has.
    pub(crate) fn new() -> Self {
        let mut builder = Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            values: Vec::new(),
            properties: PropertyTable::new(),
            slot: None,
            triggerable: false,
            latent: false,
        };
        builder
            .value_link(
                PropertyDef::new(ENABLED, true)
                    .describe("Disabled nodes do not run during graph execution."),
            )
            .hidden();
        builder.property(PropertyDef::typed(COMMENT, DataType::String));
        builder.property(
            PropertyDef::new(LOG_NODE, false).describe("Log a message whenever this node runs."),
        );
        builder
    }

    /// Add an input link.
    pub fn input(&mut self, name: &str) -> &mut Self {
        self.inputs.push(InputLink::new(name));
        self.triggerable = true;
        self
    }

    /// Add an output link.
    pub fn output(&mut self, name: &str) -> &mut Self {
        self.outputs.push(OutputLink::new(name));
        self
    }

    /// Declare a plain property.
    pub fn property(&mut self, def: PropertyDef) -> &mut Self {
        self.properties.declare(def);
        self
    }

    /// Declare a property that value nodes can be bound to.
    pub fn value_link(&mut self, def: PropertyDef) -> &mut ValueLink {
        let link = ValueLink::new(def.name.clone(), def.data_type);
        self.properties.declare(def);
        self.values.retain(|existing| existing.name() != link.name());
        self.values.push(link);
        let last = self.values.len() - 1;
        &mut self.values[last]
    }

    /// Give the node a value slot typed after `initial`.
    pub fn value(&mut self, initial: Value) -> &mut Self {
        self.slot = Some(ValueSlot::new(initial));
        self
    }

    /// Give the node a value slot of an explicit type.
    pub fn value_typed(&mut self, data_type: DataType, initial: Value) -> &mut Self {
        self.slot = Some(ValueSlot::typed(data_type, initial));
        self
    }

    /// Allow spontaneous triggers even without input links.
    pub fn event(&mut self) -> &mut Self {
        self.triggerable = true;
        self
    }

    /// Allow the node to stay active across ticks.
    pub fn latent(&mut self) -> &mut Self {
        self.latent = true;
        self
    }

    /// The capabilities declared so far.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            triggerable: self.triggerable,
            valued: self.slot.is_some(),
            latent: self.latent,
        }
    }
}
