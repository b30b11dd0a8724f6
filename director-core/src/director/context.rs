//! Node Context
//!
//! What a node's behaviour can do while one of its hooks runs: read and
//! write its properties through its value links, fire outputs, and look at
//! the current time step.

use smallvec::SmallVec;

use super::runtime::Runtime;
use crate::error::{DirectorError, Result};
use crate::graph::{NodeId, OutputRef};
use crate::reactive::{LinkTarget, Value};

/// Side effects of one hook call that the director acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// Indices of the outputs fired, in firing order.
    pub fired: SmallVec<[usize; 2]>,
    /// The default `Out` activation was declined.
    pub suppress_out: bool,
}

/// Handle given to node hooks.
pub struct NodeContext<'a> {
    rt: &'a mut Runtime,
    node: NodeId,
    outcome: Outcome,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(rt: &'a mut Runtime, node: NodeId) -> Self {
        Self {
            rt,
            node,
            outcome: Outcome::default(),
        }
    }

    pub(crate) fn finish(self) -> Outcome {
        self.outcome
    }

    /// The node being run.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Simulated time elapsed this tick, in seconds.
    pub fn sim_delta(&self) -> f32 {
        self.rt.frame.sim_delta
    }

    /// Real time elapsed this tick, in seconds.
    pub fn delta(&self) -> f32 {
        self.rt.frame.delta
    }

    /// Number of the tick in progress; zero before the first update.
    pub fn tick(&self) -> u64 {
        self.rt.frame.tick
    }

    /// Fire the output named `name`.
    ///
    /// Connected nodes are queued, not run. Returns false if the node has
    /// no such output.
    pub fn activate_output(&mut self, name: &str) -> bool {
        let index = match self.rt.script.node(self.node).and_then(|n| n.output_index(name)) {
            Ok(index) => index,
            Err(err) => {
                tracing::warn!(node = ?self.node, %err, "output not activated");
                return false;
            }
        };
        self.rt.activate_output(OutputRef::new(self.node, index));
        self.outcome.fired.push(index);
        true
    }

    /// Do not fire `Out` when this update completes.
    pub fn suppress_out(&mut self) {
        self.outcome.suppress_out = true;
    }

    /// Number of values readable under `name`.
    pub fn property_count(&self, name: &str) -> usize {
        self.rt
            .script
            .node(self.node)
            .map(|n| n.property_count(name))
            .unwrap_or(0)
    }

    fn target(&self, name: &str, index: usize) -> Result<LinkTarget> {
        self.rt.script.node(self.node)?.property_target(name, index)
    }

    /// Read the `index`-th value of property `name`.
    ///
    /// Bound value nodes get a chance to recompute before the read.
    pub fn get(&mut self, name: &str, index: usize) -> Result<Value> {
        match self.target(name, index)? {
            LinkTarget::Bound(value) => self.rt.read_value(value),
            LinkTarget::Local => self.local(name),
        }
    }

    /// Read a value as a bool.
    pub fn get_bool(&mut self, name: &str, index: usize) -> Result<bool> {
        self.get(name, index)?.as_bool()
    }

    /// Read a value as an int.
    pub fn get_int(&mut self, name: &str, index: usize) -> Result<i32> {
        self.get(name, index)?.as_int()
    }

    /// Read a value as a float.
    pub fn get_float(&mut self, name: &str, index: usize) -> Result<f32> {
        self.get(name, index)?.as_float()
    }

    /// Read a value as a double.
    pub fn get_double(&mut self, name: &str, index: usize) -> Result<f64> {
        self.get(name, index)?.as_double()
    }

    /// Read a value as a string.
    pub fn get_string(&mut self, name: &str, index: usize) -> Result<String> {
        Ok(self.get(name, index)?.as_str()?.to_string())
    }

    /// Write the `index`-th value of property `name`.
    ///
    /// Writing a bound value node notifies its dependents, even when the
    /// value does not change.
    pub fn set(&mut self, name: &str, index: usize, value: Value) -> Result<()> {
        match self.target(name, index)? {
            LinkTarget::Bound(target) => self.rt.write_value(target, value, true).map(|_| ()),
            LinkTarget::Local => self.rt.script.node_mut(self.node)?.set_property(name, value),
        }
    }

    /// Write every value of property `name`.
    pub fn set_all(&mut self, name: &str, value: Value) -> Result<()> {
        for index in 0..self.property_count(name) {
            self.set(name, index, value.clone())?;
        }
        Ok(())
    }

    /// This value node's own stored value.
    pub fn value(&self) -> Result<Value> {
        self.rt
            .script
            .node(self.node)?
            .slot()
            .map(|slot| slot.value().clone())
            .ok_or(DirectorError::NotAValueNode(self.node))
    }

    /// Store this value node's own value.
    ///
    /// Dependents are notified only when the value changes. Returns
    /// whether it changed.
    pub fn set_value(&mut self, value: Value) -> Result<bool> {
        self.rt.write_value(self.node, value, false)
    }

    /// The node's local value of property `name`, ignoring links.
    pub fn local(&self, name: &str) -> Result<Value> {
        self.rt
            .script
            .node(self.node)?
            .property(name)
            .cloned()
            .ok_or_else(|| DirectorError::UnknownProperty {
                node: self.node,
                name: name.to_string(),
            })
    }

    /// Set the node's local value of property `name`, ignoring links.
    pub fn set_local(&mut self, name: &str, value: Value) -> Result<()> {
        self.rt.script.node_mut(self.node)?.set_property(name, value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{Director, DirectorConfig, NodeId, NodeRegistry, Result, Value};

    /// An Int, a change event watching it and an increment writing it.
    fn watched() -> (Director, NodeId, NodeId, NodeId) {
        let mut director =
            Director::new(Arc::new(NodeRegistry::with_builtins()), DirectorConfig::default());
        let root = director.root();
        let value = director.add_node(root, "Int").unwrap();
        let event = director.add_node(root, "Value Changed Event").unwrap();
        let action = director.add_node(root, "Increment").unwrap();
        director.connect_value(event, "Value", value).unwrap();
        director.connect_value(action, "Value", value).unwrap();
        director.start();
        director.output_test(event, "Changed").unwrap();
        (director, value, event, action)
    }

    #[test]
    fn set_notifies_even_when_unchanged() {
        let (mut director, value, event, action) = watched();

        let (result, _) = director
            .runtime
            .with_behavior(action, |_, ctx| ctx.set("Value", 0, Value::Int(0)))
            .unwrap();
        result.unwrap();

        assert_eq!(director.value(value).unwrap(), Value::Int(0));
        assert_eq!(director.output_test(event, "Changed").unwrap(), 1);
    }

    #[test]
    fn set_value_notifies_only_on_change() {
        let (mut director, value, event, _) = watched();

        let (changed, _) = director
            .runtime
            .with_behavior(value, |_, ctx| ctx.set_value(Value::Int(0)))
            .unwrap();
        assert!(!changed.unwrap());
        assert_eq!(director.output_test(event, "Changed").unwrap(), 0);

        let (changed, _) = director
            .runtime
            .with_behavior(value, |_, ctx| ctx.set_value(Value::Int(5)))
            .unwrap();
        assert!(changed.unwrap());
        assert_eq!(director.output_test(event, "Changed").unwrap(), 1);
    }

    #[test]
    fn outcome_lists_fired_outputs() {
        let (mut director, _, event, _) = watched();

        let (fired, outcome) = director
            .runtime
            .with_behavior(event, |_, ctx| {
                let missing = ctx.activate_output("Missing");
                ctx.activate_output("Changed");
                ctx.suppress_out();
                missing
            })
            .unwrap();

        assert!(!fired);
        assert_eq!(outcome.fired.len(), 1);
        assert!(outcome.suppress_out);
    }

    #[test]
    fn local_values_are_read_back() {
        let (mut director, _, _, action) = watched();

        let (amount, _) = director
            .runtime
            .with_behavior(action, |_, ctx| -> Result<i32> {
                ctx.set_local("Amount", Value::Int(9))?;
                ctx.get_int("Amount", 0)
            })
            .unwrap();

        assert_eq!(amount.unwrap(), 9);
        assert_eq!(director.node(action).unwrap().property("Amount"), Some(&Value::Int(9)));
    }
}
