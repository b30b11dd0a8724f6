//! Value Propagation
//!
//! Reading and writing value nodes through the director runtime.
//!
//! # How It Works
//!
//! 1. A write stores into the value node's slot.
//!
//! 2. If the value changed (or the caller asks to notify regardless), the
//!    runtime enters the [`PropagationGuard`](super::PropagationGuard) for
//!    the value node and:
//!    a. copies the value to every same-named global value node,
//!    b. calls `on_link_value_changed` on each dependent in binding order.
//!
//! 3. A dependent that recomputes its own value writes it through the same
//!    path, so the push continues depth first until nothing changes, a
//!    cycle is found or the depth limit is hit.
//!
//! A read calls the value node's `on_value_retrieved` hook first, then
//! returns the stored value.

use super::value::Value;
use crate::director::Runtime;
use crate::error::{DirectorError, Result};
use crate::graph::NodeId;

impl Runtime {
    /// Store `value` in a value node's slot and push the change.
    ///
    /// Returns whether the stored value changed. With `notify_always` the
    /// dependents are notified even when it did not.
    pub(crate) fn write_value(
        &mut self,
        node: NodeId,
        value: Value,
        notify_always: bool,
    ) -> Result<bool> {
        let slot = self
            .script
            .node_mut(node)?
            .slot_mut()
            .ok_or(DirectorError::NotAValueNode(node))?;
        let changed = slot.set(value)?;
        if changed || notify_always {
            self.value_changed(node);
        }
        Ok(changed)
    }

    /// Push the current value of `node` to global peers and dependents.
    pub(crate) fn value_changed(&mut self, node: NodeId) {
        if let Err(err) = self.guard.enter(node) {
            tracing::warn!(
                node = ?node,
                depth = self.guard.depth(),
                %err,
                "value propagation truncated"
            );
            return;
        }

        let fan_out = !self.guard.applying_global();
        self.guard.set_applying_global(false);

        let Some((value, dependents)) = self
            .script
            .node(node)
            .ok()
            .and_then(|n| n.slot())
            .map(|slot| (slot.value().clone(), slot.dependents().to_vec()))
        else {
            self.guard.exit(node);
            return;
        };

        if self.node_logging {
            tracing::trace!(node = ?node, value = %value, "value changed");
        }

        if fan_out {
            for peer in self.script.global_peers(node) {
                self.guard.set_applying_global(true);
                if let Err(err) = self.write_value(peer, value.clone(), false) {
                    tracing::warn!(node = ?peer, %err, "global value not applied");
                }
                self.guard.set_applying_global(false);
            }
        }

        for dependent in dependents {
            let Some(link) = self
                .script
                .node(dependent.node)
                .ok()
                .and_then(|n| n.values().get(dependent.link))
                .map(|l| l.name().to_string())
            else {
                continue;
            };
            let outcome = self.with_behavior(dependent.node, |behavior, ctx| {
                behavior.on_link_value_changed(ctx, &link)
            });
            if let Some((Err(err), _)) = outcome {
                tracing::warn!(node = ?dependent.node, link = %link, %err, "value change not handled");
            }
        }

        self.guard.exit(node);
    }

    /// Read a value node, letting it recompute first.
    pub(crate) fn read_value(&mut self, node: NodeId) -> Result<Value> {
        self.script
            .node(node)?
            .slot()
            .ok_or(DirectorError::NotAValueNode(node))?;

        if !self.guard.is_propagating(node) {
            let outcome = self.with_behavior(node, |behavior, ctx| behavior.on_value_retrieved(ctx));
            if let Some((Err(err), _)) = outcome {
                tracing::warn!(node = ?node, %err, "value not recomputed");
            }
        }

        self.script
            .node(node)?
            .slot()
            .map(|slot| slot.value().clone())
            .ok_or(DirectorError::NotAValueNode(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeRegistry;

    fn runtime_with(kinds: &[&str]) -> (Runtime, Vec<NodeId>) {
        let registry = NodeRegistry::with_builtins();
        let mut rt = Runtime::new("Test", 16, false);
        let root = rt.script.root();
        let ids = kinds
            .iter()
            .map(|kind| rt.script.insert_node(root, registry.kind(kind).unwrap()).unwrap())
            .collect();
        (rt, ids)
    }

    #[test]
    fn writing_a_plain_node_fails() {
        let (mut rt, ids) = runtime_with(&["Log Message"]);
        let err = rt.write_value(ids[0], Value::Int(1), false).unwrap_err();
        assert!(matches!(err, DirectorError::NotAValueNode(id) if id == ids[0]));
        assert!(rt.read_value(ids[0]).is_err());
    }

    #[test]
    fn read_recomputes_unless_propagating() {
        let (mut rt, ids) = runtime_with(&["Add", "Double"]);
        let (add, input) = (ids[0], ids[1]);
        rt.script.connect_value(add, 0, input).unwrap();
        rt.script.node_mut(add).unwrap().set_property("B", Value::Double(3.0)).unwrap();
        rt.write_value(input, Value::Double(2.0), false).unwrap();

        assert_eq!(rt.read_value(add).unwrap(), Value::Double(5.0));

        rt.write_value(input, Value::Double(4.0), false).unwrap();
        rt.guard.enter(add).unwrap();
        assert_eq!(rt.read_value(add).unwrap(), Value::Double(5.0));
        rt.guard.exit(add);
        assert_eq!(rt.read_value(add).unwrap(), Value::Double(7.0));
    }

    #[test]
    fn dependents_follow_changes() {
        let (mut rt, ids) = runtime_with(&["Boolean", "Is Not"]);
        let (input, not) = (ids[0], ids[1]);
        rt.script.connect_value(not, 0, input).unwrap();

        assert!(rt.write_value(input, Value::Bool(true), false).unwrap());
        assert_eq!(rt.read_value(not).unwrap(), Value::Bool(false));
        assert!(!rt.write_value(input, Value::Bool(true), false).unwrap());
        assert_eq!(rt.guard.depth(), 0);
    }

    #[test]
    fn globals_share_one_write() {
        let (mut rt, ids) = runtime_with(&["Int", "Int", "Int"]);
        for id in &ids {
            let node = rt.script.node_mut(*id).unwrap();
            node.set_name("Shared");
            node.slot_mut().unwrap().set_global(true);
        }

        rt.write_value(ids[0], Value::Int(7), false).unwrap();

        for id in &ids {
            assert_eq!(rt.read_value(*id).unwrap(), Value::Int(7));
        }
        assert_eq!(rt.guard.take_overruns(), 0);
        assert_eq!(rt.guard.depth(), 0);
    }

    #[test]
    fn self_bound_negation_is_cut_off() {
        let (mut rt, ids) = runtime_with(&["Is Not"]);
        rt.script.connect_value(ids[0], 0, ids[0]).unwrap();

        rt.value_changed(ids[0]);

        assert_eq!(rt.guard.take_overruns(), 1);
        assert_eq!(rt.guard.depth(), 0);
        assert_eq!(rt.read_value(ids[0]).unwrap(), Value::Bool(false));
    }
}
