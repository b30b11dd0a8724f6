//! Script Arena and Graph Hierarchy
//!
//! A [`Script`] owns every node and graph of one director. Nodes live in a
//! single generational arena; a [`DirectorGraph`] only records which nodes
//! and child graphs it owns, in order. The graphs form a tree below one
//! root graph.
//!
//! # Edits
//!
//! All structural edits go through the script so both ends of a connection
//! are always updated together:
//!
//! - activation links: [`connect`](Script::connect) and
//!   [`disconnect`](Script::disconnect) keep output and input peer lists
//!   symmetric.
//! - value links: [`connect_value`](Script::connect_value) binds a value
//!   node to a reader's link and registers the reader as a dependent of the
//!   value node, so a write knows whom to notify.
//!
//! Removing a node first disconnects every link of every kind, so no other
//! node keeps a reference to it.

use slotmap::SlotMap;

use super::id::{GraphId, InputRef, NodeId, OutputRef};
use super::link::{InputLink, OutputLink};
use super::node::Node;
use crate::error::{DirectorError, Result};
use crate::kind::NodeKind;
use crate::reactive::Dependent;

/// A named container of nodes and nested graphs.
#[derive(Debug, Clone)]
pub struct DirectorGraph {
    id: GraphId,
    name: String,
    comment: String,
    enabled: bool,
    parent: Option<GraphId>,
    nodes: Vec<NodeId>,
    graphs: Vec<GraphId>,
}

impl DirectorGraph {
    fn new(id: GraphId, name: impl Into<String>, parent: Option<GraphId>) -> Self {
        Self {
            id,
            name: name.into(),
            comment: String::new(),
            enabled: true,
            parent,
            nodes: Vec::new(),
            graphs: Vec::new(),
        }
    }

    /// The graph's id.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the graph.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Editor comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Set the editor comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Whether nodes of this graph run.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the graph.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The owning graph; `None` for the root.
    pub fn parent(&self) -> Option<GraphId> {
        self.parent
    }

    /// Owned nodes in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Nested graphs in insertion order.
    pub fn graphs(&self) -> &[GraphId] {
        &self.graphs
    }
}

/// Every node and graph of a director.
#[derive(Debug)]
pub struct Script {
    nodes: SlotMap<NodeId, Node>,
    graphs: SlotMap<GraphId, DirectorGraph>,
    root: GraphId,
}

impl Script {
    /// Create a script with an empty root graph.
    pub fn new(name: impl Into<String>) -> Self {
        let mut graphs = SlotMap::with_key();
        let name = name.into();
        let root = graphs.insert_with_key(|id| DirectorGraph::new(id, name, None));
        Self {
            nodes: SlotMap::with_key(),
            graphs,
            root,
        }
    }

    /// The root graph's id.
    pub fn root(&self) -> GraphId {
        self.root
    }

    /// Look up a graph.
    pub fn graph(&self, id: GraphId) -> Result<&DirectorGraph> {
        self.graphs.get(id).ok_or(DirectorError::UnknownGraph(id))
    }

    /// Look up a graph mutably.
    pub fn graph_mut(&mut self, id: GraphId) -> Result<&mut DirectorGraph> {
        self.graphs.get_mut(id).ok_or(DirectorError::UnknownGraph(id))
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(DirectorError::UnknownNode(id))
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(DirectorError::UnknownNode(id))
    }

    /// Check if `id` refers to a live node.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of graphs, root included.
    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Add an empty graph below `parent`.
    pub fn add_graph(&mut self, parent: GraphId, name: impl Into<String>) -> Result<GraphId> {
        self.graph(parent)?;
        let id = self
            .graphs
            .insert_with_key(|id| DirectorGraph::new(id, name, Some(parent)));
        self.graph_mut(parent)?.graphs.push(id);
        Ok(id)
    }

    /// Create a node of `kind` in `graph`.
    pub fn insert_node(&mut self, graph: GraphId, kind: &NodeKind) -> Result<NodeId> {
        self.graph(graph)?;
        let id = self.nodes.insert_with_key(|id| Node::new(id, graph, kind));
        self.graph_mut(graph)?.nodes.push(id);
        tracing::trace!(node = ?id, kind = %kind.name(), "node created");
        Ok(id)
    }

    /// Disconnect and delete a node.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        self.disconnect_node(id)?;
        let node = self.nodes.remove(id).ok_or(DirectorError::UnknownNode(id))?;
        if let Some(graph) = self.graphs.get_mut(node.graph()) {
            graph.nodes.retain(|n| *n != id);
        }
        Ok(node)
    }

    /// Delete a graph with all its nodes and nested graphs.
    pub fn remove_graph(&mut self, id: GraphId) -> Result<()> {
        if id == self.root {
            return Err(DirectorError::RootGraph);
        }
        let graph = self.graph(id)?;
        let parent = graph.parent;
        let children = graph.graphs.clone();
        let nodes = graph.nodes.clone();

        for child in children {
            self.remove_graph(child)?;
        }
        for node in nodes {
            self.remove_node(node)?;
        }
        self.graphs.remove(id);
        if let Some(parent) = parent.and_then(|p| self.graphs.get_mut(p)) {
            parent.graphs.retain(|g| *g != id);
        }
        Ok(())
    }

    /// Drop every node and nested graph, keeping an empty root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        let root = self.graphs.remove(self.root);
        self.graphs.clear();
        let name = root.map(|g| g.name).unwrap_or_default();
        self.root = self
            .graphs
            .insert_with_key(|id| DirectorGraph::new(id, name, None));
    }

    /// Node ids in tree order: a graph's own nodes, then its nested graphs.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect_nodes(self.root, &mut out);
        out
    }

    fn collect_nodes(&self, graph: GraphId, out: &mut Vec<NodeId>) {
        if let Some(graph) = self.graphs.get(graph) {
            out.extend_from_slice(&graph.nodes);
            for child in &graph.graphs {
                self.collect_nodes(*child, out);
            }
        }
    }

    /// Iterate over every node, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Nodes whose display name is `name`, in tree order.
    pub fn find_nodes(&self, name: &str) -> Vec<NodeId> {
        self.node_ids()
            .into_iter()
            .filter(|id| self.nodes[*id].name() == name)
            .collect()
    }

    /// The first value node named `name`, in tree order.
    pub fn find_value_node(&self, name: &str) -> Option<NodeId> {
        self.node_ids().into_iter().find(|id| {
            let node = &self.nodes[*id];
            node.slot().is_some() && node.name() == name
        })
    }

    /// Other global value nodes sharing `id`'s name and data type.
    pub fn global_peers(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let Some(slot) = node.slot().filter(|s| s.is_global()) else {
            return Vec::new();
        };
        self.node_ids()
            .into_iter()
            .filter(|other| *other != id)
            .filter(|other| {
                let peer = &self.nodes[*other];
                peer.name() == node.name()
                    && peer
                        .slot()
                        .is_some_and(|s| s.is_global() && s.data_type() == slot.data_type())
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Activation links
    // ------------------------------------------------------------------

    fn output_link(&self, out: OutputRef) -> Result<&OutputLink> {
        self.node(out.node)?
            .outputs()
            .get(out.index)
            .ok_or_else(|| index_error("output", out.index, self.nodes[out.node].outputs().len()))
    }

    fn input_link(&self, input: InputRef) -> Result<&InputLink> {
        self.node(input.node)?
            .inputs()
            .get(input.index)
            .ok_or_else(|| index_error("input", input.index, self.nodes[input.node].inputs().len()))
    }

    /// Connect an output to an input.
    ///
    /// Returns `Ok(false)` if they were already connected.
    pub fn connect(&mut self, out: OutputRef, input: InputRef) -> Result<bool> {
        self.output_link(out)?;
        self.input_link(input)?;

        let added = self.nodes[out.node].outputs_mut()[out.index].add_peer(input);
        self.nodes[input.node].inputs_mut()[input.index].add_peer(out);
        Ok(added)
    }

    /// Disconnect an output from an input.
    ///
    /// Returns `Ok(false)` if they were not connected.
    pub fn disconnect(&mut self, out: OutputRef, input: InputRef) -> Result<bool> {
        self.output_link(out)?;
        self.input_link(input)?;

        let removed = self.nodes[out.node].outputs_mut()[out.index].remove_peer(input);
        self.nodes[input.node].inputs_mut()[input.index].remove_peer(out);
        Ok(removed)
    }

    /// Disconnect an output from every input it feeds.
    pub fn disconnect_output(&mut self, out: OutputRef) -> Result<bool> {
        self.output_link(out)?;
        let peers = self.nodes[out.node].outputs_mut()[out.index].take_peers();
        for input in &peers {
            if let Some(link) = self
                .nodes
                .get_mut(input.node)
                .and_then(|n| n.inputs_mut().get_mut(input.index))
            {
                link.remove_peer(out);
            }
        }
        Ok(!peers.is_empty())
    }

    /// Disconnect an input from every output feeding it.
    pub fn disconnect_input(&mut self, input: InputRef) -> Result<bool> {
        self.input_link(input)?;
        let peers = self.nodes[input.node].inputs_mut()[input.index].take_peers();
        for out in &peers {
            if let Some(link) = self
                .nodes
                .get_mut(out.node)
                .and_then(|n| n.outputs_mut().get_mut(out.index))
            {
                link.remove_peer(input);
            }
        }
        Ok(!peers.is_empty())
    }

    /// Check if `out` currently feeds `input`.
    pub fn is_connected(&self, out: OutputRef, input: InputRef) -> bool {
        self.output_link(out)
            .map(|link| link.is_connected_to(input))
            .unwrap_or(false)
    }

    /// Append an input link to a node and return its index.
    pub fn add_input_link(&mut self, node: NodeId, name: &str) -> Result<usize> {
        let node = self.node_mut(node)?;
        node.mark_triggerable();
        let inputs = node.inputs_mut();
        inputs.push(InputLink::new(name));
        Ok(inputs.len() - 1)
    }

    /// Append an output link to a node and return its index.
    pub fn add_output_link(&mut self, node: NodeId, name: &str) -> Result<usize> {
        let outputs = self.node_mut(node)?.outputs_mut();
        outputs.push(OutputLink::new(name));
        Ok(outputs.len() - 1)
    }

    /// Disconnect and delete an input link.
    ///
    /// Later inputs shift down by one; every output feeding them is
    /// rewritten to the new index.
    pub fn remove_input_link(&mut self, node: NodeId, index: usize) -> Result<()> {
        let input = InputRef::new(node, index);
        self.disconnect_input(input)?;
        self.nodes[node].inputs_mut().remove(index);

        let shifted: Vec<(usize, Vec<OutputRef>)> = self.nodes[node]
            .inputs()
            .iter()
            .enumerate()
            .skip(index)
            .map(|(i, link)| (i, link.peers().to_vec()))
            .collect();
        for (new_index, peers) in shifted {
            let from = InputRef::new(node, new_index + 1);
            let to = InputRef::new(node, new_index);
            for out in peers {
                if let Some(link) = self
                    .nodes
                    .get_mut(out.node)
                    .and_then(|n| n.outputs_mut().get_mut(out.index))
                {
                    link.replace_peer(from, to);
                }
            }
        }
        Ok(())
    }

    /// Disconnect and delete an output link.
    ///
    /// Later outputs shift down by one; every input they feed is rewritten
    /// to the new index.
    pub fn remove_output_link(&mut self, node: NodeId, index: usize) -> Result<()> {
        let out = OutputRef::new(node, index);
        self.disconnect_output(out)?;
        self.nodes[node].outputs_mut().remove(index);

        let shifted: Vec<(usize, Vec<InputRef>)> = self.nodes[node]
            .outputs()
            .iter()
            .enumerate()
            .skip(index)
            .map(|(i, link)| (i, link.peers().to_vec()))
            .collect();
        for (new_index, peers) in shifted {
            let from = OutputRef::new(node, new_index + 1);
            let to = OutputRef::new(node, new_index);
            for input in peers {
                if let Some(link) = self
                    .nodes
                    .get_mut(input.node)
                    .and_then(|n| n.inputs_mut().get_mut(input.index))
                {
                    link.replace_peer(from, to);
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Value links
    // ------------------------------------------------------------------

    /// Bind `value` to the `link`-th value link of `reader`.
    ///
    /// Binding to a scalar link replaces its previous value node. Returns
    /// `Ok(false)` if `value` was already bound there.
    pub fn connect_value(&mut self, reader: NodeId, link: usize, value: NodeId) -> Result<bool> {
        let slot = self
            .node(value)?
            .slot()
            .ok_or(DirectorError::NotAValueNode(value))?;
        let node = self.node(reader)?;
        let value_link = node.values().get(link).ok_or_else(|| {
            index_error("value", link, node.values().len())
        })?;

        if value_link.type_checking() && !slot.can_be_type(value_link.data_type()) {
            return Err(DirectorError::IncompatibleTypes {
                expected: value_link.data_type(),
                found: slot.data_type(),
            });
        }
        let accepted = match node.behavior.as_ref() {
            Some(behavior) => behavior.can_connect_value(value_link, slot),
            None => true,
        };
        if !accepted {
            return Err(DirectorError::ConnectionRejected {
                node: reader,
                link: value_link.name().to_string(),
                value,
            });
        }

        let (bound, replaced) = self.nodes[reader].values_mut()[link].bind(value);
        if !bound {
            return Ok(false);
        }
        let dependent = Dependent::new(reader, link);
        if let Some(old) = replaced.and_then(|n| self.nodes.get_mut(n)) {
            if let Some(slot) = old.slot_mut() {
                slot.remove_dependent(dependent);
            }
        }
        if let Some(slot) = self.nodes[value].slot_mut() {
            slot.add_dependent(dependent);
        }
        Ok(true)
    }

    /// Unbind `value`, or every value node when `None`, from the `link`-th
    /// value link of `reader`.
    pub fn disconnect_value(
        &mut self,
        reader: NodeId,
        link: usize,
        value: Option<NodeId>,
    ) -> Result<bool> {
        let node = self.node_mut(reader)?;
        let count = node.values().len();
        let removed = node
            .values_mut()
            .get_mut(link)
            .ok_or_else(|| index_error("value", link, count))?
            .unbind(value);

        let dependent = Dependent::new(reader, link);
        for value in &removed {
            if let Some(slot) = self.nodes.get_mut(*value).and_then(|n| n.slot_mut()) {
                slot.remove_dependent(dependent);
            }
        }
        Ok(!removed.is_empty())
    }

    /// Remove every connection of a node: activation links in both
    /// directions, its own value links, and the value links other nodes
    /// have bound to it.
    pub fn disconnect_node(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        let inputs = node.inputs().len();
        let outputs = node.outputs().len();
        let values = node.values().len();
        let readers: Vec<Dependent> = node
            .slot()
            .map(|s| s.dependents().to_vec())
            .unwrap_or_default();

        let mut changed = false;
        for index in 0..inputs {
            changed |= self.disconnect_input(InputRef::new(id, index))?;
        }
        for index in 0..outputs {
            changed |= self.disconnect_output(OutputRef::new(id, index))?;
        }
        for index in 0..values {
            changed |= self.disconnect_value(id, index, None)?;
        }
        for reader in readers {
            if self.contains_node(reader.node) {
                changed |= self.disconnect_value(reader.node, reader.link, Some(id))?;
            }
        }
        Ok(changed)
    }
}

fn index_error(kind: &str, index: usize, count: usize) -> DirectorError {
    DirectorError::IndexOutOfRange {
        link: format!("{kind} link"),
        index,
        count,
    }
}
