//! Persisted Scripts
//!
//! A script is saved as a tree of graph records holding node records.
//! Node ids are not stable across runs, so each node record carries a
//! record-local integer id and edges name their far end by that id plus a
//! link name.
//!
//! Two encodings are provided: JSON for hand-edited and diffable files and
//! MessagePack (named fields) for compact storage.
//!
//! Each node record also lists the node's activation links in order, so
//! links added or removed after the node was created survive a reload.
//! Records without the lists get the links their kind builds.
//!
//! Loading is all-or-nothing. A record that names an unknown node kind, an
//! unknown link or a node id that does not exist fails with
//! [`DirectorError::Structural`] and nothing is built.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::id::{GraphId, InputRef, NodeId, OutputRef};
use super::link::{InputLink, OutputLink};
use super::script::Script;
use crate::error::{DirectorError, Result};
use crate::kind::NodeRegistry;
use crate::reactive::Value;

/// A whole script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    /// Name of the root graph.
    pub name: String,
    /// The root graph.
    pub root: GraphRecord,
}

/// One graph and everything below it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphRecord {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "true_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub graphs: Vec<GraphRecord>,
}

fn true_by_default() -> bool {
    true
}

/// One node: its kind, local properties, value and outgoing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Record-local id referenced by edges.
    pub id: u32,
    /// Registered node kind name.
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// Local values of every property, linked or not.
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    /// Current value, for value nodes.
    #[serde(default)]
    pub value: Option<Value>,
    /// Initial value, for value nodes.
    #[serde(default)]
    pub initial_value: Option<Value>,
    #[serde(default)]
    pub global: bool,
    /// Input links in order; `None` keeps the kind's own.
    #[serde(default)]
    pub input_links: Option<Vec<LinkRecord>>,
    /// Output links in order; `None` keeps the kind's own.
    #[serde(default)]
    pub output_links: Option<Vec<LinkRecord>>,
    /// Activation edges leaving this node.
    #[serde(default)]
    pub outputs: Vec<OutputEdges>,
    /// Value nodes bound to this node's value links.
    #[serde(default)]
    pub values: Vec<ValueEdges>,
}

/// An activation link's name and editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    #[serde(default = "true_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub comment: String,
}

impl LinkRecord {
    fn input(&self) -> InputLink {
        let mut link = InputLink::new(self.name.clone());
        link.set_visible(self.visible);
        link.set_comment(self.comment.clone());
        link
    }

    fn output(&self) -> OutputLink {
        let mut link = OutputLink::new(self.name.clone());
        link.set_visible(self.visible);
        link.set_comment(self.comment.clone());
        link
    }
}

/// The inputs fed by one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEdges {
    pub output: String,
    pub targets: Vec<EdgeTarget>,
}

/// The far end of an activation edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTarget {
    pub node: u32,
    pub input: String,
}

/// The value nodes bound to one value link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEdges {
    pub link: String,
    #[serde(default)]
    pub exposed: bool,
    #[serde(default)]
    pub nodes: Vec<u32>,
}

impl ScriptRecord {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as MessagePack with named fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decode from MessagePack.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

fn structural(message: impl Into<String>) -> DirectorError {
    DirectorError::Structural(message.into())
}

impl Script {
    /// Capture the script as a record.
    pub fn to_record(&self) -> ScriptRecord {
        let ids: HashMap<NodeId, u32> = self
            .node_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as u32))
            .collect();
        let root = self.graph_record(self.root(), &ids);
        ScriptRecord {
            name: root.name.clone(),
            root,
        }
    }

    fn graph_record(&self, id: GraphId, ids: &HashMap<NodeId, u32>) -> GraphRecord {
        let Ok(graph) = self.graph(id) else {
            return GraphRecord::default();
        };
        GraphRecord {
            name: graph.name().to_string(),
            comment: graph.comment().to_string(),
            enabled: graph.enabled(),
            nodes: graph
                .nodes()
                .iter()
                .filter_map(|n| self.node_record(*n, ids))
                .collect(),
            graphs: graph
                .graphs()
                .iter()
                .map(|g| self.graph_record(*g, ids))
                .collect(),
        }
    }

    fn node_record(&self, id: NodeId, ids: &HashMap<NodeId, u32>) -> Option<NodeRecord> {
        let node = self.node(id).ok()?;
        let outputs = node
            .outputs()
            .iter()
            .filter(|link| !link.peers().is_empty())
            .map(|link| OutputEdges {
                output: link.name().to_string(),
                targets: link
                    .peers()
                    .iter()
                    .filter_map(|peer| {
                        let target = self.node(peer.node).ok()?;
                        Some(EdgeTarget {
                            node: *ids.get(&peer.node)?,
                            input: target.inputs().get(peer.index)?.name().to_string(),
                        })
                    })
                    .collect(),
            })
            .collect();
        let values = node
            .values()
            .iter()
            .filter(|link| link.is_linked())
            .map(|link| ValueEdges {
                link: link.name().to_string(),
                exposed: link.exposed(),
                nodes: link.links().iter().filter_map(|n| ids.get(n).copied()).collect(),
            })
            .collect();

        Some(NodeRecord {
            id: *ids.get(&id)?,
            kind: node.kind().to_string(),
            name: node.name().to_string(),
            properties: node
                .properties()
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            value: node.slot().map(|s| s.value().clone()),
            initial_value: node.slot().map(|s| s.initial().clone()),
            global: node.slot().is_some_and(|s| s.is_global()),
            input_links: Some(
                node.inputs()
                    .iter()
                    .map(|l| LinkRecord {
                        name: l.name().to_string(),
                        visible: l.visible(),
                        comment: l.comment().to_string(),
                    })
                    .collect(),
            ),
            output_links: Some(
                node.outputs()
                    .iter()
                    .map(|l| LinkRecord {
                        name: l.name().to_string(),
                        visible: l.visible(),
                        comment: l.comment().to_string(),
                    })
                    .collect(),
            ),
            outputs,
            values,
        })
    }

    /// Build a script from a record.
    pub fn from_record(registry: &NodeRegistry, record: &ScriptRecord) -> Result<Script> {
        let mut script = Script::new(record.name.clone());
        let root = script.root();
        let mut ids = HashMap::new();

        script.build_graph(registry, root, &record.root, &mut ids)?;
        script.link_graph(&record.root, &ids)?;
        Ok(script)
    }

    fn build_graph(
        &mut self,
        registry: &NodeRegistry,
        id: GraphId,
        record: &GraphRecord,
        ids: &mut HashMap<u32, NodeId>,
    ) -> Result<()> {
        let graph = self.graph_mut(id)?;
        graph.set_name(record.name.clone());
        graph.set_comment(record.comment.clone());
        graph.set_enabled(record.enabled);

        for node_record in &record.nodes {
            let kind = registry
                .kind(&node_record.kind)
                .map_err(|_| structural(format!("unknown node kind `{}`", node_record.kind)))?;
            let node_id = self.insert_node(id, kind)?;
            if ids.insert(node_record.id, node_id).is_some() {
                return Err(structural(format!("duplicate node id {}", node_record.id)));
            }
            self.apply_node_record(node_id, node_record)?;
        }
        for child in &record.graphs {
            let child_id = self.add_graph(id, child.name.clone())?;
            self.build_graph(registry, child_id, child, ids)?;
        }
        Ok(())
    }

    fn apply_node_record(&mut self, id: NodeId, record: &NodeRecord) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_name(record.name.clone());

        if let Some(links) = &record.input_links {
            *node.inputs_mut() = links.iter().map(LinkRecord::input).collect();
            if !links.is_empty() {
                node.mark_triggerable();
            }
        }
        if let Some(links) = &record.output_links {
            *node.outputs_mut() = links.iter().map(LinkRecord::output).collect();
        }

        for (name, value) in &record.properties {
            match node.set_property(name, value.clone()) {
                Ok(()) => {}
                Err(DirectorError::UnknownProperty { .. }) => {
                    tracing::warn!(node = ?id, kind = %record.kind, property = %name, "ignoring unknown property");
                }
                Err(err) => {
                    return Err(structural(format!(
                        "property `{name}` of node {}: {err}",
                        record.id
                    )))
                }
            }
        }

        let has_value = record.value.is_some() || record.initial_value.is_some();
        let Some(slot) = node.slot_mut() else {
            if has_value {
                return Err(structural(format!(
                    "node {} of kind `{}` holds no value",
                    record.id, record.kind
                )));
            }
            return Ok(());
        };
        let invalid = |err: DirectorError| structural(format!("value of node {}: {err}", record.id));
        if let Some(initial) = &record.initial_value {
            slot.set_initial(initial.clone()).map_err(invalid)?;
        }
        if let Some(value) = &record.value {
            slot.set(value.clone()).map_err(invalid)?;
        }
        slot.set_global(record.global);
        Ok(())
    }

    fn link_graph(&mut self, record: &GraphRecord, ids: &HashMap<u32, NodeId>) -> Result<()> {
        let resolve = |id: u32| {
            ids.get(&id)
                .copied()
                .ok_or_else(|| structural(format!("edge references missing node {id}")))
        };

        for node_record in &record.nodes {
            let source = resolve(node_record.id)?;
            for edges in &node_record.outputs {
                let output = self
                    .node(source)?
                    .output_index(&edges.output)
                    .map_err(|err| structural(err.to_string()))?;
                for target in &edges.targets {
                    let target_id = resolve(target.node)?;
                    let input = self
                        .node(target_id)?
                        .input_index(&target.input)
                        .map_err(|err| structural(err.to_string()))?;
                    self.connect(OutputRef::new(source, output), InputRef::new(target_id, input))?;
                }
            }
            for edges in &node_record.values {
                let link = self
                    .node(source)?
                    .value_link_index(&edges.link)
                    .map_err(|err| structural(err.to_string()))?;
                for value in &edges.nodes {
                    let value_id = resolve(*value)?;
                    self.connect_value(source, link, value_id)
                        .map_err(|err| structural(err.to_string()))?;
                }
                self.node_mut(source)?.values_mut()[link].set_exposed(edges.exposed);
            }
        }
        for child in &record.graphs {
            self.link_graph(child, ids)?;
        }
        Ok(())
    }
}
