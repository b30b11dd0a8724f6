//! Value Links
//!
//! A value link redirects one of a node's properties to zero or more value
//! nodes. Unbound, reads and writes go to the node's own property (the
//! "exposed" default). Bound, they go to the bound value nodes instead.
//!
//! A scalar link binds at most one value node and always reports one
//! value. An array link (`allow_multiple`) reports one value per bound
//! value node, possibly none.

use smallvec::SmallVec;

use super::value::DataType;
use crate::graph::NodeId;

/// Where a read or write of a link position lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// The node's own property of the same name.
    Local,
    /// The value held by this value node.
    Bound(NodeId),
}

/// A named data port on a node.
#[derive(Debug, Clone)]
pub struct ValueLink {
    /// Name of the property this link redirects.
    name: String,
    data_type: DataType,
    exposed: bool,
    visible: bool,
    is_out: bool,
    allow_multiple: bool,
    type_checking: bool,
    required: bool,
    /// Bound value nodes, in binding order.
    links: SmallVec<[NodeId; 2]>,
}

impl ValueLink {
    /// Create a scalar, exposed, type-checked link for a property.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            exposed: true,
            visible: true,
            is_out: false,
            allow_multiple: false,
            type_checking: true,
            required: false,
            links: SmallVec::new(),
        }
    }

    /// Accept any number of bound value nodes.
    pub fn array(&mut self) -> &mut Self {
        self.allow_multiple = true;
        self
    }

    /// Mark the link as written by its node.
    pub fn output(&mut self) -> &mut Self {
        self.is_out = true;
        self
    }

    /// Require a bound value node before the node may run.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Accept value nodes of any type.
    pub fn untyped(&mut self) -> &mut Self {
        self.type_checking = false;
        self
    }

    /// Hide the link from editors and keep it unexposed.
    pub fn hidden(&mut self) -> &mut Self {
        self.visible = false;
        self.exposed = false;
        self
    }

    /// The property name this link redirects.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether the link is shown as a connectable port.
    pub fn exposed(&self) -> bool {
        self.exposed
    }

    /// Set whether the link is shown as a connectable port.
    pub fn set_exposed(&mut self, exposed: bool) {
        self.exposed = exposed;
    }

    /// Whether editors should draw this link.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the link in editors.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the node writes through this link.
    pub fn is_out(&self) -> bool {
        self.is_out
    }

    /// Whether the link accepts several value nodes.
    pub fn allow_multiple(&self) -> bool {
        self.allow_multiple
    }

    /// Whether binding checks the value node's type.
    pub fn type_checking(&self) -> bool {
        self.type_checking
    }

    /// Whether the node needs a bound value to run.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Bound value nodes in order.
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    /// Whether at least one value node is bound.
    pub fn is_linked(&self) -> bool {
        !self.links.is_empty()
    }

    /// Number of values readable through this link.
    pub fn property_count(&self) -> usize {
        if self.allow_multiple {
            self.links.len()
        } else {
            1
        }
    }

    /// Resolve the `index`-th value position.
    ///
    /// Returns `None` when `index` is past [`property_count`](Self::property_count).
    pub fn target(&self, index: usize) -> Option<LinkTarget> {
        if self.allow_multiple {
            return self.links.get(index).copied().map(LinkTarget::Bound);
        }
        if index != 0 {
            return None;
        }
        Some(match self.links.first() {
            Some(node) => LinkTarget::Bound(*node),
            None => LinkTarget::Local,
        })
    }

    /// Bind a value node.
    ///
    /// A scalar link drops its previous binding, which is returned so the
    /// caller can unregister the reverse edge.
    pub(crate) fn bind(&mut self, value: NodeId) -> (bool, Option<NodeId>) {
        if self.links.contains(&value) {
            return (false, None);
        }
        let replaced = if self.allow_multiple {
            None
        } else {
            self.links.pop()
        };
        self.links.push(value);
        (true, replaced)
    }

    /// Unbind one value node, or all of them when `value` is `None`.
    pub(crate) fn unbind(&mut self, value: Option<NodeId>) -> SmallVec<[NodeId; 2]> {
        match value {
            Some(node) => {
                let before = self.links.len();
                self.links.retain(|n| *n != node);
                if self.links.len() != before {
                    SmallVec::from_elem(node, 1)
                } else {
                    SmallVec::new()
                }
            }
            None => std::mem::take(&mut self.links),
        }
    }
}
