//! Node Kind Registry
//!
//! Maps node kind names to factories. A registry is built once, wrapped in
//! an `Arc` and injected into every director that needs it; there is no
//! process-wide instance.

use std::fmt;

use indexmap::IndexMap;

use super::NodeBehavior;
use crate::error::{DirectorError, Result};

/// Creates a fresh behaviour for a new node.
pub type NodeFactory = Box<dyn Fn() -> Box<dyn NodeBehavior> + Send + Sync>;

/// A registered node kind.
pub struct NodeKind {
    name: String,
    category: String,
    description: String,
    factory: NodeFactory,
}

impl NodeKind {
    /// Describe a node kind.
    pub fn new<F>(name: impl Into<String>, category: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn NodeBehavior> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            category: category.into(),
            description: String::new(),
            factory: Box::new(factory),
        }
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Name the kind is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category used to group kinds in editors.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// What nodes of this kind do.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `category::name`, used in log messages.
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.category, self.name)
    }

    /// Instantiate a new behaviour.
    pub fn create(&self) -> Box<dyn NodeBehavior> {
        (self.factory)()
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeKind")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

/// The set of node kinds a director can instantiate.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    kinds: IndexMap<String, NodeKind>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard node catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::nodes::register_builtins(&mut registry);
        registry
    }

    /// Register a node kind.
    ///
    /// Returns false if a kind with the same name was replaced.
    pub fn register(&mut self, kind: NodeKind) -> bool {
        let name = kind.name.clone();
        let replaced = self.kinds.insert(name.clone(), kind).is_some();
        if replaced {
            tracing::warn!(kind = %name, "node kind registered twice; keeping the latest");
        }
        !replaced
    }

    /// Look up a node kind.
    pub fn kind(&self, name: &str) -> Result<&NodeKind> {
        self.kinds
            .get(name)
            .ok_or_else(|| DirectorError::UnknownNodeKind(name.to_string()))
    }

    /// Check if a kind is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Iterate over registered kinds in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeKind> {
        self.kinds.values()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
