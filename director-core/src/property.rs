//! Node Properties
//!
//! The property table is the minimal stand-in for the host's property
//! reflection layer: a node declares named, typed properties while it is
//! built, and value links redirect reads and writes of those properties to
//! bound value nodes. Unlinked properties keep their value here, and this
//! table is what gets persisted for them.

use indexmap::IndexMap;

use crate::error::{DirectorError, Result};
use crate::graph::NodeId;
use crate::reactive::{DataType, Value};

/// Declaration of a single property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Property name, unique within a node.
    pub name: String,
    /// Declared type. Writes are coerced to it.
    pub data_type: DataType,
    /// Value the property starts with.
    pub default: Value,
    /// Human readable description for editors.
    pub description: String,
}

impl PropertyDef {
    /// Declare a property whose type is taken from its default value.
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        let default = default.into();
        Self {
            name: name.into(),
            data_type: default.data_type(),
            default,
            description: String::new(),
        }
    }

    /// Declare a property of an explicit type, starting at that type's zero.
    pub fn typed(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default: Value::default_for(data_type),
            description: String::new(),
        }
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone)]
struct Property {
    def: PropertyDef,
    value: Value,
}

/// Ordered table of a node's properties and their local values.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    entries: IndexMap<String, Property>,
}

impl PropertyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property. Re-declaring a name replaces the earlier entry.
    pub fn declare(&mut self, def: PropertyDef) {
        let value = def.default.clone();
        self.entries.insert(def.name.clone(), Property { def, value });
    }

    /// Check if a property with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get a property's declaration.
    pub fn def(&self, name: &str) -> Option<&PropertyDef> {
        self.entries.get(name).map(|p| &p.def)
    }

    /// Get a property's current local value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|p| &p.value)
    }

    /// Set a property's local value, coercing it to the declared type.
    ///
    /// `owner` is only used to label the error.
    pub fn set(&mut self, owner: NodeId, name: &str, value: Value) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| DirectorError::UnknownProperty {
                node: owner,
                name: name.to_string(),
            })?;
        entry.value = value.coerce(entry.def.data_type)?;
        Ok(())
    }

    /// Restore a property to its declared default.
    pub fn reset(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.value = entry.def.default.clone();
        }
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, p)| (name.as_str(), &p.value))
    }

    /// Iterate over the declarations in order.
    pub fn defs(&self) -> impl Iterator<Item = &PropertyDef> {
        self.entries.values().map(|p| &p.def)
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
