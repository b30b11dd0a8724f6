//! Director configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Safety bounds and logging switches of a [`Director`](crate::Director).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Activations delivered per tick before the rest of the queue is
    /// dropped.
    pub max_activations_per_tick: usize,
    /// Nesting limit for synchronous value-change notifications.
    pub max_propagation_depth: usize,
    /// Log executions of nodes whose `LogNode` property is set.
    pub node_logging: bool,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            max_activations_per_tick: 10_000,
            max_propagation_depth: 64,
            node_logging: false,
        }
    }
}

impl DirectorConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
