//! Director Core
//!
//! This crate provides a tick-driven node graph engine for scripting the
//! behaviour of a running simulation: triggers, conditions, timed actions
//! and computed values. It implements:
//!
//! - Activation links and a breadth-first, non-recursive activation queue
//! - Latent nodes that stay active across ticks
//! - A dataflow layer of typed values with push and pull propagation
//! - Hierarchical graphs stored in generational arenas
//! - JSON and MessagePack persistence
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: nodes, links, graphs and the script arena
//! - `reactive`: values, value links and value propagation
//! - `kind`: the node kind plugin contract and the registry
//! - `director`: the scheduler and the context handed to nodes
//! - `nodes`: a standard catalog of node kinds
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use director_core::{Director, DirectorConfig, NodeRegistry, Value};
//!
//! let registry = Arc::new(NodeRegistry::with_builtins());
//! let mut director = Director::new(registry, DirectorConfig::default());
//! let root = director.root();
//!
//! let event = director.add_node(root, "Remote Event").unwrap();
//! let increment = director.add_node(root, "Increment").unwrap();
//! let counter = director.add_node(root, "Int").unwrap();
//!
//! director.set_property(event, "EventName", "go").unwrap();
//! director.connect(event, "Out", increment, "In").unwrap();
//! director.connect_value(increment, "Value", counter).unwrap();
//!
//! director.fire_remote_event("go");
//! director.update(1.0 / 60.0, 1.0 / 60.0);
//! assert_eq!(director.value(counter).unwrap(), Value::Int(1));
//! ```

pub mod config;
pub mod director;
pub mod error;
pub mod graph;
pub mod kind;
pub mod nodes;
pub mod property;
pub mod reactive;

pub use config::DirectorConfig;
pub use director::{Director, NodeContext, TickReport};
pub use error::{DirectorError, LinkKind, Result};
pub use graph::{GraphId, NodeId, ScriptRecord};
pub use kind::{Capabilities, NodeBehavior, NodeBuilder, NodeKind, NodeRegistry};
pub use property::PropertyDef;
pub use reactive::{DataType, Value};
