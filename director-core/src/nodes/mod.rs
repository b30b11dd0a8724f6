//! Standard Node Catalog
//!
//! A small set of node kinds covering each capability combination:
//!
//! - [`value`]: typed value nodes (`Boolean`, `Int`, `Float`, ...).
//! - [`mutator`]: value nodes computed from other values (`And`, `Or`,
//!   `Is Not`, `Add`).
//! - [`event`]: nodes that start control flow (`Start Event`,
//!   `Remote Event`, `Value Changed Event`).
//! - [`action`]: one-shot actions (`Increment`, `Set Value`, `Toggle`,
//!   `Compare Bool`, `Log Message`).
//! - [`latent`]: actions that span several ticks (`Delay`, `Loop`).
//!
//! Hosts add their own kinds next to these with
//! [`NodeRegistry::register`].

pub mod action;
pub mod event;
pub mod latent;
pub mod mutator;
pub mod value;

use crate::kind::NodeRegistry;

/// Kind name of remote event nodes, fired by name from the host.
pub const REMOTE_EVENT: &str = "Remote Event";

/// Property holding a remote event's name.
pub const EVENT_NAME: &str = "EventName";

/// Register every kind of the catalog.
pub fn register_builtins(registry: &mut NodeRegistry) {
    value::register(registry);
    mutator::register(registry);
    event::register(registry);
    action::register(registry);
    latent::register(registry);
}
