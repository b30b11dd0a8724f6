//! Dataflow Layer
//!
//! Alongside activation links, nodes exchange typed values. This module
//! holds the pieces of that layer.
//!
//! # Concepts
//!
//! ## Values
//!
//! A [`Value`] is a tagged variant with one arm per [`DataType`]. Typed
//! accessors fail with a type mismatch instead of defaulting.
//!
//! ## Value Links
//!
//! A [`ValueLink`] redirects one of a node's properties to one or more
//! value nodes. Unbound, the node reads its own property.
//!
//! ## Value Slots
//!
//! A value node carries a [`ValueSlot`]: the value, its initial value and
//! the [`Dependent`]s reading it.
//!
//! # Propagation
//!
//! Writes are pushed: storing a value synchronously calls
//! `on_link_value_changed` on every dependent, and a dependent that
//! recomputes its own value pushes further, depth first. Reads are pulled:
//! reading a value node first calls its `on_value_retrieved` hook so it
//! can recompute lazily.
//!
//! Pushes are not queued, so a [`PropagationGuard`] cuts cycles and overly
//! deep chains. Pulls cannot loop: a node's hooks never run re-entrantly,
//! so a read cycle simply returns the value currently stored.

mod context;
mod runtime;
mod signal;
mod subscriber;
mod value;
mod value_link;

pub use context::PropagationGuard;
pub use signal::ValueSlot;
pub use subscriber::Dependent;
pub use value::{DataType, Value};
pub use value_link::{LinkTarget, ValueLink};
