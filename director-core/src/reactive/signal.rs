//! Value Slots
//!
//! The slot is the state a value node carries on top of an ordinary node:
//! the current value, the initial value restored when the script starts,
//! and the set of dependents to notify when the value changes.
//!
//! # How Writes Propagate
//!
//! The slot itself only stores. Writing through the runtime
//! (`Runtime::write_value`) stores into the slot and then walks
//! [`dependents`](ValueSlot::dependents), calling each reader's
//! `on_link_value_changed` hook synchronously.

use smallvec::SmallVec;

use super::subscriber::Dependent;
use super::value::{DataType, Value};
use crate::error::Result;

/// The value held by a value node.
#[derive(Debug, Clone)]
pub struct ValueSlot {
    data_type: DataType,
    value: Value,
    initial: Value,
    /// Shares its value with same-named global slots.
    global: bool,
    dependents: SmallVec<[Dependent; 4]>,
}

impl ValueSlot {
    /// Create a slot holding `initial`, typed after it.
    pub fn new(initial: Value) -> Self {
        Self::typed(initial.data_type(), initial)
    }

    /// Create a slot of an explicit type.
    ///
    /// An `Any` slot keeps whatever type is written into it.
    pub fn typed(data_type: DataType, initial: Value) -> Self {
        Self {
            data_type,
            value: initial.clone(),
            initial,
            global: false,
            dependents: SmallVec::new(),
        }
    }

    /// Declared type of the slot.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Check if this slot may be read through a link of `link_type`.
    pub fn can_be_type(&self, link_type: DataType) -> bool {
        self.data_type.can_connect_to(link_type)
    }

    /// Current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Store a value, coerced to the slot type.
    ///
    /// Returns whether the stored value changed.
    pub fn set(&mut self, value: Value) -> Result<bool> {
        let value = value.coerce(self.data_type)?;
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    /// Value restored when the script starts.
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// Replace the initial value, coerced to the slot type.
    pub fn set_initial(&mut self, value: Value) -> Result<()> {
        self.initial = value.coerce(self.data_type)?;
        Ok(())
    }

    /// Restore the initial value. Returns whether the value changed.
    pub fn reset(&mut self) -> bool {
        if self.value == self.initial {
            return false;
        }
        self.value = self.initial.clone();
        true
    }

    /// Whether the slot is shared with same-named global slots.
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Mark the slot as global.
    pub fn set_global(&mut self, global: bool) {
        self.global = global;
    }

    /// Readers to notify on change, in binding order.
    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    pub(crate) fn add_dependent(&mut self, dependent: Dependent) {
        if !self.dependents.contains(&dependent) {
            self.dependents.push(dependent);
        }
    }

    pub(crate) fn remove_dependent(&mut self, dependent: Dependent) {
        self.dependents.retain(|d| *d != dependent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use slotmap::SlotMap;

    #[test]
    fn set_reports_change() {
        let mut slot = ValueSlot::new(Value::Int(0));
        assert!(slot.set(Value::Int(3)).unwrap());
        assert!(!slot.set(Value::Int(3)).unwrap());
        assert_eq!(slot.value(), &Value::Int(3));
    }

    #[test]
    fn set_coerces_numeric_values() {
        let mut slot = ValueSlot::new(Value::Float(0.0));
        slot.set(Value::Int(2)).unwrap();
        assert_eq!(slot.value(), &Value::Float(2.0));
        assert!(slot.set(Value::String("x".into())).is_err());
    }

    #[test]
    fn reset_restores_initial() {
        let mut slot = ValueSlot::new(Value::Bool(false));
        slot.set_initial(Value::Bool(true)).unwrap();
        assert!(slot.reset());
        assert_eq!(slot.value(), &Value::Bool(true));
        assert!(!slot.reset());
    }

    #[test]
    fn any_slot_accepts_every_type() {
        let mut slot = ValueSlot::typed(DataType::Any, Value::Int(0));
        slot.set(Value::String("text".into())).unwrap();
        assert_eq!(slot.value(), &Value::String("text".into()));
        assert!(slot.can_be_type(DataType::Vec3));
    }

    #[test]
    fn dependents_are_unique() {
        let mut arena: SlotMap<NodeId, ()> = SlotMap::with_key();
        let reader = arena.insert(());
        let mut slot = ValueSlot::new(Value::Int(0));

        slot.add_dependent(Dependent::new(reader, 0));
        slot.add_dependent(Dependent::new(reader, 0));
        slot.add_dependent(Dependent::new(reader, 1));
        assert_eq!(slot.dependents().len(), 2);

        slot.remove_dependent(Dependent::new(reader, 0));
        assert_eq!(slot.dependents(), &[Dependent::new(reader, 1)]);
    }
}
