//! Value nodes.
//!
//! A value node only holds a typed value. Its display name doubles as the
//! variable name used by [`Director::find_value_node`](crate::Director::find_value_node)
//! and by global value sharing.

use crate::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry};
use crate::reactive::{DataType, Value};

/// A plain value node of one data type.
#[derive(Debug, Clone, Copy)]
pub struct TypedValue {
    data_type: DataType,
}

impl TypedValue {
    pub fn new(data_type: DataType) -> Self {
        Self { data_type }
    }
}

impl NodeBehavior for TypedValue {
    fn build(&self, node: &mut NodeBuilder) {
        node.value_typed(self.data_type, Value::default_for(self.data_type));
    }
}

pub(super) fn register(registry: &mut NodeRegistry) {
    let kinds = [
        ("Boolean", DataType::Bool, "A boolean value."),
        ("Int", DataType::Int, "An integer value."),
        ("Float", DataType::Float, "A float value."),
        ("Double", DataType::Double, "A double value."),
        ("String", DataType::String, "A string value."),
        ("Vec3", DataType::Vec3, "A three component vector."),
        ("Actor", DataType::ActorId, "An actor id."),
    ];
    for (name, data_type, description) in kinds {
        registry.register(
            NodeKind::new(name, "General", move || Box::new(TypedValue::new(data_type)))
                .describe(description),
        );
    }
}
