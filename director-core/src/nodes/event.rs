//! Event nodes: where control flow enters a script.

use super::EVENT_NAME;
use crate::director::NodeContext;
use crate::error::Result;
use crate::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry, OUT};
use crate::property::PropertyDef;
use crate::reactive::DataType;

/// Fires `Out` when the script starts.
#[derive(Debug, Default)]
pub struct StartEvent;

impl NodeBehavior for StartEvent {
    fn build(&self, node: &mut NodeBuilder) {
        node.event().output(OUT);
    }

    fn on_start(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        ctx.activate_output(OUT);
        Ok(())
    }
}

/// Fires `Out` when the host fires a remote event of the same name.
#[derive(Debug, Default)]
pub struct RemoteEvent;

impl NodeBehavior for RemoteEvent {
    fn build(&self, node: &mut NodeBuilder) {
        node.event().output(OUT);
        node.property(
            PropertyDef::typed(EVENT_NAME, DataType::String)
                .describe("Name the host fires this event by."),
        );
    }
}

/// Fires `Changed` whenever the value bound to `Value` is written.
#[derive(Debug, Default)]
pub struct ValueChangedEvent;

impl NodeBehavior for ValueChangedEvent {
    fn build(&self, node: &mut NodeBuilder) {
        node.output("Changed");
        node.value_link(PropertyDef::typed("Value", DataType::Any))
            .untyped()
            .required();
    }

    fn on_link_value_changed(&mut self, ctx: &mut NodeContext<'_>, link: &str) -> Result<()> {
        if link == "Value" {
            ctx.activate_output("Changed");
        }
        Ok(())
    }
}

pub(super) fn register(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("Start Event", "General", || Box::new(StartEvent))
            .describe("An event that is triggered immediately when the script is first updated."),
    );
    registry.register(
        NodeKind::new(super::REMOTE_EVENT, "Core", || Box::new(RemoteEvent))
            .describe("A remote event."),
    );
    registry.register(
        NodeKind::new("Value Changed Event", "General", || Box::new(ValueChangedEvent))
            .describe("An event fired whenever its value is written."),
    );
}
