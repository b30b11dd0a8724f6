//! One-shot actions.
//!
//! Each action does its work in a single update and returns false. Unless
//! it picked an output itself the director then fires `Out`.

use crate::director::NodeContext;
use crate::error::Result;
use crate::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry, OUT};
use crate::property::PropertyDef;
use crate::reactive::{DataType, Value};

const IN: &str = "In";

/// Adds `Amount` to every value bound to `Value`.
#[derive(Debug, Default)]
pub struct Increment;

impl NodeBehavior for Increment {
    fn build(&self, node: &mut NodeBuilder) {
        node.input(IN).output(OUT);
        node.value_link(PropertyDef::typed("Value", DataType::Any))
            .array()
            .output()
            .untyped()
            .required();
        node.value_link(PropertyDef::new("Amount", 1));
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        _input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        let amount = ctx.get("Amount", 0)?;
        for index in 0..ctx.property_count("Value") {
            let current = ctx.get("Value", index)?;
            ctx.set("Value", index, current.add(&amount)?)?;
        }
        Ok(false)
    }
}

/// Copies `Source` into every value bound to `Dest`.
#[derive(Debug, Default)]
pub struct SetValue;

impl NodeBehavior for SetValue {
    fn build(&self, node: &mut NodeBuilder) {
        node.input(IN).output(OUT);
        node.value_link(PropertyDef::typed("Source", DataType::Any))
            .untyped()
            .required();
        node.value_link(PropertyDef::typed("Dest", DataType::Any))
            .array()
            .output()
            .untyped();
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        _input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        let value = ctx.get("Source", 0)?;
        ctx.set_all("Dest", value)?;
        Ok(false)
    }
}

/// Sets, clears or flips the bools bound to `Value`.
#[derive(Debug, Default)]
pub struct Toggle;

impl Toggle {
    const SET: usize = 0;
    const RESET: usize = 1;
}

impl NodeBehavior for Toggle {
    fn build(&self, node: &mut NodeBuilder) {
        node.input("Set").input("Reset").input("Toggle").output(OUT);
        node.value_link(PropertyDef::new("Value", false)).array().output();
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        for index in 0..ctx.property_count("Value") {
            let next = match input {
                Some(Self::SET) => true,
                Some(Self::RESET) => false,
                _ => !ctx.get_bool("Value", index)?,
            };
            ctx.set("Value", index, Value::Bool(next))?;
        }
        Ok(false)
    }
}

/// Fires `A == B` or `A != B`.
#[derive(Debug, Default)]
pub struct CompareBool;

impl NodeBehavior for CompareBool {
    fn build(&self, node: &mut NodeBuilder) {
        node.input(IN).output("A == B").output("A != B");
        node.value_link(PropertyDef::new("A", false));
        node.value_link(PropertyDef::new("B", false));
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        _input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        let a = ctx.get_bool("A", 0)?;
        let b = ctx.get_bool("B", 0)?;
        ctx.activate_output(if a == b { "A == B" } else { "A != B" });
        Ok(false)
    }
}

/// Writes `Message` to the log.
#[derive(Debug, Default)]
pub struct LogMessage;

impl NodeBehavior for LogMessage {
    fn build(&self, node: &mut NodeBuilder) {
        node.input(IN).output(OUT);
        node.value_link(PropertyDef::typed("Message", DataType::Any)).untyped();
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        _input: Option<usize>,
        _first_update: bool,
    ) -> Result<bool> {
        let message = ctx.get("Message", 0)?;
        tracing::info!(node = ?ctx.node(), %message, "log message");
        Ok(false)
    }
}

pub(super) fn register(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("Increment", "General", || Box::new(Increment))
            .describe("Adds an amount to one or more values."),
    );
    registry.register(
        NodeKind::new("Set Value", "General", || Box::new(SetValue))
            .describe("Copies the value of the Source value into the Destination value."),
    );
    registry.register(
        NodeKind::new("Toggle", "General", || Box::new(Toggle)).describe("Sets a boolean value."),
    );
    registry.register(
        NodeKind::new("Compare Bool", "General", || Box::new(CompareBool))
            .describe("Compares two bool values A and B."),
    );
    registry.register(
        NodeKind::new("Log Message", "General", || Box::new(LogMessage))
            .describe("Writes out a message to the log."),
    );
}
