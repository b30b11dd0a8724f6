//! Mutator nodes.
//!
//! A mutator is a value node whose value is derived from the values bound
//! to its own links. `And`, `Or` and `Is Not` recompute eagerly whenever
//! one of their inputs changes, so readers always see a current result.
//! `Add` recomputes lazily, right before it is read.
//!
//! Every mutator recomputes its whole result on each notification.

use crate::director::NodeContext;
use crate::error::Result;
use crate::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry};
use crate::property::PropertyDef;
use crate::reactive::{DataType, Value};

const VALUES: &str = "Values";

/// Which boolean reduction a [`Reduce`] node computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// True iff every input is true; true with no inputs.
    All,
    /// True iff at least one input is true; false with no inputs.
    Any,
}

/// Boolean reduction over the array link `Values`.
#[derive(Debug, Clone, Copy)]
pub struct Reduce {
    reduction: Reduction,
}

impl Reduce {
    pub fn new(reduction: Reduction) -> Self {
        Self { reduction }
    }

    fn recompute(&self, ctx: &mut NodeContext<'_>) -> Result<()> {
        let count = ctx.property_count(VALUES);
        let mut result = match self.reduction {
            Reduction::All => true,
            Reduction::Any => false,
        };
        for index in 0..count {
            let input = ctx.get_bool(VALUES, index)?;
            match self.reduction {
                Reduction::All if !input => {
                    result = false;
                    break;
                }
                Reduction::Any if input => {
                    result = true;
                    break;
                }
                _ => {}
            }
        }
        ctx.set_value(Value::Bool(result))?;
        Ok(())
    }
}

impl NodeBehavior for Reduce {
    fn build(&self, node: &mut NodeBuilder) {
        node.value_link(PropertyDef::typed(VALUES, DataType::Bool)).array();
        node.value(Value::Bool(self.reduction == Reduction::All));
    }

    fn on_start(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        self.recompute(ctx)
    }

    fn on_link_value_changed(&mut self, ctx: &mut NodeContext<'_>, link: &str) -> Result<()> {
        if link == VALUES {
            self.recompute(ctx)?;
        }
        Ok(())
    }
}

/// The negation of the bool bound to `Value`.
#[derive(Debug, Default)]
pub struct IsNot;

impl IsNot {
    fn recompute(ctx: &mut NodeContext<'_>) -> Result<()> {
        let input = ctx.get_bool("Value", 0)?;
        ctx.set_value(Value::Bool(!input))?;
        Ok(())
    }
}

impl NodeBehavior for IsNot {
    fn build(&self, node: &mut NodeBuilder) {
        node.value_link(PropertyDef::new("Value", false));
        node.value(Value::Bool(true));
    }

    fn on_start(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        Self::recompute(ctx)
    }

    fn on_link_value_changed(&mut self, ctx: &mut NodeContext<'_>, _link: &str) -> Result<()> {
        Self::recompute(ctx)
    }
}

/// `A + B`, computed when read.
#[derive(Debug, Default)]
pub struct Add;

impl NodeBehavior for Add {
    fn build(&self, node: &mut NodeBuilder) {
        node.value_link(PropertyDef::new("A", 0.0f64));
        node.value_link(PropertyDef::new("B", 0.0f64));
        node.value(Value::Double(0.0));
    }

    fn on_value_retrieved(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        let a = ctx.get_double("A", 0)?;
        let b = ctx.get_double("B", 0)?;
        ctx.set_value(Value::Double(a + b))?;
        Ok(())
    }
}

pub(super) fn register(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("And", "Mutator", || Box::new(Reduce::new(Reduction::All)))
            .describe("Tests if all received values are true."),
    );
    registry.register(
        NodeKind::new("Or", "Mutator", || Box::new(Reduce::new(Reduction::Any)))
            .describe("Tests if at least one received value is true."),
    );
    registry.register(
        NodeKind::new("Is Not", "Mutator", || Box::new(IsNot)).describe("Flips the value received."),
    );
    registry.register(
        NodeKind::new("Add", "Mutator", || Box::new(Add)).describe("Performs an addition of two values."),
    );
}
