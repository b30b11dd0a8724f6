//! Latent actions.
//!
//! These stay in the director's active set across ticks by returning true
//! from `update`. Their only state is the elapsed time they keep in the
//! behaviour itself; stopping one is removing it from the active set.
//!
//! A latent node triggered again while active is updated twice in one tick,
//! so elapsed time is counted at most once per tick.

use crate::director::NodeContext;
use crate::error::Result;
use crate::kind::{NodeBehavior, NodeBuilder, NodeKind, NodeRegistry, OUT};
use crate::property::PropertyDef;

const START: usize = 0;
const STOP: usize = 1;

/// Simulated time since the last restart.
#[derive(Debug, Default)]
struct Timer {
    elapsed: f32,
    counted: u64,
}

impl Timer {
    fn restart(&mut self, ctx: &NodeContext<'_>) {
        self.elapsed = 0.0;
        self.counted = ctx.tick();
    }

    /// Add this tick's time. Returns false if it was already added.
    fn advance(&mut self, ctx: &NodeContext<'_>) -> bool {
        if self.counted == ctx.tick() {
            return false;
        }
        self.counted = ctx.tick();
        self.elapsed += ctx.sim_delta();
        true
    }
}

/// Waits `Time` simulated seconds, then fires `Out`.
///
/// Triggering `Start` again while waiting restarts the wait. `Stop` cancels
/// it and fires `Stopped` instead.
#[derive(Debug, Default)]
pub struct Delay {
    timer: Timer,
}

impl NodeBehavior for Delay {
    fn build(&self, node: &mut NodeBuilder) {
        node.input("Start").input("Stop").output(OUT).output("Stopped");
        node.value_link(
            PropertyDef::new("Time", 1.0f32).describe("Seconds to wait before firing Out."),
        );
        node.latent();
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        input: Option<usize>,
        first_update: bool,
    ) -> Result<bool> {
        let time = ctx.get_float("Time", 0)?;
        match input {
            Some(STOP) => {
                ctx.activate_output("Stopped");
                Ok(false)
            }
            Some(START) => {
                self.timer.restart(ctx);
                Ok(time > 0.0)
            }
            _ if first_update => {
                self.timer.restart(ctx);
                Ok(time > 0.0)
            }
            _ => {
                self.timer.advance(ctx);
                Ok(self.timer.elapsed < time)
            }
        }
    }
}

/// Fires `Cycle` every `Time` simulated seconds until stopped.
#[derive(Debug, Default)]
pub struct Loop {
    timer: Timer,
}

impl NodeBehavior for Loop {
    fn build(&self, node: &mut NodeBuilder) {
        node.input("Start").input("Stop").output("Cycle").output("Stopped");
        node.value_link(PropertyDef::new("Time", 1.0f32));
        node.latent();
    }

    fn update(
        &mut self,
        ctx: &mut NodeContext<'_>,
        input: Option<usize>,
        first_update: bool,
    ) -> Result<bool> {
        if input == Some(STOP) {
            ctx.activate_output("Stopped");
            return Ok(false);
        }
        if first_update || input == Some(START) {
            self.timer.restart(ctx);
            return Ok(true);
        }
        if !self.timer.advance(ctx) {
            return Ok(true);
        }

        let time = ctx.get_float("Time", 0)?;
        if time <= 0.0 {
            ctx.activate_output("Cycle");
            return Ok(true);
        }
        while self.timer.elapsed >= time {
            self.timer.elapsed -= time;
            ctx.activate_output("Cycle");
        }
        Ok(true)
    }
}

pub(super) fn register(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("Delay", "General", || Box::new(Delay::default()))
            .describe("Performs a time delay."),
    );
    registry.register(
        NodeKind::new("Loop", "General", || Box::new(Loop::default())).describe(
            "Continually fires its 'Cycle' output after a given time period while active.",
        ),
    );
}
