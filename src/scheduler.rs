//! Drives an [`Engine`] one generation per tick.
//!
//! The host calls [`Driver::tick`] from a single fixed-timestep system, so at
//! most one step is ever in flight. A stop request only sets a flag: it is seen
//! at the start of the next tick, never in the middle of a step.

use bevy::prelude::Resource;

use crate::engine::{Engine, StepResult};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A stop was requested; the engine was not touched.
    Cancelled,
    Stepped(StepResult),
    /// Stepped, and the population has just become stagnant.
    Stagnated(StepResult),
}

#[derive(Resource, Debug, Default)]
pub struct Driver {
    halt_on_stagnation: bool,
    stop_requested: bool,
    ticks: u64,
}

impl Driver {
    pub fn new(halt_on_stagnation: bool) -> Self {
        Self {
            halt_on_stagnation,
            ..Default::default()
        }
    }

    /// Clears any pending stop request.
    pub fn start(&mut self) {
        self.stop_requested = false;
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Number of steps this driver has performed.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, engine: &mut Engine) -> Tick {
        if self.stop_requested {
            return Tick::Cancelled;
        }

        let was_stagnant = engine.is_stagnant();
        let result = engine.step();
        self.ticks += 1;
        // only the move into stagnation halts, so a run restarted on a
        // stagnant board keeps going
        if self.halt_on_stagnation && !was_stagnant && engine.is_stagnant() {
            self.stop_requested = true;
            Tick::Stagnated(result)
        } else {
            Tick::Stepped(result)
        }
    }
}
