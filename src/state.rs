use bevy::prelude::*;

#[derive(States, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimState {
    /// Building the board.
    #[default]
    Load,
    /// Accepting edits; generations only advance on a single step.
    Paused,
    /// The driver steps the engine on every fixed tick.
    Running,
}
