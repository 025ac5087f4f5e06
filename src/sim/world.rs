/// Game phase and the read-only snapshot handed to the presentation layer.

use crate::domain::entity::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Before the first start. No interaction.
    Idle,
    /// Accepting moves.
    Playing,
    /// Reached the goal. Terminal until restart.
    Won,
    /// Reached the hazard. Terminal until restart.
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// A copy of the game's state at one instant.
///
/// Callers get these by value; holding one never lets them change the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameState {
    pub phase: Phase,
    pub player: Position,
    pub spawn: Position,
    /// `(rows, cols)`
    pub dimensions: (usize, usize),
}

/// A command's result: the state it left behind and what happened.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CommandResult {
    pub state: GameState,
    pub event: super::event::GameEvent,
}
