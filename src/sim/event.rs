/// Events emitted by each game command.
/// The presentation layer consumes these to decide what to show next
/// (re-render, game-over overlay, success screen).

use crate::domain::entity::Position;
use crate::domain::rules::Rejection;
use super::world::Phase;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    Restarted,
    Moved { from: Position, to: Position },
    GoalReached { at: Position },
    HazardReached { at: Position },
    /// The rules declined the move; nothing changed.
    Blocked { at: Position, reason: Rejection },
    /// A move arrived outside `Playing`; nothing changed.
    Ignored { phase: Phase },
}

impl GameEvent {
    /// Did this command leave the state exactly as it was?
    pub fn is_noop(self) -> bool {
        matches!(self, GameEvent::Blocked { .. } | GameEvent::Ignored { .. })
    }
}
