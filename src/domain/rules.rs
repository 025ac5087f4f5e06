/// Movement rules, truth-table driven.
///
/// Pure functions over a maze. They decide "what is legal" and report
/// where a move lands; applying it is the state machine's job.
/// There is no notion of game phase here.
///
/// ## Movement Truth Table
///
/// Rules are checked top to bottom; the first match decides.
/// ┌──────────────────────────┬───────────────────────────┐
/// │ Condition                │ Result                    │
/// ├──────────────────────────┼───────────────────────────┤
/// │ step not a unit vector   │ Rejected(InvalidDirection)│
/// │ dest out of bounds       │ Rejected(OutOfBounds)     │
/// │ dest tile not passable   │ Rejected(Wall)            │
/// │ dest == goal             │ Moved { outcome: Goal }   │
/// │ dest == hazard           │ Moved { outcome: Hazard } │
/// │ Otherwise                │ Moved { outcome: Open }   │
/// └──────────────────────────┴───────────────────────────┘

use std::fmt;

use super::entity::{Position, Step};
use super::maze::Maze;

/// What the destination cell means for the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Open,
    Goal,
    Hazard,
}

/// Why a move was declined.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rejection {
    InvalidDirection,
    OutOfBounds,
    Wall,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::InvalidDirection => "invalid direction",
            Rejection::OutOfBounds => "out of bounds",
            Rejection::Wall => "wall",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveResult {
    Moved { to: Position, outcome: Outcome },
    Rejected(Rejection),
}

/// Try a single step from `current`. See truth table above.
pub fn try_move(current: Position, step: Step, maze: &Maze) -> MoveResult {
    if !step.is_unit() {
        return MoveResult::Rejected(Rejection::InvalidDirection);
    }
    let grid = maze.grid();
    let candidate = match current.offset(step) {
        Some(p) if grid.contains(p) => p,
        _ => return MoveResult::Rejected(Rejection::OutOfBounds),
    };
    if !grid.is_passable_at(candidate) {
        return MoveResult::Rejected(Rejection::Wall);
    }
    MoveResult::Moved { to: candidate, outcome: classify(candidate, maze) }
}

/// Which landmark, if any, sits at `pos`.
pub fn classify(pos: Position, maze: &Maze) -> Outcome {
    if pos == maze.goal() {
        Outcome::Goal
    } else if pos == maze.hazard() {
        Outcome::Hazard
    } else {
        Outcome::Open
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
