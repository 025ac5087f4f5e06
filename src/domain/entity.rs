/// Entities: positions, movement vectors, and the player.

use std::fmt;

/// A cell coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Apply a step. Returns None when the result would go below zero
    /// on either axis (the upper bound is the grid's business).
    pub fn offset(self, step: Step) -> Option<Position> {
        let x = self.x.checked_add_signed(step.dx as isize)?;
        let y = self.y.checked_add_signed(step.dy as isize)?;
        Some(Position { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Movement direction, one per directional control.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right];

    pub fn step(self) -> Step {
        match self {
            MoveDir::Up => Step::new(0, -1),
            MoveDir::Down => Step::new(0, 1),
            MoveDir::Left => Step::new(-1, 0),
            MoveDir::Right => Step::new(1, 0),
        }
    }
}

/// Raw movement vector. Only the four unit vectors are legal moves;
/// everything else is rejected by the move rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Step {
    pub dx: i32,
    pub dy: i32,
}

impl Step {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Step { dx, dy }
    }

    /// Exactly one axis moves, by exactly one cell.
    pub fn is_unit(self) -> bool {
        matches!((self.dx, self.dy), (0, 1) | (0, -1) | (1, 0) | (-1, 0))
    }
}

impl From<MoveDir> for Step {
    fn from(dir: MoveDir) -> Self {
        dir.step()
    }
}

/// Player position tracking.
///
/// `spawn` is fixed for the session. `current` only changes through
/// `reset()` (start / restart) and `set()` (an already-validated move),
/// both of which are reserved for the game state machine.
#[derive(Clone, Debug)]
pub struct PlayerState {
    current: Position,
    spawn: Position,
}

impl PlayerState {
    pub fn new(spawn: Position) -> Self {
        PlayerState { current: spawn, spawn }
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    /// Put the player back on the given spawn cell.
    pub(crate) fn reset(&mut self, to: Position) {
        self.current = to;
    }

    /// Move to a position the rules have already accepted.
    pub(crate) fn set(&mut self, to: Position) {
        self.current = to;
    }
}
