/// A validated maze: the grid plus its three landmark cells.
///
/// This is the static configuration of a session. Everything that can be
/// wrong with it is caught here, at construction, so the game itself has
/// no invalid states to reach.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::entity::Position;
use super::grid::Grid;

/// The fixed cells a maze is built around.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Landmark {
    Spawn,
    Goal,
    Hazard,
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Landmark::Spawn => "spawn",
            Landmark::Goal => "goal",
            Landmark::Hazard => "hazard",
        })
    }
}

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown cell value {value} at {at}")]
    UnknownCell { at: Position, value: u8 },
    #[error("unknown tile '{ch}' on line {line}")]
    UnknownTile { line: usize, ch: char },
    #[error("maze has no {0}")]
    Missing(Landmark),
    #[error("{landmark} appears twice: {first} and {second}")]
    Duplicate { landmark: Landmark, first: Position, second: Position },
    #[error("{landmark} {at} is outside the grid")]
    OutOfBounds { landmark: Landmark, at: Position },
    #[error("{landmark} {at} is a wall")]
    NotPassable { landmark: Landmark, at: Position },
    #[error("{a} and {b} share cell {at}")]
    Overlap { a: Landmark, b: Landmark, at: Position },
    #[error("could not read maze file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    spawn: Position,
    goal: Position,
    hazard: Position,
}

impl Maze {
    /// Validate and assemble. Each landmark must be inside the grid, on an
    /// open cell, and distinct from the other two.
    pub fn new(grid: Grid, spawn: Position, goal: Position, hazard: Position) -> Result<Self, MazeError> {
        let marks = [
            (Landmark::Spawn, spawn),
            (Landmark::Goal, goal),
            (Landmark::Hazard, hazard),
        ];
        for (landmark, at) in marks {
            if !grid.contains(at) {
                return Err(MazeError::OutOfBounds { landmark, at });
            }
            if !grid.is_passable_at(at) {
                return Err(MazeError::NotPassable { landmark, at });
            }
        }
        for (i, &(a, pa)) in marks.iter().enumerate() {
            if let Some(&(b, _)) = marks[i + 1..].iter().find(|(_, pb)| *pb == pa) {
                return Err(MazeError::Overlap { a, b, at: pa });
            }
        }
        Ok(Maze { grid, spawn, goal, hazard })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn hazard(&self) -> Position {
        self.hazard
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        // ######
        // #....#
        // ######
        Grid::from_matrix(&[
            [1u8, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn accepts_valid_landmarks() {
        let m = Maze::new(
            corridor(),
            Position::new(2, 1),
            Position::new(4, 1),
            Position::new(1, 1),
        )
        .unwrap();
        assert_eq!(m.spawn(), Position::new(2, 1));
        assert_eq!(m.goal(), Position::new(4, 1));
        assert_eq!(m.hazard(), Position::new(1, 1));
        assert_eq!(m.dimensions(), (3, 6));
    }

    #[test]
    fn rejects_spawn_on_wall() {
        let err = Maze::new(
            corridor(),
            Position::new(0, 0),
            Position::new(4, 1),
            Position::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::NotPassable { landmark: Landmark::Spawn, .. }));
    }

    #[test]
    fn rejects_goal_outside_grid() {
        let err = Maze::new(
            corridor(),
            Position::new(2, 1),
            Position::new(6, 1),
            Position::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::OutOfBounds { landmark: Landmark::Goal, .. }));
    }

    #[test]
    fn rejects_shared_cells() {
        let err = Maze::new(
            corridor(),
            Position::new(2, 1),
            Position::new(1, 1),
            Position::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MazeError::Overlap { a: Landmark::Goal, b: Landmark::Hazard, .. }
        ));
    }

    #[test]
    fn error_messages_name_the_landmark() {
        let err = Maze::new(
            corridor(),
            Position::new(0, 0),
            Position::new(4, 1),
            Position::new(1, 1),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "spawn (0, 0) is a wall");
    }
}
