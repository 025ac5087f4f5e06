/// Maze loader.
///
/// ## Sources (priority order):
///   1. A maze file given on the command line or in `config.toml`
///   2. The built-in Valentine maze
///
/// ## Maze file format (`.txt`):
///   One line per row, all rows the same length.
///   Lines starting with `;` are comments, blank lines are skipped.
///
/// ## Tile legend:
///   '#' = Wall                   '.' or ' ' = Walkway
///   'P' = Player spawn           'G' = Goal (white heart)
///   'X' = Hazard (black heart)
///
/// Spawn, goal and hazard sit on walkway cells and must each appear
/// exactly once.

use std::path::Path;

use log::{debug, info};

use crate::domain::entity::Position;
use crate::domain::grid::Grid;
use crate::domain::maze::{Landmark, Maze, MazeError};
use crate::domain::tile::Tile;

// ══════════════════════════════════════════════════════════════
// Built-in maze
// ══════════════════════════════════════════════════════════════

pub const VALENTINE_SPAWN: Position = Position::new(6, 4);
pub const VALENTINE_GOAL: Position = Position::new(11, 8);
pub const VALENTINE_HAZARD: Position = Position::new(1, 1);

/// 13 × 10, 1 = wall, 0 = walkway.
const VALENTINE: [[u8; 13]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 0, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// The maze the game ships with.
pub fn builtin() -> Result<Maze, MazeError> {
    let grid = Grid::from_matrix(&VALENTINE)?;
    Maze::new(grid, VALENTINE_SPAWN, VALENTINE_GOAL, VALENTINE_HAZARD)
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the configured maze, or the built-in one when none is given.
pub fn load_maze(path: Option<&Path>) -> Result<Maze, MazeError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|source| MazeError::Io { path: path.to_path_buf(), source })?;
            let maze = parse_maze(&text)?;
            info!("loaded maze {} ({}x{})", path.display(), maze.grid().width(), maze.grid().height());
            Ok(maze)
        }
        None => {
            debug!("using built-in maze");
            builtin()
        }
    }
}

/// Parse the text format described at the top of this module.
pub fn parse_maze(text: &str) -> Result<Maze, MazeError> {
    let mut rows = vec![];
    let mut spawn = None;
    let mut goal = None;
    let mut hazard = None;

    let lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with(';'));

    for (line_idx, line) in lines {
        let y = rows.len();
        let mut row = Vec::with_capacity(line.len());
        for (x, ch) in line.trim_end_matches('\r').chars().enumerate() {
            let here = Position::new(x, y);
            let tile = match ch {
                '#' => Tile::Wall,
                '.' | ' ' => Tile::Open,
                'P' => { place(&mut spawn, Landmark::Spawn, here)?; Tile::Open }
                'G' => { place(&mut goal, Landmark::Goal, here)?; Tile::Open }
                'X' => { place(&mut hazard, Landmark::Hazard, here)?; Tile::Open }
                _ => return Err(MazeError::UnknownTile { line: line_idx + 1, ch }),
            };
            row.push(tile);
        }
        rows.push(row);
    }

    let grid = Grid::from_rows(rows)?;
    let spawn = spawn.ok_or(MazeError::Missing(Landmark::Spawn))?;
    let goal = goal.ok_or(MazeError::Missing(Landmark::Goal))?;
    let hazard = hazard.ok_or(MazeError::Missing(Landmark::Hazard))?;
    Maze::new(grid, spawn, goal, hazard)
}

fn place(slot: &mut Option<Position>, landmark: Landmark, at: Position) -> Result<(), MazeError> {
    if let Some(first) = *slot {
        return Err(MazeError::Duplicate { landmark, first, second: at });
    }
    *slot = Some(at);
    Ok(())
}
