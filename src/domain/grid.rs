/// The maze layout: a fixed rectangle of tiles.
///
/// Built once, never mutated. All queries fail closed: any coordinate
/// outside `[0, cols) × [0, rows)` reads as a wall.

use super::entity::Position;
use super::maze::MazeError;
use super::tile::Tile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build from rows of tiles. Rejects an empty layout and ragged rows.
    pub fn from_rows(tiles: Vec<Vec<Tile>>) -> Result<Self, MazeError> {
        let height = tiles.len();
        let width = tiles.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MazeError::Empty);
        }
        if let Some((row, r)) = tiles.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MazeError::Ragged { row, expected: width, found: r.len() });
        }
        Ok(Grid { tiles, width, height })
    }

    /// Build from the 0/1 matrix form (1 = wall, 0 = open).
    pub fn from_matrix<R: AsRef<[u8]>>(matrix: &[R]) -> Result<Self, MazeError> {
        let mut rows = Vec::with_capacity(matrix.len());
        for (y, row) in matrix.iter().enumerate() {
            let mut tiles = Vec::with_capacity(row.as_ref().len());
            for (x, &value) in row.as_ref().iter().enumerate() {
                let tile = Tile::from_flag(value)
                    .ok_or(MazeError::UnknownCell { at: Position::new(x, y), value })?;
                tiles.push(tile);
            }
            rows.push(tiles);
        }
        Grid::from_rows(rows)
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Tile at (x, y). Out of bounds = wall.
    pub fn tile_at(&self, x: i64, y: i64) -> Tile {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => self.tiles[y][x],
            _ => Tile::Wall,
        }
    }

    pub fn is_passable(&self, x: i64, y: i64) -> bool {
        self.tile_at(x, y).is_passable()
    }

    pub fn is_passable_at(&self, pos: Position) -> bool {
        match (i64::try_from(pos.x), i64::try_from(pos.y)) {
            (Ok(x), Ok(y)) => self.is_passable(x, y),
            _ => false,
        }
    }

    /// Rows of tiles, top to bottom (for renderers).
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Grid {
        Grid::from_matrix(&[
            [1u8, 1, 1, 1],
            [1, 0, 0, 1],
            [1, 1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn dimensions_are_rows_then_cols() {
        let g = small();
        assert_eq!(g.dimensions(), (3, 4));
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
    }

    #[test]
    fn passability() {
        let g = small();
        assert!(g.is_passable(1, 1));
        assert!(g.is_passable(2, 1));
        assert!(!g.is_passable(0, 0));
        assert!(!g.is_passable(3, 1));
        assert!(g.is_passable_at(Position::new(2, 1)));
    }

    #[test]
    fn out_of_bounds_fails_closed() {
        let g = Grid::from_matrix(&[[0u8, 0], [0, 0]]).unwrap();
        assert!(!g.is_passable(-1, 0));
        assert!(!g.is_passable(0, -1));
        assert!(!g.is_passable(2, 0));
        assert!(!g.is_passable(0, 2));
        assert!(!g.is_passable_at(Position::new(5, 5)));
        assert_eq!(g.tile_at(99, 99), Tile::Wall);
    }

    #[test]
    fn huge_coordinates_never_wrap_into_the_grid() {
        let g = Grid::from_matrix(&[[0u8, 0], [0, 0]]).unwrap();
        assert_eq!(g.tile_at((1 << 32) | 1, 1), Tile::Wall);
        assert_eq!(g.tile_at(1, (1 << 32) | 1), Tile::Wall);
        assert_eq!(g.tile_at(i64::MAX, 0), Tile::Wall);
        assert_eq!(g.tile_at(i64::MIN, 0), Tile::Wall);
        assert!(!g.is_passable_at(Position::new(usize::MAX, 0)));
    }

    #[test]
    fn rejects_empty() {
        let empty: [[u8; 0]; 0] = [];
        assert!(matches!(Grid::from_matrix(&empty), Err(MazeError::Empty)));
        assert!(matches!(Grid::from_rows(vec![vec![]]), Err(MazeError::Empty)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![Tile::Open; 3], vec![Tile::Open; 2]];
        match Grid::from_rows(rows) {
            Err(MazeError::Ragged { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 3, 2));
            }
            other => panic!("expected Ragged, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_matrix_value() {
        let err = Grid::from_matrix(&[[0u8, 7]]).unwrap_err();
        assert!(matches!(
            err,
            MazeError::UnknownCell { at: Position { x: 1, y: 0 }, value: 7 }
        ));
    }
}
