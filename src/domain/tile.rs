/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Open, // Walkway
    Wall, // Impassable
}

impl Tile {
    /// Can the player occupy this cell?
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Open)
    }

    /// Is this a wall?
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Decode a cell from the 0/1 matrix form (1 = wall, 0 = open).
    pub fn from_flag(flag: u8) -> Option<Tile> {
        match flag {
            0 => Some(Tile::Open),
            1 => Some(Tile::Wall),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_is_passable() {
        assert!(Tile::Open.is_passable());
        assert!(!Tile::Wall.is_passable());
        assert!(Tile::Wall.is_wall());
    }

    #[test]
    fn matrix_flags() {
        assert_eq!(Tile::from_flag(0), Some(Tile::Open));
        assert_eq!(Tile::from_flag(1), Some(Tile::Wall));
        assert_eq!(Tile::from_flag(2), None);
    }
}
