//! Ordered movement paths.

use serde::{Deserialize, Serialize};

use super::square::Square;

/// Path geometry identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathId {
    /// Classic 14-square circuit (Bell / Finkel).
    Bell,
    /// 16 squares: up the middle, then back down the home band.
    Masters,
    /// 14 squares finishing through the opponent's home band.
    Murray,
    /// 16 squares on the long single-file board.
    Aseb,
}

impl PathId {
    pub const ALL: [PathId; 4] = [PathId::Bell, PathId::Masters, PathId::Murray, PathId::Aseb];
}

impl std::fmt::Display for PathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PathId::Bell => "Bell",
            PathId::Masters => "Masters",
            PathId::Murray => "Murray",
            PathId::Aseb => "Aseb",
        };
        f.write_str(name)
    }
}

/// An ordered sequence of squares for one color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    squares: Vec<Square>,
}

impl Path {
    /// Build a path from `(column, row)` pairs.
    #[must_use]
    pub fn from_coords(coords: &[(u8, u8)]) -> Self {
        Self {
            squares: coords.iter().map(|&(c, r)| Square::at(c, r)).collect(),
        }
    }

    /// Mirror image for the other color.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            squares: self.squares.iter().map(|s| s.mirrored()).collect(),
        }
    }

    /// Number of squares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Square at a path index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Index of a square on this path.
    #[must_use]
    pub fn index_of(&self, square: Square) -> Option<usize> {
        self.squares.iter().position(|&s| s == square)
    }

    /// True if the path passes through the square.
    #[must_use]
    pub fn contains(&self, square: Square) -> bool {
        self.squares.contains(&square)
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }
}
