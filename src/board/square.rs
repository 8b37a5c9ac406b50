//! Board squares and special-square tags.

use serde::{Deserialize, Serialize};

/// Number of columns on every board layout.
pub const BOARD_COLUMNS: u8 = 3;

/// A square on the shared board grid.
///
/// Encoded as `row * 3 + column`. Column 0 is white's home band, column 2 is
/// black's home band, column 1 is the shared middle band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(pub u8);

impl Square {
    /// Square at the given column and row.
    #[must_use]
    pub const fn at(column: u8, row: u8) -> Self {
        Self(row * BOARD_COLUMNS + column)
    }

    /// Column (0..3).
    #[must_use]
    pub const fn column(self) -> u8 {
        self.0 % BOARD_COLUMNS
    }

    /// Row, counted from white's entry end.
    #[must_use]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_COLUMNS
    }

    /// True for squares in the shared middle band.
    #[must_use]
    pub const fn is_shared(self) -> bool {
        self.column() == 1
    }

    /// Swap home bands: column 0 <-> column 2, middle band unchanged.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::at(BOARD_COLUMNS - 1 - self.column(), self.row())
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (b'a' + self.column()) as char;
        write!(f, "{}{}", file, self.row() + 1)
    }
}

/// Special-square tag. A square can carry several tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareKind {
    Rosette,
    Gate,
    Market,
    Temple,
    House,
}
