//! Piece positions.

use serde::{Deserialize, Serialize};

/// Where a single piece is.
///
/// Path indices are 0-based positions on the owner's path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiecePosition {
    /// Waiting off-board to enter.
    #[default]
    AtStart,
    /// On the owner's path at this index.
    OnPath(u8),
    /// Borne off. Terminal.
    Finished,
}

impl PiecePosition {
    #[must_use]
    pub const fn is_at_start(self) -> bool {
        matches!(self, PiecePosition::AtStart)
    }

    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, PiecePosition::Finished)
    }

    /// Path index when on the board.
    #[must_use]
    pub const fn path_index(self) -> Option<usize> {
        match self {
            PiecePosition::OnPath(i) => Some(i as usize),
            _ => None,
        }
    }

    /// Numeric progress along the circuit: 0 at start, `index + 1` on the
    /// path, `path_len + 1` when finished.
    #[must_use]
    pub const fn ordinal(self, path_len: usize) -> usize {
        match self {
            PiecePosition::AtStart => 0,
            PiecePosition::OnPath(i) => i as usize + 1,
            PiecePosition::Finished => path_len + 1,
        }
    }
}

impl std::fmt::Display for PiecePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PiecePosition::AtStart => write!(f, "start"),
            PiecePosition::OnPath(i) => write!(f, "path[{}]", i),
            PiecePosition::Finished => write!(f, "finished"),
        }
    }
}
