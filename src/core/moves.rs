//! Move representation.
//!
//! A `Move` is produced by move generation and consumed once by
//! `GameEngine::apply_move`. Remote participants send the same structure;
//! the engine does not care where a move came from.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::color::Color;
use super::position::PiecePosition;
use crate::board::Square;

/// Piece indices carried or captured by a move.
pub type PieceList = SmallVec<[u8; 4]>;

/// Where a move ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// Lands on the mover's path.
    OnPath { index: u8, square: Square },
    /// Bears the piece off.
    Finish,
}

impl Destination {
    #[must_use]
    pub const fn square(self) -> Option<Square> {
        match self {
            Destination::OnPath { square, .. } => Some(square),
            Destination::Finish => None,
        }
    }

    #[must_use]
    pub const fn position(self) -> PiecePosition {
        match self {
            Destination::OnPath { index, .. } => PiecePosition::OnPath(index),
            Destination::Finish => PiecePosition::Finished,
        }
    }

    #[must_use]
    pub const fn is_finish(self) -> bool {
        matches!(self, Destination::Finish)
    }
}

/// A legal move for the active color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Index of the piece that was selected.
    pub piece: u8,
    pub from: PiecePosition,
    pub to: Destination,
    /// Other own pieces travelling with the selected one (stacks).
    pub carried: PieceList,
    /// Opponent pieces sent back to start.
    pub captured: PieceList,
    pub extra_turn: bool,
    pub backwards: bool,
}

impl Move {
    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    #[must_use]
    pub fn enters_board(&self) -> bool {
        self.from.is_at_start()
    }

    /// The selected piece and every carried piece.
    pub fn moving_pieces(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::once(self.piece).chain(self.carried.iter().copied())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "piece {} {} -> ", self.piece, self.from)?;
        match self.to {
            Destination::OnPath { index, square } => write!(f, "path[{}] ({})", index, square)?,
            Destination::Finish => write!(f, "finish")?,
        }
        if !self.carried.is_empty() {
            write!(f, " carrying {:?}", self.carried.as_slice())?;
        }
        if self.is_capture() {
            write!(f, " capturing {:?}", self.captured.as_slice())?;
        }
        if self.backwards {
            write!(f, " (backwards)")?;
        }
        if self.extra_turn {
            write!(f, " +turn")?;
        }
        Ok(())
    }
}

/// An applied move with metadata, kept in the state's history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub color: Color,
    pub mv: Move,
    /// Turn counter value before the move was applied.
    pub turn: u32,
    pub dice_total: u8,
}
