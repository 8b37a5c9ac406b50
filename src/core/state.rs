//! Game state.
//!
//! `GameState` is a plain value: cloning it gives a fully independent copy,
//! which is what every search branch relies on. Move history is an
//! `im::Vector` so that clone stays O(1) however long the game runs.
//!
//! Only `GameEngine` mutates positions, dice, and turn ownership; everyone
//! else reads snapshots.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::color::{Color, ColorMap};
use super::dice::DiceRoll;
use super::moves::MoveRecord;
use super::position::PiecePosition;

/// Positions of one color's pieces, indexed by piece number.
pub type PieceSet = SmallVec<[PiecePosition; 7]>;

/// Game lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the draw that decides who starts.
    #[default]
    InitialRoll,
    Playing,
    GameOver,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Color to act.
    pub current_player: Color,
    /// Piece positions per color.
    pub pieces: ColorMap<PieceSet>,
    /// Outstanding roll, if the current player has rolled.
    pub dice: Option<DiceRoll>,
    /// Number of moves applied so far.
    pub turn: u32,
    /// The current player is acting again after a rosette or capture.
    pub extra_turn: bool,
    pub winner: Option<Color>,
    pub history: Vector<MoveRecord>,
}

impl GameState {
    /// Fresh state with every piece at start.
    #[must_use]
    pub fn new(pieces_per_player: usize) -> Self {
        Self {
            phase: GamePhase::InitialRoll,
            current_player: Color::White,
            pieces: ColorMap::new(|_| {
                SmallVec::from_elem(PiecePosition::AtStart, pieces_per_player)
            }),
            dice: None,
            turn: 0,
            extra_turn: false,
            winner: None,
            history: Vector::new(),
        }
    }

    /// Pieces per color.
    #[must_use]
    pub fn pieces_per_player(&self) -> usize {
        self.pieces[Color::White].len()
    }

    /// Positions of a color's pieces.
    #[must_use]
    pub fn positions(&self, color: Color) -> &[PiecePosition] {
        &self.pieces[color]
    }

    /// Position of a single piece.
    #[must_use]
    pub fn position(&self, color: Color, piece: u8) -> Option<PiecePosition> {
        self.pieces[color].get(piece as usize).copied()
    }

    /// Set a piece's position (engine and test setup only).
    pub(crate) fn set_position(&mut self, color: Color, piece: u8, position: PiecePosition) {
        if let Some(slot) = self.pieces[color].get_mut(piece as usize) {
            *slot = position;
        }
    }

    /// Number of finished pieces for a color.
    #[must_use]
    pub fn finished_count(&self, color: Color) -> usize {
        self.pieces[color].iter().filter(|p| p.is_finished()).count()
    }

    /// Number of pieces still waiting at start.
    #[must_use]
    pub fn waiting_count(&self, color: Color) -> usize {
        self.pieces[color].iter().filter(|p| p.is_at_start()).count()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Total of the outstanding roll.
    #[must_use]
    pub fn dice_total(&self) -> Option<u8> {
        self.dice.as_ref().map(|d| d.total)
    }

    /// Encode as bytes for sync and persistence layers.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Place pieces directly. Intended for setting up test positions and
    /// puzzles; does not check legality.
    #[must_use]
    pub fn with_positions(mut self, color: Color, positions: &[PiecePosition]) -> Self {
        for (i, &pos) in positions.iter().enumerate() {
            self.set_position(color, i as u8, pos);
        }
        self
    }
}
