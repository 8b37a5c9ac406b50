//! Core value types: colors, positions, dice, moves, state, RNG.
//!
//! Nothing here knows the rules. Variants and the engine in `rules` give
//! these values meaning.

pub mod color;
pub mod dice;
pub mod moves;
pub mod position;
pub mod rng;
pub mod state;

pub use color::{Color, ColorMap};
pub use dice::{DiceBits, DiceRoll, DiceSource, ScriptedDice};
pub use moves::{Destination, Move, MoveRecord, PieceList};
pub use position::PiecePosition;
pub use rng::GameRng;
pub use state::{GamePhase, GameState, PieceSet};
