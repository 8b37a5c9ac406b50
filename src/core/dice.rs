//! Binary dice: random-bit sources and roll results.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Raw dice values, one bit per die.
pub type DiceBits = SmallVec<[bool; 4]>;

/// Source of uniform random bits, one per die.
pub trait DiceSource {
    fn next_bit(&mut self) -> bool;

    /// Draw `count` dice.
    fn draw(&mut self, count: usize) -> DiceBits {
        (0..count).map(|_| self.next_bit()).collect()
    }
}

/// Replays a fixed sequence of bits; used for tests and recorded games.
///
/// Returns `false` once the script is exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    bits: Vec<bool>,
    cursor: usize,
}

impl ScriptedDice {
    #[must_use]
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits, cursor: 0 }
    }

    /// Script whole rolls by their totals, each spread over `dice_count` dice.
    #[must_use]
    pub fn from_totals(totals: &[u8], dice_count: usize) -> Self {
        let bits = totals
            .iter()
            .flat_map(|&t| (0..dice_count).map(move |i| i < t as usize))
            .collect();
        Self::new(bits)
    }

    /// Bits left in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.cursor)
    }
}

impl DiceSource for ScriptedDice {
    fn next_bit(&mut self) -> bool {
        let bit = self.bits.get(self.cursor).copied().unwrap_or(false);
        self.cursor += 1;
        bit
    }
}

/// An outstanding roll, after variant bonuses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Raw die values.
    pub values: DiceBits,
    /// Movement total including bonuses.
    pub total: u8,
    /// A zero roll was replaced by the maximum via temple majority.
    pub blessed: bool,
    /// Squares added by house control.
    pub house_bonus: u8,
}

impl DiceRoll {
    /// Roll with no bonuses applied.
    #[must_use]
    pub fn plain(values: DiceBits) -> Self {
        let total = raw_total(&values);
        Self {
            values,
            total,
            blessed: false,
            house_bonus: 0,
        }
    }

    /// Sum of the raw dice.
    #[must_use]
    pub fn raw_total(&self) -> u8 {
        raw_total(&self.values)
    }
}

pub(crate) fn raw_total(values: &[bool]) -> u8 {
    values.iter().filter(|&&b| b).count() as u8
}
