//! Dice bonus calculation.
//!
//! The only rule that differs between variants in more than a flag. It is a
//! plain enum value on `RuleVariant`, so variants stay data and serialize.

use serde::{Deserialize, Serialize};

use crate::core::dice::raw_total;
use crate::core::{Color, ColorMap, DiceRoll};

/// Special squares controlled by each color for one position.
///
/// A square is controlled by a color when only that color has pieces on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardControl {
    pub temples: ColorMap<u8>,
    pub houses: ColorMap<u8>,
}

impl BoardControl {
    /// The color holds strictly more temples than its opponent.
    #[must_use]
    pub fn has_temple_majority(&self, color: Color) -> bool {
        self.temples[color] > self.temples[color.opponent()]
    }
}

/// How a raw roll becomes a movement total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceBonus {
    /// Total is the number of set dice.
    #[default]
    None,
    /// Temple blessing turns a zero into the maximum roll for the color with
    /// temple majority; each controlled house adds one, up to a cap.
    Sanctuary {
        temple_blessing: bool,
        house_bonus: bool,
        max_house_bonus: u8,
    },
}

impl DiceBonus {
    /// Apply the bonus rule for `mover` given the current board control.
    #[must_use]
    pub fn apply(&self, raw: &[bool], mover: Color, control: &BoardControl) -> DiceRoll {
        let mut roll = DiceRoll::plain(raw.iter().copied().collect());
        let DiceBonus::Sanctuary {
            temple_blessing,
            house_bonus,
            max_house_bonus,
        } = *self
        else {
            return roll;
        };

        if temple_blessing && raw_total(raw) == 0 && control.has_temple_majority(mover) {
            roll.total = raw.len() as u8;
            roll.blessed = true;
        }
        if house_bonus {
            let bonus = control.houses[mover].min(max_house_bonus);
            roll.total += bonus;
            roll.house_bonus = bonus;
        }
        roll
    }

    /// Largest bonus that can be added on top of the raw dice.
    #[must_use]
    pub fn max_bonus(&self) -> u8 {
        match *self {
            DiceBonus::Sanctuary {
                house_bonus: true,
                max_house_bonus,
                ..
            } => max_house_bonus,
            _ => 0,
        }
    }

    #[must_use]
    pub fn uses_temples(&self) -> bool {
        matches!(
            self,
            DiceBonus::Sanctuary {
                temple_blessing: true,
                ..
            }
        )
    }

    #[must_use]
    pub fn uses_houses(&self) -> bool {
        matches!(self, DiceBonus::Sanctuary { house_bonus: true, .. })
    }
}
