//! Rule variants.
//!
//! A variant is a single immutable record. Everything that differs between
//! rule sets is a field; the dice bonus is the one behavior that is more
//! than a flag and is carried as a `DiceBonus` value.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::dice::DiceBonus;
use crate::board::{PathCatalog, PathId, PathSet, Square};
use crate::error::ConfigurationError;

/// Upper bound on dice per roll (chance nodes enumerate `2^dice`).
pub const MAX_DICE: u8 = 8;

/// Named rule sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantId {
    Finkel,
    Blitz,
    Masters,
    Tournament,
    Aseb,
    Murray,
    Skiryuk,
    Debug,
}

impl VariantId {
    pub const ALL: [VariantId; 8] = [
        VariantId::Finkel,
        VariantId::Blitz,
        VariantId::Masters,
        VariantId::Tournament,
        VariantId::Aseb,
        VariantId::Murray,
        VariantId::Skiryuk,
        VariantId::Debug,
    ];

    /// Look up by display name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VariantId::Finkel => "Finkel",
            VariantId::Blitz => "Blitz",
            VariantId::Masters => "Masters",
            VariantId::Tournament => "Tournament",
            VariantId::Aseb => "Aseb",
            VariantId::Murray => "Murray",
            VariantId::Skiryuk => "Skiryuk",
            VariantId::Debug => "Debug",
        }
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which special-square sets protect pieces from capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeSquares {
    pub rosettes: bool,
    pub markets: bool,
    pub temples: bool,
}

impl SafeSquares {
    pub const NONE: SafeSquares = SafeSquares {
        rosettes: false,
        markets: false,
        temples: false,
    };
    pub const ROSETTES: SafeSquares = SafeSquares {
        rosettes: true,
        markets: false,
        temples: false,
    };

    /// Resolve against a layout.
    #[must_use]
    pub fn resolve(&self, paths: &PathSet) -> FxHashSet<Square> {
        let special = &paths.special;
        let mut set = FxHashSet::default();
        if self.rosettes {
            set.extend(special.rosettes.iter().copied());
        }
        if self.markets {
            set.extend(special.markets.iter().copied());
        }
        if self.temples {
            set.extend(special.temples.iter().copied());
        }
        set
    }
}

/// What happens when a piece would land on a safe square held by the opponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeLanding {
    /// The move is illegal.
    #[default]
    Blocked,
    /// Both colors share the square; nothing is captured.
    Shared,
}

/// One complete rule set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleVariant {
    pub id: VariantId,
    pub description: String,
    pub pieces_per_player: u8,
    pub dice_count: u8,
    pub path: PathId,
    pub extra_turn_on_rosette: bool,
    pub extra_turn_on_capture: bool,
    /// An opponent on the gate square blocks bearing off.
    pub gate_keeper_enabled: bool,
    pub safe_squares: SafeSquares,
    pub safe_landing: SafeLanding,
    pub allow_stacking: bool,
    pub stacks_move_together: bool,
    pub stack_only_on_rosettes: bool,
    pub allow_backward_movement: bool,
    /// Backward moves are offered alongside forward ones rather than only
    /// when no forward move exists.
    pub backward_optional: bool,
    pub pieces_to_win: u8,
    pub exact_roll_to_finish: bool,
    pub dice_bonus: DiceBonus,
}

/// The subset of a variant the engine consults during play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub pieces_per_player: u8,
    pub dice_count: u8,
    pub path: PathId,
    pub extra_turn_on_rosette: bool,
    pub extra_turn_on_capture: bool,
    pub gate_keeper_enabled: bool,
    pub safe_squares: SafeSquares,
    pub safe_landing: SafeLanding,
    pub allow_stacking: bool,
    pub stacks_move_together: bool,
    pub stack_only_on_rosettes: bool,
    pub allow_backward_movement: bool,
    pub backward_optional: bool,
    pub pieces_to_win: u8,
    pub exact_roll_to_finish: bool,
    pub dice_bonus: DiceBonus,
}

impl RuleVariant {
    /// Classic rules: 7 pieces, 4 dice, rosettes are safe and grant another roll.
    #[must_use]
    pub fn finkel() -> Self {
        Self {
            id: VariantId::Finkel,
            description: "Irving Finkel's reconstruction of the classic rules".to_string(),
            pieces_per_player: 7,
            dice_count: 4,
            path: PathId::Bell,
            extra_turn_on_rosette: true,
            extra_turn_on_capture: false,
            gate_keeper_enabled: false,
            safe_squares: SafeSquares::ROSETTES,
            safe_landing: SafeLanding::Blocked,
            allow_stacking: false,
            stacks_move_together: false,
            stack_only_on_rosettes: false,
            allow_backward_movement: false,
            backward_optional: false,
            pieces_to_win: 7,
            exact_roll_to_finish: true,
            dice_bonus: DiceBonus::None,
        }
    }

    /// Short game: 5 pieces on the long path, captures also grant a turn.
    #[must_use]
    pub fn blitz() -> Self {
        Self {
            id: VariantId::Blitz,
            description: "Fast game where captures earn another roll".to_string(),
            pieces_per_player: 5,
            path: PathId::Masters,
            extra_turn_on_capture: true,
            pieces_to_win: 5,
            ..Self::finkel()
        }
    }

    #[must_use]
    pub fn masters() -> Self {
        Self {
            id: VariantId::Masters,
            description: "James Masters' rules on the 16-square path".to_string(),
            path: PathId::Masters,
            ..Self::finkel()
        }
    }

    /// Classic rules plus the gate keeper.
    #[must_use]
    pub fn tournament() -> Self {
        Self {
            id: VariantId::Tournament,
            description: "Classic rules where an enemy on the gate blocks bearing off".to_string(),
            gate_keeper_enabled: true,
            ..Self::finkel()
        }
    }

    #[must_use]
    pub fn aseb() -> Self {
        Self {
            id: VariantId::Aseb,
            description: "Twenty squares of Aseb, bearing off without an exact roll".to_string(),
            pieces_per_player: 5,
            path: PathId::Aseb,
            pieces_to_win: 5,
            exact_roll_to_finish: false,
            ..Self::finkel()
        }
    }

    /// Backward movement and stacking on rosettes.
    #[must_use]
    pub fn murray() -> Self {
        Self {
            id: VariantId::Murray,
            description: "H.J.R. Murray's rules with optional backward moves".to_string(),
            path: PathId::Murray,
            allow_stacking: true,
            stack_only_on_rosettes: true,
            allow_backward_movement: true,
            backward_optional: true,
            ..Self::finkel()
        }
    }

    /// Stacks, market safety, and the temple/house dice bonuses.
    #[must_use]
    pub fn skiryuk() -> Self {
        Self {
            id: VariantId::Skiryuk,
            description: "Dmitriy Skiryuk's rules with stacks and sanctuary bonuses".to_string(),
            pieces_per_player: 5,
            safe_squares: SafeSquares {
                rosettes: true,
                markets: true,
                temples: false,
            },
            safe_landing: SafeLanding::Shared,
            allow_stacking: true,
            stacks_move_together: true,
            pieces_to_win: 5,
            exact_roll_to_finish: false,
            dice_bonus: DiceBonus::Sanctuary {
                temple_blessing: true,
                house_bonus: true,
                max_house_bonus: 2,
            },
            ..Self::finkel()
        }
    }

    /// Tiny game for exhaustive search and tests.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            id: VariantId::Debug,
            description: "Two pieces, two dice".to_string(),
            pieces_per_player: 2,
            dice_count: 2,
            pieces_to_win: 2,
            ..Self::finkel()
        }
    }

    /// Built-in record for an id.
    #[must_use]
    pub fn builtin(id: VariantId) -> Self {
        match id {
            VariantId::Finkel => Self::finkel(),
            VariantId::Blitz => Self::blitz(),
            VariantId::Masters => Self::masters(),
            VariantId::Tournament => Self::tournament(),
            VariantId::Aseb => Self::aseb(),
            VariantId::Murray => Self::murray(),
            VariantId::Skiryuk => Self::skiryuk(),
            VariantId::Debug => Self::debug(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Highest movement total a roll can produce.
    #[must_use]
    pub fn max_roll(&self) -> u8 {
        self.dice_count + self.dice_bonus.max_bonus()
    }

    /// Check internal consistency against the layout it names.
    pub fn validate(&self, catalog: &PathCatalog) -> Result<(), ConfigurationError> {
        let fail = |msg: &str| Err(ConfigurationError::invalid(self.id, msg));

        let Some(paths) = catalog.get(self.path) else {
            return fail("path is not in the catalog");
        };
        let special = &paths.special;

        if self.pieces_per_player == 0 {
            return fail("needs at least one piece per player");
        }
        if self.dice_count == 0 || self.dice_count > MAX_DICE {
            return fail("dice count must be between 1 and 8");
        }
        if self.pieces_to_win == 0 || self.pieces_to_win > self.pieces_per_player {
            return fail("pieces to win must be between 1 and pieces per player");
        }
        if !self.allow_stacking && (self.stacks_move_together || self.stack_only_on_rosettes) {
            return fail("stack options set without stacking");
        }
        if self.stack_only_on_rosettes {
            if special.rosettes.is_empty() {
                return fail("rosette-only stacking on a layout without rosettes");
            }
            if !self.safe_squares.rosettes {
                return fail("rosette-only stacking requires rosettes to be safe");
            }
        }
        if self.backward_optional && !self.allow_backward_movement {
            return fail("optional backward moves without backward movement");
        }
        if self.gate_keeper_enabled && special.gate.is_none() {
            return fail("gate keeper on a layout without a gate");
        }
        if self.dice_bonus.uses_temples() && special.temples.is_empty() {
            return fail("temple blessing on a layout without temples");
        }
        if self.dice_bonus.uses_houses() {
            if special.houses.is_empty() {
                return fail("house bonus on a layout without houses");
            }
            if self.dice_bonus.max_bonus() == 0 {
                return fail("house bonus enabled with a zero cap");
            }
        }
        Ok(())
    }

    /// Fields the engine needs.
    #[must_use]
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            pieces_per_player: self.pieces_per_player,
            dice_count: self.dice_count,
            path: self.path,
            extra_turn_on_rosette: self.extra_turn_on_rosette,
            extra_turn_on_capture: self.extra_turn_on_capture,
            gate_keeper_enabled: self.gate_keeper_enabled,
            safe_squares: self.safe_squares,
            safe_landing: self.safe_landing,
            allow_stacking: self.allow_stacking,
            stacks_move_together: self.stacks_move_together,
            stack_only_on_rosettes: self.stack_only_on_rosettes,
            allow_backward_movement: self.allow_backward_movement,
            backward_optional: self.backward_optional,
            pieces_to_win: self.pieces_to_win,
            exact_roll_to_finish: self.exact_roll_to_finish,
            dice_bonus: self.dice_bonus,
        }
    }
}
