//! Game engine: legality, dice, move application, win detection.
//!
//! One engine serves every variant. All rule differences are read from the
//! variant's `EngineConfig` and the layout's `PathSet`; there is no
//! per-variant code path here.
//!
//! ## Contract
//!
//! - `legal_moves` is recomputed from positions and the outstanding roll on
//!   every call; nothing is cached between calls.
//! - `apply_move` is the only mutator of piece positions. Rejected requests
//!   leave the state untouched.
//! - Ordering of generated moves is deterministic: forward moves first,
//!   then backward ones, pieces in index order within each group.

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::dice::BoardControl;
use super::variant::{EngineConfig, RuleVariant, SafeLanding, VariantId};
use crate::board::{Path, PathCatalog, PathSet, Square};
use crate::core::dice::DiceBits;
use crate::core::{
    Color, ColorMap, DiceRoll, DiceSource, Destination, GamePhase, GameState, Move, MoveRecord,
    PieceList, PiecePosition,
};
use crate::error::{ConfigurationError, EngineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Rules for one variant on one layout.
#[derive(Clone, Debug)]
pub struct GameEngine {
    variant: RuleVariant,
    config: EngineConfig,
    paths: PathSet,
    safe: FxHashSet<Square>,
}

impl GameEngine {
    /// Validate the variant and resolve its layout.
    pub fn new(variant: RuleVariant, catalog: &PathCatalog) -> Result<Self, ConfigurationError> {
        variant.validate(catalog)?;
        let paths = catalog
            .get(variant.path)
            .cloned()
            .ok_or_else(|| ConfigurationError::invalid(variant.id, "path is not in the catalog"))?;
        let safe = variant.safe_squares.resolve(&paths);
        let config = variant.to_engine_config();
        Ok(Self {
            variant,
            config,
            paths,
            safe,
        })
    }

    /// Engine for a built-in variant on the standard catalog.
    pub fn builtin(id: VariantId) -> Result<Self, ConfigurationError> {
        Self::new(RuleVariant::builtin(id), &PathCatalog::standard())
    }

    #[must_use]
    pub fn variant(&self) -> &RuleVariant {
        &self.variant
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn paths(&self) -> &PathSet {
        &self.paths
    }

    #[must_use]
    pub fn path(&self, color: Color) -> &Path {
        self.paths.path(color)
    }

    #[must_use]
    pub fn path_len(&self) -> usize {
        self.paths.len()
    }

    /// Pieces cannot be captured here.
    #[must_use]
    pub fn is_safe(&self, square: Square) -> bool {
        self.safe.contains(&square)
    }

    #[must_use]
    pub fn is_rosette(&self, square: Square) -> bool {
        self.paths.special.is_rosette(square)
    }

    // === Lifecycle ===

    /// Fresh game waiting for the first-player draw.
    #[must_use]
    pub fn new_game(&self) -> GameState {
        GameState::new(self.config.pieces_per_player as usize)
    }

    /// Draw one bit to decide who moves first and start play.
    pub fn decide_first_player(
        &self,
        state: &mut GameState,
        source: &mut dyn DiceSource,
    ) -> Result<Color, EngineError> {
        self.require_phase(state, GamePhase::InitialRoll)?;
        let first = Color::from_bit(source.next_bit());
        self.begin(state, first);
        Ok(first)
    }

    /// Start play with a fixed first player.
    pub fn start_with(&self, state: &mut GameState, first: Color) -> Result<(), EngineError> {
        self.require_phase(state, GamePhase::InitialRoll)?;
        self.begin(state, first);
        Ok(())
    }

    fn begin(&self, state: &mut GameState, first: Color) {
        state.current_player = first;
        state.phase = GamePhase::Playing;
        info!(variant = %self.variant.id, first = %first, "game started");
    }

    // === Dice ===

    /// Roll for the current player and record the outstanding roll.
    pub fn roll_dice(
        &self,
        state: &mut GameState,
        source: &mut dyn DiceSource,
    ) -> Result<DiceRoll, EngineError> {
        self.require_phase(state, GamePhase::Playing)?;
        if state.dice.is_some() {
            return Err(EngineError::DiceAlreadyRolled {
                color: state.current_player,
            });
        }
        let raw = source.draw(self.config.dice_count as usize);
        let roll = self.dice_outcome(state, &raw);
        debug!(
            color = %state.current_player,
            raw = roll.raw_total(),
            total = roll.total,
            blessed = roll.blessed,
            house_bonus = roll.house_bonus,
            "dice rolled"
        );
        state.dice = Some(roll.clone());
        Ok(roll)
    }

    /// Movement total for raw dice in this position, bonuses included.
    ///
    /// Pure; board control is read from the state as it is.
    #[must_use]
    pub fn dice_outcome(&self, state: &GameState, raw: &[bool]) -> DiceRoll {
        let bonus = &self.config.dice_bonus;
        let control = if bonus.uses_temples() || bonus.uses_houses() {
            self.board_control(state)
        } else {
            BoardControl::default()
        };
        self.config
            .dice_bonus
            .apply(raw, state.current_player, &control)
    }

    /// Distinct roll outcomes with their probabilities.
    ///
    /// Raw combinations with the same number of set dice give the same
    /// outcome, so each total appears once weighted by `C(n, k) / 2^n`.
    #[must_use]
    pub fn chance_outcomes(&self, state: &GameState) -> Vec<(DiceRoll, f64)> {
        let n = self.config.dice_count as usize;
        let denom = (1u64 << n) as f64;
        (0..=n)
            .map(|k| {
                let raw: DiceBits = (0..n).map(|i| i < k).collect();
                (self.dice_outcome(state, &raw), binomial(n, k) as f64 / denom)
            })
            .collect()
    }

    /// Install a roll without the usual checks (search and replay).
    pub(crate) fn install_roll(&self, state: &mut GameState, roll: DiceRoll) {
        state.dice = Some(roll);
    }

    /// Install a known roll for the current player.
    pub fn set_dice(&self, state: &mut GameState, roll: DiceRoll) -> Result<(), EngineError> {
        self.require_phase(state, GamePhase::Playing)?;
        if state.dice.is_some() {
            return Err(EngineError::DiceAlreadyRolled {
                color: state.current_player,
            });
        }
        self.install_roll(state, roll);
        Ok(())
    }

    // === Queries ===

    /// Board square of a position, if on the path.
    #[must_use]
    pub fn square_of(&self, color: Color, position: PiecePosition) -> Option<Square> {
        position.path_index().and_then(|i| self.path(color).get(i))
    }

    /// Pieces of each color on a square.
    #[must_use]
    pub fn occupants(&self, state: &GameState, square: Square) -> ColorMap<PieceList> {
        ColorMap::new(|color| self.pieces_on(state, color, square))
    }

    fn pieces_on(&self, state: &GameState, color: Color, square: Square) -> PieceList {
        state
            .positions(color)
            .iter()
            .enumerate()
            .filter(|(_, &pos)| self.square_of(color, pos) == Some(square))
            .map(|(i, _)| i as u8)
            .collect()
    }

    /// Temples and houses held by exactly one color.
    #[must_use]
    pub fn board_control(&self, state: &GameState) -> BoardControl {
        let mut control = BoardControl::default();
        let special = &self.paths.special;
        for &square in &special.temples {
            if let Some(owner) = self.sole_occupant(state, square) {
                control.temples[owner] += 1;
            }
        }
        for &square in &special.houses {
            if let Some(owner) = self.sole_occupant(state, square) {
                control.houses[owner] += 1;
            }
        }
        control
    }

    fn sole_occupant(&self, state: &GameState, square: Square) -> Option<Color> {
        let occ = self.occupants(state, square);
        match (occ[Color::White].is_empty(), occ[Color::Black].is_empty()) {
            (false, true) => Some(Color::White),
            (true, false) => Some(Color::Black),
            _ => None,
        }
    }

    /// Legal moves for the current player and outstanding roll.
    ///
    /// Empty outside `Playing`, before a roll, or on a zero total.
    #[must_use]
    pub fn legal_moves(&self, state: &GameState) -> Vec<Move> {
        if state.phase != GamePhase::Playing {
            return Vec::new();
        }
        let Some(total) = state.dice_total() else {
            return Vec::new();
        };
        if total == 0 {
            return Vec::new();
        }

        let color = state.current_player;
        let mut moves = self.generate(state, color, total, Direction::Forward);
        let backward = self.config.backward_optional || moves.is_empty();
        if self.config.allow_backward_movement && backward {
            moves.extend(self.generate(state, color, total, Direction::Backward));
        }
        moves
    }

    /// Pieces that some legal move would move.
    #[must_use]
    pub fn eligible_pieces(&self, state: &GameState) -> Vec<u8> {
        let mut pieces: Vec<u8> = self
            .legal_moves(state)
            .iter()
            .flat_map(|mv| mv.moving_pieces().collect::<Vec<_>>())
            .collect();
        pieces.sort_unstable();
        pieces.dedup();
        pieces
    }

    fn generate(
        &self,
        state: &GameState,
        color: Color,
        total: u8,
        direction: Direction,
    ) -> Vec<Move> {
        let positions = state.positions(color);
        let len = self.path_len();
        let total = total as usize;
        let mut moves = Vec::new();

        for (piece, &from) in positions.iter().enumerate() {
            let piece = piece as u8;

            let dest_index = match (from, direction) {
                (PiecePosition::Finished, _) => continue,
                (PiecePosition::AtStart, Direction::Forward) => total - 1,
                (PiecePosition::AtStart, Direction::Backward) => continue,
                (PiecePosition::OnPath(i), Direction::Forward) => i as usize + total,
                (PiecePosition::OnPath(i), Direction::Backward) => {
                    match (i as usize).checked_sub(total) {
                        Some(d) => d,
                        None => continue,
                    }
                }
            };

            let carried = match self.stack_partners(positions, piece, from) {
                Some(carried) => carried,
                // Not the lowest index of its stack.
                None => continue,
            };

            let mv = if dest_index >= len {
                if dest_index > len && self.config.exact_roll_to_finish {
                    continue;
                }
                if self.gate_blocked(state, color) {
                    continue;
                }
                Move {
                    piece,
                    from,
                    to: Destination::Finish,
                    carried,
                    captured: PieceList::new(),
                    extra_turn: false,
                    backwards: false,
                }
            } else {
                let Some(square) = self.path(color).get(dest_index) else {
                    continue;
                };
                let Some((captured, extra_turn)) = self.landing(state, color, square) else {
                    continue;
                };
                Move {
                    piece,
                    from,
                    to: Destination::OnPath {
                        index: dest_index as u8,
                        square,
                    },
                    carried,
                    captured,
                    extra_turn,
                    backwards: direction == Direction::Backward,
                }
            };
            moves.push(mv);
        }
        moves
    }

    /// Own pieces sharing `piece`'s square that travel with it.
    ///
    /// `None` when a lower-indexed piece already represents the stack.
    fn stack_partners(
        &self,
        positions: &[PiecePosition],
        piece: u8,
        from: PiecePosition,
    ) -> Option<PieceList> {
        if !self.config.stacks_move_together || !matches!(from, PiecePosition::OnPath(_)) {
            return Some(PieceList::new());
        }
        let mut carried = PieceList::new();
        for (other, &pos) in positions.iter().enumerate() {
            let other = other as u8;
            if other == piece || pos != from {
                continue;
            }
            if other < piece {
                return None;
            }
            carried.push(other);
        }
        Some(carried)
    }

    /// Capture list and extra-turn flag for landing on `square`, or `None`
    /// when the landing is illegal.
    fn landing(
        &self,
        state: &GameState,
        color: Color,
        square: Square,
    ) -> Option<(PieceList, bool)> {
        let own = self.pieces_on(state, color, square);
        if !own.is_empty() {
            if !self.config.allow_stacking {
                return None;
            }
            if self.config.stack_only_on_rosettes && !self.is_rosette(square) {
                return None;
            }
        }

        let opponents = self.pieces_on(state, color.opponent(), square);
        let captured = if opponents.is_empty() {
            PieceList::new()
        } else if self.is_safe(square) {
            match self.config.safe_landing {
                SafeLanding::Blocked => return None,
                SafeLanding::Shared => PieceList::new(),
            }
        } else {
            opponents
        };

        let extra_turn = (self.config.extra_turn_on_rosette && self.is_rosette(square))
            || (self.config.extra_turn_on_capture && !captured.is_empty());
        Some((captured, extra_turn))
    }

    fn gate_blocked(&self, state: &GameState, color: Color) -> bool {
        if !self.config.gate_keeper_enabled {
            return false;
        }
        match self.paths.special.gate {
            Some(gate) => !self.pieces_on(state, color.opponent(), gate).is_empty(),
            None => false,
        }
    }

    // === Mutation ===

    /// Apply a move chosen from `legal_moves`.
    pub fn apply_move(&self, state: &mut GameState, mv: &Move) -> Result<(), EngineError> {
        self.require_phase(state, GamePhase::Playing)?;
        let color = state.current_player;
        let Some(total) = state.dice_total() else {
            return Err(EngineError::DiceNotRolled { color });
        };
        if !self.legal_moves(state).contains(mv) {
            return Err(EngineError::illegal(format!(
                "{mv} is not legal for {color} with a roll of {total}"
            )));
        }
        debug!(color = %color, total, mv = %mv, "applying move");
        self.apply_trusted(state, mv);
        if let Some(winner) = state.winner {
            info!(winner = %winner, turns = state.turn, "game over");
        }
        Ok(())
    }

    /// Apply a move already known to be legal. Used by search on states it
    /// generated itself.
    pub(crate) fn apply_trusted(&self, state: &mut GameState, mv: &Move) {
        let color = state.current_player;
        let record = MoveRecord {
            color,
            mv: mv.clone(),
            turn: state.turn,
            dice_total: state.dice_total().unwrap_or(0),
        };

        let dest = mv.to.position();
        for piece in mv.moving_pieces() {
            state.set_position(color, piece, dest);
        }
        for &captured in &mv.captured {
            state.set_position(color.opponent(), captured, PiecePosition::AtStart);
        }

        state.history.push_back(record);
        state.turn += 1;
        state.dice = None;

        if let Some(winner) = self.check_win(state) {
            state.phase = GamePhase::GameOver;
            state.winner = Some(winner);
            state.extra_turn = false;
            return;
        }

        if mv.extra_turn {
            state.extra_turn = true;
        } else {
            state.extra_turn = false;
            state.current_player = color.opponent();
        }
    }

    /// Give up the turn. Only allowed when no legal move exists.
    pub fn pass(&self, state: &mut GameState) -> Result<(), EngineError> {
        self.require_phase(state, GamePhase::Playing)?;
        let color = state.current_player;
        if state.dice.is_none() {
            return Err(EngineError::DiceNotRolled { color });
        }
        let available = self.legal_moves(state).len();
        if available > 0 {
            return Err(EngineError::illegal(format!(
                "{color} cannot pass with {available} legal moves"
            )));
        }
        self.pass_trusted(state);
        debug!(color = %color, "passed");
        Ok(())
    }

    pub(crate) fn pass_trusted(&self, state: &mut GameState) {
        state.dice = None;
        state.extra_turn = false;
        state.current_player = state.current_player.opponent();
    }

    /// Winner, if any color has finished enough pieces.
    #[must_use]
    pub fn check_win(&self, state: &GameState) -> Option<Color> {
        let needed = self.config.pieces_to_win as usize;
        Color::ALL
            .into_iter()
            .find(|&color| state.finished_count(color) >= needed)
    }

    fn require_phase(&self, state: &GameState, expected: GamePhase) -> Result<(), EngineError> {
        if state.phase == expected {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                expected,
                actual: state.phase,
            })
        }
    }
}

fn binomial(n: usize, k: usize) -> u64 {
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedDice;

    fn playing(id: VariantId, first: Color) -> (GameEngine, GameState) {
        let engine = GameEngine::builtin(id).unwrap();
        let mut state = engine.new_game();
        engine.start_with(&mut state, first).unwrap();
        (engine, state)
    }

    fn roll(engine: &GameEngine, state: &mut GameState, total: u8) {
        let mut dice = ScriptedDice::from_totals(&[total], engine.config().dice_count as usize);
        engine.roll_dice(state, &mut dice).unwrap();
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 0), 1);
        assert_eq!(binomial(4, 1), 4);
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(8, 4), 70);
    }

    #[test]
    fn test_decide_first_player() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let mut state = engine.new_game();
        let mut dice = ScriptedDice::new(vec![false]);
        let first = engine.decide_first_player(&mut state, &mut dice).unwrap();
        assert_eq!(first, Color::Black);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.current_player, Color::Black);

        let err = engine.decide_first_player(&mut state, &mut dice).unwrap_err();
        assert!(matches!(err, EngineError::WrongPhase { .. }));
    }

    #[test]
    fn test_roll_twice_rejected() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 2);
        let mut dice = ScriptedDice::from_totals(&[1], 4);
        let err = engine.roll_dice(&mut state, &mut dice).unwrap_err();
        assert_eq!(err, EngineError::DiceAlreadyRolled { color: Color::White });
    }

    #[test]
    fn test_roll_before_start_rejected() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let mut state = engine.new_game();
        let mut dice = ScriptedDice::from_totals(&[1], 4);
        assert!(engine.roll_dice(&mut state, &mut dice).is_err());
    }

    #[test]
    fn test_no_moves_without_roll() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        assert!(engine.legal_moves(&state).is_empty());
    }

    #[test]
    fn test_zero_roll_has_no_moves() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 0);
        assert!(engine.legal_moves(&state).is_empty());
        engine.pass(&mut state).unwrap();
        assert_eq!(state.current_player, Color::Black);
        assert!(state.dice.is_none());
    }

    #[test]
    fn test_cannot_pass_with_moves() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 2);
        let err = engine.pass(&mut state).unwrap_err();
        assert!(matches!(err, EngineError::IllegalMoveRequest { .. }));
        assert_eq!(state.current_player, Color::White);
    }

    #[test]
    fn test_entering_moves() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 3);
        let moves = engine.legal_moves(&state);
        assert_eq!(moves.len(), 7);
        for (i, mv) in moves.iter().enumerate() {
            assert_eq!(mv.piece, i as u8);
            assert!(mv.enters_board());
            assert_eq!(mv.to.position(), PiecePosition::OnPath(2));
        }
    }

    #[test]
    fn test_rosette_grants_extra_turn() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 4);
        let mv = engine.legal_moves(&state)[0].clone();
        assert!(mv.extra_turn);
        engine.apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.current_player, Color::White);
        assert!(state.extra_turn);
        assert!(state.dice.is_none());
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_capture_sends_home() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        // White on index 4 (first shared square), black about to land there.
        let mut state = state
            .with_positions(Color::White, &[PiecePosition::OnPath(4)])
            .with_positions(Color::Black, &[PiecePosition::OnPath(2)]);
        state.current_player = Color::Black;
        roll(&engine, &mut state, 2);

        let mv = engine
            .legal_moves(&state)
            .into_iter()
            .find(|m| m.piece == 0 && !m.enters_board())
            .unwrap();
        assert_eq!(mv.captured.as_slice(), &[0]);
        engine.apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.position(Color::White, 0), Some(PiecePosition::AtStart));
        assert_eq!(state.position(Color::Black, 0), Some(PiecePosition::OnPath(4)));
        assert_eq!(state.current_player, Color::White);
    }

    #[test]
    fn test_occupied_safe_rosette_blocks() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        // Middle rosette is index 7 on both paths.
        let mut state = state
            .with_positions(Color::Black, &[PiecePosition::OnPath(7)])
            .with_positions(Color::White, &[PiecePosition::OnPath(5)]);
        roll(&engine, &mut state, 2);
        let moves = engine.legal_moves(&state);
        assert!(moves.iter().all(|m| m.piece != 0));
    }

    #[test]
    fn test_own_piece_blocks_without_stacking() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        let mut state =
            state.with_positions(
                Color::White,
                &[PiecePosition::OnPath(1), PiecePosition::OnPath(3)],
            );
        roll(&engine, &mut state, 2);
        let moves = engine.legal_moves(&state);
        assert!(moves.iter().all(|m| m.piece != 0));
        assert!(moves.iter().any(|m| m.piece == 1));
    }

    #[test]
    fn test_exact_roll_to_finish() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        let mut state = state.with_positions(Color::White, &[PiecePosition::OnPath(12)]);
        roll(&engine, &mut state, 3);
        assert!(engine.legal_moves(&state).iter().all(|m| m.piece != 0));

        let mut state = state.clone();
        state.dice = None;
        roll(&engine, &mut state, 2);
        let mv = engine.legal_moves(&state).into_iter().find(|m| m.piece == 0).unwrap();
        assert!(mv.to.is_finish());
    }

    #[test]
    fn test_overshoot_finishes_without_exact_rule() {
        let (engine, state) = playing(VariantId::Aseb, Color::White);
        let mut state = state.with_positions(Color::White, &[PiecePosition::OnPath(15)]);
        roll(&engine, &mut state, 3);
        let mv = engine.legal_moves(&state).into_iter().find(|m| m.piece == 0).unwrap();
        assert!(mv.to.is_finish());
    }

    #[test]
    fn test_gate_keeper_blocks_finish() {
        let (engine, state) = playing(VariantId::Tournament, Color::White);
        let gate = engine.paths().special.gate.unwrap();
        let gate_index = engine.path(Color::Black).index_of(gate).unwrap() as u8;
        let mut state = state
            .with_positions(Color::White, &[PiecePosition::OnPath(13)])
            .with_positions(Color::Black, &[PiecePosition::OnPath(gate_index)]);
        roll(&engine, &mut state, 1);
        assert!(engine.legal_moves(&state).iter().all(|m| !m.to.is_finish()));

        // Same position without an enemy on the gate.
        let mut free = state.clone().with_positions(Color::Black, &[PiecePosition::AtStart]);
        free.dice = None;
        roll(&engine, &mut free, 1);
        assert!(engine.legal_moves(&free).iter().any(|m| m.to.is_finish()));
    }

    #[test]
    fn test_backward_only_when_forward_blocked() {
        let engine = GameEngine::new(
            RuleVariant {
                backward_optional: false,
                ..RuleVariant::murray()
            },
            &PathCatalog::standard(),
        )
        .unwrap();
        let mut state = engine.new_game();
        engine.start_with(&mut state, Color::White).unwrap();
        let mut state = state.with_positions(
            Color::White,
            &[
                PiecePosition::OnPath(6),
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
            ],
        );
        // Piece 6 still at start; forward moves exist.
        roll(&engine, &mut state, 2);
        assert!(engine.legal_moves(&state).iter().all(|m| !m.backwards));

        // Last piece finished too: index 6 + 2 is free, still forward only.
        let mut state = state.with_positions(
            Color::White,
            &[
                PiecePosition::OnPath(12),
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
            ],
        );
        state.dice = None;
        roll(&engine, &mut state, 4);
        let moves = engine.legal_moves(&state);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].backwards);
        assert_eq!(moves[0].to.position(), PiecePosition::OnPath(8));
    }

    #[test]
    fn test_optional_backward_listed_after_forward() {
        let (engine, state) = playing(VariantId::Murray, Color::White);
        let mut state = state.with_positions(Color::White, &[PiecePosition::OnPath(5)]);
        roll(&engine, &mut state, 2);
        let moves = engine.legal_moves(&state);
        let first_back = moves.iter().position(|m| m.backwards).unwrap();
        assert!(moves[..first_back].iter().all(|m| !m.backwards));
        assert!(moves[first_back..].iter().all(|m| m.backwards));
        assert_eq!(moves[first_back].to.position(), PiecePosition::OnPath(3));
    }

    #[test]
    fn test_stack_moves_together() {
        let (engine, state) = playing(VariantId::Skiryuk, Color::White);
        let mut state = state.with_positions(
            Color::White,
            &[PiecePosition::OnPath(5), PiecePosition::AtStart, PiecePosition::OnPath(5)],
        );
        roll(&engine, &mut state, 1);
        let moves = engine.legal_moves(&state);
        let stack = moves.iter().find(|m| m.piece == 0).unwrap();
        assert_eq!(stack.carried.as_slice(), &[2]);
        assert!(moves.iter().all(|m| m.piece != 2));

        let stack = stack.clone();
        engine.apply_move(&mut state, &stack).unwrap();
        assert_eq!(state.position(Color::White, 0), Some(PiecePosition::OnPath(6)));
        assert_eq!(state.position(Color::White, 2), Some(PiecePosition::OnPath(6)));
    }

    #[test]
    fn test_shared_safe_square_no_capture() {
        let (engine, state) = playing(VariantId::Skiryuk, Color::White);
        // Index 5 is the first market on the shared band.
        let mut state = state
            .with_positions(Color::White, &[PiecePosition::OnPath(3)])
            .with_positions(Color::Black, &[PiecePosition::OnPath(5)]);
        roll(&engine, &mut state, 2);
        let mv = engine.legal_moves(&state).into_iter().find(|m| m.piece == 0).unwrap();
        assert!(!mv.is_capture());
        engine.apply_move(&mut state, &mv).unwrap();
        let square = engine.path(Color::White).get(5).unwrap();
        let occ = engine.occupants(&state, square);
        assert_eq!(occ[Color::White].as_slice(), &[0]);
        assert_eq!(occ[Color::Black].as_slice(), &[0]);
    }

    #[test]
    fn test_illegal_move_rejected_without_change() {
        let (engine, mut state) = playing(VariantId::Finkel, Color::White);
        roll(&engine, &mut state, 2);
        let mut mv = engine.legal_moves(&state)[0].clone();
        mv.to = Destination::Finish;
        let before = state.clone();
        let err = engine.apply_move(&mut state, &mv).unwrap_err();
        assert!(matches!(err, EngineError::IllegalMoveRequest { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_win_detection() {
        let (engine, state) = playing(VariantId::Debug, Color::White);
        let mut state = state.with_positions(
            Color::White,
            &[PiecePosition::Finished, PiecePosition::OnPath(12)],
        );
        roll(&engine, &mut state, 2);
        let mv = engine.legal_moves(&state).into_iter().find(|m| m.to.is_finish()).unwrap();
        engine.apply_move(&mut state, &mv).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.winner, Some(Color::White));
        assert!(engine.legal_moves(&state).is_empty());
    }

    #[test]
    fn test_board_control() {
        let (engine, state) = playing(VariantId::Skiryuk, Color::White);
        // Index 6 is a temple; index 4 is a house.
        let state = state
            .with_positions(Color::White, &[PiecePosition::OnPath(6), PiecePosition::OnPath(4)])
            .with_positions(Color::Black, &[PiecePosition::OnPath(4)]);
        let control = engine.board_control(&state);
        assert_eq!(control.temples[Color::White], 1);
        assert_eq!(control.temples[Color::Black], 0);
        assert_eq!(control.houses[Color::White], 0);
        assert_eq!(control.houses[Color::Black], 0);
    }

    #[test]
    fn test_chance_outcomes_sum_to_one() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        let outcomes = engine.chance_outcomes(&state);
        assert_eq!(outcomes.len(), 5);
        let sum: f64 = outcomes.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((outcomes[2].1 - 6.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_eligible_pieces() {
        let (engine, state) = playing(VariantId::Finkel, Color::White);
        let mut state = state.with_positions(
            Color::White,
            &[
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::Finished,
                PiecePosition::OnPath(1),
            ],
        );
        roll(&engine, &mut state, 1);
        assert_eq!(engine.eligible_pieces(&state), vec![5, 6]);
    }
}
