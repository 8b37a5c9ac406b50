//! Uniform random move selection.

use super::context::SearchContext;
use super::{forced, Decision, Strategy};
use crate::core::GameState;
use crate::rules::GameEngine;

/// Picks a legal move uniformly at random. Always available.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(
        &mut self,
        engine: &GameEngine,
        state: &GameState,
        ctx: &mut SearchContext,
    ) -> Decision {
        let moves = engine.legal_moves(state);
        if let Some(decision) = forced(&moves) {
            return decision;
        }
        let index = ctx.rng().gen_index(moves.len());
        Decision::Move(moves[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, ScriptedDice};
    use crate::rules::VariantId;

    #[test]
    fn test_random_picks_legal_move() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let mut state = engine.new_game();
        engine.start_with(&mut state, Color::White).unwrap();
        engine
            .roll_dice(&mut state, &mut ScriptedDice::from_totals(&[2], 4))
            .unwrap();

        let legal = engine.legal_moves(&state);
        let mut ctx = SearchContext::new(9);
        for _ in 0..20 {
            match RandomStrategy.choose(&engine, &state, &mut ctx) {
                Decision::Move(mv) => assert!(legal.contains(&mv)),
                Decision::Pass => panic!("moves were available"),
            }
        }
    }

    #[test]
    fn test_random_passes_without_moves() {
        let engine = GameEngine::builtin(VariantId::Finkel).unwrap();
        let mut state = engine.new_game();
        engine.start_with(&mut state, Color::White).unwrap();
        engine
            .roll_dice(&mut state, &mut ScriptedDice::from_totals(&[0], 4))
            .unwrap();
        let mut ctx = SearchContext::new(9);
        assert_eq!(RandomStrategy.choose(&engine, &state, &mut ctx), Decision::Pass);
    }
}
