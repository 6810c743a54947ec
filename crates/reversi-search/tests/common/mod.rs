#![allow(dead_code)]

use std::sync::Arc;

use reversi_search::constants::{WEIGHT_DEPTH_ONE, WEIGHT_DEPTH_ZERO};
use reversi_search::eval::{DiscCountEvaluator, IncrementalEvaluator};
use reversi_search::position::Position;
use reversi_search::search::AlphaBetaSearch;
use reversi_search::transposition_table::TranspositionTable;
use reversi_search::types::{EvalLarge, Score};

pub fn new_search() -> AlphaBetaSearch<DiscCountEvaluator> {
    AlphaBetaSearch::new(Arc::new(TranspositionTable::new(4)), DiscCountEvaluator::new())
}

fn static_eval(position: &Position) -> i32 {
    let mut eval = DiscCountEvaluator::new();
    eval.setup(position.player, position.opponent);
    eval.evaluate().value()
}

/// Exact final score by full-width negamax, in discs.
pub fn brute_force_solve(position: &Position, passed: bool) -> Score {
    let moves = position.legal_moves();
    if moves.is_empty() {
        if passed {
            return position.final_score();
        }
        return -brute_force_solve(&position.pass(), true);
    }
    moves
        .iter()
        .map(|sq| -brute_force_solve(&position.play(position.move_flip(sq)), false))
        .max()
        .unwrap()
}

/// Full-width negamax to `depth` with the disc count evaluator, blending the
/// last ply the way the search does.
pub fn reference_evaluate(position: &Position, depth: u32, passed: bool) -> EvalLarge {
    if depth == 0 {
        return EvalLarge::from_raw(static_eval(position));
    }
    let moves = position.legal_moves();
    if moves.is_empty() {
        if passed {
            return EvalLarge::from_disc_diff(position.final_score());
        }
        return -reference_evaluate(&position.pass(), depth, true);
    }
    let depth_zero = static_eval(position);
    let best = moves
        .iter()
        .map(|sq| {
            let child = position.play(position.move_flip(sq));
            if depth == 1 {
                (depth_zero * WEIGHT_DEPTH_ZERO - static_eval(&child) * WEIGHT_DEPTH_ONE)
                    / (WEIGHT_DEPTH_ZERO + WEIGHT_DEPTH_ONE)
            } else {
                -reference_evaluate(&child, depth - 1, false).value()
            }
        })
        .max()
        .unwrap();
    EvalLarge::from_raw(best)
}
