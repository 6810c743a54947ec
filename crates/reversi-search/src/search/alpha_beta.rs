//! Negamax alpha-beta search.
//!
//! One recursive procedure serves two modes. In *evaluate* mode the remaining
//! depth is smaller than the number of empty squares and leaves are scored by
//! the incremental evaluator. In *solve* mode the depth equals the number of
//! empty squares and the result is the exact final score, found under an
//! optional node budget.
//!
//! Each node tries, in order: a stability cutoff, a transposition table
//! cutoff, an estimate of the work needed to refute it (solve mode only, may
//! abort the search), then its moves in the order picked by
//! [`StrategyTable`]. Exact searches hand over to the last-moves solver when
//! five empties remain after the move.

use std::sync::Arc;

use log::debug;

use crate::bitboard::Bitboard;
use crate::constants::{
    MIN_DEPTH_FOR_HASH_MAP, MIN_EMPTIES_FOR_DISPROOF_NUMBER, MIN_EMPTIES_FOR_HASH_MAP,
    WEIGHT_DEPTH_ONE, WEIGHT_DEPTH_ZERO,
};
use crate::estimators::{byte_to_proof_number, proof_number};
use crate::eval::{IncrementalEvaluator, ScopedInvert, ScopedUpdate};
use crate::position::{Position, final_score};
use crate::search::config::SearchConfig;
use crate::search::last_moves::solve5;
use crate::search::move_iterator::{MoveIterator, NodeMoves, StrategyTable};
use crate::search::stats::{Stats, StatsType};
use crate::search::{SearchAborted, UNLIMITED_VISITS};
use crate::stability::{refine_stable, upper_bound_from_stable};
use crate::transposition_table::TranspositionTable;
use crate::types::{Depth, EvalLarge};
use crate::{estimators, stability};

/// Stability cutoffs are only tried above this remaining depth.
const MIN_DEPTH_FOR_STABILITY_CUTOFF: Depth = 3;

/// Deepest node allowed to switch to a cheaper ordering when it is unlikely to
/// raise its lower bound.
const MAX_DEPTH_FOR_UNLIKELY: Depth = 13;

/// Exact search depth whose children go to the five-empties solver.
const DEPTH_FOR_LAST_5: Depth = 6;

/// Minimum depth for estimating the work of a refutation.
const MIN_DEPTH_FOR_EARLY_FILTER: Depth = 14;

#[inline(always)]
fn use_hash_map(depth: Depth, solve: bool) -> bool {
    if solve {
        depth >= MIN_EMPTIES_FOR_HASH_MAP
    } else {
        depth >= MIN_DEPTH_FOR_HASH_MAP
    }
}

#[inline(always)]
fn update_evaluator(depth: Depth, solve: bool) -> bool {
    !solve || depth >= MIN_EMPTIES_FOR_DISPROOF_NUMBER
}

/// Estimated nodes to prove that the side to move in `position` scores at
/// least `lower`. `evaluator` holds `position`.
#[inline]
fn visited_to_prove<E: IncrementalEvaluator>(
    position: &Position,
    lower: EvalLarge,
    evaluator: &E,
) -> f64 {
    let byte = proof_number(position.player, position.opponent, lower, evaluator.evaluate());
    byte_to_proof_number(byte).trunc()
}

/// Estimated nodes to prove that no move of `position` reaches `upper`.
///
/// `evaluator` holds `position` from the opponent's point of view, as it does
/// while the moves of a node are being searched.
fn visited_to_disprove<E: IncrementalEvaluator>(
    position: &Position,
    upper: EvalLarge,
    evaluator: &mut E,
) -> f64 {
    let candidates = position.opponent.neighbors() & position.empties();
    let mut total = 0.0;
    for sq in candidates {
        let flip = position.move_flip(sq);
        if flip.is_empty() {
            continue;
        }
        let child_eval = ScopedUpdate::new(&mut *evaluator, sq, flip, true);
        total += visited_to_prove(&position.play(flip), -upper, &*child_eval);
    }
    total
}

/// Budget left to a child once the estimated work of its siblings is set aside.
#[inline(always)]
fn child_budget(max_visited: u64, reserved: f64) -> u64 {
    if max_visited == UNLIMITED_VISITS {
        max_visited
    } else {
        max_visited.saturating_sub(reserved as u64)
    }
}

/// Alpha-beta search driven by an incremental leaf evaluator.
///
/// The transposition table may be shared with other searches; everything else
/// belongs to this instance and is reset by each call to
/// [`evaluate_with_window`](Self::evaluate_with_window).
pub struct AlphaBetaSearch<E: IncrementalEvaluator> {
    tt: Arc<TranspositionTable>,
    evaluator: E,
    stats: Stats,
    strategies: StrategyTable,
    max_visited: u64,
}

impl<E: IncrementalEvaluator> AlphaBetaSearch<E> {
    /// Creates a search on a shared transposition table, without node budget.
    pub fn new(tt: Arc<TranspositionTable>, evaluator: E) -> Self {
        stability::init();
        estimators::init();

        AlphaBetaSearch {
            tt,
            evaluator,
            stats: Stats::new(),
            strategies: StrategyTable::new(),
            max_visited: UNLIMITED_VISITS,
        }
    }

    /// Creates a search with its own transposition table.
    pub fn with_config(config: &SearchConfig, evaluator: E) -> Self {
        let mut search = Self::new(Arc::new(TranspositionTable::new(config.tt_mb_size)), evaluator);
        search.max_visited = config.max_visited;
        search
    }

    /// Searches `position` to `depth` with the full window and the configured
    /// node budget.
    pub fn evaluate(&mut self, position: &Position, depth: Depth) -> Result<EvalLarge, SearchAborted> {
        self.evaluate_with_window(position, depth, EvalLarge::MIN, EvalLarge::MAX, self.max_visited)
    }

    /// Searches `position` to `depth` within the window `[lower, upper]`.
    ///
    /// `depth` is capped at the number of empty squares. When it reaches it,
    /// the result is exact.
    ///
    /// # Returns
    ///
    /// A fail-soft value: exact when strictly inside the window, otherwise a
    /// bound on the same side. `Err(SearchAborted)` when an exact search would
    /// visit more than `max_visited` nodes.
    pub fn evaluate_with_window(
        &mut self,
        position: &Position,
        depth: Depth,
        lower: EvalLarge,
        upper: EvalLarge,
        max_visited: u64,
    ) -> Result<EvalLarge, SearchAborted> {
        debug_assert!(EvalLarge::MIN <= lower && lower < upper && upper <= EvalLarge::MAX);
        self.stats.reset();
        let n_empties = position.n_empties();
        let depth = depth.min(n_empties);
        let solve = depth == n_empties;
        self.evaluator.setup(position.player, position.opponent);
        self.stats.add(1, StatsType::Last5);
        debug!(
            "{} depth {} in [{}, {}], budget {}",
            if solve { "solve" } else { "evaluate" },
            depth,
            lower,
            upper,
            max_visited
        );

        let result = if !solve && depth == 0 {
            Ok(self.evaluator.evaluate())
        } else {
            let mut node = NodeSearch {
                tt: &self.tt,
                stats: &mut self.stats,
                strategies: &self.strategies,
            };
            let root = NodeArgs {
                position: *position,
                depth,
                passed: false,
                lower,
                upper,
                last_flip: Bitboard::EMPTY,
                stable: Bitboard::EMPTY,
                max_visited,
            };
            if solve {
                node.search::<true, E>(&mut self.evaluator, root)
            } else {
                node.search::<false, E>(&mut self.evaluator, root)
            }
        };

        match result {
            Ok(eval) => debug!("result {} ({})", eval, self.stats),
            Err(_) => debug!("aborted ({})", self.stats),
        }
        result
    }

    /// Nodes visited by the last search.
    #[inline]
    pub fn n_visited(&self) -> u64 {
        self.stats.n_visited()
    }

    /// Counters of the last search.
    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn transposition_table(&self) -> &Arc<TranspositionTable> {
        &self.tt
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Node budget used by [`evaluate`](Self::evaluate).
    pub fn max_visited(&self) -> u64 {
        self.max_visited
    }
}

/// Arguments of one node.
#[derive(Debug, Clone, Copy)]
struct NodeArgs {
    position: Position,
    depth: Depth,
    /// The previous move was a pass.
    passed: bool,
    lower: EvalLarge,
    upper: EvalLarge,
    /// Move flip of the move that led here.
    last_flip: Bitboard,
    /// Discs known to be stable.
    stable: Bitboard,
    max_visited: u64,
}

/// State shared by every node of one search.
struct NodeSearch<'a> {
    tt: &'a TranspositionTable,
    stats: &'a mut Stats,
    strategies: &'a StrategyTable,
}

impl NodeSearch<'_> {
    fn search<const SOLVE: bool, E: IncrementalEvaluator>(
        &mut self,
        evaluator: &mut E,
        node: NodeArgs,
    ) -> Result<EvalLarge, SearchAborted> {
        let NodeArgs {
            position: pos,
            depth,
            passed,
            lower,
            upper,
            last_flip,
            stable,
            max_visited,
        } = node;
        debug_assert!(EvalLarge::MIN <= lower && lower < EvalLarge::MAX);
        debug_assert!(EvalLarge::MIN < upper && upper <= EvalLarge::MAX);

        let mut new_stable = stable;
        let mut stability_upper = upper;
        if depth > MIN_DEPTH_FOR_STABILITY_CUTOFF {
            new_stable = refine_stable(pos.opponent, pos.player, stable);
            stability_upper =
                EvalLarge::from_disc_diff(upper_bound_from_stable(new_stable, pos.opponent));
            if stability_upper <= lower {
                return Ok(stability_upper);
            }
        }

        let use_hash = use_hash_map(depth, SOLVE);
        let entry = if use_hash { self.tt.get(&pos) } else { None };
        if let Some(e) = entry.as_ref().filter(|e| e.depth >= depth) {
            if e.lower >= upper || e.lower == e.upper {
                return Ok(e.lower);
            } else if e.upper <= lower {
                return Ok(e.upper);
            }
        }

        let update_eval = update_evaluator(depth, SOLVE);
        let depth_zero_eval = if update_eval { evaluator.evaluate() } else { lower };
        let mut evaluator = ScopedInvert::new(evaluator, update_eval);

        let unlikely = depth <= MAX_DEPTH_FOR_UNLIKELY
            && (stability_upper < lower + 120 || depth_zero_eval < lower - 40);
        let mut moves = NodeMoves::setup(
            self.strategies.get(depth, SOLVE, unlikely),
            pos.player,
            pos.opponent,
            last_flip,
            upper,
            entry.as_ref(),
            &mut *evaluator,
        );

        // Without a budget the estimate could only ever shrink children's budgets.
        let limited = max_visited != UNLIMITED_VISITS;
        let try_early_filter = SOLVE
            && limited
            && depth >= MIN_DEPTH_FOR_EARLY_FILTER
            && depth_zero_eval < upper - 32;
        let mut to_be_visited = 0.0;
        if try_early_filter {
            to_be_visited = visited_to_disprove(&pos, upper, &mut *evaluator);
        }
        if SOLVE && limited && to_be_visited + self.stats.n_visited() as f64 > max_visited as f64 {
            return Err(SearchAborted);
        }

        let empties = pos.empties();
        let mut best: Option<EvalLarge> = None;
        let mut best_move = None;
        let mut second_best: Option<EvalLarge> = None;
        let mut second_best_move = None;

        while let Some(flip) = moves.next_flip(self.stats) {
            let Some(square) = (flip & empties).lsb_square() else {
                continue;
            };
            let child = pos.play(flip);
            let alpha = best.map_or(lower, |b| b.max(lower));
            let mut child_eval = ScopedUpdate::new(&mut *evaluator, square, flip, update_eval);

            let eval = if SOLVE && depth == DEPTH_FOR_LAST_5 {
                let mut n_visited = 0i64;
                let score = solve5(
                    child.player,
                    child.opponent,
                    (-upper).to_lower_disc(),
                    (-alpha).to_upper_disc(),
                    flip,
                    new_stable,
                    &mut n_visited,
                );
                self.stats.add_signed(n_visited, StatsType::Last5);
                -EvalLarge::from_disc_diff(score)
            } else if !SOLVE && depth == 1 {
                (depth_zero_eval * WEIGHT_DEPTH_ZERO - child_eval.evaluate() * WEIGHT_DEPTH_ONE)
                    / (WEIGHT_DEPTH_ZERO + WEIGHT_DEPTH_ONE)
            } else {
                if try_early_filter {
                    to_be_visited -= visited_to_prove(&child, -upper, &*child_eval);
                }
                let child_node = NodeArgs {
                    position: child,
                    depth: depth.saturating_sub(1),
                    passed: false,
                    lower: -upper,
                    upper: -alpha,
                    last_flip: flip,
                    stable: new_stable,
                    max_visited: child_budget(max_visited, to_be_visited),
                };
                -self.search::<SOLVE, E>(&mut *child_eval, child_node)?
            };

            if best.is_none_or(|b| eval > b) {
                second_best = best;
                second_best_move = best_move;
                best = Some(eval);
                best_move = Some(square);
            } else if second_best.is_none_or(|s| eval > s) {
                second_best = Some(eval);
                second_best_move = Some(square);
            }
            if eval >= upper {
                break;
            }
        }

        let Some(best) = best else {
            if passed {
                return Ok(EvalLarge::from_disc_diff(final_score(pos.player, pos.opponent)));
            }
            self.stats.add(1, StatsType::Pass);
            let pass_node = NodeArgs {
                position: pos.pass(),
                passed: true,
                lower: -upper,
                upper: -lower,
                stable: new_stable,
                ..node
            };
            return Ok(-self.search::<SOLVE, E>(&mut *evaluator, pass_node)?);
        };

        if use_hash {
            self.tt.update(&pos, depth, best, lower, upper, best_move, second_best_move);
        }
        Ok(best)
    }
}
