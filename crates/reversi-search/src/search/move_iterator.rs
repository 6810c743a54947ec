//! Move ordering for the alpha-beta search.
//!
//! Each node picks a [`Strategy`] from its remaining depth, the search mode
//! and whether it is unlikely to raise the lower bound. Cheap strategies are
//! used where the subtree is small; expensive, better ordered ones higher up.

use arrayvec::ArrayVec;

use crate::bitboard::{Bitboard, CENTRAL, CORNERS, EDGE, X_SQUARES};
use crate::constants::{MAX_DEPTH, MIN_EMPTIES_FOR_DISPROOF_NUMBER};
use crate::estimators::disproof_number_over_prob;
use crate::eval::IncrementalEvaluator;
use crate::flip::move_flip;
use crate::search::stats::{Stats, StatsType};
use crate::square::Square;
use crate::transposition_table::HashEntry;
use crate::types::{Depth, EvalLarge};

/// Bonus of each square when breaking ties between moves with the same mobility.
#[rustfmt::skip]
const SQUARE_VALUE: [i32; 64] = [
    18,  4, 16, 12, 12, 16,  4, 18,
     4,  2,  6,  8,  8,  6,  2,  4,
    16,  6, 14, 10, 10, 14,  6, 16,
    12,  8, 10,  0,  0, 10,  8, 12,
    12,  8, 10,  0,  0, 10,  8, 12,
    16,  6, 14, 10, 10, 14,  6, 16,
     4,  2,  6,  8,  8,  6,  2,  4,
    18,  4, 16, 12, 12, 16,  4, 18,
];

/// Score forced on the move suggested by the transposition table.
const HASH_MOVE_VALUE: i32 = 99_999_999;

/// Move ordering strategy of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Candidate squares in bit order.
    VeryQuick,
    /// Fixed priority tiers, few of them.
    QuickShallow,
    /// Fixed priority tiers with more edge and corner patterns.
    QuickDeep,
    /// All moves, fewest opponent replies first.
    MinimizeOpponentMoves,
    /// All moves, cheapest estimated refutation first.
    DisproofNumber,
}

impl Strategy {
    fn select(depth: Depth, solve: bool, unlikely: bool) -> Strategy {
        if unlikely {
            if depth <= 9 {
                Strategy::VeryQuick
            } else {
                Strategy::QuickShallow
            }
        } else if (solve && depth <= 8) || (!solve && depth <= 2) {
            Strategy::QuickShallow
        } else if (solve && depth <= 9) || (!solve && depth <= 4) {
            Strategy::QuickDeep
        } else if !solve || depth < MIN_EMPTIES_FOR_DISPROOF_NUMBER {
            Strategy::MinimizeOpponentMoves
        } else {
            Strategy::DisproofNumber
        }
    }
}

/// Strategy lookup by `(depth, solve, unlikely)`, built once per search object.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    strategies: [Strategy; 4 * MAX_DEPTH],
}

impl StrategyTable {
    pub fn new() -> Self {
        let mut strategies = [Strategy::VeryQuick; 4 * MAX_DEPTH];
        for depth in 0..MAX_DEPTH {
            for solve in [false, true] {
                for unlikely in [false, true] {
                    strategies[Self::offset(depth, solve, unlikely)] =
                        Strategy::select(depth as Depth, solve, unlikely);
                }
            }
        }
        StrategyTable { strategies }
    }

    #[inline(always)]
    fn offset(depth: usize, solve: bool, unlikely: bool) -> usize {
        depth.min(MAX_DEPTH - 1)
            + if solve { MAX_DEPTH } else { 0 }
            + if unlikely { 2 * MAX_DEPTH } else { 0 }
    }

    /// Strategy for a node.
    #[inline]
    pub fn get(&self, depth: Depth, solve: bool, unlikely: bool) -> Strategy {
        self.strategies[Self::offset(depth as usize, solve, unlikely)]
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces the legal moves of a node one at a time, as move flips.
pub trait MoveIterator {
    /// Returns the next legal move flip, or `None` once every move was returned.
    fn next_flip(&mut self, stats: &mut Stats) -> Option<Bitboard>;
}

/// Empty squares next to an opponent disc: every legal move is one of them.
#[inline(always)]
fn candidates(player: Bitboard, opponent: Bitboard) -> Bitboard {
    player.potential_moves(opponent)
}

/// Tries candidate squares in bit order.
pub struct VeryQuickIterator {
    player: Bitboard,
    opponent: Bitboard,
    candidates: Bitboard,
}

impl VeryQuickIterator {
    pub fn new(player: Bitboard, opponent: Bitboard) -> Self {
        VeryQuickIterator {
            player,
            opponent,
            candidates: candidates(player, opponent),
        }
    }
}

impl MoveIterator for VeryQuickIterator {
    fn next_flip(&mut self, stats: &mut Stats) -> Option<Bitboard> {
        while let Some(sq) = self.candidates.lsb_square() {
            self.candidates = self.candidates.clear_lsb();
            let flip = move_flip(sq, self.player.bits(), self.opponent.bits());
            if flip != 0 {
                stats.add(1, StatsType::VeryQuick);
                return Some(Bitboard::new(flip));
            }
        }
        None
    }
}

/// Tries candidate squares tier by tier; the last tier holds every square.
pub struct QuickIterator {
    player: Bitboard,
    opponent: Bitboard,
    candidates: Bitboard,
    masks: ArrayVec<Bitboard, 9>,
    current_mask: usize,
    counter: StatsType,
}

impl QuickIterator {
    /// Few tiers, for small subtrees.
    pub fn shallow(player: Bitboard, opponent: Bitboard, last_flip: Bitboard) -> Self {
        let empties = !(player | opponent);
        let masks = [
            !empties.neighbors() & player.neighbors(),
            CORNERS,
            if last_flip.intersects(X_SQUARES) {
                last_flip.neighbors()
            } else {
                Bitboard::EMPTY
            },
            CENTRAL,
            EDGE,
            Bitboard::ALL,
        ];
        Self::with_masks(player, opponent, &masks, StatsType::Quick1)
    }

    /// More tiers around corners and edges, for larger subtrees.
    pub fn deep(player: Bitboard, opponent: Bitboard, last_flip: Bitboard) -> Self {
        let empties = !(player | opponent);
        let neighbors_player = player.neighbors();
        let masks = [
            !empties.neighbors() & neighbors_player,
            empties.unique_in_edges() & neighbors_player,
            last_flip.neighbors() & CORNERS,
            CORNERS,
            empties.first_last_in_edges(),
            if last_flip.intersects(X_SQUARES) {
                last_flip.neighbors()
            } else {
                Bitboard::EMPTY
            },
            CENTRAL,
            EDGE,
            Bitboard::ALL,
        ];
        Self::with_masks(player, opponent, &masks, StatsType::Quick2)
    }

    fn with_masks(player: Bitboard, opponent: Bitboard, masks: &[Bitboard], counter: StatsType) -> Self {
        QuickIterator {
            player,
            opponent,
            candidates: candidates(player, opponent),
            masks: masks.iter().copied().collect(),
            current_mask: 0,
            counter,
        }
    }
}

impl MoveIterator for QuickIterator {
    fn next_flip(&mut self, stats: &mut Stats) -> Option<Bitboard> {
        while !self.candidates.is_empty() {
            while (self.masks[self.current_mask] & self.candidates).is_empty() {
                self.current_mask += 1;
            }
            let tier = self.masks[self.current_mask] & self.candidates;
            let sq = tier.lsb_square()?;
            self.candidates = self.candidates.remove(sq);
            let flip = move_flip(sq, self.player.bits(), self.opponent.bits());
            if flip != 0 {
                stats.add(1, self.counter);
                return Some(Bitboard::new(flip));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct ScoredMove {
    flip: Bitboard,
    value: i32,
}

/// Scores every legal move up front and returns them best first.
pub struct EvalIterator {
    moves: ArrayVec<ScoredMove, 64>,
}

impl EvalIterator {
    /// Ranks moves by the mobility they leave to the opponent.
    pub fn minimize_opponent_moves(
        player: Bitboard,
        opponent: Bitboard,
        entry: Option<&HashEntry>,
    ) -> Self {
        Self::with_scorer(player, opponent, entry, |sq, flip| {
            let moves = (opponent & !flip).moves(player | flip);
            -((moves.count() + (moves & CORNERS).count()) as i32) * 1000 + SQUARE_VALUE[sq.index()]
        })
    }

    /// Ranks moves by the estimated cost of refuting `upper` after them,
    /// divided by the probability that the refutation succeeds.
    ///
    /// `evaluator` must hold the node inverted; each move is applied to it and
    /// undone before the next one.
    pub fn disproof_number<E: IncrementalEvaluator>(
        player: Bitboard,
        opponent: Bitboard,
        upper: EvalLarge,
        entry: Option<&HashEntry>,
        evaluator: &mut E,
    ) -> Self {
        Self::with_scorer(player, opponent, entry, |sq, flip| {
            evaluator.update(sq, flip);
            let eval = evaluator.evaluate();
            let value = -disproof_number_over_prob(opponent & !flip, player | flip, -upper, eval);
            evaluator.undo_update(sq, flip);
            value
        })
    }

    fn with_scorer(
        player: Bitboard,
        opponent: Bitboard,
        entry: Option<&HashEntry>,
        mut score: impl FnMut(Square, Bitboard) -> i32,
    ) -> Self {
        let hash_move = entry.and_then(|e| e.best_move);
        let mut moves = ArrayVec::new();
        for sq in candidates(player, opponent) {
            let flip = Bitboard::new(move_flip(sq, player.bits(), opponent.bits()));
            if flip.is_empty() {
                continue;
            }
            let value = if hash_move == Some(sq) {
                HASH_MOVE_VALUE
            } else {
                score(sq, flip)
            };
            moves.push(ScoredMove { flip, value });
        }
        EvalIterator { moves }
    }
}

impl MoveIterator for EvalIterator {
    fn next_flip(&mut self, stats: &mut Stats) -> Option<Bitboard> {
        if self.moves.is_empty() {
            return None;
        }
        stats.add(1, StatsType::MovesOrDisproof);
        let mut best = 0;
        for (i, m) in self.moves.iter().enumerate() {
            if m.value > self.moves[best].value {
                best = i;
            }
        }
        Some(self.moves.swap_remove(best).flip)
    }
}

/// The move iterator of one node, whichever strategy it uses.
pub enum NodeMoves {
    VeryQuick(VeryQuickIterator),
    Quick(QuickIterator),
    Eval(EvalIterator),
}

impl NodeMoves {
    /// Prepares the moves of a node.
    ///
    /// # Arguments
    ///
    /// * `strategy` - How to order the moves
    /// * `player`, `opponent` - The node's position
    /// * `last_flip` - Move flip of the move that led to the node
    /// * `upper` - Upper bound of the node's window
    /// * `entry` - Transposition table entry of the node, if any
    /// * `evaluator` - Leaf evaluator, holding the node inverted
    pub fn setup<E: IncrementalEvaluator>(
        strategy: Strategy,
        player: Bitboard,
        opponent: Bitboard,
        last_flip: Bitboard,
        upper: EvalLarge,
        entry: Option<&HashEntry>,
        evaluator: &mut E,
    ) -> Self {
        match strategy {
            Strategy::VeryQuick => NodeMoves::VeryQuick(VeryQuickIterator::new(player, opponent)),
            Strategy::QuickShallow => {
                NodeMoves::Quick(QuickIterator::shallow(player, opponent, last_flip))
            }
            Strategy::QuickDeep => NodeMoves::Quick(QuickIterator::deep(player, opponent, last_flip)),
            Strategy::MinimizeOpponentMoves => NodeMoves::Eval(
                EvalIterator::minimize_opponent_moves(player, opponent, entry),
            ),
            Strategy::DisproofNumber => NodeMoves::Eval(EvalIterator::disproof_number(
                player, opponent, upper, entry, evaluator,
            )),
        }
    }
}

impl MoveIterator for NodeMoves {
    #[inline]
    fn next_flip(&mut self, stats: &mut Stats) -> Option<Bitboard> {
        match self {
            NodeMoves::VeryQuick(it) => it.next_flip(stats),
            NodeMoves::Quick(it) => it.next_flip(stats),
            NodeMoves::Eval(it) => it.next_flip(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::DiscCountEvaluator;
    use crate::position::Position;
    use crate::random::random_position;

    fn drain(mut it: impl MoveIterator) -> (Vec<Bitboard>, Stats) {
        let mut stats = Stats::new();
        let mut flips = Vec::new();
        while let Some(flip) = it.next_flip(&mut stats) {
            flips.push(flip);
        }
        (flips, stats)
    }

    fn legal_flips(pos: &Position) -> Vec<Bitboard> {
        let mut flips: Vec<Bitboard> = pos.legal_moves().iter().map(|sq| pos.move_flip(sq)).collect();
        flips.sort_by_key(|f| f.bits());
        flips
    }

    fn sorted(mut flips: Vec<Bitboard>) -> Vec<Bitboard> {
        flips.sort_by_key(|f| f.bits());
        flips
    }

    #[test]
    fn test_strategy_table() {
        let table = StrategyTable::new();
        assert_eq!(table.get(9, true, true), Strategy::VeryQuick);
        assert_eq!(table.get(10, false, true), Strategy::QuickShallow);
        assert_eq!(table.get(8, true, false), Strategy::QuickShallow);
        assert_eq!(table.get(9, true, false), Strategy::QuickDeep);
        assert_eq!(table.get(11, true, false), Strategy::MinimizeOpponentMoves);
        assert_eq!(table.get(12, true, false), Strategy::DisproofNumber);
        assert_eq!(table.get(2, false, false), Strategy::QuickShallow);
        assert_eq!(table.get(4, false, false), Strategy::QuickDeep);
        assert_eq!(table.get(40, false, false), Strategy::MinimizeOpponentMoves);
    }

    #[test]
    fn test_every_strategy_returns_each_legal_move_once() {
        let mut eval = DiscCountEvaluator::new();
        for _ in 0..200 {
            let pos = random_position(0.4, 0.4);
            let expected = legal_flips(&pos);
            eval.setup(pos.opponent, pos.player);
            let last_flip = Square::B2.bitboard() | Square::C3.bitboard();
            for strategy in [
                Strategy::VeryQuick,
                Strategy::QuickShallow,
                Strategy::QuickDeep,
                Strategy::MinimizeOpponentMoves,
                Strategy::DisproofNumber,
            ] {
                let it = NodeMoves::setup(
                    strategy,
                    pos.player,
                    pos.opponent,
                    last_flip,
                    EvalLarge::ZERO,
                    None,
                    &mut eval,
                );
                let (flips, stats) = drain(it);
                assert_eq!(sorted(flips), expected, "{strategy:?}\n{pos}");
                assert_eq!(stats.n_visited(), expected.len() as u64);
            }
        }
    }

    #[test]
    fn test_counters() {
        let pos = Position::new();
        let (_, stats) = drain(QuickIterator::shallow(pos.player, pos.opponent, Bitboard::EMPTY));
        assert_eq!(stats.get(StatsType::Quick1), 4);
        let (_, stats) = drain(QuickIterator::deep(pos.player, pos.opponent, Bitboard::EMPTY));
        assert_eq!(stats.get(StatsType::Quick2), 4);
        let (_, stats) = drain(VeryQuickIterator::new(pos.player, pos.opponent));
        assert_eq!(stats.get(StatsType::VeryQuick), 4);
    }

    #[test]
    fn test_quick_prefers_corners() {
        // Black to move can take A1 or play D6.
        let pos = Position::from_string(
            "-OX-----\
             --------\
             --------\
             ---OX---\
             ---XO---\
             --------\
             --------\
             --------",
            'X',
        )
        .unwrap();
        let (flips, _) = drain(QuickIterator::shallow(pos.player, pos.opponent, Bitboard::EMPTY));
        assert_eq!(flips[0] & pos.empties(), Square::A1.bitboard());
    }

    #[test]
    fn test_hash_move_comes_first() {
        let pos = Position::new();
        let entry = HashEntry {
            player: pos.player.bits(),
            opponent: pos.opponent.bits(),
            depth: 3,
            lower: EvalLarge::MIN,
            upper: EvalLarge::MAX,
            best_move: Some(Square::E6),
            second_best_move: None,
        };
        let (flips, _) = drain(EvalIterator::minimize_opponent_moves(
            pos.player,
            pos.opponent,
            Some(&entry),
        ));
        assert_eq!(flips[0], pos.move_flip(Square::E6));
    }

    #[test]
    fn test_minimize_opponent_moves_order() {
        let pos = random_position(0.35, 0.35);
        let (flips, _) = drain(EvalIterator::minimize_opponent_moves(pos.player, pos.opponent, None));
        let mobility: Vec<u32> = flips
            .iter()
            .map(|&f| {
                let child = pos.play(f);
                let m = child.legal_moves();
                m.count() + (m & CORNERS).count()
            })
            .collect();
        assert!(mobility.windows(2).all(|w| w[0] <= w[1]), "{mobility:?}");
    }

    #[test]
    fn test_disproof_number_restores_evaluator() {
        let pos = Position::new();
        let mut eval = DiscCountEvaluator::new();
        eval.setup(pos.opponent, pos.player);
        let before = eval.clone();
        let _ = EvalIterator::disproof_number(pos.player, pos.opponent, EvalLarge::ZERO, None, &mut eval);
        assert_eq!(eval, before);
    }
}
