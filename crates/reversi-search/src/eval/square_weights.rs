//! Positional evaluator based on a fixed square weight table.

use crate::bitboard::Bitboard;
use crate::eval::IncrementalEvaluator;
use crate::square::Square;
use crate::types::EvalLarge;

/// Value of owning each square, A1 first.
#[rustfmt::skip]
const SQUARE_WEIGHTS: [i32; 64] = [
    20, -3, 11,  8,  8, 11, -3, 20,
    -3, -7, -4,  1,  1, -4, -7, -3,
    11, -4,  2,  2,  2,  2, -4, 11,
     8,  1,  2, -3, -3,  2,  1,  8,
     8,  1,  2, -3, -3,  2,  1,  8,
    11, -4,  2,  2,  2,  2, -4, 11,
    -3, -7, -4,  1,  1, -4, -7, -3,
    20, -3, 11,  8,  8, 11, -3, 20,
];

/// Sums the square weights plus one point per disc for each side.
///
/// The two sums are maintained incrementally: a move only touches the squares
/// of its flip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SquareWeightEvaluator {
    player_sum: i32,
    opponent_sum: i32,
}

#[inline]
fn weight_of(b: Bitboard) -> i32 {
    b.iter().map(|sq| SQUARE_WEIGHTS[sq.index()] + 1).sum()
}

impl SquareWeightEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncrementalEvaluator for SquareWeightEvaluator {
    fn setup(&mut self, player: Bitboard, opponent: Bitboard) {
        self.player_sum = weight_of(player);
        self.opponent_sum = weight_of(opponent);
    }

    #[inline]
    fn evaluate(&self) -> EvalLarge {
        let raw = 4 * (self.player_sum - self.opponent_sum);
        EvalLarge::from_raw(raw.clamp(EvalLarge::MIN.value(), EvalLarge::MAX.value()))
    }

    #[inline]
    fn update(&mut self, square: Square, flip: Bitboard) {
        let captured = weight_of(flip.remove(square));
        self.player_sum -= captured;
        self.opponent_sum += captured + SQUARE_WEIGHTS[square.index()] + 1;
    }

    #[inline]
    fn undo_update(&mut self, square: Square, flip: Bitboard) {
        let captured = weight_of(flip.remove(square));
        self.player_sum += captured;
        self.opponent_sum -= captured + SQUARE_WEIGHTS[square.index()] + 1;
    }

    #[inline]
    fn invert(&mut self) {
        std::mem::swap(&mut self.player_sum, &mut self.opponent_sum);
    }
}
