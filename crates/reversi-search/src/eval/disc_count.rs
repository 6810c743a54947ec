//! Disc count evaluator.

use crate::bitboard::Bitboard;
use crate::eval::IncrementalEvaluator;
use crate::square::Square;
use crate::types::EvalLarge;

/// Scores a position as `8 * (player discs - opponent discs + 2)`.
///
/// The constant offset makes depth-zero and depth-one scores distinguishable
/// in tests; the evaluator is mostly a reference for the search itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscCountEvaluator {
    player: Bitboard,
    opponent: Bitboard,
}

impl DiscCountEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncrementalEvaluator for DiscCountEvaluator {
    fn setup(&mut self, player: Bitboard, opponent: Bitboard) {
        self.player = player;
        self.opponent = opponent;
    }

    #[inline]
    fn evaluate(&self) -> EvalLarge {
        let diff = self.player.count() as i32 - self.opponent.count() as i32;
        EvalLarge::from_disc_diff(diff + 2)
    }

    #[inline]
    fn update(&mut self, _square: Square, flip: Bitboard) {
        self.player &= !flip;
        self.opponent |= flip;
    }

    #[inline]
    fn undo_update(&mut self, square: Square, flip: Bitboard) {
        self.player = (self.player | flip).remove(square);
        self.opponent &= !flip;
    }

    #[inline]
    fn invert(&mut self) {
        std::mem::swap(&mut self.player, &mut self.opponent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_evaluate_start() {
        let pos = Position::new();
        let mut eval = DiscCountEvaluator::new();
        eval.setup(pos.player, pos.opponent);
        assert_eq!(eval.evaluate(), EvalLarge::from_raw(16));
    }

    #[test]
    fn test_update_and_undo() {
        let pos = Position::new();
        let mut eval = DiscCountEvaluator::new();
        eval.setup(pos.player, pos.opponent);
        eval.invert();
        let before = eval.clone();

        let flip = pos.move_flip(Square::F5);
        eval.update(Square::F5, flip);
        let child = pos.play(flip);
        let mut expected = DiscCountEvaluator::new();
        expected.setup(child.player, child.opponent);
        assert_eq!(eval, expected);

        eval.undo_update(Square::F5, flip);
        assert_eq!(eval, before);
    }
}
