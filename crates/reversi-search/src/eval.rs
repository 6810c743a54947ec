//! Incremental leaf evaluation.
//!
//! The search keeps a single evaluator in sync with the position it is
//! visiting. Moves are pushed with [`IncrementalEvaluator::update`] and popped
//! with [`IncrementalEvaluator::undo_update`]; [`IncrementalEvaluator::invert`]
//! swaps the point of view between the two sides.
//!
//! [`ScopedInvert`] and [`ScopedUpdate`] pair each push with its pop so that an
//! early return, including an aborted search, leaves the evaluator unchanged.

mod disc_count;
mod square_weights;

use std::ops::{Deref, DerefMut};

pub use disc_count::DiscCountEvaluator;
pub use square_weights::SquareWeightEvaluator;

use crate::bitboard::Bitboard;
use crate::square::Square;
use crate::types::EvalLarge;

/// A heuristic score kept up to date move by move.
///
/// Protocol used by the search at each node:
///
/// 1. `evaluate()` scores the node for the side to move.
/// 2. `invert()` switches to the opponent's point of view.
/// 3. For each move, `update(square, flip)` makes the evaluator hold the child
///    position (`player &= !flip`, `opponent |= flip`), so `evaluate()` now
///    scores the child for its side to move. `undo_update` restores the node.
/// 4. `invert()` again before returning.
pub trait IncrementalEvaluator {
    /// Loads a position, `player` being the side to move.
    fn setup(&mut self, player: Bitboard, opponent: Bitboard);

    /// Scores the current position for the side to move.
    fn evaluate(&self) -> EvalLarge;

    /// Applies a move flip: `flip` leaves `player` and joins `opponent`.
    ///
    /// `square` is the played square, part of `flip`.
    fn update(&mut self, square: Square, flip: Bitboard);

    /// Reverts an [`update`](Self::update) made with the same arguments.
    fn undo_update(&mut self, square: Square, flip: Bitboard);

    /// Swaps the two sides.
    fn invert(&mut self);
}

/// Inverts an evaluator for as long as the guard lives.
pub struct ScopedInvert<'a, E: IncrementalEvaluator> {
    evaluator: &'a mut E,
    active: bool,
}

impl<'a, E: IncrementalEvaluator> ScopedInvert<'a, E> {
    /// Inverts `evaluator` if `active`, and inverts it back on drop.
    #[inline(always)]
    pub fn new(evaluator: &'a mut E, active: bool) -> Self {
        if active {
            evaluator.invert();
        }
        ScopedInvert { evaluator, active }
    }
}

impl<E: IncrementalEvaluator> Deref for ScopedInvert<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.evaluator
    }
}

impl<E: IncrementalEvaluator> DerefMut for ScopedInvert<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.evaluator
    }
}

impl<E: IncrementalEvaluator> Drop for ScopedInvert<'_, E> {
    #[inline(always)]
    fn drop(&mut self) {
        if self.active {
            self.evaluator.invert();
        }
    }
}

/// Applies a move to an evaluator for as long as the guard lives.
pub struct ScopedUpdate<'a, E: IncrementalEvaluator> {
    evaluator: &'a mut E,
    square: Square,
    flip: Bitboard,
    active: bool,
}

impl<'a, E: IncrementalEvaluator> ScopedUpdate<'a, E> {
    /// Updates `evaluator` with the move if `active`, and undoes it on drop.
    #[inline(always)]
    pub fn new(evaluator: &'a mut E, square: Square, flip: Bitboard, active: bool) -> Self {
        if active {
            evaluator.update(square, flip);
        }
        ScopedUpdate {
            evaluator,
            square,
            flip,
            active,
        }
    }
}

impl<E: IncrementalEvaluator> Deref for ScopedUpdate<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.evaluator
    }
}

impl<E: IncrementalEvaluator> DerefMut for ScopedUpdate<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.evaluator
    }
}

impl<E: IncrementalEvaluator> Drop for ScopedUpdate<'_, E> {
    #[inline(always)]
    fn drop(&mut self) {
        if self.active {
            self.evaluator.undo_update(self.square, self.flip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn test_scoped_guards_restore_state() {
        let pos = Position::new();
        let mut eval = DiscCountEvaluator::new();
        eval.setup(pos.player, pos.opponent);
        let before = eval.clone();

        {
            let mut inverted = ScopedInvert::new(&mut eval, true);
            let flip = pos.move_flip(Square::D3);
            let updated = ScopedUpdate::new(&mut *inverted, Square::D3, flip, true);
            assert_eq!(updated.evaluate(), EvalLarge::from_raw(8 * (1 - 4 + 2)));
        }
        assert_eq!(eval, before);
    }

    #[test]
    fn test_inactive_guards_do_nothing() {
        let pos = Position::new();
        let mut eval = DiscCountEvaluator::new();
        eval.setup(pos.player, pos.opponent);
        let before = eval.clone();
        {
            let mut inverted = ScopedInvert::new(&mut eval, false);
            let updated =
                ScopedUpdate::new(&mut *inverted, Square::D3, pos.move_flip(Square::D3), false);
            assert_eq!(updated.evaluate(), before.evaluate());
        }
        assert_eq!(eval, before);
    }
}
