//! Random positions for tests, benchmarks and the command line tool.

use crate::bitboard::Bitboard;
use crate::position::Position;
use crate::square::Square;

/// Fills each square independently: the side to move with probability
/// `p_player`, the opponent with probability `p_opponent`.
///
/// Boards with no disc at all are redrawn.
pub fn random_position(p_player: f64, p_opponent: f64) -> Position {
    loop {
        let mut player = Bitboard::EMPTY;
        let mut opponent = Bitboard::EMPTY;
        for sq in Square::iter() {
            let value = rand::random::<f64>();
            if value < p_player {
                player = player.set(sq);
            } else if value < p_player + p_opponent {
                opponent = opponent.set(sq);
            }
        }
        if !(player | opponent).is_empty() {
            return Position { player, opponent };
        }
    }
}

/// Draws a random position with random fill probabilities.
pub fn random_any_position() -> Position {
    loop {
        let p_player = rand::random::<f64>();
        let p_opponent = rand::random::<f64>();
        let total = p_player + p_opponent + rand::random::<f64>();
        let (p_player, p_opponent) = (p_player / total, p_opponent / total);
        if p_player >= 0.01 || p_opponent >= 0.01 {
            return random_position(p_player, p_opponent);
        }
    }
}

/// Random position with a number of empty squares in `min_empties..=max_empties`.
///
/// The empty squares are picked uniformly, the discs split evenly between
/// the two sides.
pub fn random_endgame(min_empties: u32, max_empties: u32) -> Position {
    let n_empties = rand::random_range(min_empties..=max_empties.min(64));
    let mut empties = Bitboard::EMPTY;
    while empties.count() < n_empties {
        let index = rand::random_range(0..64usize);
        if let Some(sq) = Square::from_index(index) {
            empties = empties.set(sq);
        }
    }

    let mut player = Bitboard::EMPTY;
    let mut opponent = Bitboard::EMPTY;
    for sq in (!empties).iter() {
        if rand::random_bool(0.5) {
            player = player.set(sq);
        } else {
            opponent = opponent.set(sq);
        }
    }
    Position { player, opponent }
}
