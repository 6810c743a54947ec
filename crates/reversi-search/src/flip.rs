//! Disc flip calculation for move execution.

use crate::square::Square;

/// Ray directions as (shift, left-shift?, wrap mask applied to the moving bit).
const DIRECTIONS: [(u32, bool, u64); 8] = [
    (1, true, 0xFEFEFEFEFEFEFEFE),  // east
    (1, false, 0x7F7F7F7F7F7F7F7F), // west
    (8, true, 0xFFFFFFFFFFFFFFFF),  // north
    (8, false, 0xFFFFFFFFFFFFFFFF), // south
    (9, true, 0xFEFEFEFEFEFEFEFE),  // north-east
    (7, true, 0x7F7F7F7F7F7F7F7F),  // north-west
    (7, false, 0xFEFEFEFEFEFEFEFE), // south-east
    (9, false, 0x7F7F7F7F7F7F7F7F), // south-west
];

#[inline(always)]
fn step(b: u64, shift: u32, left: bool, mask: u64) -> u64 {
    if left {
        (b << shift) & mask
    } else {
        (b >> shift) & mask
    }
}

/// Calculates which opponent discs would be flipped by placing a disc at the given square.
///
/// # Arguments
///
/// * `sq` - The square where the disc is being placed
/// * `p` - Bitboard representing the current player's discs
/// * `o` - Bitboard representing the opponent's discs
///
/// # Returns
///
/// A bitboard representing all opponent discs that would be flipped by this move.
/// Returns 0 if no discs would be flipped (invalid move).
#[inline]
pub fn flip(sq: Square, p: u64, o: u64) -> u64 {
    let origin = 1u64 << sq.index();
    let mut flipped = 0;
    for &(shift, left, mask) in DIRECTIONS.iter() {
        let mut line = 0;
        let mut cursor = step(origin, shift, left, mask);
        while cursor & o != 0 {
            line |= cursor;
            cursor = step(cursor, shift, left, mask);
        }
        if cursor & p != 0 {
            flipped |= line;
        }
    }
    flipped
}

/// Move flip for playing at `sq`: the captured discs plus `sq` itself.
///
/// Returns 0 if the move captures nothing. `sq` must be empty.
#[inline(always)]
pub fn move_flip(sq: Square, p: u64, o: u64) -> u64 {
    let captured = flip(sq, p, o);
    if captured == 0 {
        0
    } else {
        captured | 1 << sq.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(squares: &[Square]) -> u64 {
        squares.iter().fold(0, |b, sq| b | sq.bitboard().bits())
    }

    #[test]
    fn test_flip() {
        let p = bits(&[Square::D5, Square::E4]);
        let o = bits(&[Square::D4, Square::E5]);
        assert_eq!(flip(Square::C4, p, o), Square::D4.bitboard().bits());
        assert_eq!(flip(Square::D3, p, o), Square::D4.bitboard().bits());
        assert_eq!(flip(Square::E6, p, o), Square::E5.bitboard().bits());
        assert_eq!(flip(Square::F5, p, o), Square::E5.bitboard().bits());
        assert_eq!(flip(Square::C3, p, o), 0);
        assert_eq!(move_flip(Square::C3, p, o), 0);
        assert_eq!(
            move_flip(Square::C4, p, o),
            bits(&[Square::C4, Square::D4])
        );
    }

    #[test]
    fn test_flip_multiple_directions() {
        // Player on A1, H1 and H8; opponent fills the lines from D1.
        let p = bits(&[Square::A1, Square::H1, Square::H8]);
        let o = bits(&[Square::B1, Square::C1, Square::E1, Square::F1, Square::G1, Square::E2]);
        assert_eq!(
            flip(Square::D1, p, o),
            bits(&[Square::B1, Square::C1, Square::E1, Square::F1, Square::G1])
        );
    }

    #[test]
    fn test_flip_no_wrap_around() {
        // H1 followed by A2 must not be treated as a line.
        let p = bits(&[Square::B2]);
        let o = bits(&[Square::A2]);
        assert_eq!(flip(Square::H1, p, o), 0);
    }

    #[test]
    fn test_flip_requires_closing_disc() {
        let p = 0;
        let o = bits(&[Square::B1, Square::C1]);
        assert_eq!(flip(Square::A1, p, o), 0);
    }
}
