//! Bitboard operations and types.
//!
//! This module provides a [`Bitboard`] type that represents a 64-square Reversi board
//! using a single `u64`, where each bit corresponds to a square (bit 0 = A1, bit 63 = H8).

use crate::square::Square;

/// The four corner squares (A1, H1, A8, H8).
pub const CORNERS: Bitboard = Bitboard(0x8100000000000081);

/// The squares diagonally adjacent to a corner (B2, G2, B7, G7).
pub const X_SQUARES: Bitboard = Bitboard(0x0042000000004200);

/// The C and X squares around each corner.
pub const XC_SQUARES: Bitboard = Bitboard(0x42C300000000C342);

/// Inner squares that are neither on an edge nor next to a corner.
pub const CENTRAL: Bitboard = Bitboard(0x003C7E7E7E7E3C00);

/// Edge squares that are neither corners nor C squares.
pub const EDGE: Bitboard = Bitboard(0x3C0081818181003C);

/// The four 4x4 quadrants: A1-D4, E1-H4, A5-D8, E5-H8.
pub const QUADRANTS: [Bitboard; 4] = [
    Bitboard(0x000000000F0F0F0F),
    Bitboard(0x00000000F0F0F0F0),
    Bitboard(0x0F0F0F0F00000000),
    Bitboard(0xF0F0F0F000000000),
];

const RANK_1: u64 = 0x00000000000000FF;
const RANK_8: u64 = 0xFF00000000000000;
const FILE_A: u64 = 0x0101010101010101;
const FILE_H: u64 = 0x8080808080808080;

/// Newtype wrapper for a 64-bit bitboard (bit 0 = A1, bit 63 = H8).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// Bitboard with no square set.
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Bitboard with every square set.
    pub const ALL: Bitboard = Bitboard(u64::MAX);

    /// Creates a new bitboard from raw bits.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Returns the raw 64-bit value.
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns a new bitboard with the bit at the given square set.
    #[inline(always)]
    pub const fn set(self, sq: Square) -> Self {
        Bitboard(self.0 | 1 << sq as u8)
    }

    /// Returns a new bitboard with the bit at the given square removed.
    #[inline(always)]
    pub const fn remove(self, sq: Square) -> Self {
        Bitboard(self.0 & !(1 << sq as u8))
    }

    /// Checks if the bitboard contains the bit at the given square.
    #[inline(always)]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1 << sq as u8) != 0
    }

    /// Checks if the bitboard has no bits set.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits (population count).
    #[inline(always)]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if at least one bit is shared with `other`.
    #[inline(always)]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns a new bitboard with the least significant bit cleared.
    #[inline(always)]
    pub const fn clear_lsb(self) -> Self {
        Bitboard(self.0 & self.0.wrapping_sub(1))
    }

    /// Returns the square corresponding to the least significant set bit.
    ///
    /// # Returns
    ///
    /// `Some(Square)` for the LSB position, or `None` if the bitboard is empty.
    #[inline(always)]
    pub fn lsb_square(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_bit(self.0.trailing_zeros()))
        }
    }

    /// Returns the least significant set bit as a one-bit bitboard.
    #[inline(always)]
    pub const fn lsb(self) -> Self {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Keeps only the lowest and the highest set bit.
    #[inline(always)]
    pub const fn first_and_last(self) -> Self {
        if self.0 == 0 {
            Bitboard(0)
        } else {
            Bitboard(1 << self.0.trailing_zeros() | 1 << (63 - self.0.leading_zeros()))
        }
    }

    /// Returns `self` if exactly one bit is set, an empty bitboard otherwise.
    #[inline(always)]
    pub const fn if_single(self) -> Self {
        if self.0.count_ones() == 1 {
            self
        } else {
            Bitboard(0)
        }
    }

    /// Returns an iterator over all set squares in the bitboard.
    ///
    /// # Returns
    ///
    /// A [`BitboardIterator`] that yields each set square in LSB-first order.
    #[inline(always)]
    pub fn iter(self) -> BitboardIterator {
        BitboardIterator::new(self)
    }

    /// Returns the squares adjacent (including diagonally) to any set bit.
    ///
    /// The set bits themselves are only included when they neighbor another set bit.
    #[inline(always)]
    pub const fn neighbors(self) -> Self {
        let b = self.0;
        let horizontal = ((b << 1) & !FILE_A) | ((b >> 1) & !FILE_H);
        let row = b | horizontal;
        Bitboard(horizontal | (row << 8) | (row >> 8))
    }

    /// Gets the legal moves for the player.
    ///
    /// # Arguments
    ///
    /// * `opponent` - The opponent's bitboard.
    ///
    /// # Returns
    ///
    /// A `Bitboard` with bits set for each legal move position.
    #[inline(always)]
    pub fn moves(self, opponent: Bitboard) -> Bitboard {
        Bitboard(get_moves(self.0, opponent.0))
    }

    /// Gets the potential moves for the player: empty squares adjacent to an
    /// opponent disc.
    #[inline(always)]
    pub fn potential_moves(self, opponent: Bitboard) -> Bitboard {
        opponent.neighbors() & !(self | opponent)
    }

    /// Edge squares that are the only empty square of their edge.
    ///
    /// `self` is interpreted as the set of empty squares.
    #[inline]
    pub const fn unique_in_edges(self) -> Bitboard {
        let e = self.0;
        Bitboard(
            Bitboard(e & RANK_1).if_single().0
                | Bitboard(e & RANK_8).if_single().0
                | Bitboard(e & FILE_A).if_single().0
                | Bitboard(e & FILE_H).if_single().0,
        )
    }

    /// The first and last empty square of every edge, corners excluded.
    ///
    /// `self` is interpreted as the set of empty squares.
    #[inline]
    pub const fn first_last_in_edges(self) -> Bitboard {
        let e = self.0;
        Bitboard(
            (Bitboard(e & RANK_1).first_and_last().0
                | Bitboard(e & RANK_8).first_and_last().0
                | Bitboard(e & FILE_A).first_and_last().0
                | Bitboard(e & FILE_H).first_and_last().0)
                & !CORNERS.0,
        )
    }
}

// Operator trait implementations

impl std::ops::BitAnd for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl std::ops::BitXor for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl std::ops::Not for Bitboard {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl std::ops::BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl std::ops::BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitXorAssign for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Conversion trait implementations

impl From<u64> for Bitboard {
    #[inline(always)]
    fn from(bits: u64) -> Self {
        Bitboard(bits)
    }
}

impl From<Bitboard> for u64 {
    #[inline(always)]
    fn from(bb: Bitboard) -> Self {
        bb.0
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(sq: Square) -> Self {
        sq.bitboard()
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIterator::new(self)
    }
}

impl std::fmt::Display for Bitboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in 0..8 {
            for file in 0..8 {
                let sq = rank * 8 + file;
                if (self.0 >> sq) & 1 != 0 {
                    write!(f, "X")?;
                } else {
                    write!(f, "-")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Gets the legal moves for the player.
///
/// Reference: <https://github.com/abulmo/edax-reversi/blob/14f048c05ddfa385b6bf954a9c2905bbe677e9d3/src/board.c#L822>
#[inline(always)]
fn get_moves(player: u64, opponent: u64) -> u64 {
    let empty = !(player | opponent);
    (get_some_moves(player, opponent & 0x007E7E7E7E7E7E00, 7) & empty)
        | (get_some_moves(player, opponent & 0x007E7E7E7E7E7E00, 9) & empty)
        | (get_some_moves(player, opponent & 0x7E7E7E7E7E7E7E7E, 1) & empty)
        | (get_some_moves(player, opponent & 0x00FFFFFFFFFFFF00, 8) & empty)
}

/// Propagates a run of opponent discs from the player's discs in both
/// directions along `dir` and returns the squares just past each run.
#[inline(always)]
fn get_some_moves(b: u64, mask: u64, dir: u32) -> u64 {
    let mut flip = ((b << dir) | (b >> dir)) & mask;
    flip |= ((flip << dir) | (flip >> dir)) & mask;
    flip |= ((flip << dir) | (flip >> dir)) & mask;
    flip |= ((flip << dir) | (flip >> dir)) & mask;
    flip |= ((flip << dir) | (flip >> dir)) & mask;
    flip |= ((flip << dir) | (flip >> dir)) & mask;
    (flip << dir) | (flip >> dir)
}

/// An iterator that yields each set bit position in a bitboard as a `Square`.
pub struct BitboardIterator {
    bitboard: Bitboard,
}

impl BitboardIterator {
    /// Creates a new `BitboardIterator`.
    #[inline(always)]
    pub fn new(bitboard: Bitboard) -> BitboardIterator {
        BitboardIterator { bitboard }
    }
}

impl Iterator for BitboardIterator {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let square = self.bitboard.lsb_square()?;
        self.bitboard = self.bitboard.clear_lsb();
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bitboard.count() as usize;
        (n, Some(n))
    }
}
