use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;

/// Represents a square on a reversi board, ranging from A1 to H8.
///
/// The board is indexed as follows:
///
/// ```text
///   A B C D E F G H
/// 1 00 01 02 03 04 05 06 07
/// 2 08 09 10 11 12 13 14 15
/// 3 16 17 18 19 20 21 22 23
/// 4 24 25 26 27 28 29 30 31
/// 5 32 33 34 35 36 37 38 39
/// 6 40 41 42 43 44 45 46 47
/// 7 48 49 50 51 52 53 54 55
/// 8 56 57 58 59 60 61 62 63
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

/// Constants for board dimensions
pub const BOARD_SIZE: usize = 8;
pub const TOTAL_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

#[rustfmt::skip]
const ALL_SQUARES: [Square; TOTAL_SQUARES] = {
    use Square::*;
    [
        A1, B1, C1, D1, E1, F1, G1, H1,
        A2, B2, C2, D2, E2, F2, G2, H2,
        A3, B3, C3, D3, E3, F3, G3, H3,
        A4, B4, C4, D4, E4, F4, G4, H4,
        A5, B5, C5, D5, E5, F5, G5, H5,
        A6, B6, C6, D6, E6, F6, G6, H6,
        A7, B7, C7, D7, E7, F7, G7, H7,
        A8, B8, C8, D8, E8, F8, G8, H8,
    ]
};

impl Square {
    /// Returns a bitboard with only this square set.
    #[inline(always)]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1 << self as u8)
    }

    /// Converts the `Square` into a `usize` index (0-63).
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts an index into a `Square`.
    ///
    /// # Arguments
    ///
    /// * `index` - The index to convert.
    ///
    /// # Returns
    ///
    /// `Some(Square)` if the index is in `0..64`, `None` otherwise.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < TOTAL_SQUARES {
            Some(ALL_SQUARES[index])
        } else {
            None
        }
    }

    /// Converts a bit index known to be in `0..64` into a `Square`.
    #[inline(always)]
    pub(crate) fn from_bit(index: u32) -> Square {
        debug_assert!(index < 64, "bit index out of range: {index}");
        ALL_SQUARES[(index & 63) as usize]
    }

    /// Returns the file (column) of this square, 0 for A through 7 for H.
    #[inline]
    pub const fn file(self) -> usize {
        self.index() % BOARD_SIZE
    }

    /// Returns the rank (row) of this square, 0 for rank 1 through 7 for rank 8.
    #[inline]
    pub const fn rank(self) -> usize {
        self.index() / BOARD_SIZE
    }

    /// Creates a `Square` from file and rank coordinates.
    ///
    /// # Returns
    ///
    /// `None` if either coordinate is outside `0..8`.
    pub fn from_file_rank(file: usize, rank: usize) -> Option<Square> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Square::from_index(rank * BOARD_SIZE + file)
        } else {
            None
        }
    }

    /// Returns an iterator over all 64 squares from A1 to H8.
    #[inline]
    pub fn iter() -> impl Iterator<Item = Square> {
        ALL_SQUARES.into_iter()
    }
}

/// Error type for square parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    /// Invalid square string format (must be 2 characters)
    #[error("invalid square format: must be 2 characters (e.g., 'a1')")]
    InvalidFormat,
    /// Invalid file character (must be a-h or A-H)
    #[error("invalid file '{0}': must be a-h or A-H")]
    InvalidFile(char),
    /// Invalid rank character (must be 1-8)
    #[error("invalid rank '{0}': must be 1-8")]
    InvalidRank(char),
}

impl FromStr for Square {
    type Err = SquareError;

    /// Parses algebraic notation such as `"d3"` or `"H8"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(SquareError::InvalidFormat);
        };

        let file = match file_char.to_ascii_lowercase() {
            c @ 'a'..='h' => c as usize - 'a' as usize,
            _ => return Err(SquareError::InvalidFile(file_char)),
        };
        let rank = match rank_char {
            c @ '1'..='8' => c as usize - '1' as usize,
            _ => return Err(SquareError::InvalidRank(rank_char)),
        };

        Square::from_file_rank(file, rank).ok_or(SquareError::InvalidFormat)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (self.file() as u8 + b'a') as char;
        let rank = (self.rank() as u8 + b'1') as char;
        write!(f, "{file}{rank}")
    }
}
