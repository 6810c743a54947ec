//! Reversi position representation using bitboards.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::flip;
use crate::square::Square;
use crate::types::Score;

/// Error returned when a board string cannot be turned into a [`Position`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("board string must have 64 squares, got {0}")]
    InvalidLength(usize),
    #[error("invalid board character '{0}': expected 'X', 'O' or '-'")]
    InvalidChar(char),
    #[error("invalid side to move '{0}': expected 'X' or 'O'")]
    InvalidSide(char),
    #[error("player and opponent discs overlap")]
    Overlap,
}

/// A Reversi position seen from the side to move.
///
/// `player` holds the discs of the side to move, `opponent` the other side's
/// discs. The two masks never share a bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Discs of the side to move.
    pub player: Bitboard,
    /// Discs of the side not to move.
    pub opponent: Bitboard,
}

impl Default for Position {
    /// Creates the standard starting position, black to move.
    fn default() -> Self {
        Position {
            player: Square::D5.bitboard() | Square::E4.bitboard(),
            opponent: Square::D4.bitboard() | Square::E5.bitboard(),
        }
    }
}

impl Position {
    /// Creates the standard starting position.
    pub fn new() -> Position {
        Default::default()
    }

    /// Creates a `Position` from two disjoint bitboards.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::Overlap`] if a square belongs to both sides.
    pub fn from_bitboards(
        player: impl Into<Bitboard>,
        opponent: impl Into<Bitboard>,
    ) -> Result<Position, PositionError> {
        let player = player.into();
        let opponent = opponent.into();
        if player.intersects(opponent) {
            return Err(PositionError::Overlap);
        }
        Ok(Position { player, opponent })
    }

    /// Parses a position from 64 characters, A1 first, row by row.
    ///
    /// `X` and `O` are discs, `-` is an empty square. Whitespace is ignored so
    /// that boards can be written one row per line. `to_move` selects which of
    /// `X`/`O` is the side to move.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] for a wrong square count, an unknown
    /// character or an unknown side.
    pub fn from_string(board: &str, to_move: char) -> Result<Position, PositionError> {
        let to_move = to_move.to_ascii_uppercase();
        if to_move != 'X' && to_move != 'O' {
            return Err(PositionError::InvalidSide(to_move));
        }

        let cells: Vec<char> = board.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != 64 {
            return Err(PositionError::InvalidLength(cells.len()));
        }

        let mut player = Bitboard::EMPTY;
        let mut opponent = Bitboard::EMPTY;
        for (sq, c) in Square::iter().zip(cells) {
            match c.to_ascii_uppercase() {
                '-' | '.' => {}
                c if c == to_move => player = player.set(sq),
                'X' | 'O' => opponent = opponent.set(sq),
                _ => return Err(PositionError::InvalidChar(c)),
            }
        }
        Ok(Position { player, opponent })
    }

    /// Gets the empty squares.
    #[inline(always)]
    pub fn empties(&self) -> Bitboard {
        !(self.player | self.opponent)
    }

    /// Returns the number of empty squares.
    #[inline(always)]
    pub fn n_empties(&self) -> u32 {
        64 - (self.player | self.opponent).count()
    }

    /// Returns a bitboard representing the legal moves for the side to move.
    #[inline(always)]
    pub fn legal_moves(&self) -> Bitboard {
        self.player.moves(self.opponent)
    }

    /// Checks if the side to move has any legal move.
    #[inline(always)]
    pub fn has_legal_moves(&self) -> bool {
        !self.legal_moves().is_empty()
    }

    /// Returns the move flip for playing at `sq`: the captured discs plus the
    /// played square, or an empty bitboard if the move is illegal.
    #[inline]
    pub fn move_flip(&self, sq: Square) -> Bitboard {
        if !self.empties().contains(sq) {
            return Bitboard::EMPTY;
        }
        Bitboard::new(flip::move_flip(sq, self.player.bits(), self.opponent.bits()))
    }

    /// Returns the position after a move given by its move flip.
    ///
    /// The returned position is seen from the opponent, who moves next.
    #[inline(always)]
    pub fn play(&self, flip: Bitboard) -> Position {
        Position {
            player: self.opponent & !flip,
            opponent: self.player | flip,
        }
    }

    /// Returns the position with the sides swapped.
    #[inline(always)]
    pub fn pass(&self) -> Position {
        Position {
            player: self.opponent,
            opponent: self.player,
        }
    }

    /// Checks if neither side can move.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        !self.has_legal_moves() && !self.pass().has_legal_moves()
    }

    /// Final disc difference from the side to move's point of view.
    ///
    /// Empty squares go to the side with more discs. A draw stays 0.
    #[inline]
    pub fn final_score(&self) -> Score {
        final_score(self.player, self.opponent)
    }

    /// Calculates a hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        use rapidhash::v3;
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.player.bits().to_le_bytes());
        bytes[8..].copy_from_slice(&self.opponent.bits().to_le_bytes());
        v3::rapidhash_v3_nano_inline::<true, false>(&bytes, &v3::DEFAULT_RAPID_SECRETS)
    }

    /// Renders the position as 8 rows, the side to move as `X`.
    pub fn to_string_as_board(&self) -> String {
        let mut s = String::with_capacity(64 + 8);
        for (i, sq) in Square::iter().enumerate() {
            if i > 0 && i % 8 == 0 {
                s.push('\n');
            }
            if self.player.contains(sq) {
                s.push('X');
            } else if self.opponent.contains(sq) {
                s.push('O');
            } else {
                s.push('-');
            }
        }
        s
    }
}

/// Final disc difference for the given masks, empties counted for the winner.
#[inline]
pub fn final_score(player: Bitboard, opponent: Bitboard) -> Score {
    let diff = player.count() as Score - opponent.count() as Score;
    let empties = 64 - (player | opponent).count() as Score;
    diff + diff.signum() * empties
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_as_board())
    }
}
