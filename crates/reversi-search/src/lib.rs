//! Alpha-beta search engine for Reversi.
//!
//! The entry point is [`search::AlphaBetaSearch`]. It evaluates positions to
//! a fixed depth with an [`eval::IncrementalEvaluator`], or solves them
//! exactly when the depth covers every empty square.

pub mod bitboard;
pub mod constants;
pub mod estimators;
pub mod eval;
pub mod flip;
pub mod perft;
pub mod position;
pub mod random;
pub mod search;
pub mod square;
pub mod stability;
pub mod transposition_table;
pub mod types;
pub mod util;

/// Builds the lookup tables shared by every search.
///
/// They are otherwise built on first use.
pub fn init() {
    stability::init();
    estimators::init();
}
