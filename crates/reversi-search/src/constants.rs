//! Global constants

use crate::types::Score;

/// Size of a CPU cache line in bytes.
pub const CACHE_LINE_SIZE: usize = 64;

/// Maximum possible score (disc difference).
pub const SCORE_MAX: Score = 64;

/// Minimum possible score (disc difference).
pub const SCORE_MIN: Score = -64;

/// Weight of the one-ply search in the depth-one blend.
pub const WEIGHT_DEPTH_ONE: i32 = 2;

/// Weight of the static evaluation in the depth-one blend.
pub const WEIGHT_DEPTH_ZERO: i32 = 1;

/// Minimum remaining empties for the transposition table in exact solves.
pub const MIN_EMPTIES_FOR_HASH_MAP: u32 = 10;

/// Minimum remaining depth for the transposition table in heuristic searches.
pub const MIN_DEPTH_FOR_HASH_MAP: u32 = 3;

/// Below this many empties an exact solve neither maintains the leaf evaluator
/// nor orders moves by disproof number.
pub const MIN_EMPTIES_FOR_DISPROOF_NUMBER: u32 = 12;

/// Number of depth slots in the move ordering table.
pub const MAX_DEPTH: usize = 64;
