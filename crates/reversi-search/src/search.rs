//! Alpha-beta game tree search.

pub mod alpha_beta;
pub mod config;
pub mod last_moves;
pub mod move_iterator;
pub mod stats;

pub use alpha_beta::AlphaBetaSearch;
pub use config::SearchConfig;
pub use stats::{Stats, StatsType};

/// Returned when an exact search runs out of its node budget.
///
/// Nothing about the value of the position is known; the caller has to retry
/// with a larger budget or a shallower depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("node budget exhausted")]
pub struct SearchAborted;

/// Node budget that never runs out.
pub const UNLIMITED_VISITS: u64 = u64::MAX;
