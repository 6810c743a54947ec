use crate::search::UNLIMITED_VISITS;

/// Settings of an [`AlphaBetaSearch`](crate::search::AlphaBetaSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Transposition table size in megabytes.
    pub tt_mb_size: usize,
    /// Node budget used when the caller does not pass one.
    pub max_visited: u64,
}

impl SearchConfig {
    /// Config with the given table size and no node budget.
    #[must_use]
    pub fn new(tt_mb_size: usize) -> Self {
        SearchConfig {
            tt_mb_size,
            ..Default::default()
        }
    }

    /// Caps exact searches at `max_visited` nodes. `None` keeps them unbounded.
    #[must_use]
    pub fn with_max_visited(mut self, max_visited: Option<u64>) -> Self {
        if let Some(value) = max_visited {
            self.max_visited = value;
        }
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            tt_mb_size: 16,
            max_visited: UNLIMITED_VISITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SearchConfig::new(4);
        assert_eq!(config.tt_mb_size, 4);
        assert_eq!(config.max_visited, UNLIMITED_VISITS);

        let config = config.with_max_visited(Some(1000));
        assert_eq!(config.max_visited, 1000);
        assert_eq!(config.with_max_visited(None).max_visited, 1000);
    }
}
