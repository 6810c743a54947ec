//! Node counters of an alpha-beta search.

use std::fmt;

/// Kind of work a visited node is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StatsType {
    /// Nodes solved by the exact solvers for the last five empties.
    Last5 = 0,
    /// Moves returned by the cheapest move ordering.
    VeryQuick = 1,
    /// Moves returned by the shallow fixed-priority ordering.
    Quick1 = 2,
    /// Moves returned by the deep fixed-priority ordering.
    Quick2 = 3,
    /// Moves returned by an evaluation-ranked ordering.
    MovesOrDisproof = 4,
    /// Passes.
    Pass = 5,
    TreeNode = 6,
    NextPositionFail = 7,
    NextPositionSuccess = 8,
    SolvedTooEarly = 9,
}

impl StatsType {
    /// Every counter, in index order.
    pub const ALL: [StatsType; 10] = [
        StatsType::Last5,
        StatsType::VeryQuick,
        StatsType::Quick1,
        StatsType::Quick2,
        StatsType::MovesOrDisproof,
        StatsType::Pass,
        StatsType::TreeNode,
        StatsType::NextPositionFail,
        StatsType::NextPositionSuccess,
        StatsType::SolvedTooEarly,
    ];

    /// Last counter that counts as a visited node.
    const LAST_NODE_TYPE: StatsType = StatsType::TreeNode;

    /// Short lowercase label used in summaries.
    pub fn name(self) -> &'static str {
        match self {
            StatsType::Last5 => "last_5",
            StatsType::VeryQuick => "very_quick",
            StatsType::Quick1 => "quick1",
            StatsType::Quick2 => "quick2",
            StatsType::MovesOrDisproof => "moves_or_disproof",
            StatsType::Pass => "pass",
            StatsType::TreeNode => "tree_node",
            StatsType::NextPositionFail => "next_position_fail",
            StatsType::NextPositionSuccess => "next_position_success",
            StatsType::SolvedTooEarly => "solved_too_early",
        }
    }
}

/// Per-kind node counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    n_visited: [u64; StatsType::ALL.len()],
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets every counter to zero.
    pub fn reset(&mut self) {
        self.n_visited = Default::default();
    }

    #[inline(always)]
    pub fn add(&mut self, n: u64, kind: StatsType) {
        self.n_visited[kind as usize] += n;
    }

    /// Adds a possibly negative amount, saturating at zero.
    #[inline(always)]
    pub fn add_signed(&mut self, n: i64, kind: StatsType) {
        let counter = &mut self.n_visited[kind as usize];
        *counter = counter.saturating_add_signed(n);
    }

    #[inline(always)]
    pub fn get(&self, kind: StatsType) -> u64 {
        self.n_visited[kind as usize]
    }

    /// Total visited nodes: the sum of the counters up to [`StatsType::TreeNode`].
    #[inline]
    pub fn n_visited(&self) -> u64 {
        self.n_visited[..=StatsType::LAST_NODE_TYPE as usize]
            .iter()
            .sum()
    }

    /// Adds the counters of `other` to these.
    pub fn merge(&mut self, other: &Stats) {
        for (mine, theirs) in self.n_visited.iter_mut().zip(other.n_visited.iter()) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visited {}", self.n_visited())?;
        for kind in StatsType::ALL {
            let n = self.get(kind);
            if n > 0 {
                write!(f, ", {}: {}", kind.name(), n)?;
            }
        }
        Ok(())
    }
}
