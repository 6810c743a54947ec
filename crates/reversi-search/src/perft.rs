use crate::eval::{IncrementalEvaluator, ScopedInvert, ScopedUpdate};
use crate::position::Position;

/// Executes a perft run starting from the standard initial position.
///
/// # Arguments
///
/// * `depth` - Number of plies to expand from the initial position. A depth of
///   `1` counts the immediate legal moves; larger values walk the tree
///   recursively.
///
/// # Returns
///
/// The total node count the search visits from the initial position.
pub fn perft_root(depth: u32) -> u64 {
    perft(&Position::new(), depth)
}

/// Counts the leaves `depth` plies below `position`.
///
/// Passes do not use up a ply. A finished game counts as one leaf.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let moves = position.legal_moves();
    if moves.is_empty() {
        if position.is_game_over() {
            return 1;
        }
        return perft(&position.pass(), depth);
    }

    if depth <= 1 {
        return moves.count() as u64;
    }
    moves
        .into_iter()
        .map(|sq| perft(&position.play(position.move_flip(sq)), depth - 1))
        .sum()
}

/// Walks the same tree as [`perft`] while keeping `evaluator` in step with
/// every visited position, and checks it against a fresh setup at each leaf.
///
/// # Returns
///
/// The node count, or `None` at the first position where the incremental
/// state disagrees with a fresh setup.
pub fn perft_with_evaluator<E>(position: &Position, depth: u32, evaluator: &mut E) -> Option<u64>
where
    E: IncrementalEvaluator + Default + PartialEq,
{
    let mut fresh = E::default();
    fresh.setup(position.player, position.opponent);
    if *evaluator != fresh {
        return None;
    }

    let moves = position.legal_moves();
    if moves.is_empty() {
        if position.is_game_over() {
            return Some(1);
        }
        let mut inverted = ScopedInvert::new(evaluator, true);
        return perft_with_evaluator(&position.pass(), depth, &mut *inverted);
    }

    let mut nodes = 0;
    let mut inverted = ScopedInvert::new(evaluator, true);
    for sq in moves {
        if depth <= 1 {
            nodes += 1;
            continue;
        }
        let flip = position.move_flip(sq);
        let mut child = ScopedUpdate::new(&mut *inverted, sq, flip, true);
        nodes += perft_with_evaluator(&position.play(flip), depth - 1, &mut *child)?;
    }
    Some(nodes)
}
