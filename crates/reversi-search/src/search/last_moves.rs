//! Exact solvers for positions with at most five empty squares.
//!
//! These work in disc units and bypass the transposition table, the move
//! iterators and the evaluator. Each `*_or_min` helper tries the moves of one
//! side only and returns `None` when that side has no legal move, so the
//! caller can retry for the other side and fall back to the final score.

use crate::bitboard::{Bitboard, CENTRAL, CORNERS, EDGE, QUADRANTS, XC_SQUARES};
use crate::flip;
use crate::position::final_score;
use crate::square::Square;
use crate::stability::{refine_stable, upper_bound_from_stable};
use crate::types::Score;

#[inline(always)]
fn move_flip(sq: Square, player: Bitboard, opponent: Bitboard) -> Bitboard {
    Bitboard::new(flip::move_flip(sq, player.bits(), opponent.bits()))
}

#[inline(always)]
fn max_with(best: Option<Score>, v: Score) -> Score {
    best.map_or(v, |b| b.max(v))
}

/// Score with the single empty square `x`.
#[inline]
fn solve1(x: Square, player: Bitboard, opponent: Bitboard) -> Score {
    let flip = move_flip(x, player, opponent);
    if !flip.is_empty() {
        return 2 * (player | flip).count() as Score - 64;
    }
    let flip = move_flip(x, opponent, player);
    if !flip.is_empty() {
        return 64 - 2 * (opponent | flip).count() as Score;
    }
    final_score(player, opponent)
}

fn solve2_or_min(
    x1: Square,
    x2: Square,
    player: Bitboard,
    opponent: Bitboard,
    upper: Score,
    n_visited: &mut i64,
) -> Option<Score> {
    *n_visited += 1;
    let mut best = None;

    let flip = move_flip(x1, player, opponent);
    if !flip.is_empty() {
        *n_visited += 1;
        let v = -solve1(x2, opponent & !flip, player | flip);
        if v >= upper {
            return Some(v);
        }
        best = Some(v);
    }
    let flip = move_flip(x2, player, opponent);
    if !flip.is_empty() {
        *n_visited += 1;
        let v = -solve1(x1, opponent & !flip, player | flip);
        return Some(max_with(best, v));
    }
    best
}

fn solve2(
    x1: Square,
    x2: Square,
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    n_visited: &mut i64,
) -> Score {
    if let Some(v) = solve2_or_min(x1, x2, player, opponent, upper, n_visited) {
        return v;
    }
    if let Some(v) = solve2_or_min(x1, x2, opponent, player, -lower, n_visited) {
        return -v;
    }
    final_score(player, opponent)
}

#[allow(clippy::too_many_arguments)]
fn solve3_or_min(
    x1: Square,
    x2: Square,
    x3: Square,
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    n_visited: &mut i64,
) -> Option<Score> {
    *n_visited += 1;
    let mut best = None;

    for (x, a, b) in [(x1, x2, x3), (x2, x1, x3), (x3, x1, x2)] {
        let flip = move_flip(x, player, opponent);
        if flip.is_empty() {
            continue;
        }
        let alpha = best.map_or(lower, |best: Score| best.max(lower));
        let v = -solve2(a, b, opponent & !flip, player | flip, -upper, -alpha, n_visited);
        let v = max_with(best, v);
        if v >= upper {
            return Some(v);
        }
        best = Some(v);
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn solve3(
    x1: Square,
    x2: Square,
    x3: Square,
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    n_visited: &mut i64,
) -> Score {
    if let Some(v) = solve3_or_min(x1, x2, x3, player, opponent, lower, upper, n_visited) {
        return v;
    }
    if let Some(v) = solve3_or_min(x1, x2, x3, opponent, player, -upper, -lower, n_visited) {
        return -v;
    }
    final_score(player, opponent)
}

/// Remaining squares after each of four moves. With `swap`, the last two
/// squares form a pair and are searched ahead of the others.
#[inline(always)]
fn four_orders(x: [Square; 4], swap: bool) -> [(Square, [Square; 3]); 4] {
    let [x1, x2, x3, x4] = x;
    if swap {
        [(x1, [x2, x3, x4]), (x2, [x1, x3, x4]), (x3, [x4, x1, x2]), (x4, [x3, x1, x2])]
    } else {
        [(x1, [x2, x3, x4]), (x2, [x1, x3, x4]), (x3, [x1, x2, x4]), (x4, [x1, x2, x3])]
    }
}

fn solve4_or_min(
    x: [Square; 4],
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    swap: bool,
    n_visited: &mut i64,
) -> Option<Score> {
    *n_visited += 1;
    let mut best = None;

    for (sq, [a, b, c]) in four_orders(x, swap) {
        let flip = move_flip(sq, player, opponent);
        if flip.is_empty() {
            continue;
        }
        let alpha = best.map_or(lower, |best: Score| best.max(lower));
        let v = -solve3(a, b, c, opponent & !flip, player | flip, -upper, -alpha, n_visited);
        let v = max_with(best, v);
        if v >= upper {
            return Some(v);
        }
        best = Some(v);
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn solve4(
    x: [Square; 4],
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    swap: bool,
    last_flip: Bitboard,
    stable: Bitboard,
    n_visited: &mut i64,
) -> Score {
    let margin = if last_flip.intersects(CORNERS) { 20 } else { 10 };
    if upper_bound_from_stable(stable, opponent) - margin <= lower {
        let bound = upper_bound_from_stable(refine_stable(opponent, player, stable), opponent);
        if bound <= lower {
            return bound;
        }
    }

    if let Some(v) = solve4_or_min(x, player, opponent, lower, upper, swap, n_visited) {
        return v;
    }
    if let Some(v) = solve4_or_min(x, opponent, player, -upper, -lower, swap, n_visited) {
        return -v;
    }
    final_score(player, opponent)
}

#[allow(clippy::too_many_arguments)]
fn solve5_or_min(
    x: [Square; 5],
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    swap: bool,
    stable: Bitboard,
    n_visited: &mut i64,
) -> Option<Score> {
    let [x1, x2, x3, x4, x5] = x;
    let orders = if swap {
        [
            (x1, [x2, x3, x4, x5]),
            (x2, [x1, x3, x4, x5]),
            (x3, [x1, x2, x4, x5]),
            (x4, [x5, x1, x2, x3]),
            (x5, [x4, x1, x2, x3]),
        ]
    } else {
        [
            (x1, [x2, x3, x4, x5]),
            (x2, [x1, x3, x4, x5]),
            (x3, [x1, x2, x4, x5]),
            (x4, [x1, x2, x3, x5]),
            (x5, [x1, x2, x3, x4]),
        ]
    };

    let mut best = None;
    for (sq, rest) in orders {
        let flip = move_flip(sq, player, opponent);
        if flip.is_empty() {
            continue;
        }
        let alpha = best.map_or(lower, |best: Score| best.max(lower));
        let v = -solve4(
            rest,
            opponent & !flip,
            player | flip,
            -upper,
            -alpha,
            swap,
            flip,
            stable,
            n_visited,
        );
        let v = max_with(best, v);
        if v >= upper {
            return Some(v);
        }
        best = Some(v);
    }
    best
}

/// Empty squares of `empties` by priority: corners, center, edges, then the
/// squares next to the corners.
#[inline]
fn by_priority(empties: Bitboard) -> impl Iterator<Item = Square> {
    [CORNERS, CENTRAL, EDGE, XC_SQUARES]
        .into_iter()
        .flat_map(move |mask| (empties & mask).iter())
}

/// Orders five empty squares for [`solve5`].
///
/// Squares alone in their quadrant come first, then the rest grouped by
/// quadrant. A quadrant with exactly two empties goes last, so that the
/// parity pair is played out at the bottom of the tree.
///
/// # Returns
///
/// The ordered squares and whether a two-empty quadrant exists.
fn order_five(empties: Bitboard) -> ([Square; 5], bool) {
    let mut x = [Square::A1; 5];
    let mut space_3 = [Square::A1; 3];
    let mut cont = 0;
    let mut next_cont = 0;
    let mut has_space_2 = false;
    let mut has_space_3 = false;

    for quadrant in QUADRANTS {
        let e = empties & quadrant;
        match e.count() {
            0 => continue,
            1 => {
                for sq in e {
                    x[cont] = sq;
                    cont += 1;
                }
                continue;
            }
            2 => {
                next_cont = cont;
                cont = if has_space_2 { 1 } else { 3 };
                has_space_2 = true;
            }
            3 => {
                has_space_3 = true;
                for (slot, sq) in space_3.iter_mut().zip(by_priority(e)) {
                    *slot = sq;
                }
                continue;
            }
            4 => {
                next_cont = 0;
                cont = 1;
            }
            _ => {}
        }
        for sq in by_priority(e) {
            x[cont] = sq;
            cont += 1;
        }
        cont = next_cont;
    }

    if has_space_3 {
        let start = if has_space_2 { 0 } else { 2 };
        x[start..start + 3].copy_from_slice(&space_3);
    }
    (x, has_space_2)
}

/// Solves a position with exactly five empty squares.
///
/// # Arguments
///
/// * `player`, `opponent` - The position, `player` to move
/// * `lower`, `upper` - Search window in discs
/// * `last_flip` - Move flip of the move that led here
/// * `stable` - Discs already known to be stable
/// * `n_visited` - Incremented for each visited node, decremented when the
///   stability cutoff settles the position without visiting it
///
/// # Returns
///
/// The exact score if it lies inside `(lower, upper)`, otherwise a bound on
/// the same side of the window as the exact score.
pub fn solve5(
    player: Bitboard,
    opponent: Bitboard,
    lower: Score,
    upper: Score,
    last_flip: Bitboard,
    stable: Bitboard,
    n_visited: &mut i64,
) -> Score {
    let margin = if last_flip.intersects(CORNERS) { 20 } else { 14 };
    if upper_bound_from_stable(stable, opponent) - margin <= lower {
        let bound = upper_bound_from_stable(refine_stable(opponent, player, stable), opponent);
        if bound <= lower {
            *n_visited -= 1;
            return bound;
        }
    }

    let empties = !(player | opponent);
    debug_assert_eq!(empties.count(), 5);
    let (x, swap) = order_five(empties);

    if let Some(v) = solve5_or_min(x, player, opponent, lower, upper, swap, stable, n_visited) {
        return v;
    }
    *n_visited += 1;
    if let Some(v) = solve5_or_min(x, opponent, player, -upper, -lower, swap, stable, n_visited) {
        return -v;
    }
    final_score(player, opponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::random::random_endgame;

    fn minimax(pos: &Position, passed: bool) -> Score {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            if passed {
                return pos.final_score();
            }
            return -minimax(&pos.pass(), true);
        }
        moves
            .iter()
            .map(|sq| -minimax(&pos.play(pos.move_flip(sq)), false))
            .max()
            .unwrap_or(Score::MIN)
    }

    fn five_empties() -> Position {
        random_endgame(5, 5)
    }

    fn check_window(v: Score, exact: Score, lower: Score, upper: Score) {
        if v > lower && v < upper {
            assert_eq!(v, exact);
        } else if v <= lower {
            assert!(exact <= lower, "fail low {v} but exact {exact}");
            assert!(exact <= v);
        } else {
            assert!(exact >= upper, "fail high {v} but exact {exact}");
            assert!(exact >= v);
        }
    }

    #[test]
    fn test_solve1() {
        for _ in 0..500 {
            let pos = random_endgame(1, 1);
            let x = pos.empties().lsb_square().unwrap();
            assert_eq!(solve1(x, pos.player, pos.opponent), minimax(&pos, false));
        }
    }

    #[test]
    fn test_solve2_full_window() {
        for _ in 0..500 {
            let pos = random_endgame(2, 2);
            let squares: Vec<Square> = pos.empties().iter().collect();
            let mut n = 0;
            let v = solve2(squares[0], squares[1], pos.player, pos.opponent, -65, 65, &mut n);
            assert_eq!(v, minimax(&pos, false));
        }
    }

    #[test]
    fn test_solve5_full_window() {
        for _ in 0..300 {
            let pos = five_empties();
            let mut n = 0;
            let v = solve5(pos.player, pos.opponent, -65, 65, Bitboard::EMPTY, Bitboard::EMPTY, &mut n);
            assert_eq!(v, minimax(&pos, false), "{}", pos);
        }
    }

    #[test]
    fn test_solve5_windows() {
        for _ in 0..300 {
            let pos = five_empties();
            let exact = minimax(&pos, false);
            let lower = rand::random_range(-64..64);
            let upper = rand::random_range(lower + 1..=64);
            let mut n = 0;
            let v = solve5(pos.player, pos.opponent, lower, upper, Bitboard::EMPTY, Bitboard::EMPTY, &mut n);
            check_window(v, exact, lower, upper);
        }
    }

    #[test]
    fn test_solve5_with_stable_discs() {
        for _ in 0..300 {
            let pos = five_empties();
            let exact = minimax(&pos, false);
            let stable = refine_stable(pos.opponent, pos.player, Bitboard::EMPTY);
            let lower = rand::random_range(-64..64);
            let upper = rand::random_range(lower + 1..=64);
            let mut n = 0;
            let v = solve5(pos.player, pos.opponent, lower, upper, CORNERS, stable, &mut n);
            check_window(v, exact, lower, upper);
        }
    }

    #[test]
    fn test_order_five_keeps_squares() {
        for _ in 0..300 {
            let pos = five_empties();
            let (x, _) = order_five(pos.empties());
            let seen = x.iter().fold(Bitboard::EMPTY, |b, &sq| b.set(sq));
            assert_eq!(seen, pos.empties());
        }
    }

    #[test]
    fn test_order_five_pair_goes_last() {
        // Three corners alone in their quadrants, H8 and G7 paired in the fourth.
        let empties = Square::A1.bitboard()
            | Square::A8.bitboard()
            | Square::H1.bitboard()
            | Square::H8.bitboard()
            | Square::G7.bitboard();
        let (x, swap) = order_five(empties);
        assert!(swap);
        assert_eq!(&x[3..], &[Square::H8, Square::G7]);
        let singles: Bitboard = x[..3].iter().fold(Bitboard::EMPTY, |b, &sq| b.set(sq));
        assert_eq!(
            singles,
            Square::A1.bitboard() | Square::A8.bitboard() | Square::H1.bitboard()
        );
    }

    #[test]
    fn test_counts_nodes() {
        let pos = Position::from_string(
            &format!("{}{}", "X".repeat(32), "OOOOOOOOOOOOOOOOOOOOOOOOOOO-----"),
            'X',
        )
        .unwrap();
        let mut n = 0;
        solve5(pos.player, pos.opponent, -65, 65, Bitboard::EMPTY, Bitboard::EMPTY, &mut n);
        assert!(n > 0);
    }

    #[test]
    fn test_stability_cutoff_uncounts_node() {
        let pos = Position::from_string(
            &format!("{}{}", "X".repeat(32), "OOOOOOOOOOOOOOOOOOOOOOOOOOO-----"),
            'X',
        )
        .unwrap();
        // 27 stable opponent discs cap the player at 64 - 54 = 10.
        let mut n = 0;
        let v = solve5(pos.player, pos.opponent, 10, 65, Bitboard::EMPTY, pos.opponent, &mut n);
        assert_eq!(v, 10);
        assert_eq!(n, -1);
    }
}
