mod common;

use reversi_search::constants::{WEIGHT_DEPTH_ONE, WEIGHT_DEPTH_ZERO};
use reversi_search::position::Position;
use reversi_search::random::{random_any_position, random_endgame};
use reversi_search::search::{StatsType, UNLIMITED_VISITS};
use reversi_search::types::EvalLarge;

use common::{brute_force_solve, new_search, reference_evaluate};

fn blend(depth_one: i32, depth_zero: i32) -> EvalLarge {
    EvalLarge::from_raw(
        8 * (depth_one * WEIGHT_DEPTH_ONE + depth_zero * WEIGHT_DEPTH_ZERO)
            / (WEIGHT_DEPTH_ONE + WEIGHT_DEPTH_ZERO),
    )
}

fn solve(position: &Position) -> EvalLarge {
    new_search().evaluate(position, 64).unwrap()
}

#[test]
fn test_initial_position() {
    let mut search = new_search();
    let pos = Position::new();

    assert_eq!(search.evaluate(&pos, 1), Ok(blend(3 - 2, 2)));
    assert_eq!(search.n_visited(), 5);

    // The first reply is searched fully, the other three cut off at once.
    assert_eq!(search.evaluate(&pos, 2), Ok(blend(2, 3 - 2)));
    assert_eq!(search.n_visited(), 1 + 4 + 6);
}

#[test]
fn test_pass() {
    let mut search = new_search();
    let pos = Position::from_string(
        "XXXXO---\
         --------\
         --------\
         --------\
         --------\
         ------OO\
         --------\
         ------OX",
        'X',
    )
    .unwrap();

    assert_eq!(search.evaluate(&pos, 1), Ok(blend(4 - 2, 1 + 2)));
    assert_eq!(search.evaluate(&pos, 2), Ok(blend(7 - 2, 4 + 2)));
    assert_eq!(search.evaluate(&pos, 3), Ok(EvalLarge::from_disc_diff(60)));
}

#[test]
fn test_forced_pass_negates_opponent_value() {
    let mut tested = 0;
    while tested < 50 {
        let pos = random_endgame(6, 10);
        if pos.has_legal_moves() || !pos.pass().has_legal_moves() {
            continue;
        }
        tested += 1;
        let mut search = new_search();
        let v = search.evaluate(&pos, 64).unwrap();
        assert!(search.stats().get(StatsType::Pass) >= 1);
        assert_eq!(v, -solve(&pos.pass()), "{pos}");
    }
}

#[test]
fn test_uses_hash_map() {
    let mut search = new_search();
    let mut pos = random_endgame(11, 14);
    while !pos.has_legal_moves() {
        pos = random_endgame(11, 14);
    }

    let first = search.evaluate(&pos, 64).unwrap();
    assert!(search.n_visited() > 1);

    let second = search.evaluate(&pos, 64).unwrap();
    assert_eq!(second, first);
    assert_eq!(search.n_visited(), 1);
}

#[test]
fn test_compare_with_reference() {
    let mut search = new_search();
    for _ in 0..200 {
        let pos = random_any_position();
        for depth in 1..=4 {
            if depth >= pos.n_empties() {
                break;
            }
            search.transposition_table().clear();
            assert_eq!(
                search.evaluate(&pos, depth),
                Ok(reference_evaluate(&pos, depth, false)),
                "{pos}\ndepth {depth}"
            );
        }
    }
}

#[test]
fn test_endgame_fuzz() {
    let mut search = new_search();
    for _ in 0..1000 {
        let pos = random_endgame(6, 8);
        let expected = EvalLarge::from_disc_diff(brute_force_solve(&pos, false));
        assert_eq!(search.evaluate(&pos, 64), Ok(expected), "{pos}");
    }
}

#[test]
fn test_negamax_consistency() {
    let mut search = new_search();
    for _ in 0..50 {
        let pos = random_endgame(8, 12);
        let value = search.evaluate(&pos, 64).unwrap();
        let moves = pos.legal_moves();
        let expected = if moves.is_empty() {
            if pos.pass().has_legal_moves() {
                -search.evaluate(&pos.pass(), 64).unwrap()
            } else {
                EvalLarge::from_disc_diff(pos.final_score())
            }
        } else {
            moves
                .iter()
                .map(|sq| -search.evaluate(&pos.play(pos.move_flip(sq)), 64).unwrap())
                .max()
                .unwrap()
        };
        assert_eq!(value, expected, "{pos}");
    }
}

#[test]
fn test_fail_soft_windows() {
    let mut search = new_search();
    for _ in 0..300 {
        let pos = random_endgame(7, 12);
        let exact = solve(&pos);
        let lower = rand::random_range(-64..64);
        let upper = rand::random_range(lower + 1..=64);
        let (lower, upper) = (
            EvalLarge::from_disc_diff(lower),
            EvalLarge::from_disc_diff(upper),
        );
        search.transposition_table().clear();
        let v = search
            .evaluate_with_window(&pos, 64, lower, upper, UNLIMITED_VISITS)
            .unwrap();
        if v <= lower {
            assert!(exact <= v, "{pos}: fail low {v}, exact {exact}");
        } else if v >= upper {
            assert!(exact >= v, "{pos}: fail high {v}, exact {exact}");
        } else {
            assert_eq!(v, exact, "{pos}");
        }
    }
}

#[test]
fn test_fail_soft_windows_in_evaluate_mode() {
    let mut search = new_search();
    for _ in 0..100 {
        let pos = random_endgame(20, 40);
        for depth in 2..=5 {
            search.transposition_table().clear();
            let full = search.evaluate(&pos, depth).unwrap();

            let lower = rand::random_range(EvalLarge::MIN.value()..EvalLarge::MAX.value());
            let upper = rand::random_range(lower + 1..=EvalLarge::MAX.value());
            let (lower, upper) = (EvalLarge::from_raw(lower), EvalLarge::from_raw(upper));
            search.transposition_table().clear();
            let v = search
                .evaluate_with_window(&pos, depth, lower, upper, UNLIMITED_VISITS)
                .unwrap();
            if v <= lower {
                assert!(full <= v, "{pos}\ndepth {depth}: fail low {v}, full {full}");
            } else if v >= upper {
                assert!(full >= v, "{pos}\ndepth {depth}: fail high {v}, full {full}");
            } else {
                assert_eq!(v, full, "{pos}\ndepth {depth}");
            }
        }
    }
}

#[test]
fn test_terminal_bound() {
    let mut search = new_search();
    for _ in 0..100 {
        let pos = random_endgame(0, 0);
        let v = search.evaluate(&pos, 10).unwrap();
        assert_eq!(v, EvalLarge::from_disc_diff(pos.final_score()));
        assert!(EvalLarge::MIN <= v && v <= EvalLarge::MAX);
    }
}

#[test]
fn test_known_endgames() {
    let cases = [
        (
            "--O--O----OOOOO-XOOOOOOOXXOOXOOOXXXXXOXXXOXXOOXXXXXXOXOXXOOOOOOX",
            28,
        ),
        (
            "--OXXO--XOXXXX--XOOOOXXXXOOOXXXXX-OOOXXX--OOOOXX--XXOOO----XXOO-",
            8,
        ),
    ];
    let mut search = new_search();
    for (board, score) in cases {
        let pos = Position::from_string(board, 'X').unwrap();
        assert_eq!(search.evaluate(&pos, 64), Ok(EvalLarge::from_disc_diff(score)), "{board}");
    }
}
