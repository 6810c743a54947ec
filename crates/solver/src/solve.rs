use std::time::Instant;

use anyhow::{Context, ensure};
use colored::Colorize;
use num_format::{Locale, ToFormattedString};
use reversi_search::eval::{DiscCountEvaluator, IncrementalEvaluator, SquareWeightEvaluator};
use reversi_search::position::Position;
use reversi_search::search::{AlphaBetaSearch, SearchConfig};
use reversi_search::square::Square;
use reversi_search::types::EvalLarge;

use crate::EvaluatorKind;

pub struct SolveArgs {
    pub board: String,
    pub side: char,
    pub depth: u32,
    pub lower: i32,
    pub upper: i32,
    pub evaluator: EvaluatorKind,
}

pub fn solve(args: &SolveArgs, config: &SearchConfig) -> anyhow::Result<()> {
    let position = Position::from_string(&args.board, args.side)
        .with_context(|| format!("invalid board '{}'", args.board))?;
    ensure!(
        (-64..64).contains(&args.lower) && args.lower < args.upper && args.upper <= 64,
        "invalid window [{}, {}]",
        args.lower,
        args.upper
    );

    print_position(&position, args.side.to_ascii_uppercase());

    match args.evaluator {
        EvaluatorKind::DiscCount => {
            run(AlphaBetaSearch::with_config(config, DiscCountEvaluator::new()), &position, args)
        }
        EvaluatorKind::SquareWeights => {
            run(AlphaBetaSearch::with_config(config, SquareWeightEvaluator::new()), &position, args)
        }
    }
    Ok(())
}

fn run<E: IncrementalEvaluator>(mut search: AlphaBetaSearch<E>, position: &Position, args: &SolveArgs) {
    let depth = args.depth.min(position.n_empties());
    let exact = depth == position.n_empties();

    let max_visited = search.max_visited();
    let start = Instant::now();
    let result = if args.lower == -64 && args.upper == 64 {
        search.evaluate(position, depth)
    } else {
        search.evaluate_with_window(
            position,
            depth,
            EvalLarge::from_disc_diff(args.lower),
            EvalLarge::from_disc_diff(args.upper),
            max_visited,
        )
    };
    let elapsed = start.elapsed();

    let mode = if exact { "exact" } else { "depth" };
    match result {
        Ok(eval) => println!(
            "{} {}: {}",
            mode,
            depth,
            format!("{:+.2}", eval.to_disc_diff_f32()).bold().bright_green()
        ),
        Err(e) => println!("{} {}: {}", mode, depth, e.to_string().bright_red()),
    }

    let n_visited = search.n_visited();
    let nodes_per_sec = if elapsed.as_secs_f64() > 0.0 {
        (n_visited as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };
    println!(
        "nodes {}  time {:.3}s  nps {}",
        n_visited.to_formatted_string(&Locale::en),
        elapsed.as_secs_f64(),
        nodes_per_sec.to_formatted_string(&Locale::en)
    );
    println!("{}", search.stats().to_string().dimmed());
}

/// Prints the board with the side to move's discs as `to_move`.
fn print_position(position: &Position, to_move: char) {
    let other = if to_move == 'X' { 'O' } else { 'X' };
    println!("    a b c d e f g h");
    for rank in 0..8 {
        print!("  {} ", rank + 1);
        for file in 0..8 {
            let Some(sq) = Square::from_file_rank(file, rank) else {
                continue;
            };
            let symbol = if position.player.contains(sq) {
                to_move.to_string().bright_green()
            } else if position.opponent.contains(sq) {
                other.to_string().bright_yellow()
            } else if position.legal_moves().contains(sq) {
                "·".bright_cyan()
            } else {
                "-".normal()
            };
            print!("{symbol} ");
        }
        println!();
    }
    println!(
        "{} to move, {} empties",
        to_move,
        position.n_empties()
    );
}
