mod bench;
mod solve;

use clap::{Parser, Subcommand, ValueEnum};
use reversi_search::search::SearchConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Alpha-beta search and exact solver for Reversi positions")]
struct Cli {
    #[command(subcommand)]
    command: SubCommands,

    /// Transposition table size in megabytes
    #[arg(long, default_value = "16", global = true)]
    hash_mb: usize,

    /// Give up exact searches after this many nodes
    #[arg(long, global = true)]
    max_visited: Option<u64>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Evaluate or solve one position
    Solve {
        /// 64 squares, A1 first: X, O and - for empty
        board: String,

        /// Side to move
        #[arg(short, long, default_value = "X")]
        side: char,

        /// Search depth; at least the number of empties solves exactly
        #[arg(short, long, default_value = "64")]
        depth: u32,

        /// Lower bound of the window, in discs
        #[arg(long, default_value_t = -64, allow_hyphen_values = true)]
        lower: i32,

        /// Upper bound of the window, in discs
        #[arg(long, default_value_t = 64, allow_hyphen_values = true)]
        upper: i32,

        #[arg(long, value_enum, default_value = "disc-count")]
        evaluator: EvaluatorKind,
    },
    /// Solve random endgames and report the node rate
    Bench {
        #[arg(short = 'n', long, default_value = "50")]
        count: usize,

        #[arg(long, default_value = "10")]
        min_empties: u32,

        #[arg(long, default_value = "14")]
        max_empties: u32,

        /// Keep one transposition table for every position
        #[arg(long)]
        shared_table: bool,
    },
    /// Count the leaves of the game tree from the start position
    Perft {
        #[arg(default_value = "9")]
        depth: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EvaluatorKind {
    /// Disc difference
    DiscCount,
    /// Fixed square weights
    SquareWeights,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose);
    reversi_search::init();
    let config = SearchConfig::new(args.hash_mb).with_max_visited(args.max_visited);

    match args.command {
        SubCommands::Solve {
            board,
            side,
            depth,
            lower,
            upper,
            evaluator,
        } => solve::solve(
            &solve::SolveArgs {
                board,
                side,
                depth,
                lower,
                upper,
                evaluator,
            },
            &config,
        ),
        SubCommands::Bench {
            count,
            min_empties,
            max_empties,
            shared_table,
        } => bench::bench(count, min_empties, max_empties, shared_table, &config),
        SubCommands::Perft { depth } => {
            bench::perft(depth);
            Ok(())
        }
    }
}
