use std::time::Instant;

use anyhow::ensure;
use colored::Colorize;
use num_format::{Locale, ToFormattedString};
use reversi_search::eval::DiscCountEvaluator;
use reversi_search::perft::perft_root;
use reversi_search::random::random_endgame;
use reversi_search::search::{AlphaBetaSearch, SearchConfig, Stats};

pub fn bench(
    count: usize,
    min_empties: u32,
    max_empties: u32,
    shared_table: bool,
    config: &SearchConfig,
) -> anyhow::Result<()> {
    ensure!(
        min_empties <= max_empties && max_empties <= 60,
        "invalid empties range {min_empties}..={max_empties}"
    );

    let mut search = AlphaBetaSearch::with_config(config, DiscCountEvaluator::new());
    let mut total = Stats::new();
    let mut total_nodes = 0u64;
    let mut aborted = 0usize;
    let start = Instant::now();

    for i in 0..count {
        let position = random_endgame(min_empties, max_empties);
        if !shared_table {
            search.transposition_table().clear();
        }
        let result = search.evaluate(&position, 64);
        total_nodes += search.n_visited();
        total.merge(search.stats());
        match result {
            Ok(eval) => log::info!(
                "#{} ({} empties): {:+} in {} nodes",
                i + 1,
                position.n_empties(),
                eval.to_lower_disc(),
                search.n_visited()
            ),
            Err(e) => {
                aborted += 1;
                log::warn!("#{}: {}", i + 1, e);
            }
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let nps = if elapsed > 0.0 { (total_nodes as f64 / elapsed) as u64 } else { 0 };
    println!(
        "{} positions, {}..={} empties, {} table",
        count,
        min_empties,
        max_empties,
        if shared_table { "shared" } else { "fresh" }
    );
    println!(
        "nodes {}  time {:.3}s  nps {}",
        total_nodes.to_formatted_string(&Locale::en).bold(),
        elapsed,
        nps.to_formatted_string(&Locale::en).bold()
    );
    if aborted > 0 {
        println!("{} aborted", aborted.to_string().bright_red());
    }
    println!("{}", total.to_string().dimmed());
    Ok(())
}

pub fn perft(depth: u32) {
    let start = Instant::now();
    let nodes = perft_root(depth);
    let elapsed = start.elapsed().as_secs_f64();
    let nps = if elapsed > 0.0 { (nodes as f64 / elapsed) as u64 } else { 0 };
    println!(
        "perft({}) = {}  time {:.3}s  nps {}",
        depth,
        nodes.to_formatted_string(&Locale::en).bold(),
        elapsed,
        nps.to_formatted_string(&Locale::en)
    );
}
