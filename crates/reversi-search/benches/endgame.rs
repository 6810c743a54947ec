use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use reversi_search::eval::DiscCountEvaluator;
use reversi_search::position::Position;
use reversi_search::random::random_endgame;
use reversi_search::search::AlphaBetaSearch;
use reversi_search::transposition_table::TranspositionTable;

const BENCH_EMPTIES: [u32; 3] = [8, 12, 16];
const POSITIONS_PER_RUN: usize = 20;

fn positions(n_empties: u32) -> Vec<Position> {
    (0..POSITIONS_PER_RUN)
        .map(|_| random_endgame(n_empties, n_empties))
        .collect()
}

fn endgame_benchmark(c: &mut Criterion) {
    reversi_search::init();
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(8));

    for &n_empties in &BENCH_EMPTIES {
        let positions = positions(n_empties);
        group.bench_with_input(
            BenchmarkId::from_parameter(n_empties),
            &positions,
            |b, positions| {
                b.iter(|| {
                    let tt = Arc::new(TranspositionTable::new(16));
                    let mut search = AlphaBetaSearch::new(tt, DiscCountEvaluator::new());
                    let mut visited = 0;
                    for pos in positions {
                        let _ = black_box(search.evaluate(black_box(pos), 64));
                        visited += search.n_visited();
                    }
                    black_box(visited)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, endgame_benchmark);
criterion_main!(benches);
