use criterion::{Criterion, criterion_group, criterion_main};
use reversi_search::bitboard::Bitboard;
use reversi_search::square::Square;
use reversi_search::stability;
use std::hint::black_box;

fn bench_moves(c: &mut Criterion) {
    let p_initial = Square::D5.bitboard() | Square::E4.bitboard();
    let o_initial = Square::D4.bitboard() | Square::E5.bitboard();

    c.bench_function("bitboard_moves", |b| {
        b.iter(|| black_box(p_initial).moves(black_box(o_initial)))
    });
}

fn bench_potential_moves(c: &mut Criterion) {
    let p = Square::D5.bitboard() | Square::E4.bitboard();
    let o = Square::D4.bitboard() | Square::E5.bitboard();

    c.bench_function("bitboard_potential_moves", |b| {
        b.iter(|| black_box(p).potential_moves(black_box(o)))
    });
}

fn bench_refine_stable(c: &mut Criterion) {
    let player = Bitboard::new(0x8100000000000081 | 0x00FF00000000FF00);
    let opponent = Bitboard::new(0x0000FFFFFFFF0000);
    stability::init();

    c.bench_function("stability_refine_stable", |b| {
        b.iter(|| stability::refine_stable(black_box(player), black_box(opponent), Bitboard::EMPTY))
    });
}

criterion_group!(benches, bench_moves, bench_potential_moves, bench_refine_stable);
criterion_main!(benches);
