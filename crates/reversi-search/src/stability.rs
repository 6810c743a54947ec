//! Stable disc detection.
//!
//! A disc is stable when no sequence of moves can ever flip it. The detector
//! is conservative: every disc it reports is stable, but it may miss some.
//!
//! Reference: https://github.com/abulmo/edax-reversi/blob/14f048c05ddfa385b6bf954a9c2905bbe677e9d3/src/board.c
use std::sync::OnceLock;

use crate::bitboard::Bitboard;
use crate::types::Score;

/// Size of the edge stability lookup table (256 * 256 for all possible edge configurations)
const EDGE_STABILITY_SIZE: usize = 256 * 256;

/// Inner squares whose stability can only come from contact with other stable discs.
const INNER_MASK: u64 = 0x007e7e7e7e7e7e00;

/// Edge stability lookup table, built on first use.
static EDGE_STABILITY: OnceLock<Box<[u8]>> = OnceLock::new();

/// Plays `x` on an 8-square line for `mover` and returns the updated
/// `(mover, other)` pair. Only flips towards the inside of the line are
/// considered, which is all an edge allows.
fn play_on_edge(mover: u8, other: u8, x: u32) -> (u8, u8) {
    let mut mover = mover | 1 << x;
    let mut other = other;

    for step in [-1i32, 1] {
        let mut run = 0u8;
        let mut y = x as i32 + step;
        while (0..8).contains(&y) && other & (1 << y) != 0 {
            run |= 1 << y;
            y += step;
        }
        if (0..8).contains(&y) && mover & (1 << y) != 0 {
            mover |= run;
            other &= !run;
        }
    }
    (mover, other)
}

/// Recursively refines the set of stable discs of `p` along one edge by
/// trying every move of either side on every empty square.
fn find_edge_stable(p: u8, o: u8, stable: u8) -> u8 {
    let mut stable = stable & p;
    let empties = !(p | o);
    if stable == 0 || empties == 0 {
        return stable;
    }

    for x in 0..8 {
        if empties & (1 << x) == 0 {
            continue;
        }
        let (np, no) = play_on_edge(p, o, x);
        stable = find_edge_stable(np, no, stable);
        if stable == 0 {
            return 0;
        }
        let (no, np) = play_on_edge(o, p, x);
        stable = find_edge_stable(np, no, stable);
        if stable == 0 {
            return 0;
        }
    }
    stable
}

fn init_edge_stability() -> Box<[u8]> {
    let mut table = vec![0u8; EDGE_STABILITY_SIZE].into_boxed_slice();
    for p in 0..256usize {
        for o in 0..256usize {
            if p & o == 0 {
                table[p * 256 + o] = find_edge_stable(p as u8, o as u8, p as u8);
            }
        }
    }
    table
}

/// Builds the edge stability table ahead of the first search.
pub fn init() {
    EDGE_STABILITY.get_or_init(init_edge_stability);
}

/// Unpacks bits 1-6 of a byte to the A2-A7 squares on the board.
#[inline]
fn unpack_a2a7(x: u8) -> u64 {
    let a = (x & 0x7e) as u64;
    (a.wrapping_mul(0x0000_0408_1020_4080u64)) & 0x0001_0101_0101_0100
}

/// Unpacks bits 1-6 of a byte to the H2-H7 squares on the board.
#[inline]
fn unpack_h2h7(x: u8) -> u64 {
    let a = (x & 0x7e) as u64;
    (a.wrapping_mul(0x0002_0408_1020_4000u64)) & 0x0080_8080_8080_8000
}

/// Packs the A-file (A1-A8) of a bitboard into a single byte.
#[inline]
fn pack_a1a8(x: u64) -> usize {
    let a = x & 0x0101_0101_0101_0101;
    ((a.wrapping_mul(0x0102_0408_1020_4080u64)) >> 56) as usize
}

/// Packs the H-file (H1-H8) of a bitboard into a single byte.
#[inline]
fn pack_h1h8(x: u64) -> usize {
    let a = x & 0x8080_8080_8080_8080;
    ((a.wrapping_mul(0x0002_0408_1020_4081u64)) >> 56) as usize
}

/// Stable discs of `p` on the four edges.
#[inline]
fn stable_edges(p: u64, o: u64) -> u64 {
    let table = EDGE_STABILITY.get_or_init(init_edge_stability);
    table[((p & 0xff) * 256 + (o & 0xff)) as usize] as u64
        | (table[((p >> 56) * 256 + (o >> 56)) as usize] as u64) << 56
        | unpack_a2a7(table[pack_a1a8(p) * 256 + pack_a1a8(o)])
        | unpack_h2h7(table[pack_h1h8(p) * 256 + pack_h1h8(o)])
}

/// Squares lying on lines that are full in each direction.
///
/// Returns the per-direction full lines (horizontal, vertical, the two
/// diagonals) together with their intersection.
fn full_lines(occupied: u64) -> ([u64; 4], u64) {
    let mut h = occupied;
    h &= h >> 1;
    h &= h >> 2;
    h &= h >> 4;
    let horizontal = (h & 0x0101010101010101) * 0xff;

    let mut v = occupied;
    v &= v.rotate_right(8);
    v &= v.rotate_right(16);
    v &= v.rotate_left(32);
    let vertical = v;

    let mut l7 = occupied;
    let mut r7 = occupied;
    l7 &= 0xff01010101010101 | (l7 >> 7);
    r7 &= 0x80808080808080ff | (r7 << 7);
    l7 &= 0xffff030303030303 | (l7 >> 14);
    r7 &= 0xc0c0c0c0c0c0ffff | (r7 << 14);
    l7 &= 0xffffffff0f0f0f0f | (l7 >> 28);
    r7 &= 0xf0f0f0f0ffffffff | (r7 << 28);
    let diag7 = l7 & r7;

    let mut l9 = occupied;
    let mut r9 = occupied;
    l9 &= 0xff80808080808080 | (l9 >> 9);
    r9 &= 0x01010101010101ff | (r9 << 9);
    l9 &= 0xffffc0c0c0c0c0c0 | (l9 >> 18);
    r9 &= 0x030303030303ffff | (r9 << 18);
    let diag9 = l9 & r9 & (0x0f0f0f0ff0f0f0f0 | (l9 >> 36) | (r9 << 36));

    let full = [horizontal, vertical, diag7, diag9];
    (full, horizontal & vertical & diag7 & diag9)
}

/// Grows `stable` by adding discs of `candidates` that are protected in every
/// direction, either by a stable neighbor or by a full line.
fn propagate_by_contact(candidates: u64, stable: u64, full: &[u64; 4]) -> u64 {
    let mut stable = stable;
    loop {
        let protected = ((stable >> 1) | (stable << 1) | full[0])
            & ((stable >> 8) | (stable << 8) | full[1])
            & ((stable >> 7) | (stable << 7) | full[2])
            & ((stable >> 9) | (stable << 9) | full[3]);
        let grown = stable | (protected & candidates);
        if grown == stable {
            return stable;
        }
        stable = grown;
    }
}

/// Refines a set of known stable discs.
///
/// # Arguments
///
/// * `player` - The side whose discs are checked for stability
/// * `opponent` - The other side
/// * `floor` - Discs already known to be stable; they stay in the result
///
/// # Returns
///
/// `floor` united with the stable edge discs of `player`, every disc on lines
/// full in all four directions, and the discs of `player` reached by contact
/// from those.
pub fn refine_stable(player: Bitboard, opponent: Bitboard, floor: Bitboard) -> Bitboard {
    let (p, o) = (player.bits(), opponent.bits());
    let (full, all_full) = full_lines(p | o);
    let stable = floor.bits() | stable_edges(p, o) | all_full;
    let by_contact = propagate_by_contact(p & INNER_MASK, stable & p, &full);
    Bitboard::new(stable | by_contact)
}

/// Upper bound on the final score of the side to move, in discs, given the
/// opponent's stable discs.
#[inline]
pub fn upper_bound_from_stable(stable: Bitboard, opponent: Bitboard) -> Score {
    64 - 2 * (stable & opponent).count() as Score
}
