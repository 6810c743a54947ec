//! Transposition table shared by the alpha-beta searches.
//!
//! The table is direct-mapped: each position hashes to exactly one slot, and
//! a store always replaces what was there. Slots are guarded by a busy flag
//! that is only ever tried, so neither probes nor stores wait. A busy slot
//! reads as a miss and drops the store.

use std::mem;

use aligned_vec::{AVec, ConstAlign};
use log::info;

use crate::constants::CACHE_LINE_SIZE;
use crate::position::Position;
use crate::square::Square;
use crate::types::{Depth, EvalLarge};
use crate::util::busy_flag::BusyFlag;

/// Bounded result of a previous search of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEntry {
    pub player: u64,
    pub opponent: u64,
    /// Depth the position was searched to.
    pub depth: Depth,
    /// The true value is at least this.
    pub lower: EvalLarge,
    /// The true value is at most this.
    pub upper: EvalLarge,
    pub best_move: Option<Square>,
    pub second_best_move: Option<Square>,
}

impl HashEntry {
    /// Checks if this entry was stored for `position`.
    #[inline]
    fn matches(&self, position: &Position) -> bool {
        self.player == position.player.bits() && self.opponent == position.opponent.bits()
    }
}

type Slot = BusyFlag<Option<HashEntry>>;

/// Fixed-size, direct-mapped transposition table.
pub struct TranspositionTable {
    slots: AVec<Slot, ConstAlign<CACHE_LINE_SIZE>>,
    slot_count: u64,
}

impl TranspositionTable {
    /// Initializes a new `TranspositionTable` with the specified memory size in megabytes.
    ///
    /// # Arguments
    ///
    /// * `mb_size` - The size of the table in megabytes. 0 gives a tiny table.
    pub fn new(mb_size: usize) -> Self {
        let slot_count = if mb_size == 0 {
            16
        } else {
            ((mb_size as u64 * 1024 * 1024) / mem::size_of::<Slot>() as u64).max(16)
        };
        info!(
            "transposition table: {} MB, {} slots of {} bytes",
            mb_size,
            slot_count,
            mem::size_of::<Slot>()
        );

        TranspositionTable {
            slots: AVec::from_iter(
                CACHE_LINE_SIZE,
                (0..slot_count).map(|_| BusyFlag::new(None)),
            ),
            slot_count,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Empties every slot.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            *slot.lock() = None;
        }
    }

    /// Looks up `position`.
    ///
    /// # Returns
    ///
    /// A copy of the stored entry if the slot holds this exact position and is
    /// not busy, `None` otherwise.
    #[inline]
    pub fn get(&self, position: &Position) -> Option<HashEntry> {
        let slot = self.slot(position).try_lock()?;
        (*slot).filter(|entry| entry.matches(position))
    }

    /// Stores the result of a search of `position` with window `[lower, upper]`.
    ///
    /// A value strictly inside the window is exact. A value at or below
    /// `lower` is only an upper bound, a value at or above `upper` only a
    /// lower bound.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn update(
        &self,
        position: &Position,
        depth: Depth,
        eval: EvalLarge,
        lower: EvalLarge,
        upper: EvalLarge,
        best_move: Option<Square>,
        second_best_move: Option<Square>,
    ) {
        let Some(mut slot) = self.slot(position).try_lock() else {
            return;
        };
        *slot = Some(HashEntry {
            player: position.player.bits(),
            opponent: position.opponent.bits(),
            depth,
            lower: if eval > lower { eval } else { EvalLarge::MIN },
            upper: if eval < upper { eval } else { EvalLarge::MAX },
            best_move,
            second_best_move,
        });
    }

    #[inline(always)]
    fn slot(&self, position: &Position) -> &Slot {
        &self.slots[Self::mul_hi64(position.hash(), self.slot_count) as usize]
    }

    /// Multiplies two 64-bit values and returns the high 64 bits of the result.
    ///
    /// Maps a uniform hash onto `0..b` without a division.
    #[inline(always)]
    fn mul_hi64(a: u64, b: u64) -> u64 {
        let product = (a as u128) * (b as u128);
        (product >> 64) as u64
    }
}
