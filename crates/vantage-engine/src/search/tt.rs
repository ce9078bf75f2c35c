//! Lockless transposition table.
//!
//! Each slot is two `AtomicU64` words. `word1` holds the packed entry and
//! `word0` holds `key ^ word1`, so a probe recovers the full 64-bit key and a
//! torn write (words from two different stores) reads back as a miss.
//!
//! ```text
//! data (word1):
//!   bits  0-20  best move (Move::to_bits, 0 = none)
//!   bits 21-28  depth
//!   bits 29-30  bound (0 = empty)
//!   bits 31-38  generation
//!   bits 39-54  score (i16, node-relative for mates)
//! ```

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use vantage_core::Move;

use super::MATE_THRESHOLD;

const MOVE_MASK: u64 = (1 << 21) - 1;
const DEPTH_SHIFT: u32 = 21;
const BOUND_SHIFT: u32 = 29;
const GENERATION_SHIFT: u32 = 31;
const SCORE_SHIFT: u32 = 39;

/// Slots inspected by [`TranspositionTable::hashfull`].
const HASHFULL_SAMPLE: usize = 1000;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact = 1,
    /// Failed high: the true score is at least this.
    Lower = 2,
    /// Failed low: the true score is at most this.
    Upper = 3,
}

impl Bound {
    const fn from_bits(bits: u64) -> Option<Bound> {
        match bits & 0b11 {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }

    /// Whether a score with this bound settles a node searched with the
    /// window `(alpha, beta)`.
    #[inline]
    pub fn cuts(self, score: i32, alpha: i32, beta: i32) -> bool {
        match self {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        }
    }
}

/// A verified table hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Option<Move>,
    pub depth: u8,
    pub bound: Bound,
    /// Root-relative score.
    pub score: i32,
}

/// Mate scores count plies from the root; stored entries count from the node.
fn score_to_tt(score: i32, ply: usize) -> i16 {
    let ply = ply as i32;
    let adjusted = if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    };
    adjusted as i16
}

fn score_from_tt(score: i16, ply: usize) -> i32 {
    let (score, ply) = (score as i32, ply as i32);
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

struct Slot {
    check: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn new() -> Slot {
        Slot { check: AtomicU64::new(0), data: AtomicU64::new(0) }
    }

    /// Returns the stored key and data, or `None` for an empty slot.
    #[inline]
    fn load(&self) -> Option<(u64, u64)> {
        let check = self.check.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        Bound::from_bits(data >> BOUND_SHIFT).map(|_| (check ^ data, data))
    }

    #[inline]
    fn store(&self, key: u64, data: u64) {
        self.check.store(key ^ data, Ordering::Relaxed);
        self.data.store(data, Ordering::Relaxed);
    }

    fn clear(&self) {
        self.check.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

fn pack(best_move: Option<Move>, depth: u8, bound: Bound, generation: u8, score: i16) -> u64 {
    let mv = best_move.map_or(0, |m| m.to_bits() as u64) & MOVE_MASK;
    mv | (depth as u64) << DEPTH_SHIFT
        | (bound as u64) << BOUND_SHIFT
        | (generation as u64) << GENERATION_SHIFT
        | (score as u16 as u64) << SCORE_SHIFT
}

fn unpack_depth(data: u64) -> u8 {
    (data >> DEPTH_SHIFT) as u8
}

fn unpack_generation(data: u64) -> u8 {
    (data >> GENERATION_SHIFT) as u8
}

/// Fixed-size, power-of-two hash table keyed by the position hash.
///
/// Every method takes `&self`; slots are atomics, so the table can be shared
/// without locking.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: u64,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Table using at most `mb` megabytes, rounded down to a power-of-two
    /// slot count.
    pub fn new(mb: usize) -> TranspositionTable {
        let bytes = mb.max(1) * 1024 * 1024;
        let slots = bytes / std::mem::size_of::<Slot>();
        TranspositionTable::with_capacity(slots)
    }

    /// Table with exactly `slots` entries, rounded down to a power of two.
    pub fn with_capacity(slots: usize) -> TranspositionTable {
        let slots = slots.max(1);
        let len = if slots.is_power_of_two() { slots } else { slots.next_power_of_two() >> 1 };
        TranspositionTable {
            slots: (0..len).map(|_| Slot::new()).collect(),
            mask: (len - 1) as u64,
            generation: AtomicU8::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every entry and restart generation counting.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.clear();
        }
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Mark the start of a new search.
    pub fn new_generation(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn slot(&self, key: u64) -> &Slot {
        &self.slots[(key & self.mask) as usize]
    }

    /// Look up `key`. Only an entry whose full stored key equals `key` is a hit.
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let (stored, data) = self.slot(key).load()?;
        if stored != key {
            return None;
        }
        let bound = Bound::from_bits(data >> BOUND_SHIFT)?;
        let bits = (data & MOVE_MASK) as u32;
        Some(TtEntry {
            best_move: (bits != 0).then(|| Move::from_bits(bits)),
            depth: unpack_depth(data),
            bound,
            score: score_from_tt((data >> SCORE_SHIFT) as u16 as i16, ply),
        })
    }

    /// Record a searched node.
    ///
    /// Replaces the resident entry if the slot is empty, holds the same
    /// position, or was searched no deeper than `depth`.
    pub fn store(&self, key: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Move>, ply: usize) {
        let slot = self.slot(key);
        if let Some((stored, data)) = slot.load()
            && stored != key
            && unpack_depth(data) > depth
        {
            return;
        }
        let generation = self.generation.load(Ordering::Relaxed);
        slot.store(key, pack(best_move, depth, bound, generation, score_to_tt(score, ply)));
    }

    /// Permille of sampled slots written during the current generation.
    pub fn hashfull(&self) -> u16 {
        let sample = self.slots.len().min(HASHFULL_SAMPLE);
        let generation = self.generation.load(Ordering::Relaxed);
        let used = self.slots[..sample]
            .iter()
            .filter_map(Slot::load)
            .filter(|&(_, data)| unpack_generation(data) == generation)
            .count();
        (used * 1000 / sample) as u16
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}
