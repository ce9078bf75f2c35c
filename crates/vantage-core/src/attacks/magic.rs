//! Magic-bitboard lookup for rook and bishop attacks.
//!
//! Tables are built once on first use. Per square, the relevant occupancy
//! (ray squares minus the final edge square) is multiplied by a magic number
//! and shifted down to index that square's slice of a shared attack vector.

use std::sync::OnceLock;

use crate::bitboard::Bitboard;

use super::magic_data::{BISHOP_MAGICS, ROOK_MAGICS};

pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Walk each `(file, rank)` direction from `sq`, stopping after the first
/// occupied square. Reference implementation for table population.
pub(super) const fn slide(sq: usize, occupied: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let mut attacks = 0u64;
    let mut d = 0;
    while d < 4 {
        let (df, dr) = dirs[d];
        let mut f = (sq % 8) as i8 + df;
        let mut r = (sq / 8) as i8 + dr;
        while f >= 0 && f < 8 && r >= 0 && r < 8 {
            let bit = 1u64 << ((r * 8 + f) as u32);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            f += df;
            r += dr;
        }
        d += 1;
    }
    attacks
}

/// Squares whose occupancy can change the attack set: every ray square
/// except the last one before the edge.
const fn relevant_mask(sq: usize, dirs: &[(i8, i8); 4]) -> u64 {
    let mut mask = 0u64;
    let mut d = 0;
    while d < 4 {
        let (df, dr) = dirs[d];
        let mut f = (sq % 8) as i8 + df;
        let mut r = (sq / 8) as i8 + dr;
        while f + df >= 0 && f + df < 8 && r + dr >= 0 && r + dr < 8 {
            mask |= 1u64 << ((r * 8 + f) as u32);
            f += df;
            r += dr;
        }
        d += 1;
    }
    mask
}

#[derive(Clone, Copy)]
struct Magic {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied.bits() & self.mask;
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

struct SliderTable {
    magics: [Magic; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(magic_numbers: &[u64; 64], dirs: &[(i8, i8); 4]) -> SliderTable {
        let mut magics = [Magic { mask: 0, magic: 0, shift: 0, offset: 0 }; 64];
        let mut size = 0usize;
        for (sq, entry) in magics.iter_mut().enumerate() {
            let mask = relevant_mask(sq, dirs);
            let bits = mask.count_ones();
            *entry = Magic { mask, magic: magic_numbers[sq], shift: 64 - bits, offset: size };
            size += 1 << bits;
        }

        let mut attacks = vec![Bitboard::EMPTY; size];
        for (sq, entry) in magics.iter().enumerate() {
            // Carry-rippler enumeration of every subset of the mask.
            let mut subset = 0u64;
            loop {
                attacks[entry.index(Bitboard::new(subset))] =
                    Bitboard::new(slide(sq, subset, dirs));
                subset = subset.wrapping_sub(entry.mask) & entry.mask;
                if subset == 0 {
                    break;
                }
            }
        }
        SliderTable { magics, attacks }
    }

    #[inline(always)]
    fn lookup(&self, sq: usize, occupied: Bitboard) -> Bitboard {
        self.attacks[self.magics[sq].index(occupied)]
    }
}

static ROOK_TABLE: OnceLock<SliderTable> = OnceLock::new();
static BISHOP_TABLE: OnceLock<SliderTable> = OnceLock::new();

#[inline]
pub(super) fn rook(sq: usize, occupied: Bitboard) -> Bitboard {
    ROOK_TABLE
        .get_or_init(|| SliderTable::build(&ROOK_MAGICS, &ROOK_DIRS))
        .lookup(sq, occupied)
}

#[inline]
pub(super) fn bishop(sq: usize, occupied: Bitboard) -> Bitboard {
    BISHOP_TABLE
        .get_or_init(|| SliderTable::build(&BISHOP_MAGICS, &BISHOP_DIRS))
        .lookup(sq, occupied)
}
