//! Compile-time attack and ray tables.

use crate::bitboard::Bitboard;
use crate::color::Color;

const fn leaper_table(deltas: [(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let mut bits = 0u64;
        let mut d = 0;
        while d < 8 {
            let f = (sq % 8) as i8 + deltas[d].0;
            let r = (sq / 8) as i8 + deltas[d].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            d += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

const fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let from = Bitboard::new(1u64 << sq);
        table[0][sq] = from.pawn_attacks(Color::White);
        table[1][sq] = from.pawn_attacks(Color::Black);
        sq += 1;
    }
    table
}

/// `(between, line)` for every square pair. Both empty when unaligned.
///
/// `between` excludes both endpoints; `line` is the full edge-to-edge line
/// through both squares.
const fn ray_tables() -> ([[Bitboard; 64]; 64], [[Bitboard; 64]; 64]) {
    const DIRS: [(i8, i8); 8] = [
        (1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, -1), (1, -1), (-1, 1),
    ];
    let mut between = [[Bitboard::EMPTY; 64]; 64];
    let mut line = [[Bitboard::EMPTY; 64]; 64];
    let mut a = 0;
    while a < 64 {
        let mut d = 0;
        while d < 8 {
            let (df, dr) = DIRS[d];
            let full = ray(a, df, dr) | ray(a, -df, -dr) | (1u64 << a);
            let mut passed = 0u64;
            let mut f = (a % 8) as i8 + df;
            let mut r = (a / 8) as i8 + dr;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                let b = (r * 8 + f) as usize;
                between[a][b] = Bitboard::new(passed);
                line[a][b] = Bitboard::new(full);
                passed |= 1u64 << b;
                f += df;
                r += dr;
            }
            d += 1;
        }
        a += 1;
    }
    (between, line)
}

/// Every square from `sq` (exclusive) to the edge in one direction.
const fn ray(sq: usize, df: i8, dr: i8) -> u64 {
    let mut bits = 0u64;
    let mut f = (sq % 8) as i8 + df;
    let mut r = (sq / 8) as i8 + dr;
    while f >= 0 && f < 8 && r >= 0 && r < 8 {
        bits |= 1u64 << ((r * 8 + f) as u32);
        f += df;
        r += dr;
    }
    bits
}

pub(super) static KNIGHT: [Bitboard; 64] = leaper_table([
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
]);

pub(super) static KING: [Bitboard; 64] = leaper_table([
    (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
]);

pub(super) static PAWN: [[Bitboard; 64]; 2] = pawn_table();

const RAYS: ([[Bitboard; 64]; 64], [[Bitboard; 64]; 64]) = ray_tables();
pub(super) static BETWEEN: [[Bitboard; 64]; 64] = RAYS.0;
pub(super) static LINE: [[Bitboard; 64]; 64] = RAYS.1;
