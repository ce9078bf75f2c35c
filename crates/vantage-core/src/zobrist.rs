//! Zobrist keys, generated at compile time from a fixed seed.

use crate::board::Board;
use crate::color::Color;
use crate::piece::Piece;
use crate::square::Square;

pub(crate) struct Keys {
    pub piece_square: [[u64; 64]; 12],
    pub black_to_move: u64,
    pub castling: [u64; 16],
    pub en_passant_file: [u64; 8],
}

pub(crate) static KEYS: Keys = Keys::generate(0x7661_6e74_6167_6521);

/// SplitMix64 step. Returns (value, next_state).
const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31), next)
}

impl Keys {
    const fn generate(seed: u64) -> Keys {
        let mut keys = Keys {
            piece_square: [[0; 64]; 12],
            black_to_move: 0,
            castling: [0; 16],
            en_passant_file: [0; 8],
        };
        let mut state = seed;
        let mut p = 0;
        while p < 12 {
            let mut sq = 0;
            while sq < 64 {
                let (v, s) = splitmix64(state);
                keys.piece_square[p][sq] = v;
                state = s;
                sq += 1;
            }
            p += 1;
        }
        let (v, s) = splitmix64(state);
        keys.black_to_move = v;
        state = s;
        // Index 0 (no rights) keeps key 0 so an empty set hashes to nothing.
        let mut i = 1;
        while i < 16 {
            let (v, s) = splitmix64(state);
            keys.castling[i] = v;
            state = s;
            i += 1;
        }
        let mut f = 0;
        while f < 8 {
            let (v, s) = splitmix64(state);
            keys.en_passant_file[f] = v;
            state = s;
            f += 1;
        }
        keys
    }
}

#[inline]
pub(crate) fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

#[inline]
pub(crate) fn en_passant_key(ep: Option<Square>) -> u64 {
    match ep {
        Some(sq) => KEYS.en_passant_file[sq.file() as usize],
        None => 0,
    }
}

/// Full recomputation. Used at construction and for verification.
pub(crate) fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0;
    for sq in Square::all() {
        if let Some(piece) = board.piece_on(sq) {
            hash ^= piece_key(piece, sq);
        }
    }
    if board.side_to_move() == Color::Black {
        hash ^= KEYS.black_to_move;
    }
    hash ^= KEYS.castling[board.castling().bits() as usize];
    hash ^ en_passant_key(board.en_passant())
}

#[cfg(test)]
mod tests {
    use super::{KEYS, hash_from_scratch};
    use crate::board::Board;

    #[test]
    fn keys_are_distinct_and_nonzero() {
        let mut all: Vec<u64> = KEYS.piece_square.iter().flatten().copied().collect();
        all.push(KEYS.black_to_move);
        all.extend_from_slice(&KEYS.castling[1..]);
        all.extend_from_slice(&KEYS.en_passant_file);
        let n = all.len();
        assert!(all.iter().all(|&k| k != 0));
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn side_to_move_changes_hash() {
        let white: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let black: Board = "4k3/8/8/8/8/8/8/4K3 b - - 0 1".parse().unwrap();
        assert_ne!(white.hash(), black.hash());
        assert_eq!(white.hash(), hash_from_scratch(&white));
    }

    #[test]
    fn en_passant_target_changes_hash() {
        let with: Board = "4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1".parse().unwrap();
        let without: Board = "4k3/8/8/8/4Pp2/8/8/4K3 b - - 0 1".parse().unwrap();
        assert_ne!(with.hash(), without.hash());
    }
}
