//! Attack lookups for every piece type.
//!
//! Leaper and pawn-capture masks come from compile-time tables; rook and
//! bishop attacks use magic bitboards so each query is one multiply and one
//! load regardless of occupancy.

mod magic;
mod magic_data;
mod tables;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    tables::KNIGHT[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    tables::KING[sq.index()]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables::PAWN[color.index()][sq.index()]
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magic::rook(sq.index(), occupied)
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magic::bishop(sq.index(), occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attacks of a non-pawn piece of the given kind.
#[inline]
pub fn piece_attacks(kind: PieceKind, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
        PieceKind::Pawn => Bitboard::EMPTY,
    }
}

/// Squares strictly between two aligned squares; empty otherwise.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables::BETWEEN[a.index()][b.index()]
}

/// The whole line through two aligned squares; empty otherwise.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    tables::LINE[a.index()][b.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Bitboard;

    /// Deterministic sparse occupancies for the magic cross-checks.
    fn occupancies() -> impl Iterator<Item = u64> {
        let mut state = 0x2545_f491_4f6c_dd1du64;
        (0..400).map(move |_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state & state.rotate_left(17) & state.rotate_left(31)
        })
    }

    #[test]
    fn leaper_counts() {
        assert_eq!(knight_attacks(Square::E4).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::H8), Bitboard::EMPTY.with(Square::F7).with(Square::G6));
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(king_attacks(Square::D5).count(), 8);
        assert_eq!(king_attacks(Square::H1).count(), 3);
    }

    #[test]
    fn pawn_capture_masks() {
        assert_eq!(pawn_attacks(Color::White, Square::H4), Square::G5.bitboard());
        assert_eq!(
            pawn_attacks(Color::Black, Square::D5),
            Square::C4.bitboard() | Square::E4.bitboard()
        );
        assert!(pawn_attacks(Color::White, Square::C8).is_empty());
    }

    #[test]
    fn rook_on_empty_board_sees_fourteen() {
        for sq in Square::all() {
            assert_eq!(rook_attacks(sq, Bitboard::EMPTY).count(), 14, "{sq}");
        }
    }

    #[test]
    fn blockers_are_included_then_stop() {
        let occ = Square::E6.bitboard() | Square::C4.bitboard();
        let attacks = rook_attacks(Square::E4, occ);
        assert!(attacks.contains(Square::E6));
        assert!(!attacks.contains(Square::E7));
        assert!(attacks.contains(Square::C4));
        assert!(!attacks.contains(Square::B4));
        assert!(attacks.contains(Square::E1));
        assert_eq!(bishop_attacks(Square::D4, Bitboard::EMPTY).count(), 13);
    }

    #[test]
    fn magic_lookup_matches_ray_walk() {
        for occ in occupancies() {
            for sq in Square::all() {
                let occ_bb = Bitboard::new(occ);
                assert_eq!(
                    rook_attacks(sq, occ_bb).bits(),
                    magic::slide(sq.index(), occ, &magic::ROOK_DIRS),
                    "rook {sq} occ {occ:#x}"
                );
                assert_eq!(
                    bishop_attacks(sq, occ_bb).bits(),
                    magic::slide(sq.index(), occ, &magic::BISHOP_DIRS),
                    "bishop {sq} occ {occ:#x}"
                );
            }
        }
    }

    #[test]
    fn between_and_line() {
        assert_eq!(between(Square::E1, Square::E4), Square::E2.bitboard() | Square::E3.bitboard());
        assert_eq!(between(Square::A1, Square::H8).count(), 6);
        assert_eq!(between(Square::E1, Square::E2), Bitboard::EMPTY);
        assert_eq!(between(Square::A1, Square::B3), Bitboard::EMPTY);
        assert_eq!(line(Square::C3, Square::E5).count(), 8);
        assert!(line(Square::C3, Square::E5).contains(Square::A1));
        assert_eq!(line(Square::B2, Square::G2), Bitboard::RANK_2);
        assert_eq!(line(Square::A1, Square::B3), Bitboard::EMPTY);
        for a in Square::all() {
            for b in Square::all() {
                assert_eq!(between(a, b), between(b, a));
                assert_eq!(line(a, b), line(b, a));
            }
        }
    }
}
