//! Check and pin analysis shared by every generator pass.

use crate::attacks::{between, bishop_attacks, knight_attacks, line, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

/// Everything a generator needs to emit only legal moves for one side.
pub(super) struct Context {
    pub us: Color,
    pub them: Color,
    pub king: Square,
    pub occupied: Bitboard,
    pub friendly: Bitboard,
    pub enemy: Bitboard,
    pub checkers: Bitboard,
    pub pinned: Bitboard,
    /// Destinations that resolve the current check: all squares when not in
    /// check, the checker and its ray under single check, none under double.
    pub check_mask: Bitboard,
}

impl Context {
    pub fn new(board: &Board, us: Color) -> Context {
        let them = !us;
        let king = board.king_square(us);
        let occupied = board.occupied();
        let friendly = board.side(us);

        let mut checkers = (knight_attacks(king) & board.of(them, PieceKind::Knight))
            | (pawn_attacks(us, king) & board.of(them, PieceKind::Pawn));
        let mut pinned = Bitboard::EMPTY;

        let snipers = (rook_attacks(king, Bitboard::EMPTY) & board.orthogonal_sliders(them))
            | (bishop_attacks(king, Bitboard::EMPTY) & board.diagonal_sliders(them));
        for sniper in snipers {
            let blockers = between(king, sniper) & occupied;
            if blockers.is_empty() {
                checkers |= sniper.bitboard();
            } else if !blockers.has_many() {
                pinned |= blockers & friendly;
            }
        }

        let check_mask = match checkers.first() {
            None => Bitboard::FULL,
            Some(_) if checkers.has_many() => Bitboard::EMPTY,
            Some(checker) => between(king, checker) | checkers,
        };

        Context {
            us,
            them,
            king,
            occupied,
            friendly,
            enemy: board.side(them),
            checkers,
            pinned,
            check_mask,
        }
    }

    /// A pinned piece may only move along the line through its king.
    #[inline]
    pub fn pin_allows(&self, from: Square, to: Square) -> bool {
        !self.pinned.contains(from) || line(self.king, from).contains(to)
    }
}
