//! Legal move generation.
//!
//! Checkers and pinned pieces are computed once per call; every generator
//! then restricts destinations to the check-evasion mask and pinned pieces to
//! their pin line, so no move needs a trial make to prove it legal. King
//! steps and en passant are the two cases verified against occupancy.

mod king;
mod mode;
mod pawns;
mod pieces;
mod pins;

use std::ops::Deref;

use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;

use self::mode::{AllMoves, GenMode, Tactical};
use self::pins::Context;

/// Upper bound on legal moves in any reachable position is 218.
const CAPACITY: usize = 256;

/// Fixed-capacity, stack-allocated move buffer.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; CAPACITY],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList { moves: [Move::NULL; CAPACITY], len: 0 }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < CAPACITY);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }
}

impl Default for MoveList {
    fn default() -> MoveList {
        MoveList::new()
    }
}

impl Deref for MoveList {
    type Target = [Move];

    #[inline]
    fn deref(&self) -> &[Move] {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice().iter().map(|m| m.to_string())).finish()
    }
}

fn generate<M: GenMode>(board: &Board, color: Color) -> MoveList {
    let ctx = Context::new(board, color);
    let mut list = MoveList::new();
    // Under double check only the king may move.
    if !ctx.checkers.has_many() {
        pawns::generate::<M>(board, &ctx, &mut list);
        pieces::generate::<M>(board, &ctx, &mut list);
    }
    king::generate::<M>(board, &ctx, &mut list);
    list
}

/// All legal moves for `color` in this position.
///
/// For the side not to move, moves are those it would have if it were its
/// turn; the en passant target is never used for it.
pub fn generate_moves(board: &Board, color: Color) -> MoveList {
    generate::<AllMoves>(board, color)
}

/// All legal moves for the side to move.
#[inline]
pub fn generate_legal_moves(board: &Board) -> MoveList {
    generate::<AllMoves>(board, board.side_to_move())
}

/// Legal captures and promotions for the side to move.
pub fn generate_tactical_moves(board: &Board) -> MoveList {
    generate::<Tactical>(board, board.side_to_move())
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves, generate_moves, generate_tactical_moves};
    use crate::board::Board;
    use crate::chess_move::MoveKind;
    use crate::color::Color;
    use crate::piece::PieceKind;
    use crate::square::Square;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    fn uci(board: &Board) -> Vec<String> {
        let mut moves: Vec<String> = generate_legal_moves(board).iter().map(|m| m.to_string()).collect();
        moves.sort();
        moves
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let b = Board::starting_position();
        assert_eq!(generate_legal_moves(&b).len(), 20);
        assert_eq!(generate_moves(&b, Color::Black).len(), 20);
        assert!(generate_tactical_moves(&b).is_empty());
    }

    #[test]
    fn pinned_knight_cannot_move() {
        let b = board("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(generate_legal_moves(&b).iter().all(|m| m.from() != Square::E2));
    }

    #[test]
    fn pinned_rook_slides_along_pin() {
        let b = board("4r2k/8/8/8/8/4R3/8/4K3 w - - 0 1");
        let rook: Vec<String> = uci(&b).into_iter().filter(|m| m.starts_with("e3")).collect();
        assert_eq!(rook, ["e3e2", "e3e4", "e3e5", "e3e6", "e3e7", "e3e8"]);
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let b = board("4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1");
        let moves = generate_legal_moves(&b);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.piece() == PieceKind::King));
    }

    #[test]
    fn single_check_block_or_capture() {
        // Rook on e8 checks along the e-file; the bishop can block on e3 or e2.
        let b = board("k3r3/8/8/8/8/8/3B4/4K3 w - - 0 1");
        let moves = uci(&b);
        assert!(moves.contains(&"d2e3".to_string()));
        assert!(!moves.contains(&"d2c3".to_string()));
        assert!(!moves.contains(&"e1e2".to_string()));
    }

    #[test]
    fn castling_rules() {
        let open = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = uci(&open);
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));

        // Bishop on a6 covers f1.
        let through_check = board("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = uci(&through_check);
        assert!(!moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));

        let c1_covered = board("2r1k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(!uci(&c1_covered).contains(&"e1c1".to_string()));
        // b1 is attacked but the king never crosses it.
        let b1_covered = board("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(uci(&b1_covered).contains(&"e1c1".to_string()));

        let in_check = board("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1");
        assert!(!uci(&in_check).contains(&"e1c1".to_string()));
    }

    #[test]
    fn en_passant_available_and_exact() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep: Vec<_> = generate_legal_moves(&b)
            .iter()
            .copied()
            .filter(|m| m.kind() == MoveKind::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_string(), "e5d6");
        assert_eq!(ep[0].captured(), Some(PieceKind::Pawn));
    }

    #[test]
    fn en_passant_never_for_side_not_to_move() {
        let b = board("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1");
        let black = generate_moves(&b, Color::Black);
        assert!(black.iter().any(|m| m.kind() == MoveKind::EnPassant));
        let white = generate_moves(&b, Color::White);
        assert!(white.iter().all(|m| m.kind() != MoveKind::EnPassant));
    }

    #[test]
    fn en_passant_horizontal_discovery_is_illegal() {
        let b = board("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1");
        assert!(generate_legal_moves(&b).iter().all(|m| m.kind() != MoveKind::EnPassant));
    }

    #[test]
    fn en_passant_resolves_pawn_check() {
        // The d5 pawn that just moved gives check; taking it en passant is legal.
        let checked = board("8/8/8/3pP3/4K3/8/8/k7 w - d6 0 1");
        assert!(checked.is_in_check());
        assert!(uci(&checked).contains(&"e5d6".to_string()));
    }

    #[test]
    fn promotions_come_in_fours() {
        let b = board("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = generate_legal_moves(&b);
        assert_eq!(moves.iter().filter(|m| m.is_promotion()).count(), 8);
        let tactical = generate_tactical_moves(&b);
        assert_eq!(tactical.len(), 8);
        assert!(tactical.iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn captures_record_victims() {
        let b = board("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let capture = b.parse_move("e4d5").unwrap();
        assert_eq!(capture.captured(), Some(PieceKind::Queen));
        let tactical = generate_tactical_moves(&b);
        assert_eq!(tactical.len(), 1);
    }

    #[test]
    fn moves_for_either_colour() {
        let b = board("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let black = generate_moves(&b, Color::Black);
        assert!(black.iter().all(|m| m.from() == Square::E8));
        assert_eq!(black.len(), 5);
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mated = board("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1");
        assert!(generate_legal_moves(&mated).is_empty());
        assert!(mated.is_in_check());
        let stalemate = board("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
        assert!(generate_legal_moves(&stalemate).is_empty());
        assert!(!stalemate.is_in_check());
    }
}
