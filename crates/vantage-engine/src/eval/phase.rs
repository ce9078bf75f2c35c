//! Game phase from the non-pawn material left on the board.

use vantage_core::{Board, PieceKind};

/// Phase of the starting position: four minors, four rooks and two queens.
pub const MAX_PHASE: i32 = 24;

const WEIGHTS: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// `MAX_PHASE` for full middlegame material down to `0` for bare kings and
/// pawns. Promotions cannot push the value past the maximum.
pub fn game_phase(board: &Board) -> i32 {
    WEIGHTS
        .iter()
        .map(|&(kind, weight)| board.of_kind(kind).count() as i32 * weight)
        .sum::<i32>()
        .min(MAX_PHASE)
}
