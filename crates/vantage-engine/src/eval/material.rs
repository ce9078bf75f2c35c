//! Piece values and the bishop pair.

use vantage_core::{Board, Color, PieceKind};

use super::score::{S, Score};

/// Indexed by [`PieceKind::index`]. The king carries no material value.
pub const PIECE_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 120),
    S(320, 300),
    S(335, 320),
    S(500, 530),
    S(950, 980),
    S(0, 0),
];

const BISHOP_PAIR: Score = S(40, 60);

/// Material owned by `color`.
pub fn material(board: &Board, color: Color) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        score += PIECE_VALUE[kind.index()] * board.of(color, kind).count() as i16;
    }
    if board.of(color, PieceKind::Bishop).has_many() {
        score += BISHOP_PAIR;
    }
    score
}
