//! Move ordering: hash move, then captures and promotions by MVV-LVA, then
//! killers, then quiets by history.

use vantage_core::{Board, Move, MoveList, Piece, PieceKind};

use super::heuristics::{HistoryTable, KillerTable};

const HASH_MOVE: i32 = 1_000_000;
const TACTICAL: i32 = 100_000;
const KILLER: i32 = 90_000;

/// Victim and attacker weights by [`PieceKind::index`].
const WEIGHT: [i32; PieceKind::COUNT] = [1, 3, 3, 5, 9, 0];

/// Most valuable victim first, least valuable attacker breaking ties.
const fn mvv_lva(victim: PieceKind, attacker: PieceKind) -> i32 {
    WEIGHT[victim.index()] * 16 - WEIGHT[attacker.index()]
}

/// Ordering score for captures and promotions. Quiet moves score `0`.
pub fn tactical_score(mv: Move) -> i32 {
    let capture = mv.captured().map_or(0, |victim| mvv_lva(victim, mv.piece()));
    let promotion = mv.promotion_piece().map_or(0, |kind| WEIGHT[kind.index()] * 16);
    capture + promotion
}

/// Hands out moves best-first by selection sort, so a cutoff early in the
/// list skips sorting the rest.
pub struct MovePicker {
    moves: [Move; 256],
    scores: [i32; 256],
    len: usize,
    cursor: usize,
}

impl MovePicker {
    /// Picker for an interior node.
    pub fn new(
        moves: &MoveList,
        board: &Board,
        hash_move: Option<Move>,
        killers: &KillerTable,
        history: &HistoryTable,
        ply: usize,
    ) -> MovePicker {
        let us = board.side_to_move();
        MovePicker::build(moves, |mv| {
            if Some(mv) == hash_move {
                HASH_MOVE
            } else if mv.is_tactical() {
                TACTICAL + tactical_score(mv)
            } else if let Some(rank) = killers.rank(ply, mv) {
                KILLER - rank as i32
            } else {
                history.score(Piece::new(us, mv.piece()), mv)
            }
        })
    }

    /// Picker for quiescence, ordering by MVV-LVA only.
    pub fn tactical(moves: &MoveList) -> MovePicker {
        MovePicker::build(moves, tactical_score)
    }

    fn build(moves: &MoveList, score: impl Fn(Move) -> i32) -> MovePicker {
        let mut picker = MovePicker { moves: [Move::NULL; 256], scores: [0; 256], len: moves.len(), cursor: 0 };
        for (i, &mv) in moves.iter().enumerate() {
            picker.moves[i] = mv;
            picker.scores[i] = score(mv);
        }
        picker
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        if self.cursor >= self.len {
            return None;
        }
        let best = (self.cursor..self.len).max_by_key(|&i| (self.scores[i], std::cmp::Reverse(i)))?;
        self.moves.swap(self.cursor, best);
        self.scores.swap(self.cursor, best);
        self.cursor += 1;
        Some(self.moves[self.cursor - 1])
    }
}
