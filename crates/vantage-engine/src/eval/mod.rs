//! Static evaluation.
//!
//! Search consumes any [`Evaluator`]; [`TaperedEval`] is the default, blending
//! material and piece-square bonuses between middlegame and endgame weights.

pub mod material;
pub mod phase;
pub mod pst;
pub mod score;

use vantage_core::{Board, Color};

use self::material::material;
use self::phase::game_phase;
use self::pst::pst;
use self::score::Score;

/// A static scoring function in centipawns.
///
/// Implementations must be antisymmetric: `evaluate(b, c) == -evaluate(b, !c)`.
/// Scores must stay well inside the mate band used by search.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, color: Color) -> i32;
}

/// Material plus piece-square tables, tapered by game phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaperedEval;

impl TaperedEval {
    fn side(board: &Board, color: Color) -> Score {
        let mut score = material(board, color);
        for sq in board.side(color) {
            if let Some(piece) = board.piece_on(sq) {
                score += pst(piece.kind, color, sq);
            }
        }
        score
    }
}

impl Evaluator for TaperedEval {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        let white = Self::side(board, Color::White) - Self::side(board, Color::Black);
        white.taper(game_phase(board)) * color.sign()
    }
}

/// Evaluate with the default evaluator from the side to move's point of view.
pub fn evaluate(board: &Board) -> i32 {
    TaperedEval.evaluate(board, board.side_to_move())
}
