//! Exhaustive leaf counting over the legal move tree.
//!
//! Uses the same generator and make/unmake as search, so any mismatch
//! against published counts pinpoints a move generation defect.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::board::Board;
use crate::chess_move::Move;
use crate::movegen::generate_legal_moves;

/// Number of positions reachable in exactly `depth` plies.
///
/// The board is restored before returning. The last ply is bulk counted
/// from the move list length.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mv in moves.iter() {
        board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.unmake_move();
    }
    nodes
}

/// Per-root-move breakdown of a perft run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    /// Root moves with their subtree counts, sorted by move text.
    pub moves: Vec<(Move, u64)>,
    pub total: u64,
    pub elapsed: Duration,
}

impl PerftReport {
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { (self.total as f64 / secs) as u64 } else { 0 }
    }
}

/// Run perft and report each root move's subtree separately.
///
/// Depth 0 yields an empty breakdown with a total of 1.
pub fn divide(board: &mut Board, depth: u32) -> PerftReport {
    let start = Instant::now();
    if depth == 0 {
        return PerftReport { moves: Vec::new(), total: 1, elapsed: start.elapsed() };
    }

    let mut moves: Vec<(Move, u64)> = generate_legal_moves(board)
        .iter()
        .map(|&mv| {
            board.make_move(mv);
            let count = perft(board, depth - 1);
            board.unmake_move();
            trace!(%mv, count, "divide");
            (mv, count)
        })
        .collect();
    moves.sort_by_cached_key(|(mv, _)| mv.to_string());

    let total = moves.iter().map(|(_, n)| n).sum();
    let report = PerftReport { moves, total, elapsed: start.elapsed() };
    debug!(depth, total, nps = report.nodes_per_second(), "perft finished");
    report
}
