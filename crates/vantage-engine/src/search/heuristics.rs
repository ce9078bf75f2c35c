//! Killer moves and history scores for ordering quiet moves.

use vantage_core::{Move, Piece};

use super::MAX_PLY;

/// Two quiet moves per ply that recently caused a beta cutoff.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> KillerTable {
        KillerTable { slots: [[None; 2]; MAX_PLY] }
    }

    /// Remember `mv` at `ply`, pushing the older killer into the second slot.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != Some(mv) {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    /// `0` for the newest killer, `1` for the older one.
    pub fn rank(&self, ply: usize, mv: Move) -> Option<usize> {
        self.slots.get(ply)?.iter().position(|&k| k == Some(mv))
    }
}

impl Default for KillerTable {
    fn default() -> KillerTable {
        KillerTable::new()
    }
}

const HISTORY_LIMIT: i32 = 16_384;

/// Cutoff statistics for quiet moves, indexed by moving piece and target.
pub struct HistoryTable {
    table: [[i32; 64]; Piece::COUNT],
}

impl HistoryTable {
    pub fn new() -> HistoryTable {
        HistoryTable { table: [[0; 64]; Piece::COUNT] }
    }

    /// Reward a quiet move that failed high.
    pub fn reward(&mut self, piece: Piece, mv: Move, depth: u8) {
        let entry = &mut self.table[piece.index()][mv.to().index()];
        *entry = (*entry + bonus(depth)).min(HISTORY_LIMIT);
    }

    /// Penalise a quiet move searched before the cutoff move.
    pub fn punish(&mut self, piece: Piece, mv: Move, depth: u8) {
        let entry = &mut self.table[piece.index()][mv.to().index()];
        *entry = (*entry - bonus(depth)).max(-HISTORY_LIMIT);
    }

    pub fn score(&self, piece: Piece, mv: Move) -> i32 {
        self.table[piece.index()][mv.to().index()]
    }
}

impl Default for HistoryTable {
    fn default() -> HistoryTable {
        HistoryTable::new()
    }
}

fn bonus(depth: u8) -> i32 {
    let depth = depth as i32;
    depth * depth
}
