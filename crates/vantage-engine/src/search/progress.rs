//! Search progress reporting.

use std::sync::mpsc;
use std::time::Duration;

use vantage_core::{GameStatus, Move};

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Ran until its own depth, time or node budget was used up.
    Completed,
    /// Stopped early through its [`CancellationToken`](super::CancellationToken).
    Cancelled,
}

/// Final result of [`Searcher::search`](super::Searcher::search).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best move of the deepest completed iteration. `None` only when the
    /// root has no legal moves.
    pub best_move: Option<Move>,
    /// Centipawns from the side to move's point of view; mates are
    /// `±(MATE_SCORE - plies)`.
    pub score: i32,
    pub nodes: u64,
    /// Deepest completed iteration, `0` if none completed.
    pub depth: u8,
    pub pv: Vec<Move>,
    pub status: SearchStatus,
    /// Set when the root position was already checkmate or stalemate.
    pub terminal: Option<GameStatus>,
}

/// Snapshot after one completed iterative-deepening depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProgress {
    pub depth: u8,
    pub elapsed: Duration,
    pub nodes: u64,
    pub score: i32,
    pub best_move: Move,
    pub pv: Vec<Move>,
    /// Permille of the transposition table in use.
    pub hashfull: u16,
}

impl SearchProgress {
    pub fn nodes_per_second(&self) -> u64 {
        let micros = self.elapsed.as_micros().max(1);
        (self.nodes as u128 * 1_000_000 / micros) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Depth(SearchProgress),
    Finished(SearchOutcome),
}

/// Receiver of search events. Implementations must not block.
///
/// Implemented for closures, for `mpsc::Sender<SearchEvent>`, and for `()`
/// which ignores everything.
pub trait ProgressSink {
    fn report(&mut self, event: SearchEvent);
}

impl<F: FnMut(SearchEvent)> ProgressSink for F {
    fn report(&mut self, event: SearchEvent) {
        self(event)
    }
}

impl ProgressSink for mpsc::Sender<SearchEvent> {
    fn report(&mut self, event: SearchEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Discards every event.
impl ProgressSink for () {
    fn report(&mut self, _event: SearchEvent) {}
}
