//! Iterative-deepening search.

pub mod control;
pub mod heuristics;
mod negamax;
pub mod ordering;
pub mod progress;
pub mod tt;

use std::time::Duration;

use tracing::{debug, info};
use vantage_core::{Board, GameStatus, generate_legal_moves};

use crate::eval::{Evaluator, TaperedEval};
use crate::time::{Clock, budget};

pub use control::CancellationToken;
pub use progress::{ProgressSink, SearchEvent, SearchOutcome, SearchProgress, SearchStatus};
use negamax::{SearchContext, search_root};
use control::SearchControl;
use tt::TranspositionTable;

/// Bound no score reaches.
pub const INF: i32 = 30_000;
/// Score for delivering mate at the root; mate `n` plies away scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 29_000;
/// Ply ceiling; search tables are sized for it.
pub const MAX_PLY: usize = 128;
/// Scores beyond this are forced mates.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;
pub const DRAW: i32 = 0;

/// Moves to mate for a mate score: positive when the side to move mates,
/// negative when it gets mated. `None` for ordinary scores.
pub fn mate_in(score: i32) -> Option<i32> {
    if score > MATE_THRESHOLD {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score < -MATE_THRESHOLD {
        Some(-(MATE_SCORE + score + 1) / 2)
    } else {
        None
    }
}

/// Tunable search behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Extend leaves with a captures-only search instead of a bare static
    /// evaluation.
    pub quiescence: bool,
    /// Deepest ply any line may reach, capped at [`MAX_PLY`]` - 1`.
    pub max_ply: usize,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig { quiescence: true, max_ply: MAX_PLY - 1 }
    }
}

/// What bounds a single search. All limits are optional; with none set the
/// search runs until cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
    pub clock: Option<Clock>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> SearchLimits {
        SearchLimits { depth: Some(depth), ..SearchLimits::default() }
    }

    pub fn movetime(movetime: Duration) -> SearchLimits {
        SearchLimits { movetime: Some(movetime), ..SearchLimits::default() }
    }

    pub fn nodes(nodes: u64) -> SearchLimits {
        SearchLimits { nodes: Some(nodes), ..SearchLimits::default() }
    }
}

/// Iterative-deepening alpha-beta searcher owning a transposition table.
pub struct Searcher<E = TaperedEval> {
    tt: TranspositionTable,
    evaluator: E,
    config: SearchConfig,
}

impl Searcher {
    /// Searcher with the default evaluator and a `hash_mb` megabyte table.
    pub fn new(hash_mb: usize) -> Searcher {
        Searcher::with_evaluator(TaperedEval, hash_mb)
    }
}

impl Default for Searcher {
    fn default() -> Searcher {
        Searcher::new(16)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn with_evaluator(evaluator: E, hash_mb: usize) -> Searcher<E> {
        Searcher { tt: TranspositionTable::new(hash_mb), evaluator, config: SearchConfig::default() }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned in earlier searches.
    pub fn clear(&self) {
        self.tt.clear();
    }

    /// Replace the table with an empty one of `mb` megabytes.
    pub fn resize(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Search `board` for its side to move.
    ///
    /// Deepens one ply at a time, reporting a [`SearchEvent::Depth`] after
    /// each completed iteration and a [`SearchEvent::Finished`] at the end.
    /// An iteration interrupted by `token` or a hard limit is discarded.
    pub fn search(
        &self,
        board: &Board,
        limits: &SearchLimits,
        token: &CancellationToken,
        sink: &mut impl ProgressSink,
    ) -> SearchOutcome {
        let root_moves = generate_legal_moves(board);
        let Some(&fallback) = root_moves.first() else {
            let outcome = terminal_outcome(board);
            info!(terminal = ?outcome.terminal, "no legal moves at root");
            sink.report(SearchEvent::Finished(outcome.clone()));
            return outcome;
        };

        self.tt.new_generation();
        let (soft, hard) = budget(limits, board);
        let control = SearchControl::new(token, soft, hard, limits.nodes);
        let mut ctx = SearchContext::new(board.clone(), &self.tt, &self.evaluator, &self.config, control);
        let max_depth = limits.depth.unwrap_or(u8::MAX).clamp(1, ctx.max_ply() as u8);

        let mut completed: Option<SearchProgress> = None;
        for depth in 1..=max_depth {
            if depth > 1 && ctx.control.should_stop_iterating() {
                break;
            }
            let hint = completed.as_ref().map(|p| p.best_move);
            let Some(score) = search_root(&mut ctx, depth, hint) else {
                break;
            };
            let pv = ctx.pv.root().to_vec();
            let progress = SearchProgress {
                depth,
                elapsed: ctx.control.elapsed(),
                nodes: ctx.nodes,
                score,
                best_move: pv.first().copied().unwrap_or(fallback),
                pv,
                hashfull: self.tt.hashfull(),
            };
            debug!(depth, score, nodes = ctx.nodes, best = %progress.best_move, "depth completed");
            sink.report(SearchEvent::Depth(progress.clone()));
            completed = Some(progress);
        }

        let status = if ctx.control.cancelled() { SearchStatus::Cancelled } else { SearchStatus::Completed };
        let outcome = match completed {
            Some(p) => SearchOutcome {
                best_move: Some(p.best_move),
                score: p.score,
                nodes: ctx.nodes,
                depth: p.depth,
                pv: p.pv,
                status,
                terminal: None,
            },
            None => SearchOutcome {
                best_move: Some(fallback),
                score: DRAW,
                nodes: ctx.nodes,
                depth: 0,
                pv: Vec::new(),
                status,
                terminal: None,
            },
        };
        info!(
            depth = outcome.depth,
            score = outcome.score,
            nodes = outcome.nodes,
            status = ?outcome.status,
            "search finished"
        );
        sink.report(SearchEvent::Finished(outcome.clone()));
        outcome
    }
}

fn terminal_outcome(board: &Board) -> SearchOutcome {
    let mated = board.is_in_check();
    SearchOutcome {
        best_move: None,
        score: if mated { -MATE_SCORE } else { DRAW },
        nodes: 0,
        depth: 0,
        pv: Vec::new(),
        status: SearchStatus::Completed,
        terminal: Some(if mated { GameStatus::Checkmate } else { GameStatus::Stalemate }),
    }
}

impl<E> std::fmt::Debug for Searcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").field("tt", &self.tt).field("config", &self.config).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use vantage_core::{Board, GameStatus};

    use super::*;

    const SCHOLAR: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

    fn search_depth(searcher: &Searcher, board: &Board, depth: u8) -> SearchOutcome {
        searcher.search(board, &SearchLimits::depth(depth), &CancellationToken::new(), &mut ())
    }

    #[test]
    fn mate_scores_convert_to_moves() {
        assert_eq!(mate_in(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_in(MATE_SCORE - 3), Some(2));
        assert_eq!(mate_in(-(MATE_SCORE - 2)), Some(-1));
        assert_eq!(mate_in(-(MATE_SCORE - 4)), Some(-2));
        assert_eq!(mate_in(250), None);
    }

    #[test]
    fn finds_mate_in_one() {
        let board: Board = SCHOLAR.parse().unwrap();
        let searcher = Searcher::new(1);
        for depth in [1, 2, 4] {
            searcher.clear();
            let outcome = search_depth(&searcher, &board, depth);
            assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("h5f7"), "depth {depth}");
            assert_eq!(outcome.score, MATE_SCORE - 1);
            assert_eq!(outcome.status, SearchStatus::Completed);
        }
    }

    #[test]
    fn mate_in_one_without_quiescence() {
        let board: Board = SCHOLAR.parse().unwrap();
        let mut searcher = Searcher::new(1);
        searcher.set_config(SearchConfig { quiescence: false, ..SearchConfig::default() });
        let outcome = search_depth(&searcher, &board, 2);
        assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("h5f7"));
        assert_eq!(mate_in(outcome.score), Some(1));
    }

    #[test]
    fn terminal_roots_are_reported_without_search() {
        let searcher = Searcher::new(1);

        let stalemate: Board = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let outcome = search_depth(&searcher, &stalemate, 3);
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.terminal, Some(GameStatus::Stalemate));

        let mated: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let outcome = search_depth(&searcher, &mated, 3);
        assert_eq!(outcome.best_move, None);
        assert!(outcome.score < -MATE_THRESHOLD);
        assert_eq!(outcome.terminal, Some(GameStatus::Checkmate));
    }

    #[test]
    fn avoids_stalemating_when_winning() {
        // Qb6 stalemates; anything sensible keeps the win.
        let board: Board = "k7/2K5/8/1Q6/8/8/8/8 w - - 0 1".parse().unwrap();
        let outcome = search_depth(&Searcher::new(1), &board, 3);
        assert_ne!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("b5b6"));
        assert!(outcome.score > 500);
    }

    #[test]
    fn same_search_twice_is_deterministic() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let searcher = Searcher::new(4);
        let first = search_depth(&searcher, &board, 4);
        searcher.clear();
        let second = search_depth(&searcher, &board, 4);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.pv, second.pv);
    }

    #[test]
    fn reports_every_depth_then_finishes() {
        let board = Board::starting_position();
        let (tx, rx) = mpsc::channel();
        let mut tx = tx;
        let outcome = Searcher::new(1).search(&board, &SearchLimits::depth(4), &CancellationToken::new(), &mut tx);
        drop(tx);

        let events: Vec<SearchEvent> = rx.iter().collect();
        let depths: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::Depth(p) => Some(p.depth),
                SearchEvent::Finished(_) => None,
            })
            .collect();
        assert_eq!(depths, [1, 2, 3, 4]);
        assert_eq!(events.last(), Some(&SearchEvent::Finished(outcome.clone())));
        for event in &events {
            if let SearchEvent::Depth(p) = event {
                assert_eq!(p.pv.first(), Some(&p.best_move));
            }
        }
        assert_eq!(outcome.depth, 4);
        assert!(outcome.pv.len() >= 2);
        assert!(board.parse_move(&outcome.best_move.unwrap().to_string()).is_ok());
    }

    #[test]
    fn cancellation_keeps_last_completed_depth() {
        let board = Board::starting_position();
        let token = CancellationToken::new();
        let handle = token.clone();
        let mut first_best = None;
        let mut sink = |event: SearchEvent| {
            if let SearchEvent::Depth(p) = event {
                first_best.get_or_insert(p.best_move);
                handle.cancel();
            }
        };
        let outcome = Searcher::new(1).search(&board, &SearchLimits::default(), &token, &mut sink);
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert_eq!(outcome.depth, 1);
        assert_eq!(outcome.best_move, first_best);
    }

    fn depth_reports(events: &[SearchEvent]) -> Vec<&SearchProgress> {
        events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::Depth(p) => Some(p),
                SearchEvent::Finished(_) => None,
            })
            .collect()
    }

    fn assert_matches_progress(outcome: &SearchOutcome, last: &SearchProgress) {
        assert_eq!(outcome.depth, last.depth);
        assert_eq!(outcome.best_move, Some(last.best_move));
        assert_eq!(outcome.score, last.score);
        assert_eq!(outcome.pv, last.pv);
    }

    #[test]
    fn node_budget_mid_iteration_discards_the_partial_depth() {
        let board = Board::starting_position();
        let (mut tx, rx) = mpsc::channel();
        Searcher::new(1).search(&board, &SearchLimits::depth(4), &CancellationToken::new(), &mut tx);
        drop(tx);
        let full: Vec<SearchEvent> = rx.iter().collect();
        let full = depth_reports(&full);
        let (third, fourth) = (full[2], full[3]);

        // Same search again, tripping halfway through depth 4.
        let budget = (third.nodes + fourth.nodes) / 2;
        let (mut tx, rx) = mpsc::channel();
        let outcome = Searcher::new(1).search(&board, &SearchLimits::nodes(budget), &CancellationToken::new(), &mut tx);
        drop(tx);
        let events: Vec<SearchEvent> = rx.iter().collect();
        let reports = depth_reports(&events);

        assert_eq!(reports.len(), 3);
        assert_eq!((reports[2].nodes, &reports[2].pv), (third.nodes, &third.pv));
        assert_matches_progress(&outcome, third);
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert!(outcome.nodes > third.nodes);
    }

    #[test]
    fn cancel_from_another_thread_returns_the_last_reported_depth() {
        let board = Board::starting_position();
        let token = CancellationToken::new();
        let handle = token.clone();
        let (tx, rx) = mpsc::channel();

        let (outcome, events) = thread::scope(|s| {
            let watcher = s.spawn(move || {
                let mut seen = Vec::new();
                for event in rx.iter() {
                    if matches!(event, SearchEvent::Depth(_)) {
                        handle.cancel();
                    }
                    seen.push(event);
                }
                seen
            });
            let mut tx = tx;
            let outcome = Searcher::new(1).search(&board, &SearchLimits::default(), &token, &mut tx);
            drop(tx);
            (outcome, watcher.join().unwrap())
        });

        let reports = depth_reports(&events);
        let last = reports.last().copied().unwrap();
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert_matches_progress(&outcome, last);
        assert_eq!(events.last(), Some(&SearchEvent::Finished(outcome.clone())));
    }

    #[test]
    fn cancelled_before_start_still_returns_a_legal_move() {
        let board = Board::starting_position();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = Searcher::new(1).search(&board, &SearchLimits::default(), &token, &mut ());
        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn node_budget_stops_the_search() {
        let board = Board::starting_position();
        let outcome = Searcher::new(1).search(&board, &SearchLimits::nodes(5_000), &CancellationToken::new(), &mut ());
        assert_eq!(outcome.status, SearchStatus::Completed);
        assert!(outcome.nodes <= 5_000);
        assert!(outcome.best_move.is_some());
    }

    #[test]
    fn search_after_repetition_stays_level() {
        let mut board = Board::starting_position();
        for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            board.play(mv).unwrap();
        }
        assert!(board.is_repetition());
        let outcome = search_depth(&Searcher::new(1), &board, 4);
        assert!(outcome.best_move.is_some());
        assert!(outcome.score.abs() <= 100, "score {}", outcome.score);
    }

    #[test]
    fn wins_hanging_queen() {
        let board: Board = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let outcome = search_depth(&Searcher::new(1), &board, 3);
        assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("e4d5"));
    }
}
