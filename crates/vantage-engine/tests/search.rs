//! End-to-end search behaviour across threads, limits and custom evaluators.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use vantage_core::{Board, Color, generate_legal_moves};
use vantage_engine::{
    CancellationToken, Clock, Evaluator, SearchEvent, SearchLimits, SearchOutcome, SearchStatus, Searcher,
    mate_in,
};

const SICILIAN_FEN: &str = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2";
const RUY_LOPEZ_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
const ENDGAME_FEN: &str = "8/8/8/3k4/8/3K4/4P3/8 w - - 0 1";

fn legal(board: &Board, outcome: &SearchOutcome) -> bool {
    outcome.best_move.is_some_and(|mv| generate_legal_moves(board).contains(mv))
}

#[test]
fn best_moves_are_legal() {
    let searcher = Searcher::new(8);
    for fen in [SICILIAN_FEN, RUY_LOPEZ_FEN, ENDGAME_FEN] {
        let board: Board = fen.parse().unwrap();
        let outcome = searcher.search(&board, &SearchLimits::depth(4), &CancellationToken::new(), &mut ());
        assert!(legal(&board, &outcome), "{fen}");
        assert_eq!(outcome.depth, 4);
        assert_eq!(outcome.pv.first().copied(), outcome.best_move);
    }
}

#[test]
fn pv_replays_legally() {
    let board: Board = RUY_LOPEZ_FEN.parse().unwrap();
    let outcome = Searcher::new(8).search(&board, &SearchLimits::depth(5), &CancellationToken::new(), &mut ());
    let mut replay = board.clone();
    for mv in &outcome.pv {
        assert!(generate_legal_moves(&replay).contains(*mv), "{mv} in {}", replay);
        replay.make_move(*mv);
    }
}

#[test]
fn back_rank_mate_is_found() {
    // The e1 rook is blocked, so only Re8 mates.
    let board: Board = "6k1/5ppp/8/8/8/8/4RPPP/4R1K1 w - - 0 1".parse().unwrap();
    let outcome = Searcher::new(8).search(&board, &SearchLimits::depth(4), &CancellationToken::new(), &mut ());
    assert_eq!(mate_in(outcome.score), Some(1));
    assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("e2e8"));
}

#[test]
fn movetime_is_respected() {
    let board = Board::starting_position();
    let start = Instant::now();
    let outcome = Searcher::new(8).search(
        &board,
        &SearchLimits::movetime(Duration::from_millis(100)),
        &CancellationToken::new(),
        &mut (),
    );
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    assert!(legal(&board, &outcome));
    assert_eq!(outcome.status, SearchStatus::Completed);
}

#[test]
fn clock_limits_a_search() {
    let board: Board = SICILIAN_FEN.parse().unwrap();
    let limits = SearchLimits {
        clock: Some(Clock::new(Duration::from_millis(500), Duration::ZERO)),
        ..SearchLimits::default()
    };
    let start = Instant::now();
    let outcome = Searcher::new(8).search(&board, &limits, &CancellationToken::new(), &mut ());
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(legal(&board, &outcome));
}

#[test]
fn stop_from_another_thread() {
    let board = Board::starting_position();
    let token = CancellationToken::new();
    let (tx, rx) = mpsc::channel();

    let outcome = thread::scope(|s| {
        let worker = s.spawn(|| {
            let mut tx = tx;
            Searcher::new(8).search(&board, &SearchLimits::default(), &token, &mut tx)
        });
        // Wait for at least one finished depth before stopping.
        loop {
            match rx.recv() {
                Ok(SearchEvent::Depth(_)) => break,
                Ok(SearchEvent::Finished(_)) | Err(_) => panic!("search ended on its own"),
            }
        }
        token.cancel();
        worker.join().unwrap()
    });

    assert_eq!(outcome.status, SearchStatus::Cancelled);
    assert!(outcome.depth >= 1);
    assert!(legal(&board, &outcome));
    let finished: Vec<_> = rx.try_iter().filter(|e| matches!(e, SearchEvent::Finished(_))).collect();
    assert_eq!(finished, [SearchEvent::Finished(outcome)]);
}

#[test]
fn shared_searcher_across_threads() {
    let searcher = Searcher::new(8);
    let boards: Vec<Board> = [SICILIAN_FEN, RUY_LOPEZ_FEN, ENDGAME_FEN].iter().map(|f| f.parse().unwrap()).collect();
    thread::scope(|s| {
        for board in &boards {
            let searcher = &searcher;
            s.spawn(move || {
                let outcome = searcher.search(board, &SearchLimits::depth(4), &CancellationToken::new(), &mut ());
                assert!(legal(board, &outcome));
            });
        }
    });
}

/// Counts mobility only; enough to drive the search somewhere sensible.
struct Mobility;

impl Evaluator for Mobility {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        let mine = vantage_core::generate_moves(board, color).len() as i32;
        let theirs = vantage_core::generate_moves(board, !color).len() as i32;
        mine - theirs
    }
}

#[test]
fn custom_evaluator_plugs_in() {
    let board = Board::starting_position();
    let searcher = Searcher::with_evaluator(Mobility, 1);
    let outcome = searcher.search(&board, &SearchLimits::depth(3), &CancellationToken::new(), &mut ());
    assert!(legal(&board, &outcome));
    assert!(outcome.score.abs() < 100);
}
