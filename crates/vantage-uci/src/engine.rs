//! Event-driven UCI engine with a background search thread.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, info, warn};

use vantage_core::{Board, divide};
use vantage_engine::{CancellationToken, SearchEvent, SearchLimits, SearchOutcome, SearchProgress, Searcher, mate_in};

use crate::command::{Command, GoParams, UciOption, parse_command};
use crate::error::UciError;

const SEARCH_STACK_BYTES: usize = 16 * 1024 * 1024;

/// Knobs adjustable via `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig { hash_mb: 16 }
    }
}

enum SearchState {
    Idle,
    Running { token: CancellationToken, infinite: bool },
    /// An infinite search ran out of depth on its own; `bestmove` waits for `stop`.
    Holding(SearchOutcome),
}

enum EngineEvent {
    Command(Result<Command, UciError>),
    /// A depth finished; printed by the command loop.
    Info(SearchProgress),
    SearchDone(SearchDone),
    InputClosed,
}

/// Returned by the search thread along with the searcher it borrowed.
struct SearchDone {
    outcome: SearchOutcome,
    searcher: Searcher,
}

/// Protocol output, written only from the command loop.
struct Output<W>(W);

impl<W: Write> Output<W> {
    fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.0, "{text}").and_then(|()| self.0.flush()) {
            warn!(error = %e, "failed to write UCI output");
        }
    }
}

/// The UCI engine: current position, searcher and output.
///
/// Commands are handled on the calling thread; `go` hands the searcher to a
/// worker thread, which gives it back with the result.
pub struct UciEngine<W> {
    board: Board,
    searcher: Option<Searcher>,
    state: SearchState,
    config: EngineConfig,
    pending_clear_tt: bool,
    /// TT resize (MB) to apply when the search thread returns the searcher.
    pending_resize_tt: Option<usize>,
    out: Output<W>,
}

impl<W: Write> UciEngine<W> {
    /// Engine at the starting position, writing protocol output to `out`.
    pub fn new(out: W) -> UciEngine<W> {
        UciEngine::with_config(out, EngineConfig::default())
    }

    pub fn with_config(out: W, config: EngineConfig) -> UciEngine<W> {
        UciEngine {
            board: Board::starting_position(),
            searcher: Some(Searcher::new(config.hash_mb)),
            state: SearchState::Idle,
            config,
            pending_clear_tt: false,
            pending_resize_tt: None,
            out: Output(out),
        }
    }

    /// Process `input` until `quit` or end of input.
    ///
    /// At end of input a running search is allowed to finish unless it is
    /// infinite, so piped sessions still print their `bestmove`.
    pub fn run<R: BufRead + Send + 'static>(mut self, input: R) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let input_tx = tx.clone();
        thread::Builder::new().name("uci-input".into()).spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(cmd = %line, "received UCI command");
                if input_tx.send(EngineEvent::Command(parse_command(line))).is_err() {
                    return;
                }
            }
            let _ = input_tx.send(EngineEvent::InputClosed);
        })?;

        info!(hash_mb = self.config.hash_mb, "vantage ready");
        while let Ok(event) = rx.recv() {
            match event {
                EngineEvent::Command(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => self.out.line("readyok"),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(board) => self.board = board,
                    Command::Go(params) => self.handle_go(params, &tx)?,
                    Command::Perft(depth) => self.handle_perft(depth),
                    Command::SetOption(option) => self.handle_setoption(option),
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        self.handle_stop();
                        self.wait_for_search(&rx);
                        break;
                    }
                    Command::Unknown(name) => debug!(%name, "ignoring unknown command"),
                },
                EngineEvent::Command(Err(e)) => warn!(error = %e, "rejected UCI input"),
                EngineEvent::Info(progress) => self.out.line(info_line(&progress)),
                EngineEvent::SearchDone(done) => self.finish_search(done),
                EngineEvent::InputClosed => {
                    if !matches!(self.state, SearchState::Running { infinite: false, .. }) {
                        self.handle_stop();
                    }
                    self.wait_for_search(&rx);
                    break;
                }
            }
        }

        info!("vantage shutting down");
        Ok(())
    }

    fn handle_uci(&mut self) {
        self.out.line(concat!("id name vantage ", env!("CARGO_PKG_VERSION")));
        self.out.line("id author the vantage developers");
        self.out.line(format_args!("option name Hash type spin default {} min 1 max 65536", self.config.hash_mb));
        self.out.line("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.board = Board::starting_position();
        match &self.searcher {
            Some(searcher) => searcher.clear(),
            None => self.pending_clear_tt = true,
        }
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::Hash(mb) => {
                self.config.hash_mb = mb;
                match &mut self.searcher {
                    Some(searcher) => searcher.resize(mb),
                    None => self.pending_resize_tt = Some(mb),
                }
                debug!(mb, "hash resized");
            }
        }
    }

    fn handle_go(&mut self, params: GoParams, tx: &Sender<EngineEvent>) -> Result<(), UciError> {
        if !matches!(self.state, SearchState::Idle) {
            warn!("go received while searching, ignoring");
            return Ok(());
        }
        let Some(searcher) = self.searcher.take() else {
            warn!("searcher unavailable, ignoring go");
            return Ok(());
        };

        let token = CancellationToken::new();
        let limits = params.limits(self.board.side_to_move());
        spawn_search(searcher, self.board.clone(), limits, token.clone(), tx.clone())?;
        self.state = SearchState::Running { token, infinite: params.infinite };
        Ok(())
    }

    fn handle_perft(&mut self, depth: u32) {
        if !matches!(self.state, SearchState::Idle) {
            warn!("go perft received while searching, ignoring");
            return;
        }
        let mut board = self.board.clone();
        let report = divide(&mut board, depth);
        for (mv, nodes) in &report.moves {
            self.out.line(format_args!("{mv}: {nodes}"));
        }
        self.out.line("");
        self.out.line(format_args!("Nodes searched: {}", report.total));
        info!(depth, nodes = report.total, nps = report.nodes_per_second(), "perft finished");
    }

    fn handle_stop(&mut self) {
        if let SearchState::Running { token, infinite } = &mut self.state {
            token.cancel();
            *infinite = false;
        } else if let SearchState::Holding(outcome) = mem::replace(&mut self.state, SearchState::Idle) {
            self.print_bestmove(&outcome);
        }
    }

    fn wait_for_search(&mut self, rx: &Receiver<EngineEvent>) {
        while matches!(self.state, SearchState::Running { .. }) {
            match rx.recv() {
                Ok(EngineEvent::SearchDone(done)) => self.finish_search(done),
                Ok(EngineEvent::Info(progress)) => self.out.line(info_line(&progress)),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        self.handle_stop();
    }

    fn finish_search(&mut self, done: SearchDone) {
        let mut searcher = done.searcher;
        if let Some(mb) = self.pending_resize_tt.take() {
            // A fresh table is already empty.
            searcher.resize(mb);
            self.pending_clear_tt = false;
        } else if mem::take(&mut self.pending_clear_tt) {
            searcher.clear();
        }
        self.searcher = Some(searcher);

        match mem::replace(&mut self.state, SearchState::Idle) {
            SearchState::Running { infinite: true, .. } => self.state = SearchState::Holding(done.outcome),
            _ => self.print_bestmove(&done.outcome),
        }
    }

    fn print_bestmove(&mut self, outcome: &SearchOutcome) {
        match outcome.best_move {
            Some(mv) => self.out.line(format_args!("bestmove {mv}")),
            None => self.out.line("bestmove 0000"),
        }
    }
}

/// Run `searcher` on its own thread. Progress and the final result come back
/// over `tx`; a send to a closed loop is dropped so the search never blocks.
fn spawn_search(
    searcher: Searcher,
    board: Board,
    limits: SearchLimits,
    token: CancellationToken,
    tx: Sender<EngineEvent>,
) -> std::io::Result<()> {
    thread::Builder::new().name("search".into()).stack_size(SEARCH_STACK_BYTES).spawn(move || {
        let info_tx = tx.clone();
        let mut sink = |event: SearchEvent| {
            if let SearchEvent::Depth(progress) = event {
                let _ = info_tx.send(EngineEvent::Info(progress));
            }
        };
        let outcome = searcher.search(&board, &limits, &token, &mut sink);
        let _ = tx.send(EngineEvent::SearchDone(SearchDone { outcome, searcher }));
    })?;
    Ok(())
}

/// One `info` line for a completed depth.
fn info_line(progress: &SearchProgress) -> String {
    let score = match mate_in(progress.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", progress.score),
    };
    let pv: Vec<String> = progress.pv.iter().map(|mv| mv.to_string()).collect();
    format!(
        "info depth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
        progress.depth,
        score,
        progress.nodes,
        progress.nodes_per_second(),
        progress.elapsed.as_millis(),
        progress.hashfull,
        pv.join(" "),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use vantage_core::Board;
    use vantage_engine::{CancellationToken, MATE_SCORE, SearchLimits, SearchProgress, Searcher};

    use super::{EngineEvent, info_line, spawn_search};

    fn progress(score: i32) -> SearchProgress {
        let board = Board::starting_position();
        let e4 = board.parse_move("e2e4").unwrap();
        let mut after = board.clone();
        after.make_move(e4);
        let e5 = after.parse_move("e7e5").unwrap();
        SearchProgress {
            depth: 2,
            elapsed: Duration::from_millis(500),
            nodes: 1_000,
            score,
            best_move: e4,
            pv: vec![e4, e5],
            hashfull: 3,
        }
    }

    #[test]
    fn centipawn_info_line() {
        assert_eq!(
            info_line(&progress(35)),
            "info depth 2 score cp 35 nodes 1000 nps 2000 time 500 hashfull 3 pv e2e4 e7e5"
        );
    }

    #[test]
    fn mate_info_lines() {
        assert!(info_line(&progress(MATE_SCORE - 3)).contains("score mate 2 "));
        assert!(info_line(&progress(-(MATE_SCORE - 2))).contains("score mate -1 "));
    }

    #[test]
    fn search_thread_reports_through_the_event_channel() {
        let (tx, rx) = mpsc::channel();
        spawn_search(
            Searcher::new(1),
            Board::starting_position(),
            SearchLimits::depth(3),
            CancellationToken::new(),
            tx,
        )
        .unwrap();

        let mut depths = Vec::new();
        let done = loop {
            match rx.recv_timeout(Duration::from_secs(30)).unwrap() {
                EngineEvent::Info(progress) => depths.push(progress.depth),
                EngineEvent::SearchDone(done) => break done,
                _ => panic!("unexpected event from the search thread"),
            }
        };
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(done.outcome.depth, 3);
        assert!(done.outcome.best_move.is_some());
    }

    #[test]
    fn search_thread_survives_a_closed_loop() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        spawn_search(
            Searcher::new(1),
            Board::starting_position(),
            SearchLimits::depth(2),
            CancellationToken::new(),
            tx,
        )
        .unwrap();
    }
}
