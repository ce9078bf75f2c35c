//! Full protocol sessions driven through in-memory input and output.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use vantage_uci::{EngineConfig, UciEngine};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session(input: &str) -> Vec<String> {
    let out = SharedBuf::default();
    let engine = UciEngine::with_config(out.clone(), EngineConfig { hash_mb: 1 });
    engine.run(Cursor::new(input.to_string())).unwrap();
    let bytes = out.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
}

fn bestmove(lines: &[String]) -> &str {
    let found: Vec<&String> = lines.iter().filter(|l| l.starts_with("bestmove")).collect();
    assert_eq!(found.len(), 1, "{lines:#?}");
    found[0].trim_start_matches("bestmove ")
}

#[test]
fn handshake() {
    let lines = session("uci\nisready\nquit\n");
    assert!(lines[0].starts_with("id name vantage"));
    assert!(lines.iter().any(|l| l == "option name Hash type spin default 1 min 1 max 65536"));
    assert_eq!(lines[lines.len() - 2..], ["uciok", "readyok"]);
}

#[test]
fn fixed_depth_search_reports_each_depth() {
    let lines = session("position startpos moves e2e4\ngo depth 3\n");
    let infos: Vec<&String> = lines.iter().filter(|l| l.starts_with("info depth")).collect();
    assert_eq!(infos.len(), 3);
    assert!(infos[0].starts_with("info depth 1 score cp "));
    assert!(infos.iter().all(|l| l.contains(" hashfull ") && l.contains(" pv ")));
    let mv = bestmove(&lines);
    assert_eq!(mv.len(), 4);
    assert!(infos[2].contains(&format!(" pv {mv}")), "{infos:#?}");
    // Progress and result share one writer, in order.
    assert!(infos[1].starts_with("info depth 2 ") && infos[2].starts_with("info depth 3 "));
    assert!(lines.last().is_some_and(|l| l.starts_with("bestmove ")), "{lines:#?}");
}

#[test]
fn mate_is_reported_in_moves() {
    let lines = session(
        "position fen r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4\ngo depth 2\n",
    );
    assert!(lines.iter().any(|l| l.contains("score mate 1 ")), "{lines:#?}");
    assert_eq!(bestmove(&lines), "h5f7");
}

#[test]
fn no_legal_moves_gives_null_bestmove() {
    let lines = session("position fen k7/2K5/1Q6/8/8/8/8/8 b - - 0 1\ngo depth 3\n");
    assert_eq!(bestmove(&lines), "0000");
}

#[test]
fn infinite_search_waits_for_stop() {
    let lines = session("position startpos\ngo infinite\nstop\n");
    assert_eq!(bestmove(&lines).len(), 4);
}

#[test]
fn quit_interrupts_a_long_search() {
    let lines = session("go depth 60\nquit\n");
    assert_eq!(bestmove(&lines).len(), 4);
}

#[test]
fn perft_divide_output() {
    let lines = session("position startpos\ngo perft 2\n");
    assert_eq!(lines.iter().filter(|l| l.ends_with(": 20")).count(), 20);
    assert_eq!(lines.last().map(String::as_str), Some("Nodes searched: 400"));
}

#[test]
fn bad_input_is_ignored() {
    let lines = session("position startpos moves e2e5\nsetoption name Hash value 0\nfoo\ngo depth 1\n");
    // The illegal move left the starting position in place.
    let mv = bestmove(&lines);
    assert!(["a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2", "b1", "g1"].contains(&&mv[..2]), "{mv}");
}

#[test]
fn setoption_and_newgame_before_search() {
    let lines = session("position startpos moves d2d4\nsetoption name Hash value 2\nucinewgame\ngo depth 2\n");
    let mv = bestmove(&lines);
    // ucinewgame reset the position, so White is to move again.
    assert!(mv.ends_with('3') || mv.ends_with('4'), "{mv}");
}

#[test]
fn isready_answers_during_search() {
    let lines = session("go depth 4\nisready\n");
    assert!(lines.iter().any(|l| l == "readyok"));
    bestmove(&lines);
}
