//! UCI command parsing.

use std::time::Duration;

use vantage_core::{Board, Color};
use vantage_engine::{Clock, SearchLimits};

use crate::error::UciError;

/// Arguments of `go`. A bare `go` leaves everything unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    pub movestogo: Option<u32>,
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
    /// Search until `stop`; other limits are ignored.
    pub infinite: bool,
}

impl GoParams {
    /// Search limits for `side` to move.
    pub fn limits(&self, side: Color) -> SearchLimits {
        if self.infinite {
            return SearchLimits::default();
        }
        let (remaining, increment) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        let clock = remaining.map(|remaining| Clock {
            remaining,
            increment: increment.unwrap_or(Duration::ZERO),
            moves_to_go: self.movestogo,
        });
        SearchLimits { depth: self.depth, movetime: self.movetime, nodes: self.nodes, clock }
    }
}

/// Options settable with `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    Uci,
    IsReady,
    /// Forget the current game and everything the search has learned.
    UciNewGame,
    /// A position with its move history, so repetitions are visible to search.
    Position(Board),
    Go(GoParams),
    /// `go perft N`: count leaf nodes per root move instead of searching.
    Perft(u32),
    SetOption(UciOption),
    Stop,
    Quit,
    /// Unrecognized; ignored.
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match head {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(args),
        "go" => parse_go(args),
        "setoption" => parse_setoption(args),
        _ => Ok(Command::Unknown(head.to_string())),
    }
}

/// `position startpos [moves ...]` or `position fen <fen> [moves ...]`.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let moves_at = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
    let (setup, moves) = tokens.split_at(moves_at);

    let mut board = match setup {
        ["startpos"] => Board::starting_position(),
        ["fen", fields @ ..] => {
            let fen = fields.join(" ");
            fen.parse::<Board>().map_err(|source| UciError::InvalidFen { fen, source })?
        }
        _ => return Err(UciError::MalformedPosition),
    };

    for &text in moves.iter().skip(1) {
        board
            .play(text)
            .map_err(|source| UciError::InvalidMove { text: text.to_string(), source })?;
    }
    Ok(Command::Position(board))
}

/// `go` arguments. Unknown tokens are skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();
    let mut args = tokens.iter().copied();

    while let Some(token) = args.next() {
        match token {
            "wtime" => params.wtime = Some(parse_millis(args.next(), token)?),
            "btime" => params.btime = Some(parse_millis(args.next(), token)?),
            "winc" => params.winc = Some(parse_millis(args.next(), token)?),
            "binc" => params.binc = Some(parse_millis(args.next(), token)?),
            "movetime" => params.movetime = Some(parse_millis(args.next(), token)?),
            "movestogo" => params.movestogo = Some(parse_value(args.next(), token)?),
            "depth" => params.depth = Some(parse_value(args.next(), token)?),
            "nodes" => params.nodes = Some(parse_value(args.next(), token)?),
            "infinite" => params.infinite = true,
            "perft" => return Ok(Command::Perft(parse_value(args.next(), token)?)),
            _ => {}
        }
    }

    Ok(Command::Go(params))
}

/// `setoption name <id> [value <x>]`; the name may span several tokens.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let rest = match tokens {
        ["name", rest @ ..] => rest,
        _ => return Err(UciError::MissingValue { param: "name".into() }),
    };
    let value_at = rest.iter().position(|&t| t == "value").unwrap_or(rest.len());
    let name = rest[..value_at].join(" ");
    let value = rest.get(value_at + 1).copied();

    if name.eq_ignore_ascii_case("hash") {
        let mb: usize = parse_value(value, "Hash")?;
        if mb == 0 {
            return Err(UciError::InvalidValue { param: "Hash".into(), value: "0".into() });
        }
        return Ok(Command::SetOption(UciOption::Hash(mb)));
    }
    Err(UciError::UnknownOption { name })
}

fn parse_millis(token: Option<&str>, param: &str) -> Result<Duration, UciError> {
    // GUIs occasionally send negative times when a clock runs out.
    let ms: i64 = parse_value(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

fn parse_value<T: std::str::FromStr>(token: Option<&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingValue { param: param.to_string() })?;
    value
        .parse()
        .map_err(|_| UciError::InvalidValue { param: param.to_string(), value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vantage_core::{Board, Color};

    use super::*;

    fn go(line: &str) -> GoParams {
        match parse_command(line).unwrap() {
            Command::Go(params) => params,
            other => panic!("expected Go, got {other:?}"),
        }
    }

    fn position(line: &str) -> Board {
        match parse_command(line).unwrap() {
            Command::Position(board) => board,
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn simple_commands() {
        assert!(matches!(parse_command("uci").unwrap(), Command::Uci));
        assert!(matches!(parse_command("isready").unwrap(), Command::IsReady));
        assert!(matches!(parse_command("ucinewgame").unwrap(), Command::UciNewGame));
        assert!(matches!(parse_command("stop").unwrap(), Command::Stop));
        assert!(matches!(parse_command("  quit  ").unwrap(), Command::Quit));
    }

    #[test]
    fn unknown_and_empty_lines() {
        assert!(matches!(parse_command("foobar 1 2").unwrap(), Command::Unknown(name) if name == "foobar"));
        assert!(matches!(parse_command("").unwrap(), Command::Unknown(_)));
    }

    #[test]
    fn position_startpos_applies_moves() {
        let board = position("position startpos moves e2e4 e7e5 g1f3");
        assert_eq!(board.to_string(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
        assert_eq!(board.history().len(), 3);
    }

    #[test]
    fn position_fen_with_and_without_moves() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(position(&format!("position fen {fen}")).to_string(), fen);

        let board = position(&format!("position fen {fen} moves c7c5"));
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.en_passant().map(|sq| sq.to_string()).as_deref(), Some("c6"));
    }

    #[test]
    fn position_keeps_history_for_repetition() {
        let board = position("position startpos moves g1f3 g8f6 f3g1 f6g8");
        assert!(board.is_repetition());
        assert_eq!(board.hash(), Board::starting_position().hash());
    }

    #[test]
    fn position_errors() {
        assert!(matches!(parse_command("position"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position moves e2e4"), Err(UciError::MalformedPosition)));
        assert!(matches!(parse_command("position fen invalid"), Err(UciError::InvalidFen { .. })));
        assert!(matches!(
            parse_command("position startpos moves e2e5"),
            Err(UciError::InvalidMove { text, .. }) if text == "e2e5"
        ));
        assert!(matches!(parse_command("position startpos moves e2"), Err(UciError::InvalidMove { .. })));
    }

    #[test]
    fn go_bare_defaults() {
        assert_eq!(go("go"), GoParams::default());
    }

    #[test]
    fn go_clock_fields() {
        let params = go("go wtime 300000 btime 200000 winc 2000 binc 1000 movestogo 20");
        assert_eq!(params.wtime, Some(Duration::from_millis(300_000)));
        assert_eq!(params.btime, Some(Duration::from_millis(200_000)));
        assert_eq!(params.winc, Some(Duration::from_millis(2_000)));
        assert_eq!(params.binc, Some(Duration::from_millis(1_000)));
        assert_eq!(params.movestogo, Some(20));
    }

    #[test]
    fn go_fixed_limits() {
        assert_eq!(go("go depth 6").depth, Some(6));
        assert_eq!(go("go movetime 5000").movetime, Some(Duration::from_millis(5_000)));
        assert_eq!(go("go nodes 1000000").nodes, Some(1_000_000));
        assert!(go("go infinite").infinite);
        assert!(go("go ponder depth 3").depth.is_some());
    }

    #[test]
    fn go_negative_time_clamps_to_zero() {
        assert_eq!(go("go wtime -15").wtime, Some(Duration::ZERO));
    }

    #[test]
    fn go_value_errors() {
        assert!(matches!(parse_command("go wtime"), Err(UciError::MissingValue { .. })));
        assert!(matches!(parse_command("go depth abc"), Err(UciError::InvalidValue { .. })));
        assert!(matches!(parse_command("go depth 300"), Err(UciError::InvalidValue { .. })));
    }

    #[test]
    fn go_perft() {
        assert!(matches!(parse_command("go perft 4").unwrap(), Command::Perft(4)));
        assert!(parse_command("go perft").is_err());
    }

    #[test]
    fn limits_pick_the_side_to_move() {
        let params = go("go wtime 60000 btime 30000 winc 1000 movestogo 5");
        let white = params.limits(Color::White).clock.unwrap();
        assert_eq!(white.remaining, Duration::from_secs(60));
        assert_eq!(white.increment, Duration::from_secs(1));
        assert_eq!(white.moves_to_go, Some(5));
        let black = params.limits(Color::Black).clock.unwrap();
        assert_eq!(black.remaining, Duration::from_secs(30));
        assert_eq!(black.increment, Duration::ZERO);
    }

    #[test]
    fn infinite_ignores_other_limits() {
        let params = go("go infinite depth 3 movetime 100");
        assert_eq!(params.limits(Color::White), SearchLimits::default());
        let params = go("go depth 3 nodes 500");
        let limits = params.limits(Color::White);
        assert_eq!((limits.depth, limits.nodes, limits.clock), (Some(3), Some(500), None));
    }

    #[test]
    fn setoption_hash() {
        assert!(matches!(
            parse_command("setoption name Hash value 64").unwrap(),
            Command::SetOption(UciOption::Hash(64))
        ));
        assert!(matches!(parse_command("setoption name Hash value 0"), Err(UciError::InvalidValue { .. })));
        assert!(matches!(parse_command("setoption name Hash"), Err(UciError::MissingValue { .. })));
        assert!(matches!(
            parse_command("setoption name Clear Hash"),
            Err(UciError::UnknownOption { name }) if name == "Clear Hash"
        ));
    }
}
