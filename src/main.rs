use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vantage_core::{Board, STARTING_FEN, divide};
use vantage_engine::{CancellationToken, SearchLimits, Searcher};
use vantage_uci::{EngineConfig, UciEngine};

const BENCH_FENS: [&str; 5] = [
    STARTING_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r1bq1rk1/pp2bppp/2n1pn2/3p4/2PP4/2N1PN2/PP3PPP/R2QKB1R w KQ - 0 8",
    "6k1/5ppp/8/8/8/8/4RPPP/4R1K1 w - - 0 1",
];

#[derive(Parser, Debug)]
#[command(author, version, about = "A UCI chess engine", long_about = None)]
struct Args {
    /// Transposition table size in megabytes
    #[arg(long, global = true, default_value_t = 16)]
    hash: usize,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Speak UCI on stdin/stdout (the default)
    Uci,
    /// Count leaf nodes per root move
    Perft {
        #[arg(long, short, default_value_t = 5)]
        depth: u32,
        #[arg(long, default_value = STARTING_FEN)]
        fen: String,
    },
    /// Search a fixed set of positions and report speed
    Bench {
        #[arg(long, short, default_value_t = 6)]
        depth: u8,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match args.command.unwrap_or(Mode::Uci) {
        Mode::Uci => {
            info!("vantage starting");
            let engine = UciEngine::with_config(io::stdout(), EngineConfig { hash_mb: args.hash });
            engine.run(io::BufReader::new(io::stdin()))?;
        }
        Mode::Perft { depth, fen } => perft(&fen, depth)?,
        Mode::Bench { depth } => bench(depth, args.hash)?,
    }
    Ok(())
}

fn perft(fen: &str, depth: u32) -> Result<()> {
    let mut board: Board = fen.parse().with_context(|| format!("invalid FEN {fen:?}"))?;
    let report = divide(&mut board, depth);
    for (mv, nodes) in &report.moves {
        println!("{mv}: {nodes}");
    }
    println!();
    println!("Nodes searched: {}", report.total);
    println!("Time: {} ms ({} nps)", report.elapsed.as_millis(), report.nodes_per_second());
    Ok(())
}

fn bench(depth: u8, hash_mb: usize) -> Result<()> {
    let searcher = Searcher::new(hash_mb);
    let start = Instant::now();
    let mut nodes = 0;
    for fen in BENCH_FENS {
        let board: Board = fen.parse().with_context(|| format!("invalid bench FEN {fen:?}"))?;
        searcher.clear();
        let outcome = searcher.search(&board, &SearchLimits::depth(depth), &CancellationToken::new(), &mut ());
        let best = outcome.best_move.map_or_else(|| "0000".to_string(), |mv| mv.to_string());
        println!("{fen}: {best} score {} nodes {}", outcome.score, outcome.nodes);
        nodes += outcome.nodes;
    }
    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(1e-9)) as u64;
    println!();
    println!("{nodes} nodes {nps} nps");
    Ok(())
}
