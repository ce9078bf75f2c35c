//! Search and evaluation for vantage.

pub mod eval;
pub mod search;
pub mod time;

pub use eval::{Evaluator, TaperedEval, evaluate};
pub use search::tt::TranspositionTable;
pub use search::{
    CancellationToken, MATE_SCORE, ProgressSink, SearchConfig, SearchEvent, SearchLimits, SearchOutcome,
    SearchProgress, SearchStatus, Searcher, mate_in,
};
pub use time::Clock;
