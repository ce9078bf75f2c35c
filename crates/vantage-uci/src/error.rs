//! UCI protocol errors.

use vantage_core::{FenError, MoveError};

/// Errors raised while interpreting a line of UCI input.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen`.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    #[error("invalid FEN {fen:?}: {source}")]
    InvalidFen {
        fen: String,
        source: FenError,
    },

    /// A move after `position ... moves` was malformed or illegal.
    #[error("invalid move {text:?}: {source}")]
    InvalidMove {
        text: String,
        source: MoveError,
    },

    /// A `go` or `setoption` parameter was given without its value.
    #[error("missing value for {param}")]
    MissingValue { param: String },

    #[error("invalid value {value:?} for {param}")]
    InvalidValue { param: String, value: String },

    /// `setoption` named an option the engine does not expose.
    #[error("unknown option {name:?}")]
    UnknownOption { name: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
