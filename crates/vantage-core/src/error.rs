//! Error types for position setup, board validation and move input.

use crate::color::Color;
use crate::square::Square;

/// Errors from parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected at least 4 FEN fields, found {found}")]
    MissingFields { found: usize },
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    #[error("rank {rank} describes {squares} squares, expected 8")]
    BadRankLength { rank: u8, squares: usize },
    #[error("invalid piece character {0:?}")]
    InvalidPiece(char),
    #[error("invalid side to move {0:?}")]
    InvalidSide(String),
    #[error("invalid castling field {0:?}")]
    InvalidCastling(String),
    #[error("invalid en passant field {0:?}")]
    InvalidEnPassant(String),
    #[error("invalid {field}: {found:?}")]
    InvalidCounter { field: &'static str, found: String },
    #[error("illegal position: {0}")]
    Board(#[from] BoardError),
}

/// Structural invariants a [`Board`](crate::Board) must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{color:?} has {count} kings, expected 1")]
    KingCount { color: Color, count: u32 },
    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),
    #[error("two pieces claim {0}")]
    OverlappingPieces(Square),
    #[error("occupancy does not match piece bitboards")]
    InconsistentOccupancy,
    #[error("square table disagrees with bitboards at {0}")]
    InconsistentMailbox(Square),
    #[error("side not to move is in check")]
    OpponentInCheck,
    #[error("en passant target {0} is not on the expected rank")]
    BadEnPassant(Square),
    #[error("hash does not match position")]
    HashMismatch,
}

/// Errors from requesting a move at the board boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("malformed move text {0:?}")]
    Malformed(String),
    #[error("illegal move {0}")]
    Illegal(String),
}
