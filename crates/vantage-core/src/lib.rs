//! Core chess types: board representation, move generation, and game rules.

pub mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod make_move;
pub mod movegen;
pub mod perft;
mod piece;
mod square;
mod zobrist;

pub use bitboard::Bitboard;
pub use board::{Board, BoardParts, GameStatus, HistoryFrame, PrettyBoard};
pub use castle_rights::{CastlePath, CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind};
pub use color::Color;
pub use error::{BoardError, FenError, MoveError};
pub use fen::{STARTING_FEN, parse_parts};
pub use movegen::{MoveList, generate_legal_moves, generate_moves, generate_tactical_moves};
pub use perft::{PerftReport, divide, perft};
pub use piece::{Piece, PieceKind};
pub use square::{ParseSquareError, Square};
