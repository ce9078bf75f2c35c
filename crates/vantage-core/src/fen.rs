//! FEN reading and writing.
//!
//! Parsing produces [`BoardParts`] and hands them to [`Board::from_parts`],
//! so malformed or structurally illegal input never reaches the engine.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, BoardParts};
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN record into raw position fields.
///
/// The half-move clock and full-move number may be omitted; they default to
/// `0` and `1`.
pub fn parse_parts(fen: &str) -> Result<BoardParts, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&fields.len()) {
        return Err(FenError::MissingFields { found: fields.len() });
    }

    let placement = parse_placement(fields[0])?;

    let side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidSide(other.to_string())),
    };

    let castling = CastleRights::parse(fields[2])
        .ok_or_else(|| FenError::InvalidCastling(fields[2].to_string()))?;

    let en_passant = match fields[3] {
        "-" => None,
        text => Some(
            text.parse::<Square>()
                .map_err(|_| FenError::InvalidEnPassant(text.to_string()))?,
        ),
    };

    let counter = |index: usize, field: &'static str, default: u16| match fields.get(index) {
        None => Ok(default),
        Some(text) => text.parse::<u16>().map_err(|_| FenError::InvalidCounter {
            field,
            found: text.to_string(),
        }),
    };

    Ok(BoardParts {
        placement,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock: counter(4, "halfmove clock", 0)?,
        fullmove_number: counter(5, "fullmove number", 1)?,
    })
}

fn parse_placement(field: &str) -> Result<[Option<Piece>; 64], FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::WrongRankCount { found: rows.len() });
    }

    let mut placement = [None; 64];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0usize;
        for c in text.chars() {
            match c {
                '1'..='8' => file += c as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
                    if let Some(sq) = Square::from_coords(file as u8, rank).filter(|_| file < 8) {
                        placement[sq.index()] = Some(piece);
                    }
                    file += 1;
                }
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank: rank + 1, squares: file });
        }
    }
    Ok(placement)
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        Ok(Board::from_parts(parse_parts(fen)?)?)
    }
}

/// Writes the position as a six-field FEN record.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match Square::from_coords(file, rank).and_then(|sq| self.piece_on(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
