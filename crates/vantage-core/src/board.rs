//! Position state: piece bitboards, square table, rights, clocks and hash.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Raw position fields as supplied by a position initializer such as FEN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardParts {
    pub placement: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastleRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// State needed to take back one move, pushed by [`Board::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFrame {
    pub mv: Move,
    pub captured: Option<PieceKind>,
    pub castling: CastleRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    /// Position hash before `mv` was played.
    pub hash: u64,
}

/// Whether the side to move can continue, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// A chess position plus the stack of moves that reached it.
///
/// Twelve piece bitboards (indexed by [`Piece::index`]) are the source of
/// truth; per-colour and total occupancy plus the square table are kept in
/// lockstep by every mutation.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [Bitboard; Piece::COUNT],
    colors: [Bitboard; 2],
    occupied: Bitboard,
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
    pub(crate) history: Vec<HistoryFrame>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    pub fn starting_position() -> Board {
        let mut placement = [None; 64];
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            placement[file] = Some(Piece::new(Color::White, kind));
            placement[8 + file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            placement[48 + file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            placement[56 + file] = Some(Piece::new(Color::Black, kind));
        }
        Board::assemble(BoardParts {
            placement,
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        })
    }

    /// Build a board from externally supplied fields, rejecting positions
    /// that break a structural invariant.
    pub fn from_parts(parts: BoardParts) -> Result<Board, BoardError> {
        let board = Board::assemble(parts);
        board.validate()?;
        Ok(board)
    }

    fn assemble(parts: BoardParts) -> Board {
        let mut board = Board {
            pieces: [Bitboard::EMPTY; Piece::COUNT],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            squares: [None; 64],
            side_to_move: parts.side_to_move,
            castling: parts.castling,
            en_passant: parts.en_passant,
            halfmove_clock: parts.halfmove_clock,
            fullmove_number: parts.fullmove_number.max(1),
            hash: 0,
            history: Vec::new(),
        };
        for sq in Square::all() {
            if let Some(piece) = parts.placement[sq.index()] {
                board.put(sq, piece);
            }
        }
        board.hash = zobrist::hash_from_scratch(&board);
        board
    }

    /// The fields this board would be rebuilt from, without its history.
    pub fn to_parts(&self) -> BoardParts {
        BoardParts {
            placement: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Pieces of one kind for one side.
    #[inline]
    pub fn of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[Piece::new(color, kind).index()]
    }

    /// Pieces of one kind for both sides.
    #[inline]
    pub fn of_kind(&self, kind: PieceKind) -> Bitboard {
        self.of(Color::White, kind) | self.of(Color::Black, kind)
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.of(color, PieceKind::Rook) | self.of(color, PieceKind::Queen)
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.of(color, PieceKind::Bishop) | self.of(color, PieceKind::Queen)
    }

    /// The square of `color`'s king.
    ///
    /// # Panics
    ///
    /// Only if the one-king-per-side invariant is broken.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.of(color, PieceKind::King)
            .first()
            .expect("every board holds one king per side")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Frames for every move applied since construction, oldest first.
    #[inline]
    pub fn history(&self) -> &[HistoryFrame] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|frame| frame.mv)
    }

    /// Forget the move history, keeping the current position.
    ///
    /// Repetitions before this point are no longer detected.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_none(), "{sq} already occupied");
        let bit = sq.bitboard();
        self.pieces[piece.index()] |= bit;
        self.colors[piece.color.index()] |= bit;
        self.occupied |= bit;
        self.squares[sq.index()] = Some(piece);
    }

    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq.index()].take()?;
        let bit = !sq.bitboard();
        self.pieces[piece.index()] &= bit;
        self.colors[piece.color.index()] &= bit;
        self.occupied &= bit;
        Some(piece)
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    #[inline]
    pub(crate) fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }

    /// Check every structural invariant, including the stored hash.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut union = Bitboard::EMPTY;
        for piece in Piece::all() {
            let bb = self.pieces(piece);
            if let Some(sq) = (union & bb).first() {
                return Err(BoardError::OverlappingPieces(sq));
            }
            union |= bb;
        }
        if union != self.occupied || self.side(Color::White) | self.side(Color::Black) != union {
            return Err(BoardError::InconsistentOccupancy);
        }
        if (self.side(Color::White) & self.side(Color::Black)).any() {
            return Err(BoardError::InconsistentOccupancy);
        }
        for sq in Square::all() {
            let from_bitboards = Piece::all().find(|&p| self.pieces(p).contains(sq));
            if from_bitboards != self.squares[sq.index()] {
                return Err(BoardError::InconsistentMailbox(sq));
            }
        }
        for color in Color::ALL {
            let count = self.of(color, PieceKind::King).count();
            if count != 1 {
                return Err(BoardError::KingCount { color, count });
            }
        }
        let pawns = self.of_kind(PieceKind::Pawn);
        if let Some(sq) = (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).first() {
            return Err(BoardError::PawnOnBackRank(sq));
        }
        if let Some(ep) = self.en_passant {
            let expected = match self.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if ep.rank() != expected {
                return Err(BoardError::BadEnPassant(ep));
            }
            // The pawn that just double-pushed sits past the target, and
            // both squares it crossed are empty.
            let pusher = !self.side_to_move;
            let pawn = ep.forward(pusher);
            let origin = ep.forward(self.side_to_move);
            if self.squares[pawn.index()] != Some(Piece::new(pusher, PieceKind::Pawn))
                || self.squares[ep.index()].is_some()
                || self.squares[origin.index()].is_some()
            {
                return Err(BoardError::BadEnPassant(ep));
            }
        }
        let waiting = !self.side_to_move;
        if self.is_square_attacked(self.king_square(waiting), self.side_to_move) {
            return Err(BoardError::OpponentInCheck);
        }
        if self.hash != zobrist::hash_from_scratch(self) {
            return Err(BoardError::HashMismatch);
        }
        Ok(())
    }

    /// How many earlier positions since the last irreversible move share the
    /// current hash.
    pub fn repetitions(&self) -> usize {
        let window = (self.halfmove_clock as usize).min(self.history.len());
        self.history[self.history.len() - window..]
            .iter()
            .rev()
            .skip(1)
            .step_by(2)
            .filter(|frame| frame.hash == self.hash)
            .count()
    }

    /// `true` if the current position occurred before. Search treats a single
    /// repetition as a draw.
    #[inline]
    pub fn is_repetition(&self) -> bool {
        self.repetitions() > 0
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Terminal state of the position for the side to move.
    pub fn status(&self) -> GameStatus {
        let has_moves = !crate::movegen::generate_legal_moves(self).is_empty();
        if !has_moves {
            return if self.is_in_check() {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_fifty_move_draw() {
            GameStatus::FiftyMoveRule
        } else if self.repetitions() >= 2 {
            GameStatus::ThreefoldRepetition
        } else {
            GameStatus::Ongoing
        }
    }

    /// Text diagram with rank and file labels.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::starting_position()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}

/// Display adapter returned by [`Board::pretty`].
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| self.0.piece_on(sq))
                    .map_or('.', Piece::fen_char);
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
