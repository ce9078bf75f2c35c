//! In-place move application and take-back, plus attack queries.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::{Board, HistoryFrame};
use crate::castle_rights::CastlePath;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::error::MoveError;
use crate::movegen::generate_legal_moves;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist::{self, KEYS};

impl Board {
    /// Every piece of either colour attacking `sq` under the given occupancy.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let white_pawns = self.of(Color::White, PieceKind::Pawn);
        let black_pawns = self.of(Color::Black, PieceKind::Pawn);
        (pawn_attacks(Color::Black, sq) & white_pawns)
            | (pawn_attacks(Color::White, sq) & black_pawns)
            | (knight_attacks(sq) & self.of_kind(PieceKind::Knight))
            | (king_attacks(sq) & self.of_kind(PieceKind::King))
            | (rook_attacks(sq, occupied)
                & (self.of_kind(PieceKind::Rook) | self.of_kind(PieceKind::Queen)))
            | (bishop_attacks(sq, occupied)
                & (self.of_kind(PieceKind::Bishop) | self.of_kind(PieceKind::Queen)))
    }

    /// Is `sq` attacked by any piece of colour `by`?
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.is_attacked_with_occupancy(sq, by, self.occupied())
    }

    pub(crate) fn is_attacked_with_occupancy(
        &self,
        sq: Square,
        by: Color,
        occupied: Bitboard,
    ) -> bool {
        // Cheap leapers first; sliders need a table lookup.
        (pawn_attacks(!by, sq) & self.of(by, PieceKind::Pawn)).any()
            || (knight_attacks(sq) & self.of(by, PieceKind::Knight)).any()
            || (king_attacks(sq) & self.of(by, PieceKind::King)).any()
            || (rook_attacks(sq, occupied) & self.orthogonal_sliders(by)).any()
            || (bishop_attacks(sq, occupied) & self.diagonal_sliders(by)).any()
    }

    /// Enemy pieces giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move();
        self.attackers_to(self.king_square(us), self.occupied()) & self.side(!us)
    }

    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.is_square_attacked(self.king_square(self.side_to_move()), !self.side_to_move())
    }

    /// Apply `mv` in place and push a history frame.
    ///
    /// `mv` must come from this position's legal move list; use
    /// [`Board::try_make_move`] for moves from outside the engine.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move();
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        debug_assert_eq!(
            self.piece_on(from),
            Some(Piece::new(us, mv.piece())),
            "{mv:?} does not match the board"
        );

        self.history.push(HistoryFrame {
            mv,
            captured: mv.captured(),
            castling: self.castling(),
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            hash: self.hash(),
        });

        let mut hash = self.hash() ^ zobrist::en_passant_key(self.en_passant());
        self.set_en_passant(None);
        let mover = Piece::new(us, mv.piece());

        match mv.kind() {
            MoveKind::Ordinary => {
                if let Some(kind) = mv.captured() {
                    self.take(to);
                    hash ^= zobrist::piece_key(Piece::new(them, kind), to);
                }
                self.take(from);
                self.put(to, mover);
                hash ^= zobrist::piece_key(mover, from) ^ zobrist::piece_key(mover, to);

                if mv.piece() == PieceKind::Pawn && from.index().abs_diff(to.index()) == 16 {
                    let target = from.forward(us);
                    self.set_en_passant(Some(target));
                    hash ^= zobrist::en_passant_key(Some(target));
                }
            }
            MoveKind::EnPassant => {
                let victim = en_passant_victim(from, to);
                self.take(victim);
                self.take(from);
                self.put(to, mover);
                hash ^= zobrist::piece_key(Piece::new(them, PieceKind::Pawn), victim)
                    ^ zobrist::piece_key(mover, from)
                    ^ zobrist::piece_key(mover, to);
            }
            MoveKind::CastleKing | MoveKind::CastleQueen => {
                let rook = Piece::new(us, PieceKind::Rook);
                let path = castle_path(us, mv);
                self.take(path.king_from);
                self.take(path.rook_from);
                self.put(path.king_to, mover);
                self.put(path.rook_to, rook);
                hash ^= zobrist::piece_key(mover, path.king_from)
                    ^ zobrist::piece_key(mover, path.king_to)
                    ^ zobrist::piece_key(rook, path.rook_from)
                    ^ zobrist::piece_key(rook, path.rook_to);
            }
            MoveKind::PromoteQueen
            | MoveKind::PromoteRook
            | MoveKind::PromoteBishop
            | MoveKind::PromoteKnight => {
                if let Some(kind) = mv.captured() {
                    self.take(to);
                    hash ^= zobrist::piece_key(Piece::new(them, kind), to);
                }
                let promoted = Piece::new(us, mv.promotion_piece().unwrap_or(PieceKind::Queen));
                self.take(from);
                self.put(to, promoted);
                hash ^= zobrist::piece_key(mover, from) ^ zobrist::piece_key(promoted, to);
            }
        }

        let old_rights = self.castling();
        let new_rights = old_rights.after_move(from, to);
        if new_rights != old_rights {
            hash ^= KEYS.castling[old_rights.bits() as usize] ^ KEYS.castling[new_rights.bits() as usize];
            self.set_castling(new_rights);
        }

        if mv.piece() == PieceKind::Pawn || mv.is_capture() {
            self.set_halfmove_clock(0);
        } else {
            self.set_halfmove_clock(self.halfmove_clock().saturating_add(1));
        }
        if us == Color::Black {
            self.set_fullmove_number(self.fullmove_number().saturating_add(1));
        }
        self.set_side_to_move(them);
        self.set_hash(hash ^ KEYS.black_to_move);

        debug_assert_eq!(self.validate(), Ok(()), "after {mv}");
    }

    /// Take back the most recent move, restoring the exact prior state.
    ///
    /// Returns the move taken back, or `None` if there is no history.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let frame = self.history.pop()?;
        let mv = frame.mv;
        let us = !self.side_to_move();
        let them = self.side_to_move();
        let from = mv.from();
        let to = mv.to();
        let mover = Piece::new(us, mv.piece());

        match mv.kind() {
            MoveKind::Ordinary => {
                self.take(to);
                self.put(from, mover);
                if let Some(kind) = frame.captured {
                    self.put(to, Piece::new(them, kind));
                }
            }
            MoveKind::EnPassant => {
                self.take(to);
                self.put(from, mover);
                self.put(en_passant_victim(from, to), Piece::new(them, PieceKind::Pawn));
            }
            MoveKind::CastleKing | MoveKind::CastleQueen => {
                let path = castle_path(us, mv);
                self.take(path.king_to);
                self.take(path.rook_to);
                self.put(path.king_from, mover);
                self.put(path.rook_from, Piece::new(us, PieceKind::Rook));
            }
            MoveKind::PromoteQueen
            | MoveKind::PromoteRook
            | MoveKind::PromoteBishop
            | MoveKind::PromoteKnight => {
                self.take(to);
                self.put(from, mover);
                if let Some(kind) = frame.captured {
                    self.put(to, Piece::new(them, kind));
                }
            }
        }

        if us == Color::Black {
            self.set_fullmove_number(self.fullmove_number() - 1);
        }
        self.set_side_to_move(us);
        self.set_castling(frame.castling);
        self.set_en_passant(frame.en_passant);
        self.set_halfmove_clock(frame.halfmove_clock);
        self.set_hash(frame.hash);

        debug_assert_eq!(self.validate(), Ok(()), "after taking back {mv}");
        Some(mv)
    }

    /// Apply `mv` only if it is legal here; otherwise leave the board untouched.
    pub fn try_make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if !generate_legal_moves(self).contains(mv) {
            return Err(MoveError::Illegal(mv.to_string()));
        }
        self.make_move(mv);
        Ok(())
    }

    /// Resolve square-pair notation (`e2e4`, `e7e8q`) against the legal moves.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveError> {
        let malformed = || MoveError::Malformed(text.to_string());
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(malformed());
        }
        let from: Square = text[0..2].parse().map_err(|_| malformed())?;
        let to: Square = text[2..4].parse().map_err(|_| malformed())?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c) {
                Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                    Some(kind)
                }
                _ => return Err(malformed()),
            },
        };

        generate_legal_moves(self)
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveError::Illegal(text.to_string()))
    }

    /// Parse and apply one move in square-pair notation.
    pub fn play(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = self.parse_move(text)?;
        self.make_move(mv);
        Ok(mv)
    }
}

/// The captured pawn sits beside the capturing pawn's origin, on the target file.
#[inline]
fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::from_index_unchecked(from.rank() * 8 + to.file())
}

#[inline]
fn castle_path(color: Color, mv: Move) -> CastlePath {
    let side = mv.kind().castle_side().unwrap_or(crate::castle_rights::CastleSide::King);
    CastlePath::of(color, side)
}
