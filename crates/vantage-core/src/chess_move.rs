//! Move encoding packed into a `u32`.
//!
//! ```text
//! bits  0-5   from square
//! bits  6-11  to square
//! bits 12-14  moved piece kind
//! bits 15-17  captured piece kind (7 = none)
//! bits 18-20  MoveKind
//! ```
//!
//! The all-zero value is the null move. It never appears in a legal move list.

use std::fmt;

use crate::castle_rights::CastleSide;
use crate::piece::PieceKind;
use crate::square::Square;

const SQ_MASK: u32 = 0x3F;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURE_SHIFT: u32 = 15;
const KIND_SHIFT: u32 = 18;
const NO_CAPTURE: u32 = 7;

/// What a move does beyond relocating one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Ordinary = 0,
    EnPassant = 1,
    CastleKing = 2,
    CastleQueen = 3,
    PromoteQueen = 4,
    PromoteRook = 5,
    PromoteBishop = 6,
    PromoteKnight = 7,
}

impl MoveKind {
    const ALL: [MoveKind; 8] = [
        MoveKind::Ordinary,
        MoveKind::EnPassant,
        MoveKind::CastleKing,
        MoveKind::CastleQueen,
        MoveKind::PromoteQueen,
        MoveKind::PromoteRook,
        MoveKind::PromoteBishop,
        MoveKind::PromoteKnight,
    ];

    /// The promotion kinds, strongest first.
    pub const PROMOTIONS: [MoveKind; 4] = [
        MoveKind::PromoteQueen,
        MoveKind::PromoteRook,
        MoveKind::PromoteBishop,
        MoveKind::PromoteKnight,
    ];

    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            MoveKind::PromoteQueen => Some(PieceKind::Queen),
            MoveKind::PromoteRook => Some(PieceKind::Rook),
            MoveKind::PromoteBishop => Some(PieceKind::Bishop),
            MoveKind::PromoteKnight => Some(PieceKind::Knight),
            _ => None,
        }
    }

    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            MoveKind::CastleKing => Some(CastleSide::King),
            MoveKind::CastleQueen => Some(CastleSide::Queen),
            _ => None,
        }
    }
}

/// A fully described chess move. `Copy`, four bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const NULL: Move = Move(0);

    const fn pack(
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
        kind: MoveKind,
    ) -> Move {
        let cap = match captured {
            Some(k) => k as u32,
            None => NO_CAPTURE,
        };
        Move(
            from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (piece as u32) << PIECE_SHIFT
                | cap << CAPTURE_SHIFT
                | (kind as u32) << KIND_SHIFT,
        )
    }

    /// A non-special move, optionally capturing.
    pub const fn ordinary(
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
    ) -> Move {
        debug_assert!(from.index() != to.index());
        Self::pack(from, to, piece, captured, MoveKind::Ordinary)
    }

    /// A pawn promotion; `kind` must be one of [`MoveKind::PROMOTIONS`].
    pub const fn promotion(
        from: Square,
        to: Square,
        captured: Option<PieceKind>,
        kind: MoveKind,
    ) -> Move {
        debug_assert!(kind.promotion().is_some());
        Self::pack(from, to, PieceKind::Pawn, captured, kind)
    }

    pub const fn en_passant(from: Square, to: Square) -> Move {
        Self::pack(from, to, PieceKind::Pawn, Some(PieceKind::Pawn), MoveKind::EnPassant)
    }

    /// A castling move, written as the king's two-square step.
    pub const fn castle(king_from: Square, king_to: Square, side: CastleSide) -> Move {
        let kind = match side {
            CastleSide::King => MoveKind::CastleKing,
            CastleSide::Queen => MoveKind::CastleQueen,
        };
        Self::pack(king_from, king_to, PieceKind::King, None, kind)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & SQ_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked((self.0 >> TO_SHIFT & SQ_MASK) as u8)
    }

    #[inline]
    pub const fn piece(self) -> PieceKind {
        match PieceKind::from_index((self.0 >> PIECE_SHIFT & 7) as u8) {
            Some(k) => k,
            None => PieceKind::Pawn,
        }
    }

    #[inline]
    pub const fn captured(self) -> Option<PieceKind> {
        PieceKind::from_index((self.0 >> CAPTURE_SHIFT & 7) as u8)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::ALL[(self.0 >> KIND_SHIFT & 7) as usize]
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        self.kind().promotion()
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured().is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> KIND_SHIFT & 7) >= MoveKind::PromoteQueen as u32
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind().castle_side().is_some()
    }

    /// Captures and promotions: the moves quiescence search looks at.
    #[inline]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Raw bits, for compact storage such as hash table entries.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuild a move previously produced by [`Move::to_bits`].
    #[inline]
    pub const fn from_bits(bits: u32) -> Move {
        Move(bits & 0x1F_FFFF)
    }

    /// Square-pair notation with an optional promotion suffix, e.g. `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Move(null)");
        }
        write!(f, "Move({self} {:?} {:?}", self.piece(), self.kind())?;
        if let Some(cap) = self.captured() {
            write!(f, " x{cap:?}")?;
        }
        f.write_str(")")
    }
}
