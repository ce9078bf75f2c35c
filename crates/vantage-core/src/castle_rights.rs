//! Castling rights as a four-bit set, plus the fixed castling geometry.

use std::fmt;

use crate::color::Color;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Bit 0 = White king side, 1 = White queen side, 2 = Black king side, 3 = Black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    #[inline]
    pub const fn from_bits(bits: u8) -> CastleRights {
        CastleRights(bits & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        let shift = match side {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        };
        1 << (color.index() * 2 + shift)
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::flag(color, side))
    }

    /// Rights left after a move touches `from` and `to`.
    ///
    /// Any move from or onto a king or rook home square clears the rights tied to it.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & KEEP_MASK[from.index()] & KEEP_MASK[to.index()])
    }

    pub fn parse(field: &str) -> Option<CastleRights> {
        if field == "-" {
            return Some(CastleRights::NONE);
        }
        if field.is_empty() {
            return None;
        }
        field.chars().try_fold(CastleRights::NONE, |rights, c| {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => return None,
            };
            Some(rights.with(color, side))
        })
    }
}

/// Bits that survive a move touching each square.
const KEEP_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[Square::E1.index()] = 0b1100;
    mask[Square::H1.index()] = 0b1110;
    mask[Square::A1.index()] = 0b1101;
    mask[Square::E8.index()] = 0b0011;
    mask[Square::H8.index()] = 0b1011;
    mask[Square::A8.index()] = 0b0111;
    mask
};

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

impl CastlePath {
    pub const fn of(color: Color, side: CastleSide) -> CastlePath {
        let (king_from, king_to, rook_from, rook_to) = match (color, side) {
            (Color::White, CastleSide::King) => (Square::E1, Square::G1, Square::H1, Square::F1),
            (Color::White, CastleSide::Queen) => (Square::E1, Square::C1, Square::A1, Square::D1),
            (Color::Black, CastleSide::King) => (Square::E8, Square::G8, Square::H8, Square::F8),
            (Color::Black, CastleSide::Queen) => (Square::E8, Square::C8, Square::A8, Square::D8),
        };
        CastlePath { king_from, king_to, rook_from, rook_to }
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (bit, c) in ['K', 'Q', 'k', 'q'].into_iter().enumerate() {
            if self.0 & (1 << bit) != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}
