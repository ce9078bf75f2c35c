//! Piece-square tables.
//!
//! Tables are laid out as a White player sees the board: the first row is
//! rank 8, the last row rank 1. [`pst`] handles the flip for either colour.

use vantage_core::{Color, PieceKind, Square};

use super::score::{S, Score};

#[rustfmt::skip]
const PAWN: [Score; 64] = [
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
    S( 60,140), S( 70,135), S( 60,125), S( 75,110), S( 75,110), S( 60,125), S( 70,135), S( 60,140),
    S( 15, 70), S( 20, 70), S( 30, 60), S( 40, 45), S( 40, 45), S( 30, 60), S( 20, 70), S( 15, 70),
    S(  0, 30), S(  5, 25), S( 10, 20), S( 25, 10), S( 25, 10), S( 10, 20), S(  5, 25), S(  0, 30),
    S( -5, 15), S(  0, 12), S(  5,  8), S( 20,  5), S( 20,  5), S(  5,  8), S(  0, 12), S( -5, 15),
    S( -5,  5), S( -5,  5), S(  0,  0), S(  5,  0), S(  5,  0), S( -5,  0), S( -5,  5), S( -5,  5),
    S(-10,  5), S( -5,  5), S( -5,  5), S(-20,  5), S(-20,  5), S( 10,  5), S( 10,  5), S(-10,  5),
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
];

#[rustfmt::skip]
const KNIGHT: [Score; 64] = [
    S(-80,-60), S(-50,-40), S(-35,-30), S(-30,-25), S(-30,-25), S(-35,-30), S(-50,-40), S(-80,-60),
    S(-45,-35), S(-20,-15), S(  5, -5), S( 10,  0), S( 10,  0), S(  5, -5), S(-20,-15), S(-45,-35),
    S(-30,-25), S( 10, -5), S( 25, 10), S( 35, 15), S( 35, 15), S( 25, 10), S( 10, -5), S(-30,-25),
    S(-25,-20), S(  5,  0), S( 20, 15), S( 30, 20), S( 30, 20), S( 20, 15), S(  5,  0), S(-25,-20),
    S(-25,-20), S(  0,  0), S( 15, 15), S( 20, 20), S( 20, 20), S( 15, 15), S(  0,  0), S(-25,-20),
    S(-30,-25), S(  0, -5), S( 10,  5), S( 10, 10), S( 10, 10), S( 10,  5), S(  0, -5), S(-30,-25),
    S(-45,-35), S(-25,-15), S( -5, -5), S(  0,  0), S(  0,  0), S( -5, -5), S(-25,-15), S(-45,-35),
    S(-70,-55), S(-35,-40), S(-30,-30), S(-30,-25), S(-30,-25), S(-30,-30), S(-35,-40), S(-70,-55),
];

#[rustfmt::skip]
const BISHOP: [Score; 64] = [
    S(-25,-15), S(-10,-10), S(-10,-10), S(-10, -8), S(-10, -8), S(-10,-10), S(-10,-10), S(-25,-15),
    S(-10,-10), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(-10,-10),
    S(-10, -5), S(  5,  0), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  5), S(  5,  0), S(-10, -5),
    S( -5, -5), S(  5,  0), S( 10,  5), S( 15, 10), S( 15, 10), S( 10,  5), S(  5,  0), S( -5, -5),
    S( -5, -5), S( 10,  0), S( 10,  5), S( 15, 10), S( 15, 10), S( 10,  5), S( 10,  0), S( -5, -5),
    S(-10, -5), S( 10,  0), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  0), S(-10, -5),
    S(-10,-10), S( 15, -5), S(  5,  0), S(  5,  0), S(  5,  0), S(  5,  0), S( 15, -5), S(-10,-10),
    S(-25,-15), S(-10,-10), S(-15,-10), S(-10, -8), S(-10, -8), S(-15,-10), S(-10,-10), S(-25,-15),
];

#[rustfmt::skip]
const ROOK: [Score; 64] = [
    S( 10, 10), S( 10, 10), S( 15, 10), S( 15, 10), S( 15, 10), S( 15, 10), S( 10, 10), S( 10, 10),
    S( 20, 15), S( 25, 15), S( 25, 15), S( 25, 15), S( 25, 15), S( 25, 15), S( 25, 15), S( 20, 15),
    S( -5,  5), S(  0,  5), S(  0,  5), S(  5,  5), S(  5,  5), S(  0,  5), S(  0,  5), S( -5,  5),
    S(-10,  0), S( -5,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -5,  0), S(-10,  0),
    S(-10,  0), S( -5,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -5,  0), S(-10,  0),
    S(-10, -5), S( -5, -5), S(  0, -5), S(  0, -5), S(  0, -5), S(  0, -5), S( -5, -5), S(-10, -5),
    S(-15, -5), S( -5, -5), S(  0, -5), S(  0, -5), S(  0, -5), S(  0, -5), S( -5, -5), S(-15, -5),
    S( -5,-10), S(  0, -5), S(  5, -5), S( 10, -5), S( 10, -5), S(  5, -5), S(  0, -5), S( -5,-10),
];

#[rustfmt::skip]
const QUEEN: [Score; 64] = [
    S(-20,-15), S(-10,-10), S(-10, -5), S( -5,  0), S( -5,  0), S(-10, -5), S(-10,-10), S(-20,-15),
    S(-10, -5), S( -5,  0), S(  0,  5), S(  0, 10), S(  0, 10), S(  0,  5), S( -5,  0), S(-10, -5),
    S(-10, -5), S(  0,  5), S(  5, 10), S(  5, 15), S(  5, 15), S(  5, 10), S(  0,  5), S(-10, -5),
    S( -5,  0), S(  0, 10), S(  5, 15), S(  5, 20), S(  5, 20), S(  5, 15), S(  0, 10), S( -5,  0),
    S( -5,  0), S(  0, 10), S(  5, 15), S(  5, 20), S(  5, 20), S(  5, 15), S(  0, 10), S( -5,  0),
    S(-10, -5), S(  5,  5), S(  5, 10), S(  5, 10), S(  5, 10), S(  5, 10), S(  0,  5), S(-10, -5),
    S(-10,-10), S(  0, -5), S(  5,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0, -5), S(-10,-10),
    S(-20,-20), S(-10,-15), S(-10,-10), S(  0,-10), S( -5,-10), S(-10,-10), S(-10,-15), S(-20,-20),
];

/// Shelter the king in the middlegame, centralise it in the endgame.
#[rustfmt::skip]
const KING: [Score; 64] = [
    S(-60,-70), S(-60,-40), S(-60,-30), S(-70,-20), S(-70,-20), S(-60,-30), S(-60,-40), S(-60,-70),
    S(-50,-30), S(-50,-10), S(-50,  0), S(-60, 10), S(-60, 10), S(-50,  0), S(-50,-10), S(-50,-30),
    S(-40,-25), S(-40,  5), S(-40, 20), S(-50, 30), S(-50, 30), S(-40, 20), S(-40,  5), S(-40,-25),
    S(-30,-20), S(-40,  5), S(-40, 25), S(-50, 35), S(-50, 35), S(-40, 25), S(-40,  5), S(-30,-20),
    S(-20,-25), S(-30,  0), S(-30, 20), S(-40, 30), S(-40, 30), S(-30, 20), S(-30,  0), S(-20,-25),
    S(-10,-30), S(-20,-10), S(-20, 10), S(-20, 15), S(-20, 15), S(-20, 10), S(-20,-10), S(-10,-30),
    S( 15,-35), S( 15,-20), S(  0,  0), S(-10,  5), S(-10,  5), S(  0,  0), S( 15,-20), S( 15,-35),
    S( 20,-55), S( 35,-35), S( 10,-25), S(  0,-20), S(  0,-20), S( 10,-25), S( 35,-35), S( 20,-55),
];

static TABLES: [[Score; 64]; PieceKind::COUNT] = [PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING];

/// Placement bonus for a `color` piece of `kind` on `sq`.
#[inline]
pub fn pst(kind: PieceKind, color: Color, sq: Square) -> Score {
    // Row 0 of a table is rank 8 from White's side; Black reads it unflipped.
    let row_major = match color {
        Color::White => sq.flip_rank().index(),
        Color::Black => sq.index(),
    };
    TABLES[kind.index()][row_major]
}
