//! King steps and castling.

use crate::attacks::{between, king_attacks};
use crate::board::Board;
use crate::castle_rights::{CastlePath, CastleSide};
use crate::chess_move::Move;
use crate::piece::{Piece, PieceKind};

use super::MoveList;
use super::mode::GenMode;
use super::pins::Context;

pub(super) fn generate<M: GenMode>(board: &Board, ctx: &Context, list: &mut MoveList) {
    let targets = king_attacks(ctx.king) & if M::QUIETS { !ctx.friendly } else { ctx.enemy };
    // Without the king on the board, sliders see through its old square.
    let occupied = ctx.occupied.without(ctx.king);

    for to in targets {
        if !board.is_attacked_with_occupancy(to, ctx.them, occupied) {
            let captured = board.piece_on(to).map(|p| p.kind);
            list.push(Move::ordinary(ctx.king, to, PieceKind::King, captured));
        }
    }

    if M::QUIETS && ctx.checkers.is_empty() {
        for side in [CastleSide::King, CastleSide::Queen] {
            if board.castling().has(ctx.us, side) {
                try_castle(board, ctx, side, list);
            }
        }
    }
}

fn try_castle(board: &Board, ctx: &Context, side: CastleSide, list: &mut MoveList) {
    let path = CastlePath::of(ctx.us, side);
    if ctx.king != path.king_from
        || board.piece_on(path.rook_from) != Some(Piece::new(ctx.us, PieceKind::Rook))
    {
        return;
    }
    if (between(path.king_from, path.rook_from) & ctx.occupied).any() {
        return;
    }
    let mut walk = between(path.king_from, path.king_to).with(path.king_to);
    // `Bitboard::any` is the inherent emptiness test; this is the iterator one.
    if Iterator::any(&mut walk, |sq| board.is_attacked_with_occupancy(sq, ctx.them, ctx.occupied)) {
        return;
    }
    list.push(Move::castle(path.king_from, path.king_to, side));
}
