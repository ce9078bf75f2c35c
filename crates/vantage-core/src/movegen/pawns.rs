//! Pawn pushes, captures, promotions and en passant.

use crate::attacks::{bishop_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

use super::MoveList;
use super::mode::GenMode;
use super::pins::Context;

pub(super) fn generate<M: GenMode>(board: &Board, ctx: &Context, list: &mut MoveList) {
    let us = ctx.us;
    let pawns = board.of(us, PieceKind::Pawn);
    let empty = !ctx.occupied;
    let (last_rank, double_rank) = match us {
        Color::White => (Bitboard::RANK_8, Bitboard::rank(3)),
        Color::Black => (Bitboard::RANK_1, Bitboard::rank(4)),
    };

    let single = pawns.forward(us) & empty;
    let double = single.forward(us) & empty & double_rank;

    for to in single & ctx.check_mask & last_rank {
        let from = to.forward(ctx.them);
        if ctx.pin_allows(from, to) {
            push_promotions(from, to, None, list);
        }
    }

    if M::QUIETS {
        for to in single & ctx.check_mask & !last_rank {
            let from = to.forward(ctx.them);
            if ctx.pin_allows(from, to) {
                list.push(Move::ordinary(from, to, PieceKind::Pawn, None));
            }
        }
        for to in double & ctx.check_mask {
            let from = to.forward(ctx.them).forward(ctx.them);
            if ctx.pin_allows(from, to) {
                list.push(Move::ordinary(from, to, PieceKind::Pawn, None));
            }
        }
    }

    for from in pawns {
        for to in pawn_attacks(us, from) & ctx.enemy & ctx.check_mask {
            if !ctx.pin_allows(from, to) {
                continue;
            }
            let captured = board.piece_on(to).map(|p| p.kind);
            if last_rank.contains(to) {
                push_promotions(from, to, captured, list);
            } else {
                list.push(Move::ordinary(from, to, PieceKind::Pawn, captured));
            }
        }
    }

    // The target belongs to the side to move; nobody else may capture onto it.
    if us == board.side_to_move()
        && let Some(target) = board.en_passant()
    {
        en_passant(board, ctx, target, list);
    }
}

fn push_promotions(from: Square, to: Square, captured: Option<PieceKind>, list: &mut MoveList) {
    for kind in MoveKind::PROMOTIONS {
        list.push(Move::promotion(from, to, captured, kind));
    }
}

fn en_passant(board: &Board, ctx: &Context, target: Square, list: &mut MoveList) {
    let victim = target.forward(ctx.them);
    // Under check the capture must remove the checker or block its ray.
    if !ctx.check_mask.contains(target) && !ctx.check_mask.contains(victim) {
        return;
    }

    for from in pawn_attacks(ctx.them, target) & board.of(ctx.us, PieceKind::Pawn) {
        if !ctx.pin_allows(from, target) {
            continue;
        }
        // Two pawns leave the same rank at once, which the pin mask cannot see.
        let after = (ctx.occupied.without(from).without(victim)).with(target);
        let exposed = (rook_attacks(ctx.king, after) & board.orthogonal_sliders(ctx.them))
            | (bishop_attacks(ctx.king, after) & board.diagonal_sliders(ctx.them));
        if exposed.is_empty() {
            list.push(Move::en_passant(from, target));
        }
    }
}
