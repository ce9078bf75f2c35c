//! Knight, bishop, rook and queen moves.

use crate::attacks::piece_attacks;
use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::PieceKind;

use super::MoveList;
use super::mode::GenMode;
use super::pins::Context;

const KINDS: [PieceKind; 4] = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

pub(super) fn generate<M: GenMode>(board: &Board, ctx: &Context, list: &mut MoveList) {
    let targets = (if M::QUIETS { !ctx.friendly } else { ctx.enemy }) & ctx.check_mask;

    for kind in KINDS {
        let mut movers = board.of(ctx.us, kind);
        // A pinned knight can never stay on its pin line.
        if kind == PieceKind::Knight {
            movers &= !ctx.pinned;
        }
        for from in movers {
            for to in piece_attacks(kind, from, ctx.occupied) & targets {
                if ctx.pin_allows(from, to) {
                    let captured = board.piece_on(to).map(|p| p.kind);
                    list.push(Move::ordinary(from, to, kind, captured));
                }
            }
        }
    }
}
