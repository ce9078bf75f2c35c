//! Negamax alpha-beta with quiescence.

use vantage_core::{Board, Move, MoveList, Piece, generate_legal_moves, generate_tactical_moves};

use crate::eval::Evaluator;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::tt::{Bound, TranspositionTable};
use crate::search::{DRAW, INF, MATE_SCORE, MAX_PLY, SearchConfig};

/// Triangular principal variation table. Row `ply` holds the best line
/// found from that ply onward.
pub(super) struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    fn new() -> PvTable {
        PvTable { moves: [[Move::NULL; MAX_PLY]; MAX_PLY], len: [0; MAX_PLY] }
    }

    fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Make `mv` followed by the line at `ply + 1` the line at `ply`.
    fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = mv;
        let child = ply + 1;
        if child >= MAX_PLY {
            self.len[ply] = 1;
            return;
        }
        let copy = self.len[child].min(MAX_PLY - 1);
        let (head, tail) = self.moves.split_at_mut(child);
        head[ply][1..=copy].copy_from_slice(&tail[0][..copy]);
        self.len[ply] = copy + 1;
    }

    pub(super) fn root(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

/// State threaded through one search.
pub(super) struct SearchContext<'a, E> {
    pub board: Board,
    pub nodes: u64,
    pub control: SearchControl<'a>,
    pub pv: PvTable,
    tt: &'a TranspositionTable,
    evaluator: &'a E,
    quiescence: bool,
    max_ply: usize,
    killers: KillerTable,
    history: HistoryTable,
}

impl<'a, E: Evaluator> SearchContext<'a, E> {
    pub(super) fn new(
        board: Board,
        tt: &'a TranspositionTable,
        evaluator: &'a E,
        config: &SearchConfig,
        control: SearchControl<'a>,
    ) -> SearchContext<'a, E> {
        SearchContext {
            board,
            nodes: 0,
            control,
            pv: PvTable::new(),
            tt,
            evaluator,
            quiescence: config.quiescence,
            max_ply: config.max_ply.clamp(1, MAX_PLY - 1),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
        }
    }

    pub(super) fn max_ply(&self) -> usize {
        self.max_ply
    }

    #[inline]
    fn evaluate(&self) -> i32 {
        self.evaluator.evaluate(&self.board, self.board.side_to_move())
    }

    #[inline]
    fn enter_node(&mut self, ply: usize) -> bool {
        self.pv.clear_ply(ply);
        if self.control.should_stop(self.nodes) {
            return false;
        }
        self.nodes += 1;
        true
    }
}

/// Search every root move to `depth` with a full window.
///
/// `hint` is searched first. Returns `None` if the search was stopped before
/// the iteration finished; otherwise the score, with the best line in the
/// root row of the PV table.
pub(super) fn search_root<E: Evaluator>(ctx: &mut SearchContext<'_, E>, depth: u8, hint: Option<Move>) -> Option<i32> {
    if !ctx.enter_node(0) {
        return None;
    }
    let key = ctx.board.hash();
    let hash_move = hint.or_else(|| ctx.tt.probe(key, 0).and_then(|e| e.best_move));
    let moves = generate_legal_moves(&ctx.board);
    let picker = MovePicker::new(&moves, &ctx.board, hash_move, &ctx.killers, &ctx.history, 0);

    let mut alpha = -INF;
    let mut best_move = None;
    for mv in picker {
        ctx.board.make_move(mv);
        let score = -negamax(ctx, depth - 1, 1, -INF, -alpha);
        ctx.board.unmake_move();
        if ctx.control.stopped() {
            return None;
        }
        if score > alpha {
            alpha = score;
            best_move = Some(mv);
            ctx.pv.update(0, mv);
        }
    }

    ctx.tt.store(key, depth, alpha, Bound::Exact, best_move, 0);
    Some(alpha)
}

fn negamax<E: Evaluator>(ctx: &mut SearchContext<'_, E>, depth: u8, ply: usize, mut alpha: i32, beta: i32) -> i32 {
    if depth == 0 && ctx.quiescence {
        return quiescence(ctx, ply, alpha, beta);
    }
    if !ctx.enter_node(ply) {
        return 0;
    }
    if ctx.board.is_fifty_move_draw() || ctx.board.is_repetition() {
        return DRAW;
    }
    if depth == 0 || ply >= ctx.max_ply {
        return ctx.evaluate();
    }

    let key = ctx.board.hash();
    let entry = ctx.tt.probe(key, ply);
    let hash_move = entry.and_then(|e| e.best_move);
    if let Some(entry) = entry
        && entry.depth >= depth
        && entry.bound.cuts(entry.score, alpha, beta)
    {
        return entry.score;
    }

    let moves = generate_legal_moves(&ctx.board);
    if moves.is_empty() {
        return if ctx.board.is_in_check() { -(MATE_SCORE - ply as i32) } else { DRAW };
    }

    let us = ctx.board.side_to_move();
    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = None;
    let mut quiets = MoveList::new();
    let picker = MovePicker::new(&moves, &ctx.board, hash_move, &ctx.killers, &ctx.history, ply);

    for mv in picker {
        ctx.board.make_move(mv);
        let score = -negamax(ctx, depth - 1, ply + 1, -beta, -alpha);
        ctx.board.unmake_move();
        if ctx.control.stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply, mv);
            }
        }
        if alpha >= beta {
            if !mv.is_tactical() {
                ctx.killers.store(ply, mv);
                ctx.history.reward(Piece::new(us, mv.piece()), mv, depth);
                for &quiet in quiets.iter() {
                    ctx.history.punish(Piece::new(us, quiet.piece()), quiet, depth);
                }
            }
            break;
        }
        if !mv.is_tactical() {
            quiets.push(mv);
        }
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if alpha > original_alpha {
        Bound::Exact
    } else {
        Bound::Upper
    };
    // A fail-low has no trustworthy best move; keep the previous hint.
    let stored_move = if bound == Bound::Upper { hash_move.or(best_move) } else { best_move };
    ctx.tt.store(key, depth, best_score, bound, stored_move, ply);
    best_score
}

/// Resolve captures and promotions until the position is quiet. In check,
/// every evasion is searched and there is no stand-pat.
fn quiescence<E: Evaluator>(ctx: &mut SearchContext<'_, E>, ply: usize, mut alpha: i32, beta: i32) -> i32 {
    if !ctx.enter_node(ply) {
        return 0;
    }
    if ply >= ctx.max_ply {
        return ctx.evaluate();
    }

    let in_check = ctx.board.is_in_check();
    let mut best = -INF;
    if !in_check {
        let stand_pat = ctx.evaluate();
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);
        best = stand_pat;
    }

    let moves = if in_check { generate_legal_moves(&ctx.board) } else { generate_tactical_moves(&ctx.board) };
    if in_check && moves.is_empty() {
        return -(MATE_SCORE - ply as i32);
    }

    for mv in MovePicker::tactical(&moves) {
        ctx.board.make_move(mv);
        let score = -quiescence(ctx, ply + 1, -beta, -alpha);
        ctx.board.unmake_move();
        if ctx.control.stopped() {
            return 0;
        }
        if score > best {
            best = score;
            alpha = alpha.max(score);
        }
        if alpha >= beta {
            break;
        }
    }
    best
}
