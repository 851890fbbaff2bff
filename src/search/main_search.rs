/*
 * Pincer, the core of a UCI-compatible chess engine
 * Copyright (C) 2025 the Pincer developers
 *
 * Pincer is free software: you can redistribute it and/or modify it under
 * the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * Pincer is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along
 * with Pincer. If not, see <https://www.gnu.org/licenses/>.
 */

use super::{
    ordering::order_moves, Depth, Node, NonPvNode, Pv, PvNode, SearchReferences, SearchStatus,
    MAX_PLY,
};
use crate::{
    board::Board,
    evaluation::{evaluate, mated_in, Eval, DRAW},
    movegen::{generate_moves, AllMoves, CapturesOnly, Move, Moves},
    transposition_table::{Bound, TranspositionHit},
};

/// Performs an alpha-beta search on `board` in negamax form, with
/// principal-variation windows.
///
/// Returns the score of the position after searching to the given depth.
/// If `NodeType` is [`RootNode`](super::RootNode) and a legal move exists,
/// `pv` will have at least one move in it afterwards.
#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
pub fn search<NodeType: Node>(
    refs: &mut SearchReferences<'_>,
    pv: &mut Pv,
    board: &Board,
    mut alpha: Eval,
    beta: Eval,
    mut depth: Depth,
    height: Depth,
) -> Eval {
    // the budget is checked once per 1024 nodes; a stopped search unwinds
    // without touching the TT
    if refs.check_status() != SearchStatus::Continue {
        return 0;
    }

    if height as usize >= MAX_PLY - 1 {
        return evaluate(board);
    }

    // look one ply deeper when in check: forced lines resolve slowly
    let is_in_check = board.is_in_check();
    if is_in_check {
        depth += 1;
    }

    if depth == 0 {
        return quiescence_search(refs, board, alpha, beta, height);
    }

    refs.nodes += 1;
    refs.seldepth = refs.seldepth.max(height);

    // probe the TT; a deep-enough entry can settle this node outright
    let key = board.key();
    let tt_hit = refs.tt.load(key, height);
    if let Some(hit) = tt_hit {
        if hit.depth() >= depth {
            let cutoff = match hit.bound() {
                Bound::Exact => Some(hit.score()),
                Bound::Lower if hit.score() >= beta => Some(beta),
                Bound::Upper if hit.score() <= alpha => Some(alpha),
                Bound::Lower | Bound::Upper => None,
            };
            if let Some(score) = cutoff {
                if !NodeType::IS_ROOT {
                    return score;
                }
                // the root must leave a move behind to play
                if let Some(mv) = hit.mv() {
                    pv.enqueue(mv);
                    return score;
                }
            }
        }
    }
    let tt_move = tt_hit.and_then(TranspositionHit::mv);

    let mut moves = Moves::new();
    generate_moves::<AllMoves>(board, &mut moves);
    order_moves(
        &mut moves,
        board,
        tt_move,
        refs.killers.at(height),
        &refs.history,
    );

    let mut best_move = None;
    let mut new_pv = Pv::new();
    let mut total_moves: u8 = 0;

    for index in 0..moves.len() {
        let mv = moves[index].mv;

        if NodeType::IS_ROOT && refs.check_limits() != SearchStatus::Continue {
            return alpha;
        }

        // copy-make: the parent keeps `board` pristine, so unmaking is
        // just dropping the copy
        let mut copy = *board;
        copy.make_move(mv);
        if copy.mover_in_check() {
            continue;
        }
        total_moves += 1;

        // make sure there is always a legal move ready to play
        if NodeType::IS_ROOT && total_moves == 1 {
            pv.enqueue(mv);
        }

        let new_depth = depth - 1;

        // Principal variation search + late move reductions. The first
        // legal move gets the full window. Later moves are probed with a
        // zero window at a possibly reduced depth: if the probe fails low,
        // the move ordering was right and the move is dismissed cheaply.
        // A reduced probe that raises alpha is re-run at full depth, and a
        // full-depth probe that still sits inside the window is re-run
        // with the full window.
        let mut score = 0;
        if !NodeType::IS_PV || total_moves > 1 {
            let reduction = reduction::<NodeType>(depth, total_moves, is_in_check, mv);

            score = -search::<NonPvNode>(
                refs,
                &mut new_pv,
                &copy,
                -alpha - 1,
                -alpha,
                new_depth - reduction,
                height + 1,
            );

            if score > alpha && reduction > 0 {
                score = -search::<NonPvNode>(
                    refs,
                    &mut new_pv,
                    &copy,
                    -alpha - 1,
                    -alpha,
                    new_depth,
                    height + 1,
                );
            }
        }

        if NodeType::IS_PV && (score > alpha || total_moves == 1) {
            new_pv.clear();
            score = -search::<PvNode>(
                refs,
                &mut new_pv,
                &copy,
                -beta,
                -alpha,
                new_depth,
                height + 1,
            );
        }

        // if the search was stopped somewhere below, its results cannot be
        // trusted
        if refs.status != SearchStatus::Continue {
            return if NodeType::IS_ROOT { alpha } else { 0 };
        }

        if score >= beta {
            // fail high: this node is too good to be reached by a
            // well-playing opponent
            if !mv.is_tactical() {
                refs.killers.insert(height, mv);
                refs.history.bump(mv.piece(), mv.end(), depth);
            }
            refs.tt.store(key, beta, Some(mv), depth, Bound::Lower, height);
            return beta;
        }

        if score > alpha {
            alpha = score;
            best_move = Some(mv);

            pv.clear();
            pv.enqueue(mv);
            pv.append_pv(&mut new_pv);
        }

        new_pv.clear();
    }

    // no legal moves: either checkmate or stalemate
    if total_moves == 0 {
        return if is_in_check {
            mated_in(height)
        } else {
            DRAW
        };
    }

    let bound = if best_move.is_some() {
        Bound::Exact
    } else {
        Bound::Upper
    };
    refs.tt.store(key, alpha, best_move, depth, bound, height);

    alpha
}

/// Performs a search that only considers captures (including en passant
/// and capturing promotions) and uses a static evaluation at the leaves.
///
/// This resolves the tactics hanging at the horizon of the main search, so
/// a queen left en prise on the last ply does not get mis-scored.
fn quiescence_search(
    refs: &mut SearchReferences<'_>,
    board: &Board,
    mut alpha: Eval,
    beta: Eval,
    height: Depth,
) -> Eval {
    if refs.check_status() != SearchStatus::Continue {
        return 0;
    }

    refs.nodes += 1;
    refs.seldepth = refs.seldepth.max(height);

    // stand pat: the side to move can usually do at least as well as
    // sitting still
    let stand_pat = evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    alpha = alpha.max(stand_pat);

    if height as usize >= MAX_PLY - 1 {
        return alpha;
    }

    let mut moves = Moves::new();
    generate_moves::<CapturesOnly>(board, &mut moves);
    order_moves(&mut moves, board, None, [None; 2], &refs.history);

    for index in 0..moves.len() {
        let mv = moves[index].mv;

        let mut copy = *board;
        copy.make_move(mv);
        if copy.mover_in_check() {
            continue;
        }

        let score = -quiescence_search(refs, &copy, -beta, -alpha, height + 1);

        if refs.status != SearchStatus::Continue {
            return 0;
        }

        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }

    alpha
}

/// Calculates how much to reduce the depth of a late move's zero-window
/// probe.
///
/// The first three moves run at full depth, the fourth and fifth drop one
/// ply and the rest drop two. PV nodes, evasions and tactical moves are
/// never reduced, and a reduction never sends the probe below depth zero.
fn reduction<NodeType: Node>(
    depth: Depth,
    total_moves: u8,
    is_in_check: bool,
    mv: Move,
) -> Depth {
    if NodeType::IS_PV || is_in_check || mv.is_tactical() || depth < 2 || total_moves < 4 {
        return 0;
    }

    let reduction = if total_moves >= 6 { 2 } else { 1 };
    reduction.min(depth - 1)
}
