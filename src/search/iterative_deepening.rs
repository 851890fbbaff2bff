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
    main_search::search, Depth, Limits, Pv, RootNode, SearchReferences, SearchReport,
    SearchStatus, MAX_PLY,
};
use crate::{board::Board, evaluation::INF_EVAL, movegen::Move};

/// Performs iterative deepening on the given board.
///
/// Each iteration runs a full-window root search one ply deeper than the
/// last and hands a [`SearchReport`] to `on_iteration` when it completes.
/// An iteration cut short by the budget is discarded; the best move of the
/// last *completed* iteration is returned, or [`None`] when the position
/// has no legal move at all.
pub fn iterative_deepening(
    refs: &mut SearchReferences<'_>,
    board: &Board,
    on_iteration: &mut dyn FnMut(&SearchReport),
) -> Option<Move> {
    let ply_limit = (MAX_PLY - 1) as Depth;
    let max_depth = if let Limits::Depth(depth) = refs.limits {
        depth.min(ply_limit)
    } else {
        ply_limit
    };

    let mut best_move = None;

    for depth in 1..=max_depth {
        let mut pv = Pv::new();
        refs.seldepth = 0;

        let score = search::<RootNode>(refs, &mut pv, board, -INF_EVAL, INF_EVAL, depth, 0);

        if refs.status != SearchStatus::Continue {
            // the iteration was aborted mid-way and its partial results are
            // discarded, except as a last resort when not even depth 1
            // finished
            if best_move.is_none() {
                best_move = pv.get(0);
            }
            break;
        }

        best_move = pv.get(0);

        let report = SearchReport {
            depth,
            seldepth: refs.seldepth,
            score,
            nodes: refs.nodes,
            time: refs.start.elapsed(),
            pv: pv.clone(),
        };
        on_iteration(&report);

        // a position with no legal moves cannot get better with depth
        if best_move.is_none() {
            break;
        }

        if refs.should_stop(depth) {
            break;
        }
    }

    best_move
}
