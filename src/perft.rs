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

use std::time::Instant;

use crate::{
    board::Board,
    movegen::{generate_moves, AllMoves, Moves},
};

/// Returns the number of leaf nodes `depth` moves in the future.
///
/// If `SHOULD_PRINT`, the per-move subtotals and the total are printed. If
/// `IS_TIMED`, the time taken and the average NPS are printed too.
pub fn perft<const SHOULD_PRINT: bool, const IS_TIMED: bool>(board: &Board, depth: u8) -> u64 {
    if IS_TIMED {
        let time = Instant::now();
        let result = perft::<SHOULD_PRINT, false>(board, depth);
        // for more precision
        let elapsed_us = time.elapsed().as_micros().max(1) as u64;
        let elapsed_ms = elapsed_us / 1_000;
        let nps = 1_000_000 * result / elapsed_us;
        println!("Time taken: {elapsed_ms} ms; NPS: {nps}");
        return result;
    }

    if depth == 0 {
        if SHOULD_PRINT {
            println!("1");
        }
        return 1;
    }

    let mut moves = Moves::new();
    generate_moves::<AllMoves>(board, &mut moves);

    let mut total = 0;
    for scored_move in moves.iter() {
        let mv = scored_move.mv;
        let mut copy = *board;
        copy.make_move(mv);
        if copy.mover_in_check() {
            continue;
        }

        let subtotal = perft::<false, false>(&copy, depth - 1);
        total += subtotal;

        if SHOULD_PRINT {
            println!("{mv}: {subtotal}");
        }
    }
    if SHOULD_PRINT {
        println!("Total: {total}");
    }
    total
}
