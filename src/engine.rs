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

use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use crate::{
    board::Board,
    defs::{PieceType, Square},
    error::{MoveError, PositionError},
    movegen::{generate_moves, AllMoves, Move, Moves},
    perft::perft,
    search::{
        iterative_deepening::iterative_deepening, Limits, SearchReferences, SearchReport,
    },
    transposition_table::TranspositionTable,
};

/// The engine core as its host sees it: a current position, a
/// transposition table and a stop flag, driven through the `new_game`,
/// `set_position`, `go` and `stop` operations.
///
/// The host owns all I/O. Search progress comes back through the
/// per-iteration callback of [`go`](Self::go), and the best move is its
/// return value; a host would print that as `bestmove` (or `0000` when
/// there is none).
pub struct Engine {
    /// The current position.
    board: Board,
    /// The transposition table. Lives for the process, cleared on
    /// `new_game`.
    tt: TranspositionTable,
    /// The cooperative stop flag, shared with the host.
    stop: Arc<AtomicBool>,
}

/// The default transposition table size in MiB.
const DEFAULT_HASH_MIB: usize = 32;

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new [`Engine`] with the starting position and a
    /// default-sized transposition table.
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            tt: TranspositionTable::with_capacity(DEFAULT_HASH_MIB),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the current position.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Starts a new game: the transposition table is cleared and the board
    /// is reset to the empty state, awaiting a `set_position`.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.board = Board::new();
    }

    /// Resizes the transposition table to `size_mib` MiB, clearing it.
    pub fn set_hash_size(&mut self, size_mib: usize) {
        self.tt.resize(size_mib);
    }

    /// Sets the position to `fen`, then applies each of `moves` (in UCI
    /// long algebraic notation) in order.
    ///
    /// A FEN that does not parse or a move that is not legal in the
    /// position it is played from leaves the previous position in place
    /// and reports which input was bad.
    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), PositionError> {
        let mut board = Board::from_str(fen)?;

        for &token in moves {
            let mv = find_move(&board, token)?;
            board.make_move(mv);
        }

        self.board = board;
        Ok(())
    }

    /// Runs a search on the current position within `limits`.
    ///
    /// `on_iteration` is called after every completed iteration of
    /// deepening. Returns the best move of the last completed iteration,
    /// or [`None`] if the position has no legal move (mate or stalemate:
    /// the caller decides which).
    pub fn go(
        &mut self,
        limits: Limits,
        on_iteration: &mut dyn FnMut(&SearchReport),
    ) -> Option<Move> {
        self.stop.store(false, Ordering::Relaxed);
        self.tt.new_search();

        let mut refs =
            SearchReferences::new(Instant::now(), limits, self.stop.as_ref(), &mut self.tt);
        iterative_deepening(&mut refs, &self.board, on_iteration)
    }

    /// Cooperatively ends the current search.
    ///
    /// The search notices the flag at its next budget check and returns
    /// the best move from the most recent completed iteration.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Returns a handle to the stop flag, for hosts that raise it from
    /// somewhere else (a signal handler, an input thread).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Counts the leaf nodes `depth` moves in the future from the current
    /// position.
    pub fn perft(&self, depth: u8) -> u64 {
        perft::<false, false>(&self.board, depth)
    }
}

/// Finds the legal move of `board` written as `token` in UCI long
/// algebraic notation.
// the token is all ASCII, so the byte offsets below cannot split a
// character
#[allow(clippy::string_slice)]
fn find_move(board: &Board, token: &str) -> Result<Move, MoveError> {
    if !token.is_ascii() || (token.len() != 4 && token.len() != 5) {
        return Err(MoveError::BadNotation);
    }

    let start = token[0..2]
        .parse::<Square>()
        .map_err(|_| MoveError::BadNotation)?;
    let end = token[2..4]
        .parse::<Square>()
        .map_err(|_| MoveError::BadNotation)?;
    if start == Square::NONE || end == Square::NONE {
        return Err(MoveError::BadNotation);
    }

    let promotion_piece = match token[4..].chars().next() {
        None => PieceType::NONE,
        Some(promo) => {
            let piece_type =
                PieceType::try_from(promo).map_err(|_| MoveError::BadNotation)?;
            if piece_type == PieceType::PAWN || piece_type == PieceType::KING {
                return Err(MoveError::BadNotation);
            }
            piece_type
        }
    };

    let mut moves = Moves::new();
    generate_moves::<AllMoves>(board, &mut moves);
    let mv = moves
        .move_with(start, end, promotion_piece)
        .ok_or(MoveError::Illegal)?;

    // pseudo-legal is not enough: the move must not leave the mover in
    // check
    let mut copy = *board;
    copy.make_move(mv);
    if copy.mover_in_check() {
        return Err(MoveError::Illegal);
    }

    Ok(mv)
}

#[cfg(test)]
mod tests {
    use super::Engine;
    use crate::{
        board::STARTPOS,
        defs::Square,
        error::{MoveError, PositionError},
        evaluation::MATE_BOUND,
        search::Limits,
    };

    #[test]
    fn set_position_applies_moves_and_rejects_bad_ones() {
        let mut engine = Engine::new();

        engine
            .set_position(STARTPOS, &["e2e4", "c7c5", "g1f3"])
            .unwrap();
        assert_eq!(
            engine.board().to_string(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );

        // an illegal move is rejected and the position is unchanged
        let before = engine.board().to_string();
        let result = engine.set_position(STARTPOS, &["e2e5"]);
        assert_eq!(result, Err(PositionError::Move(MoveError::Illegal)));
        assert_eq!(engine.board().to_string(), before);

        // moving into check is just as illegal
        let result = engine.set_position("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1", &["e1e2"]);
        assert_eq!(result, Err(PositionError::Move(MoveError::Illegal)));

        // bad notation is distinguished from illegality
        let result = engine.set_position(STARTPOS, &["e2"]);
        assert_eq!(result, Err(PositionError::Move(MoveError::BadNotation)));
    }

    #[test]
    fn search_reports_a_mate_score_for_a_won_position() {
        let mut engine = Engine::new();
        engine
            .set_position("7k/6Q1/8/8/8/8/8/7K w - - 0 1", &[])
            .unwrap();

        let mut last_score = 0;
        let best = engine
            .go(Limits::Depth(4), &mut |report| last_score = report.score)
            .expect("a best move exists");

        assert!(last_score > MATE_BOUND, "score {last_score} is not a mate");
        assert_eq!(best.start(), Square(54), "best move must leave g7");
        let end = best.end().to_string();
        assert!(
            ["h7", "h8", "g8", "f8", "f7", "e7", "d7", "c7", "b7"].contains(&end.as_str()),
            "unexpected mating try {best}"
        );
    }

    #[test]
    fn search_finds_the_free_queen() {
        let mut engine = Engine::new();
        engine
            .set_position(
                "rnb1kbnr/pppp1ppp/8/4p3/3q4/2N5/PPPPPPPP/R1BQKBNR w KQkq - 0 1",
                &[],
            )
            .unwrap();

        let best = engine
            .go(Limits::Depth(3), &mut |_| {})
            .expect("a best move exists");
        assert_eq!(best.to_string(), "c3d4");
    }

    #[test]
    fn positions_with_no_legal_moves_return_no_move() {
        let mut engine = Engine::new();

        // checkmated: Black to move
        engine
            .set_position("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", &[])
            .unwrap();
        assert!(engine.go(Limits::Depth(3), &mut |_| {}).is_none());

        // stalemated: Black to move, not in check, no moves
        engine
            .set_position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &[])
            .unwrap();
        assert!(engine.go(Limits::Depth(3), &mut |_| {}).is_none());
    }
}
