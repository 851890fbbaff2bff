#![cfg(test)]

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

use lazy_static::lazy_static;

use crate::{board::Board, perft::perft};

/// A known-good perft result: a position, a depth and the exact number of
/// leaf nodes.
#[derive(Clone, Copy)]
struct TestPosition<'a> {
    position: &'a str,
    perft_depth: u8,
    perft_result: u64,
}

lazy_static! {
    /// Test positions used to check the correctness of movegen and
    /// make-move, including the canonical reference counts.
    static ref TEST_POSITIONS: Vec<TestPosition<'static>> = vec![
        // startpos: the five canonical depths. Depth 5 has en passant,
        // checks and double pawn push interactions.
        TestPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 1, 20),
        TestPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2, 400),
        TestPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3, 8_902),
        TestPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4, 197_281),
        TestPosition::new(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            5,
            4_865_609,
        ),
        // kiwipete: tests all the special moves. Depth 4 covers
        // everything, but depth 5 to be safe.
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            1,
            48,
        ),
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            2,
            2_039,
        ),
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            3,
            97_862,
        ),
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            4,
            4_085_603,
        ),
        TestPosition::new(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            5,
            193_690_690,
        ),
        // CPW position 5: promotions, including underpromotion checks
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            1,
            6,
        ),
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            2,
            264,
        ),
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            3,
            9_467,
        ),
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            4,
            422_333,
        ),
        TestPosition::new(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            5,
            15_833_292,
        ),
        // en passant which would be a discovered check on our own king
        TestPosition::new("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5, 674_624),
        // an enemy knight taking a rook, disallowing castling
        TestPosition::new(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
            4,
            2_103_487,
        ),
    ];
}

impl<'a> TestPosition<'a> {
    const fn new(position: &'a str, perft_depth: u8, perft_result: u64) -> Self {
        Self {
            position,
            perft_depth,
            perft_result,
        }
    }

    fn run_test(&self) {
        let board: Board = self.position.parse().unwrap();
        println!("Position: {} depth {}", self.position, self.perft_depth);
        assert_eq!(
            perft::<false, false>(&board, self.perft_depth),
            self.perft_result,
        );
    }
}

#[test]
fn test_positions() {
    for position in TEST_POSITIONS.iter() {
        position.run_test();
    }
}
