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

use super::Eval;
use crate::{
    cfor,
    defs::{Piece, PieceType, Side, Square},
};

/// Piece-square bonuses for White, written as the board is seen from
/// White's side: the first row is rank 8 and the last row is rank 1.
///
/// Order: pawn, knight, bishop, rook, queen, king. The classic tables of
/// the simplified evaluation function, see
/// <https://www.chessprogramming.org/Simplified_Evaluation_Function>.
#[rustfmt::skip]
const INITIAL_PIECE_SQUARE_TABLES: [[Eval; Square::TOTAL]; PieceType::TOTAL] = [
    [
          0,   0,   0,   0,   0,   0,   0,   0,
         50,  50,  50,  50,  50,  50,  50,  50,
         10,  10,  20,  30,  30,  20,  10,  10,
          5,   5,  10,  25,  25,  10,   5,   5,
          0,   0,   0,  20,  20,   0,   0,   0,
          5,  -5, -10,   0,   0, -10,  -5,   5,
          5,  10,  10, -20, -20,  10,  10,   5,
          0,   0,   0,   0,   0,   0,   0,   0,
    ],
    [
        -50, -40, -30, -30, -30, -30, -40, -50,
        -40, -20,   0,   0,   0,   0, -20, -40,
        -30,   0,  10,  15,  15,  10,   0, -30,
        -30,   5,  15,  20,  20,  15,   5, -30,
        -30,   0,  15,  20,  20,  15,   0, -30,
        -30,   5,  10,  15,  15,  10,   5, -30,
        -40, -20,   0,   5,   5,   0, -20, -40,
        -50, -40, -30, -30, -30, -30, -40, -50,
    ],
    [
        -20, -10, -10, -10, -10, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,  10,  10,   5,   0, -10,
        -10,   5,   5,  10,  10,   5,   5, -10,
        -10,   0,  10,  10,  10,  10,   0, -10,
        -10,  10,  10,  10,  10,  10,  10, -10,
        -10,   5,   0,   0,   0,   0,   5, -10,
        -20, -10, -10, -10, -10, -10, -10, -20,
    ],
    [
          0,   0,   0,   0,   0,   0,   0,   0,
          5,  10,  10,  10,  10,  10,  10,   5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
         -5,   0,   0,   0,   0,   0,   0,  -5,
          0,   0,   0,   5,   5,   0,   0,   0,
    ],
    [
        -20, -10, -10,  -5,  -5, -10, -10, -20,
        -10,   0,   0,   0,   0,   0,   0, -10,
        -10,   0,   5,   5,   5,   5,   0, -10,
         -5,   0,   5,   5,   5,   5,   0,  -5,
          0,   0,   5,   5,   5,   5,   0,  -5,
        -10,   5,   5,   5,   5,   5,   0, -10,
        -10,   0,   5,   0,   0,   0,   0, -10,
        -20, -10, -10,  -5,  -5, -10, -10, -20,
    ],
    [
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -30, -40, -40, -50, -50, -40, -40, -30,
        -20, -30, -30, -40, -40, -30, -30, -20,
        -10, -20, -20, -20, -20, -20, -20, -10,
         20,  20,   0,   0,   0,   0,  20,  20,
         20,  30,  10,   0,   0,  10,  30,  20,
    ],
];

/// Creates the piece-square tables for White and Black, with an extra table
/// of 0's at the end to allow [`Piece::NONE`] to index into it.
///
/// The initial tables are written rank 8 first, so the White lookup
/// vertically mirrors the square; the Black lookup uses the square as-is
/// and negates the bonus.
pub const fn create_piece_square_tables() -> [[Eval; Square::TOTAL]; Piece::TOTAL + 1] {
    let mut psqt = [[0; Square::TOTAL]; Piece::TOTAL + 1];
    cfor!(let mut piece = 0; piece < PieceType::TOTAL; piece += 1; {
        let w_piece = Piece::from_piecetype(PieceType(piece as u8), Side::WHITE);
        let b_piece = Piece::from_piecetype(PieceType(piece as u8), Side::BLACK);
        cfor!(let mut square = 0; square < Square::TOTAL; square += 1; {
            let bonus = INITIAL_PIECE_SQUARE_TABLES[piece][square ^ 56];
            psqt[w_piece.to_index()][square] = bonus;
            psqt[b_piece.to_index()][square ^ 56] = -bonus;
        });
    });
    psqt
}

#[cfg(test)]
mod tests {
    use super::create_piece_square_tables;
    use crate::defs::{Piece, Square};

    #[test]
    fn black_tables_mirror_white_tables() {
        let psqt = create_piece_square_tables();
        for square in 0..Square::TOTAL {
            for piece in 0..Piece::TOTAL {
                let piece_type = piece >> 1;
                let white = Piece::from_piecetype(
                    crate::defs::PieceType(piece_type as u8),
                    crate::defs::Side::WHITE,
                );
                let black = Piece::from_piecetype(
                    crate::defs::PieceType(piece_type as u8),
                    crate::defs::Side::BLACK,
                );
                assert_eq!(
                    psqt[white.to_index()][square],
                    -psqt[black.to_index()][square ^ 56],
                );
            }
        }
        // spot checks: a White pawn on d4 is worth more than on d2, and a
        // Black pawn on d5 mirrors it
        let d4 = Square(27).to_index();
        let d2 = Square(11).to_index();
        let d5 = Square(35).to_index();
        assert!(psqt[Piece::WPAWN.to_index()][d4] > psqt[Piece::WPAWN.to_index()][d2]);
        assert_eq!(
            psqt[Piece::WPAWN.to_index()][d4],
            -psqt[Piece::BPAWN.to_index()][d5]
        );
    }
}
