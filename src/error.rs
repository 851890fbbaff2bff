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
    error::Error,
    fmt::{self, Display, Formatter},
};

/// An error that occurs when a FEN string cannot be parsed.
///
/// Each variant names the field that was malformed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FenError {
    /// Fewer than the two mandatory fields were present.
    MissingField,
    /// The piece placement contained a character that is neither a piece
    /// nor a digit.
    BadPieceChar(char),
    /// A rank of the piece placement did not sum to eight files.
    BadRankWidth,
    /// The side-to-move field was not 'w' or 'b'.
    BadSideToMove,
    /// The castling field contained a letter other than 'K', 'Q', 'k', 'q'
    /// or '-'.
    BadCastlingFlag(char),
    /// The en passant field was not '-' or a valid square.
    BadEpSquare,
    /// The halfmove clock was not a number.
    BadHalfmoveClock,
    /// The fullmove number was not a number.
    BadFullmoveNumber,
}

/// An error that occurs when a host-supplied move cannot be applied to the
/// current position.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveError {
    /// The move string was not in long algebraic notation.
    BadNotation,
    /// The move is not among the legal moves of the current position.
    Illegal,
}

/// An error that occurs when a `position`-style command cannot be applied:
/// either the FEN or one of the subsequent moves was bad.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PositionError {
    /// The FEN string could not be parsed.
    Fen(FenError),
    /// One of the moves could not be applied.
    Move(MoveError),
}

/// An error that occurs when a small token (a square, a piece character)
/// cannot be parsed. Callers translate it into their own error kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError;

impl Display for FenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MissingField => f.write_str("too few fields in FEN string"),
            Self::BadPieceChar(c) => write!(f, "invalid piece character '{c}'"),
            Self::BadRankWidth => f.write_str("rank does not sum to 8 files"),
            Self::BadSideToMove => f.write_str("side to move is not 'w' or 'b'"),
            Self::BadCastlingFlag(c) => write!(f, "invalid castling letter '{c}'"),
            Self::BadEpSquare => f.write_str("invalid en passant square"),
            Self::BadHalfmoveClock => f.write_str("invalid halfmove clock"),
            Self::BadFullmoveNumber => f.write_str("invalid fullmove number"),
        }
    }
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BadNotation => f.write_str("move is not in long algebraic notation"),
            Self::Illegal => f.write_str("move is not legal in the current position"),
        }
    }
}

impl Display for PositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fen(error) => write!(f, "bad FEN: {error}"),
            Self::Move(error) => write!(f, "bad move: {error}"),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("invalid token")
    }
}

impl From<FenError> for PositionError {
    fn from(error: FenError) -> Self {
        Self::Fen(error)
    }
}

impl From<MoveError> for PositionError {
    fn from(error: MoveError) -> Self {
        Self::Move(error)
    }
}

impl Error for FenError {}
impl Error for MoveError {}
impl Error for PositionError {}
impl Error for ParseError {}
