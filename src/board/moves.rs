// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::attacks::{is_in_check, kings_adjacent, KNIGHT_MOVES};
use super::castling::{Castle, CastlingRights};
use super::grid::{Board, DIAGONALS, HORIZONTALS};
use super::material::{Color, Material, Pair, Piece};
use super::square::{Mask, Rank, Square};

use Piece::*;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Coordinates are off the board")]
    OffBoard,
    #[error("No piece on the source square")]
    NoPiece,
    #[error("Piece does not belong to the side to move")]
    WrongTurn,
    #[error("Source and destination are the same square")]
    SameSquare,
    #[error("Destination holds a piece of the same color")]
    OwnPiece,
    #[error("Not a legal move")]
    InvalidMove,
    #[error("Move would leave the king in check")]
    SelfCheck,
    #[error("The game is over")]
    GameOver,
    #[error("No more moves can be numbered in this game")]
    MoveLimit,
}
use MoveError::*;

/// A move request: a source and a destination square. Castling is
/// requested by moving the king two files toward the rook.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn from_coords(
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Result<Self, MoveError> {
        let from = Square::from_coords(from_row, from_col).ok_or(OffBoard)?;
        let to = Square::from_coords(to_row, to_col).ok_or(OffBoard)?;
        Ok(Self::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// The most recently committed move, with the moved piece as it was
/// before the move (a promoted pawn is still recorded as a pawn).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
    pub material: Material,
}

impl LastMove {
    pub fn new(from: Square, to: Square, material: Material) -> Self {
        Self { from, to, material }
    }

    #[inline]
    pub fn is_double_advance(&self) -> bool {
        self.material.piece().is_pawn() && self.from.row().abs_diff(self.to.row()) == 2
    }
}

/// A validated move, classified by the side effects it has on the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalMove {
    Standard(Square, Square),
    DoubleAdvance(Square, Square),
    EnPassant(Square, Square),
    Promoting(Square, Square),
    ShortCastle(Color),
    LongCastle(Color),
}

impl LegalMove {
    pub fn from(&self) -> Square {
        match *self {
            Self::Standard(from, _)
            | Self::DoubleAdvance(from, _)
            | Self::EnPassant(from, _)
            | Self::Promoting(from, _) => from,
            Self::ShortCastle(color) | Self::LongCastle(color) => Castle::king_src(color),
        }
    }

    pub fn to(&self) -> Square {
        match *self {
            Self::Standard(_, to)
            | Self::DoubleAdvance(_, to)
            | Self::EnPassant(_, to)
            | Self::Promoting(_, to) => to,
            Self::ShortCastle(color) => Castle::Short.king_dest(color),
            Self::LongCastle(color) => Castle::Long.king_dest(color),
        }
    }

    /// The square of the pawn taken by an en passant capture from `from`
    /// to `to`: beside the capturing pawn, not on the destination.
    #[inline]
    pub fn en_passant_victim(from: Square, to: Square) -> Square {
        Square::new(to.file(), from.rank())
    }

    fn castle(color: Color, side: Castle) -> Self {
        match side {
            Castle::Short => Self::ShortCastle(color),
            Castle::Long => Self::LongCastle(color),
        }
    }
}

/// The rules of movement evaluated against a borrowed snapshot: a board,
/// the move that produced it and the castling rights of both sides.
///
/// Nothing here mutates anything. Speculative moves are played onto
/// copies of the board, so a `Rules` can be queried as often as needed,
/// which is what the terminal-state scans do.
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    board: &'a Board,
    last_move: Option<&'a LastMove>,
    castling: &'a Pair<CastlingRights>,
}

impl<'a> Rules<'a> {
    pub fn new(
        board: &'a Board,
        last_move: Option<&'a LastMove>,
        castling: &'a Pair<CastlingRights>,
    ) -> Self {
        Self {
            board,
            last_move,
            castling,
        }
    }

    #[inline]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// Checks `mv` against the movement rules of the piece on its source
    /// square and classifies it.
    ///
    /// Whose turn it is is not considered. King moves are rejected if they
    /// would leave the king attacked or next to the other king; for every
    /// other piece that check is left to `playable_move`.
    pub fn validate_move(&self, mv: Move) -> Result<LegalMove, MoveError> {
        let material = self.board[mv.from].ok_or(NoPiece)?;
        if mv.from == mv.to {
            return Err(SameSquare);
        }
        let color = material.color();
        if self.board[mv.to].is_some_and(|target| target.color() == color) {
            return Err(OwnPiece);
        }
        match material.piece() {
            Pawn => self.pawn_move(mv, color),
            Knight => match KNIGHT_MOVES[mv.from].contains(mv.to) {
                true => Ok(LegalMove::Standard(mv.from, mv.to)),
                false => Err(InvalidMove),
            },
            Bishop => self.line_move(mv, &DIAGONALS),
            Rook => self.line_move(mv, &HORIZONTALS),
            Queen => self
                .line_move(mv, &DIAGONALS)
                .or_else(|_| self.line_move(mv, &HORIZONTALS)),
            King => self.king_move(mv, color),
        }
    }

    #[inline]
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.validate_move(mv).is_ok()
    }

    /// `validate_move` followed by the self-check filter: the move is
    /// played onto a copy of the board and rejected if the mover's king is
    /// attacked afterwards. Returns the classified move and the resulting
    /// board.
    pub fn playable_move(&self, mv: Move) -> Result<(LegalMove, Board), MoveError> {
        let legal = self.validate_move(mv)?;
        // Safety: validation ensures there's material at `from`
        let color = self.board[mv.from].map(|m| m.color()).ok_or(NoPiece)?;
        let board = self.board.play(legal);
        if let Some(king) = board.king(color) {
            if is_in_check(&board, king, color) {
                return Err(SelfCheck);
            }
        }
        Ok((legal, board))
    }

    /// Destinations the piece on `from` can actually move to.
    pub fn move_destinations(&self, from: Square) -> Mask {
        Mask::from_squares(
            Square::iter().filter(|&to| self.playable_move(Move::new(from, to)).is_ok()),
        )
    }

    /// Every playable move for the pieces of `color`.
    pub fn all_moves(&self, color: Color) -> impl Iterator<Item = Move> + '_ {
        self.board.iter_color(color).flat_map(move |(from, _)| {
            self.move_destinations(from)
                .iter()
                .map(move |to| Move::new(from, to))
        })
    }

    pub fn count_moves(&self, color: Color) -> usize {
        self.board
            .iter_color(color)
            .map(|(from, _)| self.move_destinations(from).len())
            .sum()
    }

    /// True if `color` has at least one playable move. Stops at the first
    /// one found.
    pub fn can_move(&self, color: Color) -> bool {
        self.board.iter_color(color).any(|(from, _)| {
            Square::iter().any(|to| self.playable_move(Move::new(from, to)).is_ok())
        })
    }

    fn pawn_move(&self, mv: Move, color: Color) -> Result<LegalMove, MoveError> {
        let offset = mv.to - mv.from;
        let forward = color.forward();
        let single = if mv.to.rank() == Rank::promotion_rank(color) {
            LegalMove::Promoting(mv.from, mv.to)
        } else {
            LegalMove::Standard(mv.from, mv.to)
        };
        if offset.x == 0 {
            // advances never capture
            if !self.board.is_vacant(mv.to) {
                return Err(InvalidMove);
            }
            if offset.y == forward {
                return Ok(single);
            }
            if offset.y == 2 * forward
                && mv.from.rank() == Rank::pawn_rank(color)
                && self.board.is_path_clear(mv.from, mv.to)
            {
                return Ok(LegalMove::DoubleAdvance(mv.from, mv.to));
            }
            return Err(InvalidMove);
        }
        if offset.x.abs() == 1 && offset.y == forward {
            if self.board[mv.to].is_some() {
                return Ok(single);
            }
            if self.is_en_passant(mv, color) {
                return Ok(LegalMove::EnPassant(mv.from, mv.to));
            }
        }
        Err(InvalidMove)
    }

    /// En passant is only available straight after the opposing pawn's
    /// double advance, onto the square it passed over.
    fn is_en_passant(&self, mv: Move, color: Color) -> bool {
        let Some(last) = self.last_move else {
            return false;
        };
        last.is_double_advance()
            && last.to.row() == mv.from.row()
            && last.to.col() == mv.to.col()
            && self.board[last.to] == Some(Material::new(!color, Pawn))
    }

    fn line_move(&self, mv: Move, lines: &[Mask; 64]) -> Result<LegalMove, MoveError> {
        if lines[mv.from].contains(mv.to) && self.board.is_path_clear(mv.from, mv.to) {
            Ok(LegalMove::Standard(mv.from, mv.to))
        } else {
            Err(InvalidMove)
        }
    }

    fn king_move(&self, mv: Move, color: Color) -> Result<LegalMove, MoveError> {
        if mv.from.distance(mv.to) == 1 {
            let board = self.board.apply(mv.from, mv.to);
            if is_in_check(&board, mv.to, color) || kings_adjacent(&board, mv.to) {
                return Err(SelfCheck);
            }
            return Ok(LegalMove::Standard(mv.from, mv.to));
        }
        match Castle::from_king_move(color, mv.from, mv.to) {
            Some(side) if self.can_castle(color, side) => Ok(LegalMove::castle(color, side)),
            _ => Err(InvalidMove),
        }
    }

    fn can_castle(&self, color: Color, side: Castle) -> bool {
        self.castling[color].allows(side)
            && self.board[side.rook_src(color)] == Some(Material::new(color, Rook))
            && (side.blocking_lane(color) & self.board.occupied()).is_empty()
            && side
                .king_path(color)
                .into_iter()
                .all(|square| !is_in_check(self.board, square, color))
    }
}

/// Shorthand for `Rules::new(board, last_move, castling).is_legal_move(..)`.
pub fn is_legal_move(
    from: Square,
    to: Square,
    board: &Board,
    last_move: Option<&LastMove>,
    castling: &Pair<CastlingRights>,
) -> bool {
    Rules::new(board, last_move, castling).is_legal_move(Move::new(from, to))
}
