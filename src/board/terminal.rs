// Copyright 2026 Tobin Edwards
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

use strum::IntoEnumIterator;

use super::attacks::{is_in_check, KING_MOVES};
use super::grid::Board;
use super::material::Color;
use super::moves::{Move, Rules};
use super::square::Square;

/// True if nothing but the two kings is left on the board.
pub fn is_insufficient_material(board: &Board) -> bool {
    (board.occupied() - board.kings()).is_empty()
}

impl Rules<'_> {
    /// True if the king of `color` is in check.
    pub fn is_check(&self, color: Color) -> bool {
        self.board()
            .king(color)
            .is_some_and(|king| is_in_check(self.board(), king, color))
    }

    /// True if `color` is in check and no move gets it out.
    ///
    /// King steps are tried first since they are the cheapest escapes,
    /// then every destination of every other piece.
    pub fn is_checkmate(&self, color: Color) -> bool {
        let board = self.board();
        let Some(king) = board.king(color) else {
            return false;
        };
        if !is_in_check(board, king, color) {
            return false;
        }
        if KING_MOVES[king]
            .iter()
            .any(|to| self.playable_move(Move::new(king, to)).is_ok())
        {
            return false;
        }
        !board
            .iter_color(color)
            .filter(|(from, _)| *from != king)
            .any(|(from, _)| {
                Square::iter().any(|to| self.playable_move(Move::new(from, to)).is_ok())
            })
    }

    /// True if `color` is not in check but has no move at all.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_check(color) && !self.can_move(color)
    }

    #[inline]
    pub fn is_insufficient_material(&self) -> bool {
        is_insufficient_material(self.board())
    }
}
