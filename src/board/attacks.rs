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

use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use super::grid::{Board, DIAGONALS, HORIZONTALS};
use super::material::{Color, Pair, Piece};
use super::square::{Direction, Mask, Offset, Square};

use Piece::*;

/// True if the piece on `from` attacks `target`.
///
/// Attacks are geometric: the target square itself is never inspected, so
/// the answer is the same whether it is empty or occupied by either color.
/// Kings never attack; adjacency of kings is a separate rule.
pub fn attacks(board: &Board, from: Square, target: Square) -> bool {
    let Some(material) = board[from] else {
        return false;
    };
    match material.piece() {
        Pawn => PAWN_ATTACKS[material.color()][from].contains(target),
        Knight => KNIGHT_MOVES[from].contains(target),
        Bishop => attacks_diagonally(board, from, target),
        Rook => attacks_horizontally(board, from, target),
        Queen => {
            attacks_diagonally(board, from, target) || attacks_horizontally(board, from, target)
        }
        King => false,
    }
}

#[inline]
fn attacks_diagonally(board: &Board, from: Square, target: Square) -> bool {
    DIAGONALS[from].contains(target) && board.is_path_clear(from, target)
}

#[inline]
fn attacks_horizontally(board: &Board, from: Square, target: Square) -> bool {
    HORIZONTALS[from].contains(target) && board.is_path_clear(from, target)
}

/// True if any piece of the opponent of `color` attacks `square`.
///
/// `square` is usually where the king of `color` stands, but need not be:
/// castling asks the same question for the squares the king will cross.
pub fn is_in_check(board: &Board, square: Square, color: Color) -> bool {
    board
        .occupied_by(!color)
        .iter()
        .any(|from| attacks(board, from, square))
}

/// True if the king on `square` has the opposing king on a neighbouring
/// square.
pub fn kings_adjacent(board: &Board, square: Square) -> bool {
    match board[square] {
        Some(material) if material.piece().is_king() => {
            let theirs = board.occupied_by(!material.color()) & board.kings();
            !(KING_MOVES[square] & theirs).is_empty()
        }
        _ => false,
    }
}

pub(super) static KING_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = Mask::from_squares(Direction::iter().filter_map(|dir| square + dir));
    }
    array
});

pub(super) static KNIGHT_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    const OFFSETS: [Offset; 8] = [
        Offset::new(-2, -1),
        Offset::new(-2, 1),
        Offset::new(2, -1),
        Offset::new(2, 1),
        Offset::new(-1, -2),
        Offset::new(-1, 2),
        Offset::new(1, -2),
        Offset::new(1, 2),
    ];
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] =
            Mask::from_squares(OFFSETS.into_iter().filter_map(|offset| square + offset));
    }
    array
});

static PAWN_ATTACKS: Lazy<Pair<[Mask; 64]>> = Lazy::new(|| {
    let attacks = |color: Color| {
        let forward = color.forward();
        let offsets = [Offset::new(-1, forward), Offset::new(1, forward)];
        let mut array = [Mask::default(); 64];
        for square in Square::iter() {
            array[square] =
                Mask::from_squares(offsets.into_iter().filter_map(|offset| square + offset));
        }
        array
    };
    Pair::new(attacks(Color::White), attacks(Color::Black))
});
