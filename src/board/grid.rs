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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::castling::Castle;
use super::material::{Color, Material, Pair, Piece};
use super::moves::LegalMove;
use super::square::{Direction, File, Mask, Rank, Square};

use Color::*;
use Piece::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squares([Option<Material>; 64]);

impl Squares {
    fn empty() -> Self {
        Self([None; 64])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

impl From<&Masks> for Squares {
    fn from(masks: &Masks) -> Self {
        let mut squares = Squares::empty();
        for color in Color::iter() {
            for piece in Piece::iter() {
                for square in (masks.pieces[color] & masks.by_piece(piece)).iter() {
                    squares[square] = Some(Material::new(color, piece));
                }
            }
        }
        squares
    }
}

/// Reasons a set of occupancy masks can't be turned into a board.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0} is occupied by both colors")]
    ColorOverlap(Square),
    #[error("{0} holds more than one kind of piece")]
    PieceOverlap(Square),
    #[error("{0} has a color without a piece kind or a piece kind without a color")]
    Unmatched(Square),
}

/// Occupancy of the grid, one mask per color and one per piece kind.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Masks {
    pieces: Pair<Mask>,
    kings: Mask,
    queens: Mask,
    rooks: Mask,
    bishops: Mask,
    knights: Mask,
    pawns: Mask,
}

impl From<&Squares> for Masks {
    fn from(value: &Squares) -> Self {
        let mut masks = Masks::empty();
        for square in Square::iter() {
            if let Some(material) = value[square] {
                masks.pieces[material.color()] |= square;
                *masks.by_piece_mut(material.piece()) |= square;
            }
        }
        masks
    }
}

impl Masks {
    fn empty() -> Self {
        Self {
            pieces: Pair::new(Mask::empty(), Mask::empty()),
            kings: Mask::empty(),
            queens: Mask::empty(),
            rooks: Mask::empty(),
            bishops: Mask::empty(),
            knights: Mask::empty(),
            pawns: Mask::empty(),
        }
    }

    /// Checks that every square is claimed by at most one color and that
    /// occupied squares carry exactly one piece kind.
    fn validate(&self) -> Result<(), BoardError> {
        let occupied = self.pieces[White] | self.pieces[Black];
        if let Some(square) = (self.pieces[White] & self.pieces[Black]).iter().next() {
            return Err(BoardError::ColorOverlap(square));
        }
        for square in Square::iter() {
            let kinds = Piece::iter()
                .filter(|&piece| self.by_piece(piece).contains(square))
                .count();
            match (occupied.contains(square), kinds) {
                (true, 1) | (false, 0) => {}
                (true, 0) | (false, _) => return Err(BoardError::Unmatched(square)),
                (true, _) => return Err(BoardError::PieceOverlap(square)),
            }
        }
        Ok(())
    }

    fn by_piece(&self, piece: Piece) -> Mask {
        match piece {
            King => self.kings,
            Queen => self.queens,
            Rook => self.rooks,
            Bishop => self.bishops,
            Knight => self.knights,
            Pawn => self.pawns,
        }
    }

    fn by_piece_mut(&mut self, piece: Piece) -> &mut Mask {
        match piece {
            King => &mut self.kings,
            Queen => &mut self.queens,
            Rook => &mut self.rooks,
            Bishop => &mut self.bishops,
            Knight => &mut self.knights,
            Pawn => &mut self.pawns,
        }
    }
}

/// The 8x8 grid of optional pieces.
///
/// A board is a plain value: every operation that changes the contents
/// returns a new board, which is what lets the rules simulate a move and
/// throw the result away. Serialized through its occupancy masks.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Masks", into = "Masks")]
pub struct Board {
    squares: Squares,
    masks: Masks,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Masks> for Board {
    type Error = BoardError;

    fn try_from(masks: Masks) -> Result<Self, Self::Error> {
        masks.validate()?;
        Ok(Self {
            squares: (&masks).into(),
            masks,
        })
    }
}

impl From<Board> for Masks {
    fn from(board: Board) -> Self {
        board.masks
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
            masks: Masks::empty(),
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = Self::empty();
        for color in Color::iter() {
            for (file, piece) in File::iter().zip(BACK_RANK) {
                board.place(Square::new(file, Rank::back_rank(color)), Material::new(color, piece));
                board.place(Square::new(file, Rank::pawn_rank(color)), Material::new(color, Pawn));
            }
        }
        board
    }

    /// Returns a copy with `square` set to `contents`. Intended for setting
    /// up positions; no rules are checked.
    pub fn with(mut self, square: Square, contents: Option<Material>) -> Self {
        self.remove(square);
        if let Some(material) = contents {
            self.place(square, material);
        }
        self
    }

    /// Moves whatever occupies `from` onto `to` and clears `from`. The
    /// move is unconditional: legality must already have been established.
    pub fn apply(&self, from: Square, to: Square) -> Board {
        let mut board = self.clone();
        board.relocate(from, to);
        board
    }

    /// Like `apply`, but also carries out the side effects implied by the
    /// kind of move: removing a pawn taken en passant, promoting to a queen,
    /// and bringing the rook across when castling.
    pub fn play(&self, mv: LegalMove) -> Board {
        let mut board = self.clone();
        match mv {
            LegalMove::Standard(from, to) | LegalMove::DoubleAdvance(from, to) => {
                board.relocate(from, to);
            }
            LegalMove::EnPassant(from, to) => {
                board.relocate(from, to);
                board.remove(LegalMove::en_passant_victim(from, to));
            }
            LegalMove::Promoting(from, to) => {
                if let Some(mut material) = board.remove(from) {
                    material.set_piece(Queen);
                    board.place(to, material);
                }
            }
            LegalMove::ShortCastle(color) => board.castle(color, Castle::Short),
            LegalMove::LongCastle(color) => board.castle(color, Castle::Long),
        }
        board
    }

    fn castle(&mut self, color: Color, side: Castle) {
        self.relocate(Castle::king_src(color), side.king_dest(color));
        self.relocate(side.rook_src(color), side.rook_dest(color));
    }

    fn relocate(&mut self, from: Square, to: Square) {
        match self.remove(from) {
            Some(material) => self.place(to, material),
            None => {
                self.remove(to);
            }
        }
    }

    fn place(&mut self, square: Square, material: Material) {
        self.remove(square);
        self.squares[square] = Some(material);
        self.masks.pieces[material.color()] |= square;
        *self.masks.by_piece_mut(material.piece()) |= square;
    }

    fn remove(&mut self, square: Square) -> Option<Material> {
        let material = self.squares[square].take()?;
        let mask = !square.to_mask();
        self.masks.pieces[material.color()] &= mask;
        *self.masks.by_piece_mut(material.piece()) &= mask;
        Some(material)
    }

    #[inline]
    pub fn is_vacant(&self, square: Square) -> bool {
        self.squares[square].is_none()
    }

    #[inline]
    pub fn occupied(&self) -> Mask {
        self.masks.pieces[White] | self.masks.pieces[Black]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Mask {
        self.masks.pieces[color]
    }

    #[inline]
    pub fn pieces(&self, piece: Piece) -> Mask {
        self.masks.by_piece(piece)
    }

    #[inline]
    pub fn kings(&self) -> Mask {
        self.masks.kings
    }

    /// Square of the king of `color`, if there is one on the board.
    #[inline]
    pub fn king(&self, color: Color) -> Option<Square> {
        (self.occupied_by(color) & self.kings()).iter().next()
    }

    /// True if every square strictly between `from` and `to` is empty.
    /// Squares that are not on a common line have nothing between them.
    #[inline]
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        (between(from, to) & self.occupied()).is_empty()
    }

    /// Iterates over the occupied squares of one color with their contents.
    pub fn iter_color(&self, color: Color) -> impl Iterator<Item = (Square, Material)> + '_ {
        self.occupied_by(color)
            .iter()
            .filter_map(move |square| self.squares[square].map(|material| (square, material)))
    }

    /// Mirrors the board top to bottom and swaps the colors of all pieces.
    pub fn flipped(&self) -> Board {
        let mut board = Board::empty();
        for square in self.occupied().iter() {
            if let Some(material) = self.squares[square] {
                let mirror = Square::new(square.file(), Rank::from_index(7 - square.row()));
                let swapped = Material::new(!material.color(), material.piece());
                board.place(mirror, swapped);
            }
        }
        board
    }
}

impl Index<Square> for Board {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Board> for Board {
    fn as_ref(&self) -> &Board {
        self
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            for file in File::iter() {
                let c = match self.squares[Square::new(file, rank)] {
                    None => '.',
                    Some(material) => {
                        let c = match material.piece() {
                            King => 'k',
                            Queen => 'q',
                            Rook => 'r',
                            Bishop => 'b',
                            Knight => 'n',
                            Pawn => 'p',
                        };
                        match material.color() {
                            White => c.to_ascii_uppercase(),
                            Black => c,
                        }
                    }
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[inline]
pub(super) fn between(from: Square, to: Square) -> Mask {
    let index = from.to_index() * 64 + to.to_index();
    SQUARES_BETWEEN[index]
}

static SQUARES_BETWEEN: Lazy<Vec<Mask>> = Lazy::new(|| {
    // Mask of squares strictly between `start` and `end` if they share a
    // line, empty otherwise.
    fn squares_between(start: Square, end: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(step) = (end - start).to_unit() {
            let mut next = start + step;
            while let Some(square) = next {
                if square == end {
                    break;
                }
                mask |= square;
                next = square + step;
            }
        }
        mask
    }

    let mut table = vec![Mask::empty(); 64 * 64];
    for start in Square::iter() {
        for end in Square::iter() {
            if start != end && ALL_LINES[start].contains(end) {
                table[start.to_index() * 64 + end.to_index()] = squares_between(start, end);
            }
        }
    }
    table
});

pub(super) static HORIZONTALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = (square.file().to_mask() | square.rank().to_mask()) - square.to_mask();
    }
    array
});

pub(super) static DIAGONALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        let mut mask = Mask::empty();
        Direction::diagonals().for_each(|dir| {
            let mut next = square + dir;
            while let Some(sq) = next {
                mask |= sq;
                next = sq + dir;
            }
        });
        array[square] = mask;
    }
    array
});

static ALL_LINES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = HORIZONTALS[square] | DIAGONALS[square];
    }
    array
});
