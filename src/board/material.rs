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

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

/// A piece of a specific color.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
}

impl Material {
    pub const WK: Self = Self::white(King);
    pub const WQ: Self = Self::white(Queen);
    pub const WR: Self = Self::white(Rook);
    pub const WB: Self = Self::white(Bishop);
    pub const WN: Self = Self::white(Knight);
    pub const WP: Self = Self::white(Pawn);

    pub const BK: Self = Self::black(King);
    pub const BQ: Self = Self::black(Queen);
    pub const BR: Self = Self::black(Rook);
    pub const BB: Self = Self::black(Bishop);
    pub const BN: Self = Self::black(Knight);
    pub const BP: Self = Self::black(Pawn);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    #[inline]
    pub const fn white(piece: Piece) -> Self {
        Self::new(White, piece)
    }

    #[inline]
    pub const fn black(piece: Piece) -> Self {
        Self::new(Black, piece)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn set_piece(&mut self, piece: Piece) {
        self.piece = piece
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.piece.value()
    }
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }

    /// Row delta of a pawn advance: white moves toward row 0.
    #[inline]
    pub const fn forward(self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        self.opponent()
    }
}

/// Per-color storage, indexable by `Color`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self((white, black))
    }
}

impl<T> Pair<T> {
    pub fn white(&self) -> &T {
        &self.0 .0
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    /// Conventional material value. The king is not counted.
    pub const fn value(&self) -> u32 {
        match self {
            Pawn => 1,
            Knight | Bishop => 3,
            Rook => 5,
            Queen => 9,
            King => 0,
        }
    }
    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
    pub fn is_rook(&self) -> bool {
        matches!(*self, Rook)
    }
    pub fn is_pawn(&self) -> bool {
        matches!(*self, Pawn)
    }
}
