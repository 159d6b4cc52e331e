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
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::grid::between;
use super::material::{Color, Pair, Piece};
use super::square::{File, Mask, Rank, Square};

use File::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Castle {
    /// King side (O-O).
    Short,
    /// Queen side (O-O-O).
    Long,
}

impl Castle {
    #[inline]
    pub fn king_src(color: Color) -> Square {
        Square::new(FileE, Rank::back_rank(color))
    }
    #[inline]
    pub fn rook_src(&self, color: Color) -> Square {
        let file = match self {
            Castle::Short => FileH,
            Castle::Long => FileA,
        };
        Square::new(file, Rank::back_rank(color))
    }
    #[inline]
    pub fn king_dest(&self, color: Color) -> Square {
        let file = match self {
            Castle::Short => FileG,
            Castle::Long => FileC,
        };
        Square::new(file, Rank::back_rank(color))
    }
    #[inline]
    pub fn rook_dest(&self, color: Color) -> Square {
        let file = match self {
            Castle::Short => FileF,
            Castle::Long => FileD,
        };
        Square::new(file, Rank::back_rank(color))
    }
    /// Squares between king and rook, all of which must be empty.
    pub fn blocking_lane(&self, color: Color) -> Mask {
        between(Self::king_src(color), self.rook_src(color))
    }
    /// Squares the king stands on, crosses and lands on. None of them may
    /// be attacked.
    pub fn king_path(&self, color: Color) -> [Square; 3] {
        let src = Self::king_src(color);
        let dest = self.king_dest(color);
        let pass = self.rook_dest(color);
        [src, pass, dest]
    }
    /// The side being castled, if `to` is a castling destination for a king
    /// of `color` standing on `from`.
    pub fn from_king_move(color: Color, from: Square, to: Square) -> Option<Castle> {
        if from != Self::king_src(color) {
            return None;
        }
        Castle::iter().find(|side| side.king_dest(color) == to)
    }
}

/// Has-moved flags for one side. Flags only ever go from `false` to `true`.
///
/// A rook flag is set when that rook leaves its original square. Capturing
/// the rook does not set it; the emptiness and presence checks at castling
/// time cover that case.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    color: Color,
    king_moved: bool,
    oo_rook_moved: bool,
    ooo_rook_moved: bool,
}

impl CastlingRights {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            king_moved: false,
            oo_rook_moved: false,
            ooo_rook_moved: false,
        }
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
    #[inline]
    pub fn king_moved(&self) -> bool {
        self.king_moved
    }
    #[inline]
    pub fn oo_rook_moved(&self) -> bool {
        self.oo_rook_moved
    }
    #[inline]
    pub fn ooo_rook_moved(&self) -> bool {
        self.ooo_rook_moved
    }
    #[inline]
    pub fn rook_moved(&self, side: Castle) -> bool {
        match side {
            Castle::Short => self.oo_rook_moved,
            Castle::Long => self.ooo_rook_moved,
        }
    }
    /// True if neither the king nor the rook for `side` has moved.
    #[inline]
    pub fn allows(&self, side: Castle) -> bool {
        !self.king_moved && !self.rook_moved(side)
    }
    pub fn set_king_moved(&mut self) {
        self.king_moved = true;
    }
    pub fn set_rook_moved(&mut self, side: Castle) {
        match side {
            Castle::Short => self.oo_rook_moved = true,
            Castle::Long => self.ooo_rook_moved = true,
        }
    }
    /// Records that `piece` of this side left `from`.
    pub fn update(&mut self, piece: Piece, from: Square) {
        if piece.is_king() {
            self.set_king_moved();
        } else if piece.is_rook() {
            for side in Castle::iter() {
                if from == side.rook_src(self.color) {
                    self.set_rook_moved(side);
                }
            }
        }
    }
}

impl Default for Pair<CastlingRights> {
    fn default() -> Self {
        Pair::new(
            CastlingRights::new(Color::White),
            CastlingRights::new(Color::Black),
        )
    }
}
