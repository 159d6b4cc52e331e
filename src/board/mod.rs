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

//! Chess rules for a two-player game on a single board
//!
//! A _game_ holds the state of one chess session and accepts move
//! requests from whichever side is to move, applying them only if
//! they're legal. The following features are supported:
//!
//! [x] Standard piece movement, including captures
//! [x] Double pawn advance and en passant
//! [x] Promotion (always to a queen)
//! [x] Castling on both sides, with has-moved tracking
//! [x] Reject moves that leave the mover's king in check
//! [x] Detect check, checkmate and stalemate
//! [x] Recognize insufficient material (bare kings only)
//! [x] Captured pieces and material score per side
//! [ ] Under-promotion
//! [ ] Three-fold repetition and fifty-move rules
//! [ ] Chess960 and other variants
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square on an
//!   8-by-8 board. Rows run from 0 (black's back rank) to 7 (white's
//!   back rank) and map onto `Rank` (`Rank8` .. `Rank1`); columns run
//!   from 0 to 7 and map onto `File` (`FileA` .. `FileH`). Each square
//!   is named using the letter of the file followed by the number of
//!   the rank (e.g. `A8` .. `H1`).
//!
//! * A `Mask` is a 64-bit (u64) value in which each bit maps to a
//!   square on the board. Masks are used for occupancy and for the
//!   precomputed line and attack tables, and can be combined with the
//!   bitwise `|`, `&`, `-` and `!` operators.
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants: `King`, `Queen`, `Rook`, `Bishop`, `Knight` and `Pawn`.
//!   `Color` is either `White` or `Black`.
//!
//! * A `Board` is the grid of optional pieces. It's a plain value:
//!   `apply` and `play` return a new board rather than modifying the
//!   existing one, which is how moves are simulated before being
//!   committed.
//!
//! * `attacks` and `is_in_check` answer whether a square is attacked.
//!   They look only at the board, so they work for any square, not
//!   just the one a king stands on.
//!
//! * `Rules` borrows a board together with the last move and the
//!   castling rights, and decides whether a `Move` is legal. Legal
//!   moves come back classified as a `LegalMove`; rejected ones as a
//!   `MoveError`. `Rules` also detects checkmate, stalemate and
//!   insufficient material.
//!
//! * `GameState` is the complete state of a session, including whose
//!   turn it is, captures and the check / checkmate / draw status. It
//!   serializes with serde so a host can snapshot it.
//!
//! * `Game` wraps a `GameState` with an id. `request_move` is the
//!   fire-and-forget entry point: rejected requests are logged and
//!   ignored. `submit_move` performs the same transition but reports
//!   why a move was rejected.
//!

use anyhow::Result;
use tracing::debug;

mod attacks;
mod castling;
mod grid;
mod material;
mod moves;
mod play;
mod square;
mod terminal;

pub use attacks::*;
pub use castling::*;
pub use grid::*;
pub use material::*;
pub use moves::*;
pub use play::*;
pub use square::*;
pub use terminal::*;

use crate::game::{DrawReason, GameId, GameResult};

pub trait Turn {
    fn turn(&self) -> Color;
}

/// A single game session.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    state: GameState,
}

impl Game {
    pub fn new(id: GameId) -> Self {
        Self::from_state(id, GameState::new())
    }
    pub fn standard() -> Self {
        Self::new(GameId::default())
    }
    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self::new(GameId::random())
    }
    pub fn from_state(id: GameId, state: GameState) -> Self {
        Self { id, state }
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }
    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Plays the move from `(from_row, from_col)` to `(to_row, to_col)` if
    /// it's legal for the side to move. Anything else leaves the game as it
    /// was; the reason is only logged.
    pub fn request_move(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) {
        let result = Move::from_coords(from_row, from_col, to_row, to_col)
            .map_err(anyhow::Error::from)
            .and_then(|mv| self.submit_move(mv));
        if let Err(err) = result {
            debug!(
                game = %self.id,
                from_row,
                from_col,
                to_row,
                to_col,
                reason = %err,
                "rejected move request"
            );
        }
    }

    pub fn submit_move(&mut self, mv: Move) -> Result<MoveId> {
        self.state.submit_move(mv)
    }

    /// Starts over from the standard position, keeping the id.
    pub fn reset(&mut self) {
        self.state = GameState::new();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.state.board()
    }
    #[inline]
    pub fn captured(&self, color: Color) -> &[Material] {
        self.state.captured(color)
    }
    #[inline]
    pub fn check(&self) -> Option<Color> {
        self.state.check()
    }
    #[inline]
    pub fn checkmate(&self) -> Option<Color> {
        self.state.checkmate()
    }
    #[inline]
    pub fn draw(&self) -> Option<DrawReason> {
        self.state.draw()
    }
    #[inline]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.state.last_move()
    }
    #[inline]
    pub fn castling_rights(&self) -> &Pair<CastlingRights> {
        self.state.castling_rights()
    }
    pub fn score(&self, color: Color) -> u32 {
        self.state.score(color)
    }
    pub fn score_difference(&self) -> i32 {
        self.state.score_difference()
    }
    pub fn result(&self) -> Option<GameResult> {
        self.state.result()
    }
    pub fn move_destinations(&self, from: Square) -> Mask {
        self.state.move_destinations(from)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::standard()
    }
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Color {
        self.state.turn()
    }
}

impl AsRef<Board> for Game {
    fn as_ref(&self) -> &Board {
        self.state.board()
    }
}

impl AsRef<GameState> for Game {
    fn as_ref(&self) -> &GameState {
        &self.state
    }
}
