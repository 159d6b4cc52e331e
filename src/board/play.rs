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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::{info, trace};

use super::castling::CastlingRights;
use super::grid::Board;
use super::material::{Color, Material, Pair};
use super::moves::{LastMove, LegalMove, Move, MoveError, Rules};
use super::square::{Mask, Square};
use super::Turn;
use crate::game::{DrawReason, GameResult};

use Color::*;

/// Half-move counter. Even values are white's moves, odd values black's.
/// Counting stops at `u16::MAX`; `next` reports when the limit is hit.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveId(u16);

impl MoveId {
    pub const START: MoveId = MoveId(0);

    /// Id of the first move of a game where `turn` moves first.
    #[inline]
    pub const fn first(turn: Color) -> Self {
        Self(turn.to_index() as u16)
    }
    #[inline]
    pub fn turn(&self) -> Color {
        const TURNS: [Color; 2] = [White, Black];
        let index = self.value() % 2;
        TURNS[index]
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0 as usize
    }
    #[inline]
    pub fn move_count(&self) -> usize {
        self.value() / 2
    }
    #[inline]
    pub fn move_number(&self) -> usize {
        1 + self.move_count()
    }
    #[inline]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Default for MoveId {
    #[inline]
    fn default() -> Self {
        MoveId::START
    }
}

/// Everything a game session knows: the board, the side to move, captures,
/// the check and draw flags, plus what's needed to judge en passant and
/// castling on the next move.
///
/// The status flags always describe the side to move. They are refreshed
/// after every committed move and by each builder method.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    next_move_id: MoveId,
    captured: Pair<Vec<Material>>,
    check: Option<Color>,
    checkmate: Option<Color>,
    draw: Option<DrawReason>,
    last_move: Option<LastMove>,
    castling: Pair<CastlingRights>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::from_board(Board::standard(), White)
    }

    /// A game starting from an arbitrary setup with `turn` to move. Castling
    /// rights start out intact and there is no last move.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut state = Self {
            board,
            next_move_id: MoveId::first(turn),
            captured: Pair::default(),
            check: None,
            checkmate: None,
            draw: None,
            last_move: None,
            castling: Pair::default(),
        };
        state.update_status();
        state
    }

    pub fn with_castling_rights(mut self, castling: Pair<CastlingRights>) -> Self {
        self.castling = castling;
        self.update_status();
        self
    }

    pub fn with_last_move(mut self, last_move: Option<LastMove>) -> Self {
        self.last_move = last_move;
        self.update_status();
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn move_id(&self) -> MoveId {
        self.next_move_id
    }
    /// Pieces captured by `color`.
    #[inline]
    pub fn captured(&self, color: Color) -> &[Material] {
        &self.captured[color]
    }
    /// The side to move, if its king is attacked.
    #[inline]
    pub fn check(&self) -> Option<Color> {
        self.check
    }
    /// The side that has been checkmated.
    #[inline]
    pub fn checkmate(&self) -> Option<Color> {
        self.checkmate
    }
    #[inline]
    pub fn draw(&self) -> Option<DrawReason> {
        self.draw
    }
    #[inline]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }
    #[inline]
    pub fn castling_rights(&self) -> &Pair<CastlingRights> {
        &self.castling
    }
    #[inline]
    pub fn is_over(&self) -> bool {
        self.checkmate.is_some() || self.draw.is_some()
    }

    pub fn result(&self) -> Option<GameResult> {
        if let Some(mated) = self.checkmate {
            return Some(GameResult::Win(!mated));
        }
        self.draw.map(GameResult::Draw)
    }

    /// Sum of the values of the pieces `color` has captured.
    pub fn score(&self, color: Color) -> u32 {
        self.captured[color].iter().map(Material::value).sum()
    }

    /// White's score minus black's.
    pub fn score_difference(&self) -> i32 {
        self.score(White) as i32 - self.score(Black) as i32
    }

    #[inline]
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.board, self.last_move.as_ref(), &self.castling)
    }

    /// Destinations for the piece on `from`. Empty unless it belongs to the
    /// side to move and the game is still in progress.
    pub fn move_destinations(&self, from: Square) -> Mask {
        match self.board[from] {
            Some(material) if material.color() == self.turn() && !self.is_over() => {
                self.rules().move_destinations(from)
            }
            _ => Mask::default(),
        }
    }

    /// Validates `mv` for the side to move and, if it is playable, commits
    /// it. Returns the id of the committed move. On error nothing changes.
    pub fn submit_move(&mut self, mv: Move) -> Result<MoveId> {
        let (legal, board, next_move_id) = self.validate_move(mv)?;
        let turn = self.turn();
        let material = self.board[mv.from].ok_or(MoveError::NoPiece)?;

        // captures are read off the board as it was before the move
        if let Some(taken) = self.board[mv.to] {
            self.captured[turn].push(taken);
        }
        if let LegalMove::EnPassant(from, to) = legal {
            if let Some(taken) = self.board[LegalMove::en_passant_victim(from, to)] {
                self.captured[turn].push(taken);
            }
        }

        self.board = board;
        self.last_move = Some(LastMove::new(mv.from, mv.to, material));
        self.castling[turn].update(material.piece(), mv.from);
        let move_id = self.next_move_id;
        self.next_move_id = next_move_id;
        trace!(
            move_number = move_id.move_number(),
            %turn,
            %mv,
            ?legal,
            "committed move"
        );

        self.update_status();
        Ok(move_id)
    }

    fn validate_move(&self, mv: Move) -> Result<(LegalMove, Board, MoveId), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let material = self.board[mv.from].ok_or(MoveError::NoPiece)?;
        if material.color() != self.turn() {
            return Err(MoveError::WrongTurn);
        }
        let next_move_id = self.next_move_id.next().ok_or(MoveError::MoveLimit)?;
        let (legal, board) = self.rules().playable_move(mv)?;
        Ok((legal, board, next_move_id))
    }

    fn update_status(&mut self) {
        let turn = self.turn();
        let (check, checkmate, draw) = {
            let rules = self.rules();
            if rules.is_check(turn) {
                let checkmate = rules.is_checkmate(turn).then_some(turn);
                (Some(turn), checkmate, None)
            } else if rules.is_insufficient_material() {
                (None, None, Some(DrawReason::Insufficient))
            } else if rules.is_stalemate(turn) {
                (None, None, Some(DrawReason::StaleMate))
            } else {
                (None, None, None)
            }
        };
        if let Some(mated) = checkmate {
            info!(%mated, "checkmate");
        } else if let Some(side) = check {
            info!(%side, "check");
        } else if let Some(reason) = draw {
            info!(?reason, "draw");
        }
        self.check = check;
        self.checkmate = checkmate;
        self.draw = draw;
    }
}

impl Turn for GameState {
    #[inline]
    fn turn(&self) -> Color {
        self.next_move_id.turn()
    }
}

impl Index<Square> for GameState {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index]
    }
}

impl AsRef<Board> for GameState {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}
