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

use riff_rules::*;
use tracing_subscriber::EnvFilter;
use Square::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn play(game: &mut Game, moves: &[(Square, Square)]) {
    for &(from, to) in moves {
        if let Err(err) = game.submit_move(Move::new(from, to)) {
            panic!("{from}-{to} rejected: {err}");
        }
    }
}

fn rejection(game: &mut Game, from: Square, to: Square) -> MoveError {
    game.submit_move(Move::new(from, to))
        .unwrap_err()
        .downcast::<MoveError>()
        .unwrap()
}

#[test]
fn fools_mate() {
    init_tracing();
    let mut game = Game::standard();
    // f2-f3, e7-e5, g2-g4, Qd8-h4 by row and column
    game.request_move(6, 5, 5, 5);
    game.request_move(1, 4, 3, 4);
    game.request_move(6, 6, 4, 6);
    game.request_move(0, 3, 4, 7);
    assert_eq!(game.board()[H4], Some(Material::BQ));
    assert_eq!(game.check(), Some(Color::White));
    assert_eq!(game.checkmate(), Some(Color::White));
    assert_eq!(game.draw(), None);
    assert_eq!(game.result(), Some(GameResult::Win(Color::Black)));

    let before = game.state().clone();
    game.request_move(6, 7, 5, 7);
    assert_eq!(game.state(), &before);
    assert_eq!(rejection(&mut game, H2, H3), MoveError::GameOver);
}

#[test]
fn scholars_mate() {
    init_tracing();
    let mut game = Game::standard();
    play(
        &mut game,
        &[(E2, E4), (E7, E5), (F1, C4), (B8, C6), (D1, H5), (G8, F6)],
    );
    assert_eq!(game.checkmate(), None);
    play(&mut game, &[(H5, F7)]);
    assert_eq!(game.checkmate(), Some(Color::Black));
    assert_eq!(game.captured(Color::White), &[Material::BP]);
    assert_eq!(game.score(Color::White), 1);
    assert_eq!(game.score_difference(), 1);
    assert_eq!(game.result(), Some(GameResult::Win(Color::White)));
}

#[test]
fn check_that_can_be_answered() {
    let mut game = Game::standard();
    play(&mut game, &[(E2, E4), (F7, F6), (D1, H5)]);
    assert_eq!(game.check(), Some(Color::Black));
    assert_eq!(game.checkmate(), None);
    // only g7-g6 blocks; everything else leaves the king in check
    assert_eq!(rejection(&mut game, A7, A6), MoveError::SelfCheck);
    assert_eq!(rejection(&mut game, E8, F7), MoveError::SelfCheck);
    play(&mut game, &[(G7, G6)]);
    assert_eq!(game.check(), None);
}

#[test]
fn en_passant_capture() {
    init_tracing();
    let mut game = Game::standard();
    play(&mut game, &[(E2, E4), (A7, A6), (E4, E5), (D7, D5)]);
    assert!(game.move_destinations(E5).contains(D6));
    play(&mut game, &[(E5, D6)]);
    assert_eq!(game.board()[D6], Some(Material::WP));
    assert_eq!(game.board()[D5], None);
    assert_eq!(game.board()[E5], None);
    assert_eq!(game.captured(Color::White), &[Material::BP]);
    assert_eq!(game.score_difference(), 1);
}

#[test]
fn en_passant_only_immediately() {
    let mut game = Game::standard();
    play(
        &mut game,
        &[(E2, E4), (A7, A6), (E4, E5), (D7, D5), (H2, H3), (H7, H6)],
    );
    assert!(!game.move_destinations(E5).contains(D6));
    assert_eq!(rejection(&mut game, E5, D6), MoveError::InvalidMove);
}

#[test]
fn black_en_passant() {
    let mut game = Game::standard();
    play(&mut game, &[(A2, A3), (D7, D5), (H2, H3), (D5, D4), (E2, E4), (D4, E3)]);
    assert_eq!(game.board()[E3], Some(Material::BP));
    assert_eq!(game.board()[E4], None);
    assert_eq!(game.captured(Color::Black), &[Material::WP]);
    assert_eq!(game.score_difference(), -1);
}

#[test]
fn castling_both_sides() {
    init_tracing();
    let mut game = Game::standard();
    play(
        &mut game,
        &[(E2, E4), (E7, E5), (G1, F3), (B8, C6), (F1, C4), (G8, F6)],
    );
    assert!(game.move_destinations(E1).contains(G1));
    // e1-g1 by row and column
    game.request_move(7, 4, 7, 6);
    assert_eq!(game.board()[G1], Some(Material::WK));
    assert_eq!(game.board()[F1], Some(Material::WR));
    assert_eq!(game.board()[E1], None);
    assert_eq!(game.board()[H1], None);
    assert!(game.castling_rights()[Color::White].king_moved());

    play(&mut game, &[(F8, C5), (D2, D3), (E8, G8)]);
    assert_eq!(game.board()[G8], Some(Material::BK));
    assert_eq!(game.board()[F8], Some(Material::BR));
    assert!(game.castling_rights()[Color::Black].king_moved());
}

#[test]
fn long_castle() {
    let mut game = Game::standard();
    play(
        &mut game,
        &[
            (D2, D4),
            (D7, D5),
            (B1, C3),
            (B8, C6),
            (C1, F4),
            (C8, F5),
            (D1, D2),
            (D8, D7),
            (E1, C1),
            (E8, C8),
        ],
    );
    assert_eq!(game.board()[C1], Some(Material::WK));
    assert_eq!(game.board()[D1], Some(Material::WR));
    assert_eq!(game.board()[A1], None);
    assert_eq!(game.board()[C8], Some(Material::BK));
    assert_eq!(game.board()[D8], Some(Material::BR));
    assert_eq!(game.board()[A8], None);
}

#[test]
fn castling_rejected_after_rook_moved() {
    let mut game = Game::standard();
    play(
        &mut game,
        &[
            (E2, E4),
            (E7, E5),
            (G1, F3),
            (B8, C6),
            (F1, C4),
            (G8, F6),
            (H1, G1),
            (A7, A6),
            (G1, H1),
            (A6, A5),
        ],
    );
    assert_eq!(game.board()[H1], Some(Material::WR));
    assert_eq!(rejection(&mut game, E1, G1), MoveError::InvalidMove);
    assert!(!game.move_destinations(E1).contains(G1));
}

#[test]
fn castling_rejected_after_rook_captured_at_home() {
    let board = Board::empty()
        .with(E1, Some(Material::WK))
        .with(F1, Some(Material::WB))
        .with(H1, Some(Material::WR))
        .with(A2, Some(Material::WP))
        .with(H8, Some(Material::BR))
        .with(A8, Some(Material::BK));
    let mut game = Game::from_state(GameId::new(4), GameState::from_board(board, Color::Black));
    play(&mut game, &[(H8, H1), (A2, A3), (H1, H5), (F1, E2), (H5, H6)]);
    assert_eq!(game.captured(Color::Black), &[Material::WR]);
    assert_eq!(game.board()[H1], None);
    assert_eq!(game.check(), None);

    // the capture leaves the flag untouched; the empty corner is what stops it
    let rights = game.castling_rights()[Color::White];
    assert!(!rights.oo_rook_moved());
    assert!(!rights.king_moved());
    assert!(rights.allows(Castle::Short));
    assert_eq!(rejection(&mut game, E1, G1), MoveError::InvalidMove);
}

#[test]
fn castling_rejected_in_check() {
    let board = Board::empty()
        .with(E1, Some(Material::WK))
        .with(H1, Some(Material::WR))
        .with(E8, Some(Material::BR))
        .with(A8, Some(Material::BK));
    let mut game = Game::from_state(GameId::new(1), GameState::from_board(board, Color::White));
    assert_eq!(game.check(), Some(Color::White));
    assert_eq!(rejection(&mut game, E1, G1), MoveError::InvalidMove);
}

#[test]
fn castling_rejected_through_check() {
    let board = Board::empty()
        .with(E1, Some(Material::WK))
        .with(H1, Some(Material::WR))
        .with(F8, Some(Material::BR))
        .with(A8, Some(Material::BK));
    let mut game = Game::from_state(GameId::new(1), GameState::from_board(board, Color::White));
    assert_eq!(game.check(), None);
    assert_eq!(rejection(&mut game, E1, G1), MoveError::InvalidMove);
}

#[test]
fn promotion_with_capture_gives_check() {
    let board = Board::empty()
        .with(E1, Some(Material::WK))
        .with(A1, Some(Material::WR))
        .with(B2, Some(Material::BP))
        .with(H8, Some(Material::BK));
    let state = GameState::from_board(board, Color::Black);
    let mut game = Game::from_state(GameId::new(2), state);
    play(&mut game, &[(B2, A1)]);
    assert_eq!(game.board()[A1], Some(Material::BQ));
    assert_eq!(game.captured(Color::Black), &[Material::WR]);
    assert_eq!(game.check(), Some(Color::White));
    assert_eq!(game.checkmate(), None);
}

#[test]
fn bare_kings_are_insufficient() {
    let board = Board::empty()
        .with(E1, Some(Material::WK))
        .with(E8, Some(Material::BK));
    let game = Game::from_state(GameId::new(3), GameState::from_board(board, Color::White));
    assert_eq!(game.draw(), Some(DrawReason::Insufficient));
    assert_eq!(game.checkmate(), None);
    assert_eq!(game.check(), None);
    assert_eq!(game.result(), Some(GameResult::Draw(DrawReason::Insufficient)));
}

#[test]
fn opening_has_twenty_moves_each() {
    let mut game = Game::standard();
    assert_eq!(game.state().rules().count_moves(Color::White), 20);
    assert_eq!(game.draw(), None);
    assert_eq!(game.checkmate(), None);
    play(&mut game, &[(E2, E4)]);
    assert_eq!(game.state().rules().count_moves(Color::Black), 20);
}

#[test]
fn reset_starts_over() {
    let mut game = Game::new(GameId::new(9));
    play(&mut game, &[(E2, E4), (D7, D5), (E4, D5)]);
    game.reset();
    assert_eq!(game.board(), &Board::standard());
    assert_eq!(game.turn(), Color::White);
    assert!(game.captured(Color::White).is_empty());
    assert_eq!(game.id(), GameId::new(9));
}

#[test]
fn snapshot_round_trip() {
    let mut game = Game::standard();
    play(&mut game, &[(E2, E4), (A7, A6), (E4, E5), (D7, D5)]);
    let json = serde_json::to_string(game.state()).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, game.state());

    // the pending en passant survives the trip
    let mut restored = Game::from_state(game.id(), restored);
    play(&mut restored, &[(E5, D6)]);
    play(&mut game, &[(E5, D6)]);
    assert_eq!(restored.state(), game.state());
}

#[test]
fn snapshot_format() {
    let json = serde_json::to_value(Square::E4).unwrap();
    assert_eq!(json, serde_json::json!("E4"));
    let json = serde_json::to_value(GameResult::Win(Color::White)).unwrap();
    assert_eq!(json, serde_json::json!({ "Win": "White" }));
}
