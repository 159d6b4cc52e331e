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

use proptest::prelude::*;
use riff_rules::*;

/// A step in a random game: either pick one of the playable moves (by
/// index, modulo how many there are) or fire an arbitrary request.
#[derive(Debug, Clone)]
enum Step {
    Playable(usize),
    Request(usize, usize, usize, usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => any::<usize>().prop_map(Step::Playable),
        1 => (0..8usize, 0..8usize, 0..8usize, 0..8usize)
            .prop_map(|(a, b, c, d)| Step::Request(a, b, c, d)),
    ]
}

fn mirror(square: Square) -> Square {
    Square::new(square.file(), Rank::from_index(7 - square.row()))
}

fn king_attacked(board: &Board, color: Color) -> bool {
    board
        .king(color)
        .is_some_and(|king| is_in_check(board, king, color))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_games_keep_invariants(steps in prop::collection::vec(step(), 1..80)) {
        let mut game = Game::standard();
        for step in steps {
            if game.result().is_some() {
                break;
            }
            let mover = game.turn();
            let before = game.state().clone();
            let mv = match step {
                Step::Playable(index) => {
                    let moves: Vec<Move> = before.rules().all_moves(mover).collect();
                    prop_assert!(!moves.is_empty());
                    moves[index % moves.len()]
                }
                Step::Request(fr, fc, tr, tc) => match Move::from_coords(fr, fc, tr, tc) {
                    Ok(mv) => mv,
                    Err(_) => continue,
                },
            };

            let legal = before.rules().playable_move(mv).is_ok()
                && before.board()[mv.from].is_some_and(|m| m.color() == mover);
            let accepted = game.submit_move(mv).is_ok();
            prop_assert_eq!(accepted, legal);

            if accepted {
                prop_assert!(before.rules().is_legal_move(mv));
                prop_assert!(!king_attacked(game.board(), mover));
                prop_assert_eq!(game.turn(), !mover);
                prop_assert_eq!(game.last_move().map(|m| (m.from, m.to)), Some((mv.from, mv.to)));
            } else {
                prop_assert_eq!(game.state(), &before);
            }

            let turn = game.turn();
            prop_assert_eq!(game.check().is_some(), king_attacked(game.board(), turn));
            if let Some(mated) = game.checkmate() {
                prop_assert_eq!(mated, turn);
                prop_assert_eq!(game.state().rules().count_moves(turn), 0);
            }
            prop_assert!(game.checkmate().is_none() || game.draw().is_none());
        }
    }

    #[test]
    fn check_is_symmetric_under_flip(steps in prop::collection::vec(any::<usize>(), 0..40)) {
        let mut game = Game::standard();
        for index in steps {
            if game.result().is_some() {
                break;
            }
            let moves: Vec<Move> = game.state().rules().all_moves(game.turn()).collect();
            let mv = moves[index % moves.len()];
            prop_assert!(game.submit_move(mv).is_ok());
        }
        let board = game.board();
        let flipped = board.flipped();
        for color in [Color::White, Color::Black] {
            if let Some(king) = board.king(color) {
                prop_assert_eq!(
                    is_in_check(board, king, color),
                    is_in_check(&flipped, mirror(king), !color)
                );
            }
        }
    }
}
