/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! The computer's move search.

use std::time::Instant;

use alpha_beta_search::{Evaluator, Position, Score, SearchResult, Side};
use connect_four_logic::{detect, Board, Player};
use tracing::debug;

use crate::evaluator::EvaluatorKind;

/// A board seen by the search. The computer is always the maximizing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectFourPosition {
    pub board: Board,
    pub computer: Player,
}

impl ConnectFourPosition {
    pub fn new(board: Board, computer: Player) -> Self {
        Self { board, computer }
    }

    fn player_for(&self, side: Side) -> Player {
        match side {
            Side::Max => self.computer,
            Side::Min => self.computer.other(),
        }
    }
}

impl Position for ConnectFourPosition {
    type Action = usize;

    fn actions(&self) -> Vec<usize> {
        self.board.legal_moves()
    }

    fn apply(&mut self, col: usize, side: Side) {
        let player = self.player_for(side);
        self.board
            .place(col, player)
            .expect("search only plays legal columns");
    }

    fn undo(&mut self, col: usize) {
        self.board
            .retract(col)
            .expect("search only retracts columns it played");
    }

    fn is_terminal(&self) -> bool {
        detect(&self.board).is_some()
    }
}

impl Evaluator<ConnectFourPosition> for EvaluatorKind {
    fn evaluate(&self, position: &ConnectFourPosition) -> Score {
        self.score(&position.board, position.computer)
    }
}

/// Minimax value of `board` for `computer`, looking `depth` plies ahead. `maximizing` says
/// whether the computer is the one to move.
pub fn search(
    board: &Board,
    computer: Player,
    evaluator: EvaluatorKind,
    depth: u32,
    maximizing: bool,
) -> Score {
    let mut position = ConnectFourPosition::new(*board, computer);
    let side = if maximizing { Side::Max } else { Side::Min };
    alpha_beta_search::search(&mut position, &evaluator, depth, side)
}

/// Pick the computer's column. Returns `None` if the game is already over.
///
/// The search runs on a copy of `board`, so the caller's board is never touched.
pub fn choose_move(
    board: &Board,
    computer: Player,
    evaluator: EvaluatorKind,
    depth: u32,
) -> Option<SearchResult<usize>> {
    let mut position = ConnectFourPosition::new(*board, computer);
    let start = Instant::now();
    let result = alpha_beta_search::best_action(&mut position, &evaluator, depth)?;
    debug!(
        column = result.action,
        score = result.score,
        nodes = result.stats.nodes,
        cutoffs = result.stats.cutoffs,
        depth,
        elapsed = ?start.elapsed(),
        "chose move"
    );
    Some(result)
}

#[cfg(test)]
mod tests {
    use alpha_beta_search::SearchStats;
    use connect_four_logic::COLS;
    use proptest::prelude::*;

    use super::*;
    use crate::evaluator::WIN_SCORE;

    const KINDS: [EvaluatorKind; 2] = [EvaluatorKind::Positional, EvaluatorKind::Window];

    // plays columns alternately from Player 1, skipping full columns and any move that would end
    // the game, so the result is always a live position.
    fn live_position(columns: &[usize]) -> Board {
        let mut board = Board::new();
        let mut player = Player::Player1;
        for &col in columns {
            if board.place(col, player).is_err() {
                continue;
            }
            if detect(&board).is_some() {
                board.retract(col).expect("retract failed");
                continue;
            }
            player = player.other();
        }
        board
    }

    fn to_move(board: &Board) -> Player {
        if board.piece_count() % 2 == 0 {
            Player::Player1
        } else {
            Player::Player2
        }
    }

    #[test]
    fn test_depth_one_takes_immediate_win() {
        // player2 has columns 0 to 2 of the bottom row and it is player2's turn.
        let mut board = Board::new();
        for (col, player) in [
            (4, Player::Player1),
            (0, Player::Player2),
            (4, Player::Player1),
            (1, Player::Player2),
            (6, Player::Player1),
            (2, Player::Player2),
            (6, Player::Player1),
        ] {
            board.place(col, player).expect("place failed");
        }
        assert_eq!(detect(&board), None);

        for kind in KINDS {
            let result = choose_move(&board, Player::Player2, kind, 1).expect("expected a move");
            assert_eq!(result.action, 3, "evaluator: {:?}", kind);
            assert_eq!(result.score, WIN_SCORE);
        }
    }

    // player1 has three tokens on the bottom row in columns 0 to 2. it is player2's turn. check
    // that the search blocks on column 3, or else player1 will win.
    #[test]
    fn test_avoid_losing() {
        let mut board = Board::new();
        for (col, player) in [
            (0, Player::Player1),
            (0, Player::Player2),
            (1, Player::Player1),
            (1, Player::Player2),
            (2, Player::Player1),
        ] {
            board.place(col, player).expect("place failed");
        }

        for kind in KINDS {
            for depth in 2..=3 {
                let result =
                    choose_move(&board, Player::Player2, kind, depth).expect("expected a move");
                assert_eq!(
                    result.action, 3,
                    "evaluator: {:?}, depth: {}, best move: {:?}",
                    kind, depth, result
                );
                assert!(result.score > -WIN_SCORE);
            }
        }
    }

    #[test]
    fn test_only_open_column_is_chosen() {
        let mut board = Board::new();
        for col in 0..COLS - 1 {
            // alternate in pairs so no column or row lines up four.
            let (first, second) = if (col / 2) % 2 == 0 {
                (Player::Player1, Player::Player2)
            } else {
                (Player::Player2, Player::Player1)
            };
            for row in 0..connect_four_logic::ROWS {
                let player = if row % 2 == 0 { first } else { second };
                board.place(col, player).expect("place failed");
            }
        }
        assert_eq!(detect(&board), None);
        assert_eq!(board.legal_moves(), vec![COLS - 1]);

        let result = choose_move(&board, Player::Player1, EvaluatorKind::Positional, 4)
            .expect("expected a move");
        assert_eq!(result.action, COLS - 1);
    }

    #[test]
    fn test_no_move_once_game_is_over() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.place(3, Player::Player1).expect("place failed");
        }
        assert_eq!(
            choose_move(&board, Player::Player2, EvaluatorKind::Positional, 3),
            None
        );
        assert_eq!(
            search(&board, Player::Player2, EvaluatorKind::Positional, 3, true),
            -WIN_SCORE
        );
        assert_eq!(
            search(&board, Player::Player1, EvaluatorKind::Positional, 3, false),
            WIN_SCORE
        );
    }

    #[test]
    fn test_search_at_depth_zero_is_static_score() {
        let mut board = Board::new();
        board.place(3, Player::Player2).expect("place failed");
        for kind in KINDS {
            assert_eq!(
                search(&board, Player::Player2, kind, 0, true),
                kind.score(&board, Player::Player2)
            );
        }
    }

    fn columns() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0..COLS, 0..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_choose_move_never_picks_full_column(
            moves in columns(),
            depth in 1..4u32,
            window in any::<bool>(),
        ) {
            let board = live_position(&moves);
            let kind = if window { EvaluatorKind::Window } else { EvaluatorKind::Positional };
            let result = choose_move(&board, to_move(&board), kind, depth);
            let result = result.expect("live positions always have a move");
            prop_assert!(board.legal_moves().contains(&result.action));
        }

        #[test]
        fn test_alpha_beta_matches_minimax_on_boards(
            moves in columns(),
            depth in 0..4u32,
            maximizing in any::<bool>(),
        ) {
            let board = live_position(&moves);
            let computer = to_move(&board);
            let side = if maximizing { Side::Max } else { Side::Min };

            let mut position = ConnectFourPosition::new(board, computer);
            let mut stats = SearchStats::default();
            let expected = alpha_beta_search::minimax(
                &mut position,
                &EvaluatorKind::Positional,
                depth,
                side,
                &mut stats,
            );
            let actual = search(&board, computer, EvaluatorKind::Positional, depth, maximizing);
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn test_search_restores_board(moves in columns(), depth in 0..4u32) {
            let board = live_position(&moves);
            let mut position = ConnectFourPosition::new(board, to_move(&board));
            let before = position;
            let mut stats = SearchStats::default();
            alpha_beta_search::alpha_beta(
                &mut position,
                &EvaluatorKind::Window,
                depth,
                Score::MIN,
                Score::MAX,
                Side::Max,
                &mut stats,
            );
            prop_assert_eq!(position, before);

            alpha_beta_search::best_action(&mut position, &EvaluatorKind::Positional, depth);
            prop_assert_eq!(position, before);
        }
    }
}
