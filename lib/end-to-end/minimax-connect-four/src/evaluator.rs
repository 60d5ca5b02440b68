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

//! Board scoring from the computer's point of view.

use std::str::FromStr;

use alpha_beta_search::Score;
use connect_four_logic::{detect, Board, Player, Terminal, COLS, CONNECT, ROWS};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Score of a position the computer has won. A loss is the negation, a draw is 0.
pub const WIN_SCORE: Score = 1000;

/// Score of a finished game for `computer`.
pub fn terminal_score(terminal: Terminal, computer: Player) -> Score {
    match terminal {
        Terminal::Win(winner) if winner == computer => WIN_SCORE,
        Terminal::Win(_) => -WIN_SCORE,
        Terminal::Draw => 0,
    }
}

/// Worth of a single piece: closer to the centre column and higher up is better.
pub fn position_score(col: usize, row: usize) -> Score {
    let center = (COLS / 2) as Score;
    center - (col as Score - center).abs() + row as Score
}

/// Which heuristic scores non-terminal positions. Terminal positions always use
/// [`terminal_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluatorKind {
    /// Sum of [`position_score`] over the computer's pieces minus the same over the opponent's.
    #[default]
    Positional,

    /// Centre column bonus plus threat counting over every 4-cell window.
    Window,
}

impl FromStr for EvaluatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positional" => Ok(EvaluatorKind::Positional),
            "window" => Ok(EvaluatorKind::Window),
            other => Err(ConfigError::Validation(format!(
                "unknown evaluator '{}' (expected 'positional' or 'window')",
                other
            ))),
        }
    }
}

impl EvaluatorKind {
    /// Score `board` for `computer`. Positive is good for the computer.
    pub fn score(self, board: &Board, computer: Player) -> Score {
        if let Some(terminal) = detect(board) {
            return terminal_score(terminal, computer);
        }
        match self {
            EvaluatorKind::Positional => positional(board, computer),
            EvaluatorKind::Window => window(board, computer),
        }
    }
}

fn positional(board: &Board, computer: Player) -> Score {
    board
        .pieces()
        .map(|(col, row, player)| {
            let score = position_score(col, row);
            if player == computer {
                score
            } else {
                -score
            }
        })
        .sum()
}

fn score_window(own: usize, opp: usize, empty: usize) -> Score {
    let mut score = 0;
    if own == 4 {
        score += 100;
    } else if own == 3 && empty == 1 {
        score += 5;
    } else if own == 2 && empty == 2 {
        score += 2;
    }
    if opp == 3 && empty == 1 {
        score -= 4;
    }
    score
}

fn window(board: &Board, computer: Player) -> Score {
    let grid = board.to_grid();
    let own_code = computer.number();
    let opp_code = computer.other().number();

    let center = (0..ROWS).filter(|&row| grid[row][COLS / 2] == own_code).count() as Score;
    let mut score = center * 3;

    let mut tally = |cells: [(usize, usize); CONNECT]| {
        let (mut own, mut opp, mut empty) = (0, 0, 0);
        for (col, row) in cells {
            match grid[row][col] {
                0 => empty += 1,
                c if c == own_code => own += 1,
                c if c == opp_code => opp += 1,
                _ => {}
            }
        }
        score += score_window(own, opp, empty);
    };

    // horizontal
    for row in 0..ROWS {
        for col in 0..=COLS - CONNECT {
            tally([(col, row), (col + 1, row), (col + 2, row), (col + 3, row)]);
        }
    }
    // vertical
    for col in 0..COLS {
        for row in 0..=ROWS - CONNECT {
            tally([(col, row), (col, row + 1), (col, row + 2), (col, row + 3)]);
        }
    }
    // diagonal up
    for row in 0..=ROWS - CONNECT {
        for col in 0..=COLS - CONNECT {
            tally([
                (col, row),
                (col + 1, row + 1),
                (col + 2, row + 2),
                (col + 3, row + 3),
            ]);
        }
    }
    // diagonal down
    for row in CONNECT - 1..ROWS {
        for col in 0..=COLS - CONNECT {
            tally([
                (col, row),
                (col + 1, row - 1),
                (col + 2, row - 2),
                (col + 3, row - 3),
            ]);
        }
    }

    score
}
