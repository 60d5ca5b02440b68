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

//! JSON request and response shapes for driving a game from a front end.
//!
//! Boards are sent as `board[row][col]` with row 0 at the bottom, 0 for empty and 1 or 2 for
//! the players.

use connect_four_logic::{ConnectFourError, COLS, ROWS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;
use crate::game::{Game, Mode, MoveRequest, Status};

pub type Grid = [[u8; COLS]; ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// The human drops a piece. `column` is signed so out-of-range input can be reported.
    MakeMove { column: i64 },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The human, or in a two-player game whoever won.
    Player,
    Ai,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub board: Grid,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub board: Grid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<GameError> for ErrorResponse {
    fn from(e: GameError) -> Self {
        match e {
            GameError::InvalidMove(ConnectFourError::InvalidColumn(_)) => {
                ErrorResponse::new("Invalid column number")
            }
            GameError::InvalidMove(ConnectFourError::ColumnFull(_)) => {
                ErrorResponse::new("Column is full")
            }
            GameError::GameOver => ErrorResponse::new("Game is over"),
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Move(MoveResponse),
    Reset(ResetResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

fn winner(game: &Game, status: Status) -> Option<Winner> {
    match status {
        Status::InProgress => None,
        Status::Draw => Some(Winner::Draw),
        Status::Win(player) if game.is_computer(player) => Some(Winner::Ai),
        Status::Win(_) => Some(Winner::Player),
    }
}

/// Apply one request to `game`.
pub fn handle(game: &mut Game, request: Request) -> Response {
    debug!(?request, "handling request");
    let result = match request {
        Request::MakeMove { column } => make_move(game, column).map(Response::Move),
        Request::Reset => reset(game).map(Response::Reset).map_err(ErrorResponse::from),
    };
    result.unwrap_or_else(Response::Error)
}

fn make_move(game: &mut Game, column: i64) -> Result<MoveResponse, ErrorResponse> {
    let column = match usize::try_from(column) {
        Ok(column) if column < COLS => column,
        _ => return Err(ErrorResponse::new("Invalid column number")),
    };

    let player = match game.mode() {
        Mode::TwoPlayer => game.state().current_player,
        Mode::VersusComputer => game.computer_player().other(),
    };
    let outcome = game
        .submit(MoveRequest::human(player, column))
        .map_err(ErrorResponse::from)?;

    Ok(MoveResponse {
        board: outcome.board.to_grid(),
        game_over: outcome.status != Status::InProgress,
        winner: winner(game, outcome.status),
        ai_move: outcome.computer_move,
    })
}

fn reset(game: &mut Game) -> Result<ResetResponse, GameError> {
    game.reset();
    let ai_move = if game.awaiting_computer() {
        game.play_computer_turn()?.computer_move
    } else {
        None
    };
    Ok(ResetResponse {
        board: game.board().to_grid(),
        ai_move,
    })
}
