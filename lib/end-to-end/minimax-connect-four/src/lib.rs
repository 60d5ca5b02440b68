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

//! Connect Four against a fixed-depth minimax opponent.
//!
//! [`connect_four_logic`] owns the board and win detection, [`alpha_beta_search`] owns the search.
//! This crate plugs the two together: it scores boards, picks the computer's column, and runs a
//! game session where every move goes through one [`Game`] value.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod protocol;
pub mod search;
pub mod shared;

pub use config::{Difficulty, SessionConfig};
pub use error::{ConfigError, GameError};
pub use evaluator::{EvaluatorKind, WIN_SCORE};
pub use game::{Game, GameState, Mode, MoveOutcome, MoveRequest, Phase, Status, Submitter};
pub use search::{choose_move, search, ConnectFourPosition};
pub use shared::SharedGame;
