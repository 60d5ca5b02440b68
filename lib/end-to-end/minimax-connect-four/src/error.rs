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

use std::path::PathBuf;

use connect_four_logic::{ConnectFourError, Player};

use crate::game::Submitter;

/// Why a move request was turned down. A rejected request never changes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The column is off the board or already full.
    #[error("invalid move: {0}")]
    InvalidMove(#[from] ConnectFourError),

    /// The request came from someone other than the side to move.
    #[error("out of turn: waiting for {expected}, got a move from {submitter}")]
    OutOfTurn {
        expected: Player,
        submitter: Submitter,
    },

    /// The game has been won or drawn.
    #[error("game is over")]
    GameOver,

    /// Another move is still being resolved.
    #[error("a move is already being resolved")]
    Busy,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        let err = GameError::from(ConnectFourError::ColumnFull(3));
        assert_eq!(err.to_string(), "invalid move: column is full: 3");

        let err = GameError::OutOfTurn {
            expected: Player::Player1,
            submitter: Submitter::Computer,
        };
        assert_eq!(
            err.to_string(),
            "out of turn: waiting for Player 1, got a move from the computer"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("depth must be between 1 and 10".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: depth must be between 1 and 10"
        );
    }
}
