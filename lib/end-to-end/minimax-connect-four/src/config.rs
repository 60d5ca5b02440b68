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

//! Per-session settings, loadable from TOML.

use std::path::Path;
use std::str::FromStr;

use connect_four_logic::Player;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::evaluator::EvaluatorKind;
use crate::game::Mode;

/// Deepest search a session may ask for.
pub const MAX_DEPTH: u32 = 10;

/// Named search depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::Validation(format!(
                "unknown difficulty '{}' (expected 'easy', 'medium' or 'hard')",
                other
            ))),
        }
    }
}

/// Settings fixed for the lifetime of a game session. Resetting the board keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,

    /// Explicit search depth. Overrides `difficulty` when set.
    pub depth: Option<u32>,

    /// Which side the computer plays in [`Mode::VersusComputer`].
    pub computer: Player,

    pub evaluator: EvaluatorKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: Mode::VersusComputer,
            difficulty: Difficulty::default(),
            depth: None,
            computer: Player::Player2,
            evaluator: EvaluatorKind::default(),
        }
    }
}

impl SessionConfig {
    /// Depth the computer searches to.
    pub fn search_depth(&self) -> u32 {
        self.depth.unwrap_or_else(|| self.difficulty.depth())
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.search_depth();
        if depth == 0 || depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "depth must be between 1 and {}, got {}",
                MAX_DEPTH, depth
            )));
        }
        Ok(())
    }
}
