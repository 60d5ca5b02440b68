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

//! Game sessions: turn order, applying moves and answering with the computer's move.

use std::str::FromStr;

use connect_four_logic::{detect, Board, Player, Terminal};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{ConfigError, GameError};
use crate::evaluator::EvaluatorKind;
use crate::search::choose_move;

/// Who plays the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Two humans sharing a board.
    TwoPlayer,

    /// A human against the search.
    VersusComputer,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-player" => Ok(Mode::TwoPlayer),
            "versus-computer" => Ok(Mode::VersusComputer),
            other => Err(ConfigError::Validation(format!(
                "unknown mode '{}' (expected 'two-player' or 'versus-computer')",
                other
            ))),
        }
    }
}

/// Result of a game so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Moves are still accepted.
    InProgress,

    /// `Player` has four in a row.
    Win(Player),

    /// Full board, nobody won.
    Draw,
}

impl From<Option<Terminal>> for Status {
    fn from(terminal: Option<Terminal>) -> Self {
        match terminal {
            None => Status::InProgress,
            Some(Terminal::Win(player)) => Status::Win(player),
            Some(Terminal::Draw) => Status::Draw,
        }
    }
}

/// Board, side to move and result. Only changes one legal move at a time, and never again once
/// the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub status: Status,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board with Player 1 to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::Player1,
            status: Status::InProgress,
        }
    }
}

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for `Player` to move.
    AwaitingMove(Player),

    /// A move is being applied, possibly along with the computer's reply.
    Resolving,

    /// The game is over. No more moves are accepted.
    Terminal(Terminal),
}

/// Who sent a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Submitter {
    /// A person playing `Player`.
    Human(Player),

    /// The search, playing its configured side.
    Computer,
}

impl std::fmt::Display for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Submitter::Human(player) => write!(f, "{}", player),
            Submitter::Computer => write!(f, "the computer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub column: usize,
    pub submitter: Submitter,
}

impl MoveRequest {
    /// A move by the human playing `player`.
    pub fn human(player: Player, column: usize) -> Self {
        Self {
            column,
            submitter: Submitter::Human(player),
        }
    }
}

/// What happened after a move was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub status: Status,

    /// The column the computer played while resolving this request, if it played.
    pub computer_move: Option<usize>,
}

/// One game session. Owns the game state and decides when the computer moves.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    phase: Phase,
    mode: Mode,
    computer: Player,
    depth: u32,
    evaluator: EvaluatorKind,
}

impl Game {
    pub fn new(config: &SessionConfig) -> Self {
        Self::resume(config, GameState::new())
    }

    /// Continue a session from a saved state. The saved status is recomputed from the board.
    pub fn resume(config: &SessionConfig, mut state: GameState) -> Self {
        state.status = detect(&state.board).into();
        let mut game = Self {
            state,
            phase: Phase::Resolving,
            mode: config.mode,
            computer: config.computer,
            depth: config.search_depth(),
            evaluator: config.evaluator,
        };
        game.phase = game.settled_phase();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The side the computer plays. Only meaningful in [`Mode::VersusComputer`].
    pub fn computer_player(&self) -> Player {
        self.computer
    }

    pub fn is_computer(&self, player: Player) -> bool {
        self.mode == Mode::VersusComputer && player == self.computer
    }

    /// Whether the next move belongs to the computer.
    pub fn awaiting_computer(&self) -> bool {
        matches!(self.phase, Phase::AwaitingMove(player) if self.is_computer(player))
    }

    /// Apply a move. If it was a human move and the computer is next, the computer's reply is
    /// searched and applied before returning.
    pub fn submit(&mut self, request: MoveRequest) -> Result<MoveOutcome, GameError> {
        let player = self.expect_turn(request.submitter).map_err(|e| {
            warn!(column = request.column, %e, "rejected move");
            e
        })?;

        self.phase = Phase::Resolving;
        let result = self.resolve(request, player);
        self.phase = self.settled_phase();

        match &result {
            Ok(outcome) if outcome.status != Status::InProgress => {
                info!(status = ?outcome.status, "game over");
            }
            Err(e) => warn!(column = request.column, %e, "rejected move"),
            Ok(_) => {}
        }
        result
    }

    /// Let the computer make its move, e.g. to open a game where it goes first.
    pub fn play_computer_turn(&mut self) -> Result<MoveOutcome, GameError> {
        self.expect_turn(Submitter::Computer)?;
        let column = choose_move(&self.state.board, self.computer, self.evaluator, self.depth)
            .map(|result| result.action)
            .ok_or(GameError::GameOver)?;
        self.submit(MoveRequest {
            column,
            submitter: Submitter::Computer,
        })
    }

    /// Empty the board and give the first move to Player 1. Mode, depth and evaluator stay.
    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.phase = self.settled_phase();
        info!(mode = ?self.mode, depth = self.depth, "game reset");
    }

    fn expect_turn(&self, submitter: Submitter) -> Result<Player, GameError> {
        let expected = match self.phase {
            Phase::AwaitingMove(player) => player,
            Phase::Resolving => return Err(GameError::Busy),
            Phase::Terminal(_) => return Err(GameError::GameOver),
        };
        let allowed = match submitter {
            Submitter::Human(player) => player == expected && !self.is_computer(player),
            Submitter::Computer => self.is_computer(expected),
        };
        if allowed {
            Ok(expected)
        } else {
            Err(GameError::OutOfTurn {
                expected,
                submitter,
            })
        }
    }

    fn resolve(&mut self, request: MoveRequest, player: Player) -> Result<MoveOutcome, GameError> {
        self.play(request.column, player)?;

        let mut computer_move = match request.submitter {
            Submitter::Computer => Some(request.column),
            Submitter::Human(_) => None,
        };
        if computer_move.is_none()
            && self.state.status == Status::InProgress
            && self.is_computer(self.state.current_player)
        {
            if let Some(result) =
                choose_move(&self.state.board, self.computer, self.evaluator, self.depth)
            {
                self.play(result.action, self.computer)?;
                computer_move = Some(result.action);
            }
        }

        Ok(MoveOutcome {
            board: self.state.board,
            status: self.state.status,
            computer_move,
        })
    }

    // a failed place leaves the board untouched, so a rejected move changes nothing.
    fn play(&mut self, column: usize, player: Player) -> Result<(), GameError> {
        self.state.board.place(column, player)?;
        self.state.status = detect(&self.state.board).into();
        if self.state.status == Status::InProgress {
            self.state.current_player = player.other();
        }
        Ok(())
    }

    fn settled_phase(&self) -> Phase {
        match self.state.status {
            Status::InProgress => Phase::AwaitingMove(self.state.current_player),
            Status::Win(player) => Phase::Terminal(Terminal::Win(player)),
            Status::Draw => Phase::Terminal(Terminal::Draw),
        }
    }
}
