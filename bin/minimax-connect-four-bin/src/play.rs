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

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use connect_four_logic::{Player, COLS};
use minimax_connect_four::{Game, GameState, Mode, MoveRequest, SessionConfig, SharedGame, Status};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Column(usize),
    Reset,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "q" | "quit" => Some(Input::Quit),
        "r" | "reset" => Some(Input::Reset),
        other => other.parse().ok().map(Input::Column),
    }
}

fn describe_result(state: &GameState, mode: Mode, computer: Player) -> Option<String> {
    let message = match state.status {
        Status::InProgress => return None,
        Status::Draw => "It's a draw.".to_string(),
        Status::Win(player) if mode == Mode::TwoPlayer => format!("{} wins!", player),
        Status::Win(player) if player == computer => "The computer wins.".to_string(),
        Status::Win(_) => "You win!".to_string(),
    };
    Some(message)
}

pub fn run(config: SessionConfig) -> Result<()> {
    let game = SharedGame::new(Game::new(&config));
    let mode = config.mode;
    let human = config.computer.other();
    info!(?mode, depth = config.search_depth(), "starting game");

    println!("Drop a piece with a column number 0-{}. r resets, q quits.", COLS - 1);
    let mut lines = io::stdin().lock().lines();
    loop {
        if game.with_game(|g| g.awaiting_computer())? {
            println!("thinking...");
            let outcome = game.play_computer_turn()?;
            if let Some(column) = outcome.computer_move {
                println!("The computer plays column {}.", column);
            }
        }

        let state = game.snapshot();
        println!("\n{}", state.board);
        match describe_result(&state, mode, config.computer) {
            Some(message) => print!("{} r to play again, q to quit: ", message),
            None if mode == Mode::TwoPlayer => print!("{}, your move: ", state.current_player),
            None => print!("Your move: "),
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_input(&line?) {
            Some(Input::Quit) => break,
            Some(Input::Reset) => game.reset()?,
            Some(Input::Column(column)) => {
                let player = match mode {
                    Mode::TwoPlayer => state.current_player,
                    Mode::VersusComputer => human,
                };
                let worker = game.submit_in_background(MoveRequest::human(player, column))?;
                if mode == Mode::VersusComputer && state.status == Status::InProgress {
                    println!("thinking...");
                }
                match worker.join().map_err(|_| anyhow!("move worker panicked"))? {
                    Ok(outcome) => {
                        if let Some(reply) = outcome.computer_move {
                            println!("The computer plays column {}.", reply);
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            None => println!("Enter a column number 0-{}, r or q.", COLS - 1),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("3\n"), Some(Input::Column(3)));
        assert_eq!(parse_input(" q "), Some(Input::Quit));
        assert_eq!(parse_input("reset"), Some(Input::Reset));
        assert_eq!(parse_input("-1"), None);
        assert_eq!(parse_input("three"), None);
    }

    #[test]
    fn test_describe_result() {
        let mut state = GameState::new();
        assert_eq!(describe_result(&state, Mode::VersusComputer, Player::Player2), None);

        state.status = Status::Win(Player::Player2);
        assert_eq!(
            describe_result(&state, Mode::VersusComputer, Player::Player2).as_deref(),
            Some("The computer wins.")
        );
        assert_eq!(
            describe_result(&state, Mode::VersusComputer, Player::Player1).as_deref(),
            Some("You win!")
        );
        assert_eq!(
            describe_result(&state, Mode::TwoPlayer, Player::Player2).as_deref(),
            Some("Player 2 wins!")
        );
    }

    #[test]
    fn test_large_column_is_left_to_the_game() {
        assert_eq!(parse_input("9"), Some(Input::Column(9)));
    }
}
