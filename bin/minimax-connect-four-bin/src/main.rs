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

//! Command-line front end: play in the terminal, serve the JSON protocol over stdio, or pit the
//! computer against a random opponent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use connect_four_logic::Player;
use minimax_connect_four::{Difficulty, EvaluatorKind, Mode, SessionConfig};
use tracing_subscriber::EnvFilter;

mod arena;
mod play;
mod serve;

#[derive(Parser)]
#[command(name = "minimax-connect-four", about = "Connect Four against a minimax opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play in the terminal
    Play(SessionArgs),

    /// Read line-delimited JSON requests on stdin and answer on stdout
    Serve(SessionArgs),

    /// Play the computer against a random opponent and report the results
    Arena {
        #[command(flatten)]
        session: SessionArgs,

        /// Number of games to play
        #[arg(long, default_value_t = 20)]
        games: usize,

        /// Base seed for the random opponent
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Overrides for values from the configuration file.
#[derive(Args, Debug, Default)]
struct SessionArgs {
    /// Two humans share the board, no computer
    #[arg(long)]
    two_player: bool,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Search depth, overrides difficulty
    #[arg(long)]
    depth: Option<u32>,

    /// The computer plays Player 1 and moves first
    #[arg(long)]
    computer_first: bool,

    /// positional or window
    #[arg(long)]
    evaluator: Option<EvaluatorKind>,
}

impl SessionArgs {
    fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if self.two_player {
            config.mode = Mode::TwoPlayer;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
            config.depth = None;
        }
        if let Some(depth) = self.depth {
            config.depth = Some(depth);
        }
        if self.computer_first {
            config.computer = Player::Player1;
        }
        if let Some(evaluator) = self.evaluator {
            config.evaluator = evaluator;
        }
        config
    }
}

fn session_config(cli_config: &Path, args: &SessionArgs) -> Result<SessionConfig> {
    let config = SessionConfig::load_or_default(cli_config)
        .with_context(|| format!("loading config from {}", cli_config.display()))?;
    let config = args.apply(config);
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Play(args) => play::run(session_config(&cli.config, args)?),
        Command::Serve(args) => serve::run(session_config(&cli.config, args)?),
        Command::Arena {
            session,
            games,
            seed,
        } => {
            let config = session_config(&cli.config, session)?;
            let report = arena::run(&config, *games, *seed);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "minimax-connect-four",
            "play",
            "--difficulty",
            "hard",
            "--computer-first",
            "--evaluator",
            "window",
        ]);
        let Command::Play(args) = cli.command else {
            panic!("expected play");
        };
        let config = args.apply(SessionConfig {
            depth: Some(2),
            ..Default::default()
        });
        assert_eq!(config.search_depth(), 5);
        assert_eq!(config.computer, Player::Player1);
        assert_eq!(config.evaluator, EvaluatorKind::Window);
        assert_eq!(config.mode, Mode::VersusComputer);
    }

    #[test]
    fn test_depth_beats_difficulty() {
        let args = SessionArgs {
            difficulty: Some(Difficulty::Easy),
            depth: Some(4),
            ..Default::default()
        };
        assert_eq!(args.apply(SessionConfig::default()).search_depth(), 4);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let result = Cli::try_parse_from(["minimax-connect-four", "serve", "--difficulty", "insane"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_depth_fails_validation() {
        let args = SessionArgs {
            depth: Some(11),
            ..Default::default()
        };
        assert!(args.apply(SessionConfig::default()).validate().is_err());
    }
}
