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

//! Computer versus a uniformly random opponent, many games in parallel.

use connect_four_logic::Player;
use minimax_connect_four::{Game, Mode, MoveRequest, Phase, SessionConfig, Status};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArenaReport {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl ArenaReport {
    fn record(mut self, status: Status, computer_won: bool) -> Self {
        self.games += 1;
        match status {
            Status::Draw => self.draws += 1,
            Status::Win(_) if computer_won => self.wins += 1,
            _ => self.losses += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            games: self.games + other.games,
            wins: self.wins + other.wins,
            losses: self.losses + other.losses,
            draws: self.draws + other.draws,
        }
    }
}

/// Play `games` games. The computer moves first in the even-numbered ones. Game `i` seeds its
/// opponent with `seed + i`, so a run is reproducible whatever the thread count.
pub fn run(config: &SessionConfig, games: usize, seed: u64) -> ArenaReport {
    info!(games, seed, depth = config.search_depth(), "arena starting");
    let report = (0..games)
        .into_par_iter()
        .map(|i| {
            let mut config = config.clone();
            config.mode = Mode::VersusComputer;
            config.computer = if i % 2 == 0 {
                Player::Player1
            } else {
                Player::Player2
            };
            let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(i as u64));
            let game = play_one(&config, &mut rng);
            let status = game.state().status;
            let computer_won = matches!(status, Status::Win(p) if game.is_computer(p));
            debug!(game = i, ?status, "arena game finished");
            ArenaReport::default().record(status, computer_won)
        })
        .reduce(ArenaReport::default, ArenaReport::merge);
    info!(?report, "arena finished");
    report
}

fn play_one(config: &SessionConfig, rng: &mut Pcg64) -> Game {
    let mut game = Game::new(config);
    let opponent = config.computer.other();
    while let Phase::AwaitingMove(player) = game.phase() {
        let result = if game.is_computer(player) {
            game.play_computer_turn()
        } else {
            let legal = game.board().legal_moves();
            let column = *legal
                .choose(rng)
                .expect("a game in progress has a legal move");
            game.submit(MoveRequest::human(opponent, column))
        };
        result.expect("arena moves are always legal");
    }
    game
}
