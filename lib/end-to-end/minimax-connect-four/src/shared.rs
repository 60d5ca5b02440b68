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

//! A game that can be driven from more than one thread.
//!
//! Only one request is resolved at a time. A request that arrives while another one (including
//! its computer reply) is still running is rejected with [`GameError::Busy`] instead of waiting,
//! so moves are never interleaved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crate::error::GameError;
use crate::game::{Game, GameState, MoveOutcome, MoveRequest};

struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(busy: &Arc<AtomicBool>) -> Result<Self, GameError> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GameError::Busy)?;
        Ok(Self {
            busy: Arc::clone(busy),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct SharedGame {
    game: Arc<Mutex<Game>>,
    busy: Arc<AtomicBool>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Copy of the current state. Waits for an in-flight move to finish.
    pub fn snapshot(&self) -> GameState {
        *self.lock().state()
    }

    /// Run `f` on the game unless another request is in flight.
    pub fn with_game<T>(&self, f: impl FnOnce(&mut Game) -> T) -> Result<T, GameError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let mut game = self.lock();
        Ok(f(&mut game))
    }

    pub fn submit(&self, request: MoveRequest) -> Result<MoveOutcome, GameError> {
        self.with_game(|game| game.submit(request))?
    }

    pub fn play_computer_turn(&self) -> Result<MoveOutcome, GameError> {
        self.with_game(Game::play_computer_turn)?
    }

    pub fn reset(&self) -> Result<(), GameError> {
        self.with_game(Game::reset)
    }

    /// Resolve `request` on a worker thread. The game counts as busy from the moment this
    /// returns `Ok` until the worker has applied the move and any computer reply.
    pub fn submit_in_background(
        &self,
        request: MoveRequest,
    ) -> Result<JoinHandle<Result<MoveOutcome, GameError>>, GameError> {
        let guard = BusyGuard::acquire(&self.busy)?;
        let game = Arc::clone(&self.game);
        Ok(std::thread::spawn(move || {
            let _guard = guard;
            let mut game = game.lock().unwrap_or_else(PoisonError::into_inner);
            game.submit(request)
        }))
    }
}
