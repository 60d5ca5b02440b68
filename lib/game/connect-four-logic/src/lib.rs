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

#![warn(missing_docs)]

//! Connect Four game logic.
//!
//! A fixed 7 column by 6 row board with gravity, plus detection of wins and draws. Rows are
//! numbered bottom-up, so row 0 is where the first piece dropped into a column lands.
//!
//! Nothing here knows about turns or opponents. Turn order is enforced by whoever owns the board.

use serde::{Deserialize, Serialize};

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Length of a run needed to win.
pub const CONNECT: usize = 4;

/// Connect Four error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectFourError {
    /// Column is outside the board.
    #[error("invalid column: {0}")]
    InvalidColumn(usize),

    /// Row is outside the board.
    #[error("invalid row: {0}")]
    InvalidRow(usize),

    /// Column is full.
    #[error("column is full: {0}")]
    ColumnFull(usize),

    /// Column is empty, so there is nothing to retract.
    #[error("column is empty: {0}")]
    ColumnEmpty(usize),
}

/// Connect Four cell. Part of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,

    /// Cell for a piece belonging to a player.
    Player(Player),
}

/// Connect Four player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    /// Player 1. Always moves first.
    Player1,

    /// Player 2.
    Player2,
}

impl Player {
    /// Get the other player.
    pub fn other(self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// Numeric code used in grid snapshots: 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            Player::Player1 => 1,
            Player::Player2 => 2,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Player1 => write!(f, "Player 1"),
            Player::Player2 => write!(f, "Player 2"),
        }
    }
}

/// Connect Four board. This only contains the cells, and not the players or the turn.
///
/// All mutation goes through [`Board::place`] and [`Board::retract`], which keeps every column a
/// contiguous run of pieces starting at row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

// print out cells, top row first, with row and column numbers which start at 0.
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((COLS * 2 + 2) * (ROWS + 1));

        // print column numbers. recall there will be row numbers on the left.
        s.push_str("  ");
        for col in 0..COLS {
            s.push_str(&format!("{}", col));
            if col == COLS - 1 {
                s.push('\n');
            } else {
                s.push(' ');
            }
        }

        for row in (0..ROWS).rev() {
            s.push_str(&format!("{} ", row));
            for col in 0..COLS {
                let c = match self.at(col, row) {
                    Cell::Empty => '.',
                    Cell::Player(Player::Player1) => '1',
                    Cell::Player(Player::Player2) => '2',
                };
                s.push(c);
                if col < COLS - 1 {
                    s.push(' ');
                }
            }
            if row > 0 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new, empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    fn at(&self, col: usize, row: usize) -> Cell {
        self.cells[row][col]
    }

    /// Get a cell.
    pub fn get(&self, col: usize, row: usize) -> Result<Cell, ConnectFourError> {
        if col >= COLS {
            return Err(ConnectFourError::InvalidColumn(col));
        }
        if row >= ROWS {
            return Err(ConnectFourError::InvalidRow(row));
        }
        Ok(self.at(col, row))
    }

    /// Check if you can insert a piece into a column. Return the row where the inserted piece will
    /// be.
    pub fn can_insert(&self, col: usize) -> Result<usize, ConnectFourError> {
        if col >= COLS {
            return Err(ConnectFourError::InvalidColumn(col));
        }
        (0..ROWS)
            .find(|&row| self.at(col, row) == Cell::Empty)
            .ok_or(ConnectFourError::ColumnFull(col))
    }

    /// Lowest empty row in a column, or `None` if the column is full or off the board.
    pub fn drop_height(&self, col: usize) -> Option<usize> {
        self.can_insert(col).ok()
    }

    /// Drop a piece into a column. Returns the row it landed on.
    pub fn place(&mut self, col: usize, player: Player) -> Result<usize, ConnectFourError> {
        let row = self.can_insert(col)?;
        self.cells[row][col] = Cell::Player(player);
        Ok(row)
    }

    /// Remove the topmost piece of a column and return its owner. This undoes a [`Board::place`].
    pub fn retract(&mut self, col: usize) -> Result<Player, ConnectFourError> {
        if col >= COLS {
            return Err(ConnectFourError::InvalidColumn(col));
        }
        let top = (0..ROWS)
            .rev()
            .find_map(|row| match self.at(col, row) {
                Cell::Player(p) => Some((row, p)),
                Cell::Empty => None,
            });
        match top {
            Some((row, player)) => {
                self.cells[row][col] = Cell::Empty;
                Ok(player)
            }
            None => Err(ConnectFourError::ColumnEmpty(col)),
        }
    }

    /// Whether a column has no room left. Off-board columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.drop_height(col).is_none()
    }

    /// Whether every column is full. With gravity it is enough to look at the top row.
    pub fn is_full(&self) -> bool {
        self.cells[ROWS - 1].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Columns that can still take a piece, left to right.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// All pieces on the board as `(col, row, player)`, scanning rows bottom-up and columns left
    /// to right.
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Player)> + '_ {
        (0..ROWS).flat_map(move |row| {
            (0..COLS).filter_map(move |col| match self.at(col, row) {
                Cell::Player(p) => Some((col, row, p)),
                Cell::Empty => None,
            })
        })
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Numeric snapshot, `grid[row][col]`, rows bottom-up. 0 is empty, otherwise
    /// [`Player::number`].
    pub fn to_grid(&self) -> [[u8; COLS]; ROWS] {
        let mut grid = [[0; COLS]; ROWS];
        for (col, row, player) in self.pieces() {
            grid[row][col] = player.number();
        }
        grid
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminal {
    /// Some player has four in a row.
    Win(Player),

    /// The board is full and nobody has four in a row.
    Draw,
}

/// A run of at least [`CONNECT`] same-player cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Owner of the run.
    pub player: Player,

    /// `(col, row)` of every cell in the run, in order along the line.
    pub cells: Vec<(usize, usize)>,
}

// horizontal, vertical, diagonal up-right, diagonal down-right. Each is walked both ways.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

fn offset(col: usize, row: usize, dc: isize, dr: isize) -> Option<(usize, usize)> {
    let col = col.checked_add_signed(dc)?;
    let row = row.checked_add_signed(dr)?;
    (col < COLS && row < ROWS).then_some((col, row))
}

/// Find a winning run anywhere on the board.
///
/// Every occupied cell is checked in every direction, so this works on any board, not just one
/// where the last move is known. The first run found in scan order (see [`Board::pieces`]) is
/// returned.
pub fn winning_line(board: &Board) -> Option<WinningLine> {
    for (col, row, player) in board.pieces() {
        let owned = Cell::Player(player);
        for &(dc, dr) in &DIRECTIONS {
            let mut start = (col, row);
            while let Some(prev) = offset(start.0, start.1, -dc, -dr) {
                if board.at(prev.0, prev.1) != owned {
                    break;
                }
                start = prev;
            }

            let mut cells = vec![start];
            let mut current = start;
            while let Some(next) = offset(current.0, current.1, dc, dr) {
                if board.at(next.0, next.1) != owned {
                    break;
                }
                cells.push(next);
                current = next;
            }

            if cells.len() >= CONNECT {
                return Some(WinningLine { player, cells });
            }
        }
    }
    None
}

/// Check if a position is terminal. `None` means the game goes on.
pub fn detect(board: &Board) -> Option<Terminal> {
    if let Some(line) = winning_line(board) {
        return Some(Terminal::Win(line.player));
    }
    if board.is_full() {
        Some(Terminal::Draw)
    } else {
        None
    }
}
