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

//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! See Chapter 5 section 5.2 (minimax) and 5.3 (alpha-beta pruning).
//!
//! The search never copies a position. It applies an action, recurses, then undoes the action,
//! so a position only ever holds one hypothetical move per ply and is back to its original state
//! when a search returns.

use std::fmt::Debug;

/// Position score, higher is better for the maximizing side.
pub type Score = i32;

/// Which side is to move. The maximizing side is the one the search is choosing a move for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The side the search is choosing a move for.
    Max,

    /// Its opponent.
    Min,
}

impl Side {
    /// The side that moves next.
    pub fn other(self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }
}

/// A game position that can be searched by mutating it in place.
pub trait Position {
    /// A move, e.g. a column.
    type Action: Copy + Debug + PartialEq;

    /// Legal actions, in the order they are searched. Empty for terminal positions.
    fn actions(&self) -> Vec<Self::Action>;

    /// Play `action` for `side`. `action` always comes from [`Position::actions`].
    fn apply(&mut self, action: Self::Action, side: Side);

    /// Take back `action`, which is the most recently applied one.
    fn undo(&mut self, action: Self::Action);

    /// Whether the game is over here.
    fn is_terminal(&self) -> bool;
}

/// Scores a position from the maximizing side's point of view. Called on terminal positions and
/// at the depth cutoff.
pub trait Evaluator<P: Position> {
    /// Score `position`.
    fn evaluate(&self, position: &P) -> Score;
}

/// Counters collected during one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions entered, including the root and leaves.
    pub nodes: u64,

    /// Times a node stopped looking at actions because `beta <= alpha`.
    pub cutoffs: u64,
}

/// The action picked at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<A> {
    /// Best action, earliest on ties.
    pub action: A,

    /// Its minimax value.
    pub score: Score,

    /// Work done by the whole search.
    pub stats: SearchStats,
}

/// Plain minimax without pruning. Visits every node down to `depth`.
pub fn minimax<P, E>(
    position: &mut P,
    evaluator: &E,
    depth: u32,
    side: Side,
    stats: &mut SearchStats,
) -> Score
where
    P: Position,
    E: Evaluator<P>,
{
    stats.nodes += 1;
    if depth == 0 || position.is_terminal() {
        return evaluator.evaluate(position);
    }
    let actions = position.actions();
    if actions.is_empty() {
        return evaluator.evaluate(position);
    }

    let mut value = match side {
        Side::Max => Score::MIN,
        Side::Min => Score::MAX,
    };
    for action in actions {
        position.apply(action, side);
        let child = minimax(position, evaluator, depth - 1, side.other(), stats);
        position.undo(action);
        value = match side {
            Side::Max => value.max(child),
            Side::Min => value.min(child),
        };
    }
    value
}

/// Minimax with alpha-beta pruning.
///
/// `alpha` is the best score the maximizer can already guarantee and `beta` the best the
/// minimizer can. Once `beta <= alpha` the remaining siblings cannot change the result and are
/// skipped. With the full window (`Score::MIN`, `Score::MAX`) this returns exactly what
/// [`minimax`] returns.
pub fn alpha_beta<P, E>(
    position: &mut P,
    evaluator: &E,
    depth: u32,
    mut alpha: Score,
    mut beta: Score,
    side: Side,
    stats: &mut SearchStats,
) -> Score
where
    P: Position,
    E: Evaluator<P>,
{
    stats.nodes += 1;
    if depth == 0 || position.is_terminal() {
        return evaluator.evaluate(position);
    }
    let actions = position.actions();
    if actions.is_empty() {
        return evaluator.evaluate(position);
    }

    match side {
        Side::Max => {
            let mut value = Score::MIN;
            for action in actions {
                position.apply(action, side);
                let child =
                    alpha_beta(position, evaluator, depth - 1, alpha, beta, Side::Min, stats);
                position.undo(action);
                value = value.max(child);
                alpha = alpha.max(value);
                if beta <= alpha {
                    stats.cutoffs += 1;
                    break;
                }
            }
            value
        }
        Side::Min => {
            let mut value = Score::MAX;
            for action in actions {
                position.apply(action, side);
                let child =
                    alpha_beta(position, evaluator, depth - 1, alpha, beta, Side::Max, stats);
                position.undo(action);
                value = value.min(child);
                beta = beta.min(value);
                if beta <= alpha {
                    stats.cutoffs += 1;
                    break;
                }
            }
            value
        }
    }
}

/// Full-window alpha-beta search from `side`'s point of view of who moves next.
pub fn search<P, E>(position: &mut P, evaluator: &E, depth: u32, side: Side) -> Score
where
    P: Position,
    E: Evaluator<P>,
{
    let mut stats = SearchStats::default();
    alpha_beta(
        position,
        evaluator,
        depth,
        Score::MIN,
        Score::MAX,
        side,
        &mut stats,
    )
}

/// Pick the maximizing side's action at the root.
///
/// Each action is applied for the maximizer and the reply is searched on the minimizing side at
/// `depth - 1`. The first action with the strictly greatest score wins, so ties go to the
/// earliest action. Returns `None` if the position is terminal or has no actions.
///
/// Choosing an action always looks one ply ahead, so a `depth` of 0 searches like a depth of 1.
pub fn best_action<P, E>(position: &mut P, evaluator: &E, depth: u32) -> Option<SearchResult<P::Action>>
where
    P: Position,
    E: Evaluator<P>,
{
    if position.is_terminal() {
        return None;
    }

    let mut stats = SearchStats {
        nodes: 1,
        cutoffs: 0,
    };
    let mut best: Option<(P::Action, Score)> = None;
    let mut alpha = Score::MIN;
    for action in position.actions() {
        position.apply(action, Side::Max);
        let score = alpha_beta(
            position,
            evaluator,
            depth.saturating_sub(1),
            alpha,
            Score::MAX,
            Side::Min,
            &mut stats,
        );
        position.undo(action);

        // a reply searched with a raised alpha may come back as a bound equal to alpha, which is
        // never strictly better than the action that set alpha.
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((action, score));
            alpha = alpha.max(score);
        }
    }

    best.map(|(action, score)| SearchResult {
        action,
        score,
        stats,
    })
}
