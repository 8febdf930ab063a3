//! Heuristic evaluation function for Gomoku board positions
//!
//! Scores are always from the point of view of the side the engine plays
//! (`ai`). The two halves are weighted separately, so the evaluation is
//! intentionally asymmetric: with the default weights an opponent's threat
//! costs more than the same threat of our own is worth.
//!
//! Every stone contributes the pattern value of each of its four axes. A run
//! of N stones is therefore counted N times. Longer held lines weigh more.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone, DIRECTIONS};

use super::patterns::{Pattern, PatternScore};

/// Maximum Manhattan distance from center on the 15x15 board
const MAX_CENTER_DIST: i32 = 14;

/// Weight per distance unit from center
const POSITION_WEIGHT: i32 = 3;

/// Static evaluations stay well inside the win band so a real five always
/// outranks any heuristic score.
pub const EVAL_LIMIT: i32 = 50_000_000;

/// Multipliers for the own and opponent halves of the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub aggressiveness: f64,
    /// Must stay above `aggressiveness`: an opponent four has to outweigh
    /// building our own three.
    pub defensiveness: f64,
}

impl EvalWeights {
    /// Equal weights. Makes the evaluation antisymmetric between colors.
    pub const fn balanced() -> Self {
        Self {
            aggressiveness: 1.0,
            defensiveness: 1.0,
        }
    }
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            aggressiveness: 1.0,
            defensiveness: 1.5,
        }
    }
}

/// Position evaluator and move-importance estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEvaluator {
    weights: EvalWeights,
}

impl PatternEvaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn weights(&self) -> EvalWeights {
        self.weights
    }

    /// Evaluate the board for `ai`. Positive is good for `ai`.
    #[must_use]
    pub fn evaluate_position(&self, board: &Board, ai: Stone) -> i32 {
        let opp = ai.opponent();

        let mine = pattern_sum(board, ai) as f64 * self.weights.aggressiveness;
        let theirs = pattern_sum(board, opp) as f64 * self.weights.defensiveness;
        let position = i64::from(evaluate_positions(board, ai) - evaluate_positions(board, opp));

        clamp_score(mine - theirs + position as f64)
    }

    /// Cheap score for a hypothetical move by `side` at an empty `pos`.
    ///
    /// Attack is what the stone builds for `side`; defense is what it takes
    /// away from the opponent by occupying the cell. Used for move ordering
    /// and tactic tie-breaks only.
    #[must_use]
    pub fn evaluate_move_importance(&self, board: &Board, pos: Pos, side: Stone) -> i32 {
        let attack = stone_value(board, pos, side) as f64 * self.weights.aggressiveness;
        let defense = stone_value(board, pos, side.opponent()) as f64 * self.weights.defensiveness;
        clamp_score(attack + defense + f64::from(centrality(pos)))
    }
}

/// Raw pattern total for one color, before weighting.
///
/// Sums the four directional patterns of every stone plus the fork bonus.
pub fn pattern_sum(board: &Board, stone: Stone) -> i64 {
    let Some(stones) = board.stones(stone) else {
        return 0;
    };
    stones.iter_ones().map(|pos| stone_value(board, pos, stone)).sum()
}

/// Four-axis value of `stone` at `pos` (real or hypothetical), with the fork
/// bonus when two or more axes carry an open three or better.
fn stone_value(board: &Board, pos: Pos, stone: Stone) -> i64 {
    let mut total = 0i64;
    let mut fork_axes = 0;
    for &dir in &DIRECTIONS {
        let pattern = Pattern::scan(board, pos, dir, stone);
        total += i64::from(pattern.value());
        if pattern.is_fork_grade() {
            fork_axes += 1;
        }
    }
    if fork_axes >= 2 {
        total += i64::from(PatternScore::DOUBLE_OPEN_THREE);
    }
    total
}

#[inline]
fn centrality(pos: Pos) -> i32 {
    (MAX_CENTER_DIST - pos.center_distance()) * POSITION_WEIGHT
}

/// Center-control bonus over all stones of `stone`.
fn evaluate_positions(board: &Board, stone: Stone) -> i32 {
    board
        .stones(stone)
        .map_or(0, |bb| bb.iter_ones().map(centrality).sum())
}

#[inline]
fn clamp_score(raw: f64) -> i32 {
    raw.round().clamp(-f64::from(EVAL_LIMIT), f64::from(EVAL_LIMIT)) as i32
}
