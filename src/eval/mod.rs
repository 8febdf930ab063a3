//! Evaluation module for Gomoku positions
//!
//! Line patterns (twos through fives) scored per stone and per axis, a fork
//! bonus, separate aggressiveness and defensiveness weights, and a center
//! control bonus.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{pattern_sum, EvalWeights, PatternEvaluator, EVAL_LIMIT};
pub use patterns::{Pattern, PatternScore};
