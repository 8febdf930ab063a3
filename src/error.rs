//! Error type shared by the library surface

use thiserror::Error;

/// Conditions reported to the caller before any search starts.
///
/// Time pressure and shallow searches are never errors: the engine degrades
/// to a weaker move instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("board must be 15x15, got {rows} rows with a {cols}-cell row")]
    InvalidBoardDimension { rows: usize, cols: usize },

    #[error("no legal moves: the board is full")]
    NoLegalMoves,

    #[error("side to move must be Black or White, not Empty")]
    EmptySideToMove,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
