//! Gomoku move-search engine
//!
//! Computes the strongest move for the side to move on a 15x15 five-in-a-row
//! board within a time and depth budget:
//! - Standard 15x15 board, Black moves first
//! - 5-in-a-row to win (overlines allowed)
//! - No captures, no forbidden moves
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win detection along the four axes
//! - [`eval`]: Pattern scoring and position evaluation
//! - [`search`]: Zobrist hashing, transposition table, move ordering,
//!   immediate tactics and the alpha-beta driver
//! - [`book`]: Fixed replies for the first plies
//! - [`engine`]: The per-game [`SearchEngine`] tying it all together
//! - [`config`]: Tunable settings and difficulty presets
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{Board, Pos, SearchEngine, Stone};
//!
//! let mut board = Board::new();
//! let mut engine = SearchEngine::new();
//!
//! board.place(Pos::new(7, 7), Stone::Black);
//!
//! // Engine answers as White
//! let result = engine.best_move(&board, Stone::White, 500, 4).unwrap();
//! board.place(result.best_move, Stone::White);
//! println!("engine plays {} ({})", result.best_move, result.source);
//! ```
//!
//! # Concurrency
//!
//! A call is single-threaded and blocking. Run independent games on
//! separate threads with one [`SearchEngine`] each; engines share only the
//! read-only Zobrist keys.

pub mod board;
pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, WinCheck, BOARD_SIZE};
pub use config::{Difficulty, EngineConfig, SearchLimits};
pub use engine::{MoveResult, SearchEngine, SearchType};
pub use error::EngineError;
pub use eval::EvalWeights;
pub use search::TacticKind;
