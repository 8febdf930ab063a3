//! Search module for Gomoku AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Move generation and ordering (killer and history heuristics)
//! - The immediate tactics ladder run before any search
//! - Minimax with alpha-beta pruning and iterative deepening

pub mod alphabeta;
pub mod ordering;
pub mod threat;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchContext, SearchFeatures, SearchResult, SearchStats};
pub use ordering::{HistoryTable, KillerTable, MoveOrderer};
pub use threat::{ImmediateTacticsDetector, Tactic, TacticKind};
pub use tt::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;

/// Score of a five made at the root. A win `n` plies deep scores
/// `WIN_SCORE - n` so shorter wins and longer losses are preferred.
pub const WIN_SCORE: i32 = 100_000_000;

/// Alpha-beta bounds, beyond any reachable score.
pub const INF: i32 = 1_000_000_000;

/// Hard cap on recursion depth and on the per-ply killer table.
pub const MAX_PLY: usize = 64;

/// Deepest iterative-deepening pass a caller may request.
pub const MAX_SEARCH_DEPTH: u32 = 32;

/// True for scores that encode a forced five for either side.
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= WIN_SCORE - MAX_PLY as i32 * 2
}
