//! Main AI Engine integrating all search components
//!
//! One [`SearchEngine`] serves one game. It owns that game's transposition
//! table; killers and history live only for a single call. Two engines never
//! share mutable state, so games can run on separate threads freely.
//!
//! A decision goes through these stages, first hit wins:
//!
//! 1. **Opening book** while fewer than four stones are down
//! 2. **Last cell**: a single empty cell left is played without searching
//! 3. **Immediate tactics**: fives, fours and open threes, attack before defense
//! 4. **Alpha-Beta**: iterative deepening under the time budget
//! 5. **Fallback**: if not even depth 1 finished, the candidate nearest the center
//!
//! # Example
//!
//! ```
//! use gomoku::{Board, Pos, SearchEngine, SearchType, Stone};
//!
//! let mut engine = SearchEngine::new();
//! let board = Board::new();
//!
//! let result = engine.best_move(&board, Stone::Black, 1_000, 4).unwrap();
//! assert_eq!(result.best_move, Pos::new(7, 7));
//! assert_eq!(result.source, SearchType::OpeningBook);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::board::{Board, Pos, Stone, TOTAL_CELLS};
use crate::book::{OpeningBook, BOOK_PLY_LIMIT};
use crate::config::{EngineConfig, SearchLimits};
use crate::error::EngineError;
use crate::eval::PatternEvaluator;
use crate::rules::has_five_at_pos;
use crate::search::ordering::candidate_cells;
use crate::search::{
    is_mate_score, ImmediateTacticsDetector, MoveOrderer, SearchContext, SearchResult,
    SearchStats, TTStats, TacticKind, TranspositionTable, ZobristTable, MAX_SEARCH_DEPTH,
    WIN_SCORE,
};

/// Which stage produced the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    OpeningBook,
    Tactic(TacticKind),
    /// Only one empty cell was left
    LastCell,
    AlphaBeta,
    /// Time ran out before depth 1 completed
    Fallback,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::OpeningBook => f.write_str("opening book"),
            SearchType::Tactic(kind) => write!(f, "tactic ({kind:?})"),
            SearchType::LastCell => f.write_str("last cell"),
            SearchType::AlphaBeta => f.write_str("alpha-beta"),
            SearchType::Fallback => f.write_str("fallback"),
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub best_move: Pos,
    /// Evaluation from the mover's point of view
    pub score: i32,
    /// Depth of the last completed iteration (0 when no search ran)
    pub depth_reached: u32,
    pub nodes: u64,
    pub time_ms: u64,
    /// How far the move can be trusted, in [0, 1]
    pub confidence: f64,
    pub source: SearchType,
    /// Search diagnostics (empty unless alpha-beta ran)
    pub stats: SearchStats,
}

impl MoveResult {
    #[inline]
    fn instant(best_move: Pos, score: i32, source: SearchType, confidence: f64) -> Self {
        Self {
            best_move,
            score,
            depth_reached: 0,
            nodes: 0,
            time_ms: 0,
            confidence,
            source,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn from_search(result: SearchResult, max_depth: u32) -> Self {
        let confidence = if is_mate_score(result.score) {
            1.0
        } else {
            0.3 + 0.6 * f64::from(result.depth.min(max_depth)) / f64::from(max_depth.max(1))
        };
        Self {
            best_move: result.best_move,
            score: result.score,
            depth_reached: result.depth,
            nodes: result.nodes,
            time_ms: 0,
            confidence,
            source: SearchType::AlphaBeta,
            stats: result.stats,
        }
    }
}

fn tactic_confidence(kind: TacticKind) -> f64 {
    match kind {
        TacticKind::Win => 1.0,
        TacticKind::BlockFive | TacticKind::MakeFour | TacticKind::BlockFour => 0.95,
        TacticKind::MakeOpenThree | TacticKind::BlockOpenThree => 0.8,
    }
}

/// Move-search engine for one game session.
pub struct SearchEngine {
    config: EngineConfig,
    zobrist: Arc<ZobristTable>,
    tt: TranspositionTable,
    evaluator: PatternEvaluator,
    orderer: MoveOrderer,
    tactics: ImmediateTacticsDetector,
    book: OpeningBook,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Build an engine from a configuration.
    ///
    /// The default seed reuses the process-wide Zobrist table; any other
    /// seed gets a private one.
    pub fn with_config(config: EngineConfig) -> Self {
        let zobrist = if config.zobrist_seed == crate::search::zobrist::DEFAULT_SEED {
            ZobristTable::shared()
        } else {
            Arc::new(ZobristTable::with_seed(config.zobrist_seed))
        };
        let evaluator = PatternEvaluator::new(config.weights);
        Self {
            zobrist,
            tt: TranspositionTable::new(config.tt_size_mb),
            evaluator,
            orderer: MoveOrderer::new(evaluator, config.candidate_limit),
            tactics: ImmediateTacticsDetector::new(evaluator),
            book: OpeningBook::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.tt.clear();
    }

    #[inline]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// [`best_move`](Self::best_move) with the configured limits.
    pub fn best_move_default(&mut self, board: &Board, side: Stone) -> Result<MoveResult, EngineError> {
        let limits = self.config.limits;
        self.best_move_with(board, side, &limits)
    }

    pub fn best_move_with(
        &mut self,
        board: &Board,
        side: Stone,
        limits: &SearchLimits,
    ) -> Result<MoveResult, EngineError> {
        self.best_move(board, side, limits.time_budget_ms, limits.max_depth)
    }

    /// Strongest move for `side` within the budget.
    ///
    /// Errors only when no move can exist: the board is full or `side` is
    /// `Stone::Empty`. The caller's board is never modified.
    pub fn best_move(
        &mut self,
        board: &Board,
        side: Stone,
        time_budget_ms: u64,
        max_depth: u32,
    ) -> Result<MoveResult, EngineError> {
        let start = Instant::now();
        if side == Stone::Empty {
            return Err(EngineError::EmptySideToMove);
        }
        if board.is_full() {
            return Err(EngineError::NoLegalMoves);
        }
        let max_depth = max_depth.clamp(1, MAX_SEARCH_DEPTH);

        let mut result = self.decide(board, side, start, time_budget_ms, max_depth)?;
        result.time_ms = start.elapsed().as_millis() as u64;
        debug_assert!(board.is_empty(result.best_move));

        info!(
            "{side:?} plays {} via {}: score {} depth {} nodes {} {}ms",
            result.best_move,
            result.source,
            result.score,
            result.depth_reached,
            result.nodes,
            result.time_ms
        );
        Ok(result)
    }

    fn decide(
        &mut self,
        board: &Board,
        side: Stone,
        start: Instant,
        time_budget_ms: u64,
        max_depth: u32,
    ) -> Result<MoveResult, EngineError> {
        if self.config.use_opening_book && board.stone_count() < BOOK_PLY_LIMIT {
            if let Some(pos) = self.book.lookup(board, side) {
                let score = self.score_after(board, pos, side);
                return Ok(MoveResult::instant(pos, score, SearchType::OpeningBook, 0.5));
            }
        }

        if board.stone_count() as usize == TOTAL_CELLS - 1 {
            let pos = board.empty_cells().next().ok_or(EngineError::NoLegalMoves)?;
            let score = if has_five_at_pos(board, pos, side) {
                WIN_SCORE - 1
            } else {
                0
            };
            let mut result = MoveResult::instant(pos, score, SearchType::LastCell, 1.0);
            result.depth_reached = 1;
            result.nodes = 1;
            return Ok(result);
        }

        if let Some(tactic) = self.tactics.detect(board, side) {
            let score = if tactic.kind == TacticKind::Win {
                WIN_SCORE - 1
            } else {
                self.score_after(board, tactic.pos, side)
            };
            return Ok(MoveResult::instant(
                tactic.pos,
                score,
                SearchType::Tactic(tactic.kind),
                tactic_confidence(tactic.kind),
            ));
        }

        let budget = Duration::from_millis(time_budget_ms);
        let searched = SearchContext::new(
            board,
            side,
            &self.zobrist,
            &mut self.tt,
            self.orderer,
            start,
            budget,
        )
        .iterate(max_depth);

        if let Some(found) = searched {
            return Ok(MoveResult::from_search(found, max_depth));
        }

        let pos = fallback_cell(board).ok_or(EngineError::NoLegalMoves)?;
        let score = self.score_after(board, pos, side);
        Ok(MoveResult::instant(pos, score, SearchType::Fallback, 0.1))
    }

    /// Static evaluation after `side` plays `pos`.
    fn score_after(&self, board: &Board, pos: Pos, side: Stone) -> i32 {
        let mut after = board.clone();
        after.place(pos, side);
        self.evaluator.evaluate_position(&after, side)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Relevant empty cell nearest the center, ties by index.
fn fallback_cell(board: &Board) -> Option<Pos> {
    candidate_cells(board)
        .into_iter()
        .chain(board.empty_cells())
        .filter(|&p| board.is_empty(p))
        .min_by_key(|&p| (p.center_distance(), p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    fn board_from(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, s) in stones {
            board.place(Pos::new(r, c), s);
        }
        board
    }

    /// Full board without any five; every run is at most two long.
    fn nearly_full(hole: Pos) -> Board {
        let mut board = Board::new();
        for idx in 0..TOTAL_CELLS {
            let p = Pos::from_index(idx);
            if p == hole {
                continue;
            }
            let stone = if (p.col / 2 + p.row) % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            };
            board.place(p, stone);
        }
        board
    }

    #[test]
    fn test_engine_empty_board() {
        let mut engine = SearchEngine::new();
        let result = engine.best_move(&Board::new(), Stone::Black, 500, 4).unwrap();
        assert_eq!(result.best_move, Pos::center());
        assert_eq!(result.source, SearchType::OpeningBook);
        assert_eq!(result.depth_reached, 0);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_engine_empty_board_without_book() {
        let config = EngineConfig {
            use_opening_book: false,
            ..EngineConfig::default()
        };
        let mut engine = SearchEngine::with_config(config);
        let result = engine.best_move(&Board::new(), Stone::Black, 2_000, 2).unwrap();
        assert_eq!(result.best_move, Pos::center());
        assert_eq!(result.source, SearchType::AlphaBeta);
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let mut engine = SearchEngine::new();
        let board = board_from(&[
            (7, 4, Stone::Black),
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (8, 4, Stone::White),
            (8, 5, Stone::White),
            (8, 6, Stone::White),
            (8, 7, Stone::White),
        ]);
        let result = engine.best_move(&board, Stone::Black, 1_000, 6).unwrap();
        assert!(result.best_move == Pos::new(7, 3) || result.best_move == Pos::new(7, 8));
        assert_eq!(result.source, SearchType::Tactic(TacticKind::Win));
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_engine_blocks_opponent_win() {
        let mut engine = SearchEngine::new();
        let board = board_from(&[
            (7, 4, Stone::White),
            (7, 5, Stone::White),
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (9, 9, Stone::Black),
            (3, 3, Stone::Black),
            (11, 2, Stone::Black),
        ]);
        let result = engine.best_move(&board, Stone::Black, 1_000, 6).unwrap();
        assert!(result.best_move == Pos::new(7, 3) || result.best_move == Pos::new(7, 8));
        assert_eq!(result.source, SearchType::Tactic(TacticKind::BlockFive));
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_engine_rejects_full_board_and_empty_side() {
        let mut engine = SearchEngine::new();
        let mut full = nearly_full(Pos::new(0, 0));
        full.place(Pos::new(0, 0), Stone::Black);
        assert_eq!(
            engine.best_move(&full, Stone::White, 100, 2),
            Err(EngineError::NoLegalMoves)
        );
        assert_eq!(
            engine.best_move(&Board::new(), Stone::Empty, 100, 2),
            Err(EngineError::EmptySideToMove)
        );
    }

    #[test]
    fn test_engine_last_cell() {
        let mut engine = SearchEngine::new();
        let hole = Pos::new(11, 4);
        let board = nearly_full(hole);
        let result = engine.best_move(&board, Stone::White, 1_000, 8).unwrap();
        assert_eq!(result.best_move, hole);
        assert_eq!(result.depth_reached, 1);
        assert_eq!(result.source, SearchType::LastCell);
    }

    #[test]
    fn test_engine_zero_budget_falls_back() {
        let mut engine = SearchEngine::new();
        let board = board_from(&[
            (7, 7, Stone::Black),
            (9, 8, Stone::Black),
            (8, 9, Stone::White),
            (6, 8, Stone::White),
        ]);
        let result = engine.best_move(&board, Stone::Black, 0, 6).unwrap();
        assert_eq!(result.source, SearchType::Fallback);
        assert!(board.is_empty(result.best_move));
        // nearest empty candidates to the center are at distance 1
        assert_eq!(result.best_move.center_distance(), 1);
        assert_eq!(result.depth_reached, 0);
    }

    #[test]
    fn test_engine_searches_quiet_position() {
        let mut engine = SearchEngine::new();
        let board = board_from(&[
            (7, 7, Stone::Black),
            (9, 8, Stone::Black),
            (8, 9, Stone::White),
            (6, 8, Stone::White),
        ]);
        let result = engine.best_move(&board, Stone::Black, 10_000, 3).unwrap();
        assert_eq!(result.source, SearchType::AlphaBeta);
        assert_eq!(result.depth_reached, 3);
        assert!(result.nodes > 0);
        assert!(board.is_empty(result.best_move));
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
        assert!(engine.tt_stats().used > 0);
    }

    #[test]
    fn test_engine_new_game_clears_tt() {
        let mut engine = SearchEngine::with_config(EngineConfig::for_difficulty(Difficulty::Easy));
        let board = board_from(&[
            (7, 7, Stone::Black),
            (9, 8, Stone::Black),
            (8, 9, Stone::White),
            (6, 8, Stone::White),
        ]);
        engine.best_move_default(&board, Stone::Black).unwrap();
        assert!(engine.tt_stats().used > 0);
        engine.new_game();
        assert_eq!(engine.tt_stats().used, 0);
    }

    #[test]
    fn test_engine_does_not_touch_board() {
        let mut engine = SearchEngine::new();
        let board = board_from(&[
            (7, 7, Stone::Black),
            (9, 8, Stone::Black),
            (8, 9, Stone::White),
            (6, 8, Stone::White),
        ]);
        let before = board.clone();
        engine.best_move(&board, Stone::White, 2_000, 3).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_engine_alternating_colors() {
        let mut engine = SearchEngine::new();
        let mut board = Board::new();
        let mut side = Stone::Black;
        for _ in 0..8 {
            let result = engine.best_move(&board, side, 500, 3).unwrap();
            assert!(board.is_empty(result.best_move));
            board.place(result.best_move, side);
            side = side.opponent();
        }
        assert_eq!(board.stone_count(), 8);
    }

    #[test]
    fn test_search_type_display() {
        assert_eq!(SearchType::OpeningBook.to_string(), "opening book");
        assert_eq!(SearchType::Tactic(TacticKind::BlockFour).to_string(), "tactic (BlockFour)");
        assert_ne!(SearchType::AlphaBeta, SearchType::Fallback);
    }
}
