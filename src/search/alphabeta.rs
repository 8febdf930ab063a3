//! Alpha-Beta search with iterative deepening and transposition table
//!
//! Minimax with an explicit maximizing flag rather than negamax: the
//! evaluation weighs the two sides differently, so every score is kept from
//! the root player's point of view and the two node kinds mirror each other.
//!
//! # Features
//!
//! - Iterative deepening with aspiration windows from depth 4
//! - Transposition table keyed by stones, mover and root player
//! - Principal variation search with late move reduction for quiet moves
//! - Null-move pruning at non-PV nodes when the mover is not under threat
//! - Killer and history move ordering scoped to one search
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::search::{MoveOrderer, SearchContext, TranspositionTable, ZobristTable};
//!
//! let mut board = Board::new();
//! board.place(Pos::new(7, 7), Stone::Black);
//! board.place(Pos::new(8, 8), Stone::White);
//!
//! let zobrist = ZobristTable::shared();
//! let mut tt = TranspositionTable::new(1);
//! let mut ctx = SearchContext::new(
//!     &board,
//!     Stone::Black,
//!     &zobrist,
//!     &mut tt,
//!     MoveOrderer::default(),
//!     Instant::now(),
//!     Duration::from_secs(5),
//! );
//! let result = ctx.iterate(2).expect("depth 1 completes");
//! assert!(board.is_empty(result.best_move));
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::eval::{Pattern, PatternEvaluator};
use crate::rules::has_five_at_pos;

use super::ordering::{candidate_cells, HistoryTable, KillerTable, MoveOrderer};
use super::{is_mate_score, EntryType, TranspositionTable, ZobristTable, INF, MAX_PLY, WIN_SCORE};

/// Aspiration half-width around the previous iteration's score
const ASPIRATION_WINDOW: i32 = 5_000;
/// Aspiration windows start above this depth
const ASPIRATION_MIN_DEPTH: i32 = 3;
/// Null-move depth reduction
const NULL_MOVE_R: i32 = 3;
const NULL_MOVE_MIN_DEPTH: i32 = 4;
/// Moves ranked at or after this index may be reduced
const LMR_MIN_INDEX: usize = 4;
const LMR_MIN_DEPTH: i32 = 3;
/// Start another iteration only before this share of the budget is spent
const SOFT_LIMIT_RATIO: f64 = 0.8;
/// Clock is read once every 1024 nodes
const TIME_CHECK_MASK: u64 = 1023;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    pub tt_probes: u64,
    /// Probes that returned a usable score
    pub tt_hits: u64,
    pub null_prunes: u64,
    /// Reduced moves that beat the bound and were searched again at full depth
    pub lmr_researches: u64,
    pub aspiration_researches: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Outcome of the last fully completed iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Pos,
    /// Score from the root player's point of view
    pub score: i32,
    /// Depth of the last completed iteration
    pub depth: u32,
    pub nodes: u64,
    pub stats: SearchStats,
}

/// Selective parts of the search that can be switched off. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFeatures {
    pub null_move: bool,
    pub late_move_reduction: bool,
    pub aspiration: bool,
}

impl SearchFeatures {
    /// Plain alpha-beta with PVS: no pruning beyond the window, no reductions.
    pub const fn plain() -> Self {
        Self {
            null_move: false,
            late_move_reduction: false,
            aspiration: false,
        }
    }
}

impl Default for SearchFeatures {
    fn default() -> Self {
        Self {
            null_move: true,
            late_move_reduction: true,
            aspiration: true,
        }
    }
}

/// How sharp a move is, decided before it is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveClass {
    Quiet,
    /// Creates or blocks one three-or-better line
    Forcing,
    /// Creates or blocks two or more at once
    Threat,
}

/// All mutable state of one `best_move` call.
///
/// Holds a private copy of the board and borrows the session's transposition
/// table, opening a new table generation so nothing from an earlier call is
/// trusted. Killers and history start empty and are dropped with the context.
pub struct SearchContext<'a> {
    board: Board,
    root: Stone,
    hash: u64,
    zobrist: &'a ZobristTable,
    tt: &'a mut TranspositionTable,
    evaluator: PatternEvaluator,
    orderer: MoveOrderer,
    killers: KillerTable,
    history: HistoryTable,
    features: SearchFeatures,
    start: Instant,
    budget: Duration,
    aborted: bool,
    nodes: u64,
    stats: SearchStats,
}

impl<'a> SearchContext<'a> {
    /// `start` is when the caller's clock began; the budget counts from there.
    pub fn new(
        board: &Board,
        root: Stone,
        zobrist: &'a ZobristTable,
        tt: &'a mut TranspositionTable,
        orderer: MoveOrderer,
        start: Instant,
        budget: Duration,
    ) -> Self {
        tt.new_search();
        Self {
            board: board.clone(),
            root,
            hash: zobrist.hash(board),
            zobrist,
            tt,
            evaluator: orderer.evaluator(),
            orderer,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            features: SearchFeatures::default(),
            start,
            budget,
            aborted: false,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn with_features(mut self, features: SearchFeatures) -> Self {
        self.features = features;
        self
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[inline]
    fn out_of_time(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    /// Iterative deepening from depth 1 to `max_depth`.
    ///
    /// Returns the last iteration that finished inside the budget, or `None`
    /// when not even depth 1 completed. An aborted iteration is discarded.
    pub fn iterate(&mut self, max_depth: u32) -> Option<SearchResult> {
        let soft_limit = self.budget.mul_f64(SOFT_LIMIT_RATIO);
        let mut best: Option<SearchResult> = None;

        for depth in 1..=max_depth.max(1) {
            if depth > 1 && self.start.elapsed() >= soft_limit {
                debug!("stopping before depth {depth}: soft limit reached");
                break;
            }
            let d = depth as i32;
            let prev_move = best.as_ref().map(|r| r.best_move);

            let (alpha, beta) = match &best {
                Some(prev)
                    if self.features.aspiration
                        && d > ASPIRATION_MIN_DEPTH
                        && !is_mate_score(prev.score) =>
                {
                    (prev.score - ASPIRATION_WINDOW, prev.score + ASPIRATION_WINDOW)
                }
                _ => (-INF, INF),
            };

            let mut outcome = self.search_root(d, alpha, beta, prev_move);
            if let Some((score, _)) = outcome {
                if alpha > -INF && (score <= alpha || score >= beta) {
                    debug!("depth {depth}: aspiration fail ({score} outside {alpha}..{beta}), re-searching");
                    self.stats.aspiration_researches += 1;
                    outcome = self.search_root(d, -INF, INF, prev_move);
                }
            }

            let Some((score, best_move)) = outcome else {
                debug!("depth {depth} aborted after {} nodes", self.nodes);
                break;
            };

            debug!(
                "depth {depth}: best {best_move} score {score} nodes {} time {}ms",
                self.nodes,
                self.start.elapsed().as_millis()
            );
            best = Some(SearchResult {
                best_move,
                score,
                depth,
                nodes: self.nodes,
                stats: self.stats.clone(),
            });

            if score >= WIN_SCORE - MAX_PLY as i32 {
                debug!("forced win found at depth {depth}");
                break;
            }
        }

        if let Some(result) = &mut best {
            result.nodes = self.nodes;
            result.stats = self.stats.clone();
        }
        best
    }

    /// One root pass. `None` if time ran out before every move was searched.
    fn search_root(
        &mut self,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        prev_best: Option<Pos>,
    ) -> Option<(i32, Pos)> {
        let side = self.root;
        let key = self.zobrist.search_key(self.hash, side, self.root);
        let first = prev_best.or_else(|| self.tt.best_move(key));
        let moves = self.orderer.ordered_moves(
            &self.board,
            side,
            0,
            &self.killers,
            &self.history,
            first,
        );

        let orig_alpha = alpha;
        let mut best_move = *moves.first()?;
        let mut best_score = -INF;

        for (i, &mv) in moves.iter().enumerate() {
            if self.out_of_time() {
                self.aborted = true;
            }
            if self.aborted {
                return None;
            }

            let score = self.search_move(mv, side, depth, 0, alpha, beta, i);
            if self.aborted {
                return None;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let entry_type = bound_type(best_score, orig_alpha, beta);
        self.tt.store(key, depth, best_score, entry_type, Some(best_move), 0);
        Some((best_score, best_move))
    }

    /// Minimax node. `maximizing` is true when the root player is to move.
    fn minimax(
        &mut self,
        depth: i32,
        ply: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        allow_null: bool,
    ) -> i32 {
        self.nodes += 1;
        if self.nodes & TIME_CHECK_MASK == 0 && self.out_of_time() {
            self.aborted = true;
        }
        if self.aborted {
            return 0;
        }

        if self.board.is_full() {
            return 0;
        }
        if depth <= 0 || ply >= MAX_PLY as i32 - 1 {
            return self.evaluator.evaluate_position(&self.board, self.root);
        }

        let side = if maximizing {
            self.root
        } else {
            self.root.opponent()
        };
        let key = self.zobrist.search_key(self.hash, side, self.root);

        self.stats.tt_probes += 1;
        if let Some(score) = self.tt.probe(key, depth, alpha, beta, ply) {
            self.stats.tt_hits += 1;
            return score;
        }

        // Null move: hand the turn over and see if the bound still holds.
        let is_pv = beta - alpha > 1;
        if self.features.null_move
            && !is_pv
            && allow_null
            && depth >= NULL_MOVE_MIN_DEPTH
            && !self.is_threatened(side)
        {
            let reduced = depth - 1 - NULL_MOVE_R;
            if maximizing {
                let score = self.minimax(reduced, ply + 1, beta - 1, beta, false, false);
                if self.aborted {
                    return 0;
                }
                if score >= beta {
                    self.stats.null_prunes += 1;
                    return beta;
                }
            } else {
                let score = self.minimax(reduced, ply + 1, alpha, alpha + 1, true, false);
                if self.aborted {
                    return 0;
                }
                if score <= alpha {
                    self.stats.null_prunes += 1;
                    return alpha;
                }
            }
        }

        let tt_move = self.tt.best_move(key);
        let moves = self.orderer.ordered_moves(
            &self.board,
            side,
            ply as usize,
            &self.killers,
            &self.history,
            tt_move,
        );
        if moves.is_empty() {
            return self.evaluator.evaluate_position(&self.board, self.root);
        }

        let (orig_alpha, orig_beta) = (alpha, beta);
        let mut best_score = if maximizing { -INF } else { INF };
        let mut best_move = None;

        for (i, &mv) in moves.iter().enumerate() {
            let score = self.search_move(mv, side, depth, ply, alpha, beta, i);
            if self.aborted {
                return 0;
            }

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if alpha >= beta {
                self.stats.cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                self.killers.record(ply as usize, mv);
                self.history.record(mv, depth);
                break;
            }
        }

        let entry_type = bound_type(best_score, orig_alpha, orig_beta);
        self.tt.store(key, depth, best_score, entry_type, best_move, ply);
        best_score
    }

    /// Play `mv` for `side`, score the resulting position, take it back.
    #[allow(clippy::too_many_arguments)]
    fn search_move(
        &mut self,
        mv: Pos,
        side: Stone,
        depth: i32,
        ply: i32,
        alpha: i32,
        beta: i32,
        index: usize,
    ) -> i32 {
        let class = self.classify(mv, side);
        self.board.place(mv, side);
        self.hash = self.zobrist.update(self.hash, mv, side);

        let score = if has_five_at_pos(&self.board, mv, side) {
            self.win_score(side, ply + 1)
        } else {
            self.search_child(depth, ply + 1, alpha, beta, index, class, side == self.root)
        };

        self.board.remove(mv);
        self.hash = self.zobrist.update(self.hash, mv, side);
        debug_assert_eq!(self.hash, self.zobrist.hash(&self.board));
        score
    }

    /// Principal variation search of the child reached by a move at a node
    /// of kind `maximizing`. Later quiet moves are tried reduced first.
    #[allow(clippy::too_many_arguments)]
    fn search_child(
        &mut self,
        depth: i32,
        ply: i32,
        alpha: i32,
        beta: i32,
        index: usize,
        class: MoveClass,
        maximizing: bool,
    ) -> i32 {
        let full = depth - 1;
        let child = !maximizing;
        if index == 0 {
            return self.minimax(full, ply, alpha, beta, child, true);
        }

        // Threat moves are never reduced; neither are single forcing moves.
        let reduce = self.features.late_move_reduction
            && class == MoveClass::Quiet
            && index >= LMR_MIN_INDEX
            && depth >= LMR_MIN_DEPTH;
        let first_depth = if reduce { depth - 2 } else { full };

        if maximizing {
            let mut score = self.minimax(first_depth, ply, alpha, alpha + 1, child, true);
            if reduce && score > alpha && !self.aborted {
                self.stats.lmr_researches += 1;
                score = self.minimax(full, ply, alpha, alpha + 1, child, true);
            }
            if score > alpha && score < beta && !self.aborted {
                score = self.minimax(full, ply, alpha, beta, child, true);
            }
            score
        } else {
            let mut score = self.minimax(first_depth, ply, beta - 1, beta, child, true);
            if reduce && score < beta && !self.aborted {
                self.stats.lmr_researches += 1;
                score = self.minimax(full, ply, beta - 1, beta, child, true);
            }
            if score < beta && score > alpha && !self.aborted {
                score = self.minimax(full, ply, alpha, beta, child, true);
            }
            score
        }
    }

    /// Count the three-or-better lines `mv` creates for `side` or cuts for
    /// the opponent.
    fn classify(&self, mv: Pos, side: Stone) -> MoveClass {
        let opp = side.opponent();
        let lines: u32 = DIRECTIONS
            .iter()
            .map(|&dir| {
                let own = Pattern::scan(&self.board, mv, dir, side);
                let theirs = Pattern::scan(&self.board, mv, dir, opp);
                u32::from(own.run_length >= 3 && own.open_ends > 0)
                    + u32::from(theirs.run_length >= 4)
            })
            .sum();
        match lines {
            0 => MoveClass::Quiet,
            1 => MoveClass::Forcing,
            _ => MoveClass::Threat,
        }
    }

    /// Whether the opponent of `side` could make five or an open four next
    /// move. Passing in such a position would be suicidal.
    fn is_threatened(&self, side: Stone) -> bool {
        let opp = side.opponent();
        candidate_cells(&self.board).into_iter().any(|cell| {
            has_five_at_pos(&self.board, cell, opp)
                || DIRECTIONS
                    .iter()
                    .any(|&dir| Pattern::scan(&self.board, cell, dir, opp).is_open_four())
        })
    }

    /// Score of a five made by `side` at `ply`.
    #[inline]
    fn win_score(&self, side: Stone, ply: i32) -> i32 {
        let score = WIN_SCORE - ply;
        if side == self.root {
            score
        } else {
            -score
        }
    }
}

#[inline]
fn bound_type(score: i32, alpha: i32, beta: i32) -> EntryType {
    if score <= alpha {
        EntryType::UpperBound
    } else if score >= beta {
        EntryType::LowerBound
    } else {
        EntryType::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::new();
        for &(r, c, s) in stones {
            board.place(Pos::new(r, c), s);
        }
        board
    }

    fn search(board: &Board, side: Stone, depth: u32) -> (Option<SearchResult>, TranspositionTable) {
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(1);
        let result = {
            let mut ctx = SearchContext::new(
                board,
                side,
                &zobrist,
                &mut tt,
                MoveOrderer::default(),
                Instant::now(),
                Duration::from_secs(60),
            );
            ctx.iterate(depth)
        };
        (result, tt)
    }

    #[test]
    fn test_search_finds_winning_move() {
        let board = board_from(&[
            (7, 4, Stone::Black),
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 3, Stone::White),
            (8, 8, Stone::White),
            (9, 9, Stone::White),
        ]);
        let result = search(&board, Stone::Black, 4).0.unwrap();
        assert_eq!(result.best_move, Pos::new(7, 8));
        assert_eq!(result.score, WIN_SCORE - 1);
        assert_eq!(result.depth, 1, "a win at depth 1 ends the deepening");
    }

    #[test]
    fn test_search_blocks_opponent_win() {
        let board = board_from(&[
            (7, 3, Stone::White),
            (7, 4, Stone::White),
            (7, 5, Stone::White),
            (7, 6, Stone::White),
            (7, 2, Stone::Black),
            (9, 9, Stone::Black),
        ]);
        let result = search(&board, Stone::Black, 2).0.unwrap();
        assert_eq!(result.best_move, Pos::new(7, 7));
        assert!(!is_mate_score(result.score));
    }

    #[test]
    fn test_search_open_three_wins_in_three() {
        let board = board_from(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (0, 0, Stone::White),
            (14, 14, Stone::White),
        ]);
        let result = search(&board, Stone::Black, 3).0.unwrap();
        assert!(result.best_move == Pos::new(7, 5) || result.best_move == Pos::new(7, 9));
        assert_eq!(result.score, WIN_SCORE - 3);
    }

    #[test]
    fn test_search_losing_side_prefers_longest_loss() {
        // White to move cannot stop Black's open four; the score must be a
        // loss, found at the deepest ply available.
        let board = board_from(&[
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (0, 0, Stone::White),
            (0, 14, Stone::White),
        ]);
        let result = search(&board, Stone::White, 2).0.unwrap();
        assert_eq!(result.score, -(WIN_SCORE - 2));
        assert!(result.best_move == Pos::new(7, 4) || result.best_move == Pos::new(7, 9));
    }

    #[test]
    fn test_search_fills_tt_and_counts_nodes() {
        let board = board_from(&[(7, 7, Stone::Black), (8, 8, Stone::White), (6, 8, Stone::Black)]);
        let (result, tt) = search(&board, Stone::White, 3);
        let result = result.unwrap();
        assert_eq!(result.depth, 3);
        assert!(result.nodes > 0);
        assert!(result.stats.tt_probes > 0);
        assert!(tt.stats().used > 0);
        assert!(board.is_empty(result.best_move));
    }

    #[test]
    fn test_zero_budget_completes_nothing() {
        let board = board_from(&[(7, 7, Stone::Black)]);
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(1);
        let mut ctx = SearchContext::new(
            &board,
            Stone::White,
            &zobrist,
            &mut tt,
            MoveOrderer::default(),
            Instant::now(),
            Duration::ZERO,
        );
        assert_eq!(ctx.iterate(5), None);
    }

    #[test]
    fn test_classify_move_kinds() {
        let board = board_from(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (5, 9, Stone::White),
            (6, 9, Stone::White),
            (7, 9, Stone::White),
        ]);
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(1);
        let ctx = SearchContext::new(
            &board,
            Stone::Black,
            &zobrist,
            &mut tt,
            MoveOrderer::default(),
            Instant::now(),
            Duration::from_secs(1),
        );
        assert_eq!(ctx.classify(Pos::new(0, 0), Stone::Black), MoveClass::Quiet);
        // extends the black pair to three
        assert_eq!(ctx.classify(Pos::new(7, 5), Stone::Black), MoveClass::Forcing);
        // caps White's vertical three
        assert_eq!(ctx.classify(Pos::new(8, 9), Stone::Black), MoveClass::Forcing);
        // closed three against the white stone at (7,9)
        assert_eq!(ctx.classify(Pos::new(7, 8), Stone::Black), MoveClass::Forcing);
    }

    #[test]
    fn test_threat_class_blocks_and_builds() {
        // (7,8) extends Black's pair to three and cuts White's vertical three
        let board = board_from(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (4, 8, Stone::White),
            (5, 8, Stone::White),
            (6, 8, Stone::White),
        ]);
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(1);
        let ctx = SearchContext::new(
            &board,
            Stone::Black,
            &zobrist,
            &mut tt,
            MoveOrderer::default(),
            Instant::now(),
            Duration::from_secs(1),
        );
        assert_eq!(ctx.classify(Pos::new(7, 8), Stone::Black), MoveClass::Threat);
    }

    #[test]
    fn test_threatened_by_open_three() {
        let board = board_from(&[
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (0, 0, Stone::Black),
        ]);
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(1);
        let ctx = SearchContext::new(
            &board,
            Stone::Black,
            &zobrist,
            &mut tt,
            MoveOrderer::default(),
            Instant::now(),
            Duration::from_secs(1),
        );
        assert!(ctx.is_threatened(Stone::Black));
        assert!(!ctx.is_threatened(Stone::White));
    }

    fn quiet_board() -> Board {
        board_from(&[
            (7, 7, Stone::Black),
            (9, 8, Stone::Black),
            (8, 9, Stone::White),
            (6, 8, Stone::White),
        ])
    }

    fn search_with(board: &Board, side: Stone, depth: u32, features: SearchFeatures) -> SearchResult {
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(16);
        SearchContext::new(
            board,
            side,
            &zobrist,
            &mut tt,
            MoveOrderer::default(),
            Instant::now(),
            Duration::from_secs(600),
        )
        .with_features(features)
        .iterate(depth)
        .unwrap()
    }

    #[test]
    fn test_plain_search_never_prunes_selectively() {
        let result = search_with(&quiet_board(), Stone::Black, 4, SearchFeatures::plain());
        assert_eq!(result.depth, 4);
        assert_eq!(result.stats.null_prunes, 0);
        assert_eq!(result.stats.lmr_researches, 0);
        assert_eq!(result.stats.aspiration_researches, 0);
    }

    #[test]
    fn test_selective_search_agrees_on_outcome() {
        let quiet = quiet_board();
        let full = search_with(&quiet, Stone::Black, 4, SearchFeatures::default());
        let plain = search_with(&quiet, Stone::Black, 4, SearchFeatures::plain());
        assert!(!is_mate_score(full.score));
        assert!(!is_mate_score(plain.score));
        assert!(quiet.is_empty(full.best_move) && quiet.is_empty(plain.best_move));

        let winning = board_from(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (0, 0, Stone::White),
            (14, 14, Stone::White),
        ]);
        let full = search_with(&winning, Stone::Black, 5, SearchFeatures::default());
        let plain = search_with(&winning, Stone::Black, 5, SearchFeatures::plain());
        assert_eq!(full.score, WIN_SCORE - 3);
        assert_eq!(plain.score, full.score);
    }

    #[test]
    fn test_no_new_iteration_past_soft_limit() {
        let board = quiet_board();
        let zobrist = ZobristTable::default();
        let budget = Duration::from_secs(10);
        let run = |spent: Duration, max_depth: u32| {
            let mut tt = TranspositionTable::new(1);
            let start = Instant::now().checked_sub(spent).unwrap();
            let mut ctx = SearchContext::new(
                &board,
                Stone::Black,
                &zobrist,
                &mut tt,
                MoveOrderer::default(),
                start,
                budget,
            );
            ctx.iterate(max_depth).unwrap()
        };

        // 85% spent: depth 1 always runs, depth 2 must not start
        assert_eq!(run(Duration::from_millis(8_500), 4).depth, 1);
        // 70% spent: there is still room for the next iteration
        assert_eq!(run(Duration::from_millis(7_000), 2).depth, 2);
    }

    #[test]
    fn test_new_context_ignores_previous_search() {
        let board = quiet_board();
        let zobrist = ZobristTable::default();
        let mut tt = TranspositionTable::new(16);
        let run = |tt: &mut TranspositionTable| {
            SearchContext::new(
                &board,
                Stone::Black,
                &zobrist,
                tt,
                MoveOrderer::default(),
                Instant::now(),
                Duration::from_secs(600),
            )
            .iterate(4)
            .unwrap()
        };
        let first = run(&mut tt);
        let again = run(&mut tt);
        assert_eq!(again.best_move, first.best_move);
        assert_eq!(again.score, first.score);
        assert_eq!(again.nodes, first.nodes);
    }

    #[test]
    fn test_stats_rates() {
        let stats = SearchStats {
            cutoffs: 10,
            first_move_cutoffs: 9,
            tt_probes: 4,
            tt_hits: 1,
            ..SearchStats::default()
        };
        assert!((stats.first_move_rate() - 90.0).abs() < 1e-9);
        assert!((stats.tt_hit_rate() - 25.0).abs() < 1e-9);
        assert_eq!(SearchStats::default().first_move_rate(), 0.0);
    }
}
