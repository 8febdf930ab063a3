//! Candidate generation and move ordering
//!
//! Candidates are the empty cells near existing stones. The set searched at a
//! node is fixed by pattern importance alone; killer and history scores only
//! reorder that set, so they change how fast a search converges and never
//! which moves it looks at.

use crate::board::{Bitboard, Board, Pos, Stone, BOARD_SIZE};
use crate::eval::PatternEvaluator;

use super::MAX_PLY;

/// Chebyshev radius around existing stones that candidates are drawn from.
pub const CANDIDATE_RADIUS: i32 = 2;

/// Candidates kept per node after importance ranking.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 24;

/// Two most recent cutoff moves per ply.
#[derive(Debug, Clone)]
pub struct KillerTable {
    slots: [[Option<Pos>; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    /// Record a cutoff move, pushing the older killer to the second slot.
    pub fn record(&mut self, ply: usize, pos: Pos) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != Some(pos) {
            slot[1] = slot[0];
            slot[0] = Some(pos);
        }
    }

    /// 0 for the primary killer, 1 for the secondary, `None` otherwise.
    #[inline]
    pub fn rank(&self, ply: usize, pos: Pos) -> Option<usize> {
        self.slots
            .get(ply)?
            .iter()
            .position(|&k| k == Some(pos))
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Cutoff counts per cell, weighted by depth squared.
#[derive(Debug, Clone)]
pub struct HistoryTable {
    scores: [[i32; BOARD_SIZE]; BOARD_SIZE],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            scores: [[0; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    #[inline]
    pub fn record(&mut self, pos: Pos, depth: i32) {
        let cell = &mut self.scores[pos.row as usize][pos.col as usize];
        *cell = cell.saturating_add(depth * depth);
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> i32 {
        self.scores[pos.row as usize][pos.col as usize]
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Every empty cell within [`CANDIDATE_RADIUS`] of a stone, in row-major
/// order. An empty board yields the center only.
pub fn candidate_cells(board: &Board) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![Pos::center()];
    }
    let mut near = Bitboard::new();
    for stone in board.occupied() {
        for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                if let Some(p) = stone.offset(dr, dc, 1) {
                    if board.is_empty(p) {
                        near.set(p);
                    }
                }
            }
        }
    }
    near.iter_ones().collect()
}

/// Produces the ordered move list for a node.
#[derive(Debug, Clone, Copy)]
pub struct MoveOrderer {
    evaluator: PatternEvaluator,
    limit: usize,
}

impl MoveOrderer {
    pub fn new(evaluator: PatternEvaluator, limit: usize) -> Self {
        Self {
            evaluator,
            limit: limit.max(1),
        }
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn evaluator(&self) -> PatternEvaluator {
        self.evaluator
    }

    /// The top candidates by importance, highest first, ties by cell index.
    pub fn ranked_candidates(&self, board: &Board, side: Stone) -> Vec<(Pos, i32)> {
        let mut scored: Vec<(Pos, i32)> = candidate_cells(board)
            .into_iter()
            .map(|p| (p, self.evaluator.evaluate_move_importance(board, p, side)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.limit);
        scored
    }

    /// Candidates for `side` at `ply`, best first.
    ///
    /// `first` (hash move or previous best) leads when it is in the candidate
    /// set, then killers, then history score, then importance.
    pub fn ordered_moves(
        &self,
        board: &Board,
        side: Stone,
        ply: usize,
        killers: &KillerTable,
        history: &HistoryTable,
        first: Option<Pos>,
    ) -> Vec<Pos> {
        let mut ranked = self.ranked_candidates(board, side);
        ranked.sort_by_cached_key(|&(pos, importance)| {
            (
                Some(pos) != first,
                killers.rank(ply, pos).unwrap_or(2),
                std::cmp::Reverse(history.get(pos)),
                std::cmp::Reverse(importance),
                pos,
            )
        });
        ranked.into_iter().map(|(pos, _)| pos).collect()
    }
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new(PatternEvaluator::default(), DEFAULT_CANDIDATE_LIMIT)
    }
}
