//! Pattern scores and the directional line scan
//!
//! A pattern is the contiguous run of one player's stones through a cell along
//! one axis, plus how many of the two cells just beyond the run are empty.

use crate::board::{Board, Pos, Stone};

/// Pattern scores for evaluation, strictly decreasing with threat severity.
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 1_000_000;
    /// Open four: _OOOO_ (unstoppable)
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to extend)
    pub const CLOSED_FOUR: i32 = 50_000;
    /// Open three or better in two directions through one stone (fork)
    pub const DOUBLE_OPEN_THREE: i32 = 40_000;
    /// Open three: _OOO_ (becomes open four if not blocked)
    pub const OPEN_THREE: i32 = 10_000;
    /// Closed three: XOOO_ or _OOOX
    pub const CLOSED_THREE: i32 = 1_500;
    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 1_000;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 200;
}

/// A run of same-colored stones along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Stones in the contiguous run, capped at 5.
    pub run_length: u8,
    /// Empty cells immediately beyond each end (0..=2). Board edges are closed.
    pub open_ends: u8,
}

impl Pattern {
    /// Scan the run through `pos` along `(dr, dc)` as if `pos` held `stone`.
    ///
    /// `pos` itself is never read, so this measures both existing stones and
    /// hypothetical placements.
    pub fn scan(board: &Board, pos: Pos, (dr, dc): (i32, i32), stone: Stone) -> Self {
        let (fwd, fwd_open) = walk(board, pos, dr, dc, stone);
        let (back, back_open) = walk(board, pos, -dr, -dc, stone);
        Self {
            run_length: (1 + fwd + back).min(5),
            open_ends: u8::from(fwd_open) + u8::from(back_open),
        }
    }

    #[inline]
    pub fn is_five(self) -> bool {
        self.run_length >= 5
    }

    /// Four that still has room to become five.
    #[inline]
    pub fn is_live_four(self) -> bool {
        self.run_length == 4 && self.open_ends >= 1
    }

    #[inline]
    pub fn is_open_four(self) -> bool {
        self.run_length == 4 && self.open_ends == 2
    }

    #[inline]
    pub fn is_open_three(self) -> bool {
        self.run_length == 3 && self.open_ends == 2
    }

    /// Open three, any live four, or five: the threats that count toward a fork.
    #[inline]
    pub fn is_fork_grade(self) -> bool {
        self.is_five() || self.is_live_four() || self.is_open_three()
    }

    /// Score from the pattern table. Dead runs (no open end) are worthless.
    pub fn value(self) -> i32 {
        match (self.run_length, self.open_ends) {
            (5.., _) => PatternScore::FIVE,
            (_, 0) => 0,
            (4, 2) => PatternScore::OPEN_FOUR,
            (4, _) => PatternScore::CLOSED_FOUR,
            (3, 2) => PatternScore::OPEN_THREE,
            (3, _) => PatternScore::CLOSED_THREE,
            (2, 2) => PatternScore::OPEN_TWO,
            (2, _) => PatternScore::CLOSED_TWO,
            _ => 0,
        }
    }
}

/// Count `stone` cells stepping away from `pos`, then report whether the
/// first cell past the run is an on-board empty.
#[inline]
fn walk(board: &Board, pos: Pos, dr: i32, dc: i32, stone: Stone) -> (u8, bool) {
    let mut n = 0u8;
    loop {
        match pos.offset(dr, dc, i32::from(n) + 1) {
            Some(next) if board.get(next) == stone => n += 1,
            Some(next) => return (n, board.get(next) == Stone::Empty),
            None => return (n, false),
        }
    }
}
