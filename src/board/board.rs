//! Board structure

use std::fmt;
use std::str::FromStr;

use super::bitboard::Bitboard;
use super::{Move, Pos, Stone, BOARD_SIZE, TOTAL_CELLS};
use crate::error::EngineError;
use crate::rules;

/// Outcome of a five-in-a-row check through one cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WinCheck {
    pub is_win: bool,
    /// The full contiguous run (five or longer) when `is_win`.
    pub winning_line: Option<Vec<Pos>>,
}

impl WinCheck {
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn line(line: Vec<Pos>) -> Self {
        Self {
            is_win: true,
            winning_line: Some(line),
        }
    }
}

/// 15x15 game board.
///
/// The search works on a private clone and only ever adds a stone and
/// removes that same stone again, so the caller's board is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Build a board from row-major cell data supplied by a caller.
    pub fn from_rows(rows: &[Vec<Stone>]) -> Result<Self, EngineError> {
        let cols = rows.iter().map(Vec::len).find(|&len| len != BOARD_SIZE);
        if rows.len() != BOARD_SIZE || cols.is_some() {
            return Err(EngineError::InvalidBoardDimension {
                rows: rows.len(),
                cols: cols.unwrap_or(BOARD_SIZE),
            });
        }

        let mut board = Self::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &stone) in row.iter().enumerate() {
                if stone != Stone::Empty {
                    board.place(Pos::new(r as u8, c as u8), stone);
                }
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Put `stone` on an empty cell.
    ///
    /// Placing on an occupied cell is a caller bug, checked in debug builds.
    #[inline]
    pub fn place(&mut self, pos: Pos, stone: Stone) {
        debug_assert!(self.is_empty(pos), "place on occupied cell {pos}");
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Take a stone back off (search backtracking only).
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        debug_assert!(!self.is_empty(pos), "remove from empty cell {pos}");
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Apply a recorded move and report whether it won the game.
    pub fn play(&mut self, mv: Move) -> Result<WinCheck, EngineError> {
        if mv.stone == Stone::Empty {
            return Err(EngineError::EmptySideToMove);
        }
        if !self.is_empty(mv.pos) {
            return Err(EngineError::Parse(format!(
                "move #{} at {} targets an occupied cell",
                mv.seq, mv.pos
            )));
        }
        self.place(mv.pos, mv.stone);
        Ok(self.check_win(mv.pos, mv.stone))
    }

    /// Check for a run of five or more of `stone` through `pos`.
    #[inline]
    pub fn check_win(&self, pos: Pos, stone: Stone) -> WinCheck {
        rules::check_win_at(self, pos, stone)
    }

    /// Full-board scan for a finished line.
    pub fn winner(&self) -> Option<Stone> {
        rules::find_winner(self)
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Iterate over every occupied cell, black first.
    pub fn occupied(&self) -> impl Iterator<Item = Pos> {
        self.black.iter_ones().chain(self.white.iter_ones())
    }

    /// Iterate over every empty cell in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(move |&p| self.is_empty(p))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_SIZE as u8 {
            let line: String = (0..BOARD_SIZE as u8)
                .map(|c| self.get(Pos::new(r, c)).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// Parse 15 rows of `.`/`X`/`O`; blank lines and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.into_iter()
                    .map(|c| {
                        Stone::from_symbol(c)
                            .ok_or_else(|| EngineError::Parse(format!("unknown cell symbol `{c}`")))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&rows)
    }
}
