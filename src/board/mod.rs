//! Board representation for Gomoku

pub mod bitboard;
pub mod board;


use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, WinCheck};

/// Board size (15x15)
pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 225

/// The four line axes: horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Cell contents, doubling as the player symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Index into per-player tables (Black = 0, White = 1).
    #[inline]
    pub(crate) fn index(self) -> usize {
        debug_assert!(self != Stone::Empty);
        match self {
            Stone::White => 1,
            _ => 0,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }

    pub fn from_symbol(c: char) -> Option<Stone> {
        match c {
            '.' | '+' | '-' => Some(Stone::Empty),
            'X' | 'x' | 'B' | 'b' => Some(Stone::Black),
            'O' | 'o' | 'W' | 'w' => Some(Stone::White),
            _ => None,
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// The central cell (7, 7).
    #[inline]
    pub const fn center() -> Self {
        Self {
            row: (BOARD_SIZE / 2) as u8,
            col: (BOARD_SIZE / 2) as u8,
        }
    }

    /// Checked constructor from signed coordinates.
    #[inline]
    pub fn try_new(row: i32, col: i32) -> Option<Self> {
        if Self::is_valid(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Step `n` cells along `(dr, dc)`, `None` when leaving the board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, n: i32) -> Option<Self> {
        Self::try_new(i32::from(self.row) + dr * n, i32::from(self.col) + dc * n)
    }

    /// Manhattan distance to the center cell.
    #[inline]
    pub fn center_distance(self) -> i32 {
        let c = Self::center();
        (i32::from(self.row) - i32::from(c.row)).abs() + (i32::from(self.col) - i32::from(c.col)).abs()
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl FromStr for Pos {
    type Err = EngineError;

    /// Parses `row:col` (also accepts `row,col`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EngineError::Parse(format!("invalid position `{s}`, expected row:col"));
        let (r, c) = s.trim().split_once(|ch: char| ch == ':' || ch == ',').ok_or_else(bad)?;
        let row: i32 = r.trim().parse().map_err(|_| bad())?;
        let col: i32 = c.trim().parse().map_err(|_| bad())?;
        Pos::try_new(row, col)
            .ok_or_else(|| EngineError::Parse(format!("position {row}:{col} is off the board")))
    }
}

/// A placed stone with its sequence number in the game record.
///
/// The engine itself never stores moves; `seq` exists for the caller's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub pos: Pos,
    pub stone: Stone,
    pub seq: u32,
}

impl Move {
    #[inline]
    pub fn new(pos: Pos, stone: Stone, seq: u32) -> Self {
        Self { pos, stone, seq }
    }
}
