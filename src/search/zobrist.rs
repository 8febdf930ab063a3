//! Zobrist hashing for position identification
//!
//! Each (cell, color) pair gets a random 64-bit key. The stone hash of a board
//! is the XOR of the keys of every stone on it, so placing a stone and taking
//! it back again are the same O(1) update.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::search::ZobristTable;
//!
//! let zt = ZobristTable::with_seed(42);
//! let mut board = Board::new();
//! let empty = zt.hash(&board);
//!
//! let pos = Pos::new(7, 7);
//! board.place(pos, Stone::Black);
//! let incremental = zt.update(empty, pos, Stone::Black);
//! assert_eq!(incremental, zt.hash(&board));
//!
//! // Removing XORs the same key back out
//! assert_eq!(zt.update(incremental, pos, Stone::Black), empty);
//! ```

use std::sync::{Arc, OnceLock};

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::{Board, Pos, Stone, TOTAL_CELLS};

/// Seed of the process-wide table.
pub const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

static SHARED: OnceLock<Arc<ZobristTable>> = OnceLock::new();

/// Random keys for every (cell, color), plus the two search-key components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristTable {
    cells: [[u64; 2]; TOTAL_CELLS],
    side_to_move: [u64; 2],
    perspective: [u64; 2],
}

impl ZobristTable {
    /// Build a table from a seed. The same seed always yields the same keys.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut cells = [[0u64; 2]; TOTAL_CELLS];
        for cell in &mut cells {
            cell[0] = rng.next_u64();
            cell[1] = rng.next_u64();
        }
        let side_to_move = [rng.next_u64(), rng.next_u64()];
        let perspective = [rng.next_u64(), rng.next_u64()];
        Self {
            cells,
            side_to_move,
            perspective,
        }
    }

    /// Process-wide read-only table built from [`DEFAULT_SEED`] on first use.
    pub fn shared() -> Arc<ZobristTable> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::with_seed(DEFAULT_SEED))))
    }

    /// Key of one stone. `Stone::Empty` has no key.
    #[inline]
    pub fn key(&self, pos: Pos, stone: Stone) -> u64 {
        match stone {
            Stone::Empty => 0,
            _ => self.cells[pos.to_index()][stone.index()],
        }
    }

    /// Full recomputation: XOR of every present stone's key.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let black = board.black.iter_ones().map(|p| self.key(p, Stone::Black));
        let white = board.white.iter_ones().map(|p| self.key(p, Stone::White));
        black.chain(white).fold(0, |h, k| h ^ k)
    }

    /// Toggle one stone in or out of `hash`.
    #[inline]
    #[must_use]
    pub fn update(&self, hash: u64, pos: Pos, stone: Stone) -> u64 {
        hash ^ self.key(pos, stone)
    }

    /// Transposition key for a node.
    ///
    /// Scores are stored from the root player's point of view, so the same
    /// stones with a different mover or a different root player must not share
    /// an entry. A null move changes the mover without changing the stones.
    #[inline]
    pub fn search_key(&self, stone_hash: u64, to_move: Stone, root: Stone) -> u64 {
        stone_hash ^ self.side_to_move[to_move.index()] ^ self.perspective[root.index()]
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}
