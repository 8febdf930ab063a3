//! Transposition Table for caching search results
//!
//! Direct-mapped: each key maps to exactly one slot and every store overwrites
//! it. The table belongs to one game session, so stale entries from another
//! game can never be read.
//!
//! Every search starts a new generation with [`TranspositionTable::new_search`].
//! `probe` and `best_move` only see entries written in the current generation,
//! so repeating a question on a reused session repeats the answer.
//!
//! # Example
//!
//! ```
//! use gomoku::board::Pos;
//! use gomoku::search::{EntryType, TranspositionTable};
//!
//! let mut tt = TranspositionTable::new(1); // 1 MB
//! let key = 0x1234_5678_9ABC_DEF0;
//! tt.store(key, 5, 100, EntryType::Exact, Some(Pos::new(7, 7)), 0);
//!
//! assert_eq!(tt.probe(key, 5, -1000, 1000, 0), Some(100));
//! // A shallower cached result is never trusted for a deeper request
//! assert_eq!(tt.probe(key, 6, -1000, 1000, 0), None);
//! assert_eq!(tt.best_move(key), Some(Pos::new(7, 7)));
//! ```

use crate::board::Pos;

use super::{is_mate_score, WIN_SCORE};

/// How the stored score relates to the true value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - true score >= stored value (fail high)
    LowerBound,
    /// Upper bound - true score <= stored value (fail low)
    UpperBound,
}

/// Transposition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Full key, checked on lookup to reject index collisions
    pub hash: u64,
    /// Remaining depth the score was searched to
    pub depth: i32,
    /// Score, with win distances relative to this node
    pub score: i32,
    pub entry_type: EntryType,
    pub best_move: Option<Pos>,
    /// Search that wrote the entry
    pub generation: u32,
}

/// Usage statistics for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTStats {
    pub size: usize,
    pub used: usize,
    pub usage_percent: f64,
}

pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
    generation: u32,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes (at least 1024 slots).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = ((size_mb * 1024 * 1024) / entry_size).max(1024);
        Self {
            entries: vec![None; size],
            size,
            generation: 0,
        }
    }

    /// Start a new search; entries from earlier searches stop counting.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// Raw entry for `hash`, if this slot holds it, from any generation.
    #[must_use]
    pub fn lookup(&self, hash: u64) -> Option<TTEntry> {
        self.entries[self.index(hash)].filter(|e| e.hash == hash)
    }

    #[inline]
    fn current(&self, hash: u64) -> Option<TTEntry> {
        self.lookup(hash).filter(|e| e.generation == self.generation)
    }

    /// Score usable at this node, if any.
    ///
    /// The entry must have been searched at least `depth` deep, and a bound
    /// is only returned when it already settles the `(alpha, beta)` window.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: i32, alpha: i32, beta: i32, ply: i32) -> Option<i32> {
        let entry = self.current(hash)?;
        if entry.depth < depth {
            return None;
        }
        let score = score_from_tt(entry.score, ply);
        match entry.entry_type {
            EntryType::Exact => Some(score),
            EntryType::LowerBound if score >= beta => Some(score),
            EntryType::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }

    /// Best move recorded for `hash` in this search, at any depth. Used for
    /// move ordering.
    #[must_use]
    pub fn best_move(&self, hash: u64) -> Option<Pos> {
        self.current(hash).and_then(|e| e.best_move)
    }

    /// Store a result. Last write wins.
    pub fn store(
        &mut self,
        hash: u64,
        depth: i32,
        score: i32,
        entry_type: EntryType,
        best_move: Option<Pos>,
        ply: i32,
    ) {
        let idx = self.index(hash);
        self.entries[idx] = Some(TTEntry {
            hash,
            depth,
            score: score_to_tt(score, ply),
            entry_type,
            best_move,
            generation: self.generation,
        });
    }

    /// Drop every entry (new game).
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TTStats {
            size: self.size,
            used,
            usage_percent: used as f64 / self.size as f64 * 100.0,
        }
    }
}

/// Win scores are stored as distance from this node rather than from the root.
#[inline]
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        (score + ply).min(WIN_SCORE)
    } else {
        (score - ply).max(-WIN_SCORE)
    }
}

#[inline]
fn score_from_tt(score: i32, ply: i32) -> i32 {
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        score - ply
    } else {
        score + ply
    }
}
