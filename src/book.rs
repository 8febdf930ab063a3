//! Opening book for the first few plies
//!
//! Entries are written relative to the board center with stones marked as
//! ours or theirs, so one entry serves both colors. A position matches when
//! any of the eight rotations and reflections of an entry equals it; the
//! reply is transformed the same way. No match is not an error: the engine
//! simply searches.

use log::trace;

use crate::board::{Board, Pos, Stone};

/// Book lookups stop once this many stones are on the board.
pub const BOOK_PLY_LIMIT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Owner {
    Own,
    Opp,
}

use Owner::{Opp, Own};

/// Stones as (row, col) offsets from the center.
struct BookEntry {
    stones: &'static [(i32, i32, Owner)],
    reply: (i32, i32),
}

const fn entry(stones: &'static [(i32, i32, Owner)], reply: (i32, i32)) -> BookEntry {
    BookEntry { stones, reply }
}

static ENTRIES: &[BookEntry] = &[
    // Open in the center
    entry(&[], (0, 0)),
    // Center taken: answer on the diagonal
    entry(&[(0, 0, Opp)], (1, 1)),
    // Opponent next to the center: take it
    entry(&[(0, 1, Opp)], (0, 0)),
    entry(&[(1, 1, Opp)], (0, 0)),
    // Second move after a direct reply
    entry(&[(0, 0, Own), (0, 1, Opp)], (1, 1)),
    // Second move after a diagonal reply
    entry(&[(0, 0, Own), (1, 1, Opp)], (1, -1)),
    // Second move after a distant reply
    entry(&[(0, 0, Own), (0, 2, Opp)], (1, 0)),
    entry(&[(0, 0, Own), (2, 2, Opp)], (1, 0)),
    // Second stone for the side that answered the center: cap the new pair
    entry(&[(0, 0, Opp), (1, 1, Own), (1, -1, Opp)], (-1, 1)),
    entry(&[(0, 0, Opp), (1, 1, Own), (0, 1, Opp)], (0, -1)),
    entry(&[(0, 0, Opp), (0, 1, Own), (1, 0, Opp)], (-1, 0)),
];

/// The eight symmetries of the square, applied to center-relative offsets.
fn transform(t: usize, (r, c): (i32, i32)) -> (i32, i32) {
    match t {
        0 => (r, c),
        1 => (c, -r),
        2 => (-r, -c),
        3 => (-c, r),
        4 => (r, -c),
        5 => (-r, c),
        6 => (c, r),
        _ => (-c, -r),
    }
}

/// Static opening replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpeningBook;

impl OpeningBook {
    pub fn new() -> Self {
        Self
    }

    /// Book reply for `side`, if the position is in the book and the reply
    /// cell is free.
    pub fn lookup(&self, board: &Board, side: Stone) -> Option<Pos> {
        if board.stone_count() >= BOOK_PLY_LIMIT {
            return None;
        }
        let center = Pos::center();
        let mut position: Vec<(i32, i32, Owner)> = board
            .occupied()
            .map(|p| {
                let owner = if board.get(p) == side { Own } else { Opp };
                (
                    i32::from(p.row) - i32::from(center.row),
                    i32::from(p.col) - i32::from(center.col),
                    owner,
                )
            })
            .collect();
        position.sort_unstable();

        for entry in ENTRIES.iter().filter(|e| e.stones.len() == position.len()) {
            for t in 0..8 {
                let mut mapped: Vec<(i32, i32, Owner)> = entry
                    .stones
                    .iter()
                    .map(|&(r, c, owner)| {
                        let (r, c) = transform(t, (r, c));
                        (r, c, owner)
                    })
                    .collect();
                mapped.sort_unstable();
                if mapped != position {
                    continue;
                }
                let (dr, dc) = transform(t, entry.reply);
                let Some(reply) = center.offset(dr, dc, 1) else {
                    continue;
                };
                if board.is_empty(reply) {
                    trace!("book hit: {} stones, symmetry {t}, reply {reply}", position.len());
                    return Some(reply);
                }
            }
        }
        None
    }
}
