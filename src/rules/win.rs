//! Win condition checking
//!
//! A player wins with five or more stones in a row. Overlines count.

use crate::board::{Board, Pos, Stone, WinCheck, DIRECTIONS};

/// Walk from `pos` along `(dr, dc)` while cells hold `stone`.
///
/// `pos` itself is not inspected, so a hypothetical placement can be measured
/// before it is made.
#[inline]
fn count_dir(board: &Board, pos: Pos, dr: i32, dc: i32, stone: Stone) -> i32 {
    let mut n = 0;
    while let Some(next) = pos.offset(dr, dc, n + 1) {
        if board.get(next) != stone {
            break;
        }
        n += 1;
    }
    n
}

/// Contiguous run of `stone` through `pos` along one axis, in line order.
pub fn run_through(board: &Board, pos: Pos, (dr, dc): (i32, i32), stone: Stone) -> Vec<Pos> {
    let back = count_dir(board, pos, -dr, -dc, stone);
    let fwd = count_dir(board, pos, dr, dc, stone);
    (-back..=fwd).filter_map(|i| pos.offset(dr, dc, i)).collect()
}

/// Fast five-in-a-row check at a specific position. No allocation.
///
/// Treats `pos` as holding `stone` whether or not it does, so the same call
/// answers "did this move win" and "would a move here win".
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, stone: Stone) -> bool {
    DIRECTIONS.iter().any(|&(dr, dc)| {
        1 + count_dir(board, pos, dr, dc, stone) + count_dir(board, pos, -dr, -dc, stone) >= 5
    })
}

/// Check the four axes through `pos` and report the winning run, if any.
pub fn check_win_at(board: &Board, pos: Pos, stone: Stone) -> WinCheck {
    if stone == Stone::Empty {
        return WinCheck::none();
    }
    DIRECTIONS
        .iter()
        .map(|&dir| run_through(board, pos, dir, stone))
        .find(|line| line.len() >= 5)
        .map_or_else(WinCheck::none, WinCheck::line)
}

/// Scan every stone for a finished line. Black is checked first; a legal game
/// never has two winners.
pub fn find_winner(board: &Board) -> Option<Stone> {
    [Stone::Black, Stone::White].into_iter().find(|&stone| {
        board
            .stones(stone)
            .is_some_and(|bb| bb.iter_ones().any(|pos| has_five_at_pos(board, pos, stone)))
    })
}
