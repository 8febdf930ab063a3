//! Game rules for standard Gomoku
//!
//! Five or more stones in a row along any of the four axes wins; a full board
//! without a line is a draw. There are no captures and no forbidden moves.

pub mod win;

pub use win::{check_win_at, find_winner, has_five_at_pos, run_through};
