//! Immediate tactics: forced moves found without searching
//!
//! The ladder is checked strictly top to bottom and the first tier with any
//! matching cell decides the move:
//!
//! 1. complete our own five
//! 2. block the opponent's five
//! 3. make a four (open four preferred)
//! 4. block the cell where the opponent would make a four (open four preferred)
//! 5. make an open three
//! 6. block the cell where the opponent would make an open three
//!
//! Each attack tier sits above the matching defense tier. Swapping them
//! changes how the engine plays.

use log::trace;

use crate::board::{Board, Pos, Stone, DIRECTIONS};
use crate::eval::{Pattern, PatternEvaluator};
use crate::rules::has_five_at_pos;

use super::ordering::candidate_cells;

/// Which rung of the ladder fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TacticKind {
    Win,
    BlockFive,
    MakeFour,
    BlockFour,
    MakeOpenThree,
    BlockOpenThree,
}

impl TacticKind {
    /// True for the tiers that answer an opponent threat.
    pub fn is_defense(self) -> bool {
        matches!(
            self,
            TacticKind::BlockFive | TacticKind::BlockFour | TacticKind::BlockOpenThree
        )
    }
}

/// A forced move and the reason for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tactic {
    pub kind: TacticKind,
    pub pos: Pos,
}

/// What one empty cell would give a player.
#[derive(Debug, Clone, Copy, Default)]
struct CellThreat {
    five: bool,
    /// 2 for an open four, 1 for a closed four
    four: u8,
    open_three: bool,
}

impl CellThreat {
    fn scan(board: &Board, pos: Pos, stone: Stone) -> Self {
        let mut threat = Self {
            five: has_five_at_pos(board, pos, stone),
            ..Self::default()
        };
        for &dir in &DIRECTIONS {
            let p = Pattern::scan(board, pos, dir, stone);
            if p.is_open_four() {
                threat.four = 2;
            } else if p.is_live_four() {
                threat.four = threat.four.max(1);
            } else if p.is_open_three() {
                threat.open_three = true;
            }
        }
        threat
    }
}

/// Search-free scan for forced wins and blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTacticsDetector {
    evaluator: PatternEvaluator,
}

impl ImmediateTacticsDetector {
    pub fn new(evaluator: PatternEvaluator) -> Self {
        Self { evaluator }
    }

    /// The highest ladder tier that applies for `side`, if any.
    pub fn detect(&self, board: &Board, side: Stone) -> Option<Tactic> {
        let opp = side.opponent();
        let cells: Vec<(Pos, CellThreat, CellThreat)> = candidate_cells(board)
            .into_iter()
            .filter(|&p| board.is_empty(p))
            .map(|p| (p, CellThreat::scan(board, p, side), CellThreat::scan(board, p, opp)))
            .collect();

        // (tier, rank within tier) where a higher rank wins inside the tier
        let ladder: [(TacticKind, fn(&CellThreat, &CellThreat) -> Option<u8>); 6] = [
            (TacticKind::Win, |own, _| own.five.then_some(0)),
            (TacticKind::BlockFive, |_, theirs| theirs.five.then_some(0)),
            (TacticKind::MakeFour, |own, _| (own.four > 0).then_some(own.four)),
            (TacticKind::BlockFour, |_, theirs| (theirs.four > 0).then_some(theirs.four)),
            (TacticKind::MakeOpenThree, |own, _| own.open_three.then_some(0)),
            (TacticKind::BlockOpenThree, |_, theirs| theirs.open_three.then_some(0)),
        ];

        for (kind, matches) in ladder {
            let hits: Vec<(Pos, u8)> = cells
                .iter()
                .filter_map(|(p, own, theirs)| matches(own, theirs).map(|rank| (*p, rank)))
                .collect();
            if let Some(pos) = self.pick(board, side, &hits) {
                trace!("tactic {kind:?} at {pos} for {side:?} ({} candidates)", hits.len());
                return Some(Tactic { kind, pos });
            }
        }
        None
    }

    /// Highest rank, then importance, then closest to center, then index.
    fn pick(&self, board: &Board, side: Stone, hits: &[(Pos, u8)]) -> Option<Pos> {
        hits.iter()
            .map(|&(pos, rank)| {
                let importance = self.evaluator.evaluate_move_importance(board, pos, side);
                (pos, rank, importance)
            })
            .min_by(|a, b| {
                b.1.cmp(&a.1)
                    .then(b.2.cmp(&a.2))
                    .then(a.0.center_distance().cmp(&b.0.center_distance()))
                    .then(a.0.cmp(&b.0))
            })
            .map(|(pos, _, _)| pos)
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

    fn detect(board: &Board, side: Stone) -> Option<Tactic> {
        ImmediateTacticsDetector::default().detect(board, side)
    }

    #[test]
    fn test_nothing_on_quiet_board() {
        let board = board_from(&[(7, 7, Stone::Black), (8, 9, Stone::White)]);
        assert_eq!(detect(&board, Stone::Black), None);
        assert_eq!(detect(&Board::new(), Stone::Black), None);
    }

    #[test]
    fn test_own_five_first() {
        let board = board_from(&[
            (7, 4, Stone::Black),
            (7, 5, Stone::Black),
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (3, 3, Stone::White),
            (3, 4, Stone::White),
            (3, 5, Stone::White),
            (3, 6, Stone::White),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::Win);
        assert!(tactic.pos == Pos::new(7, 3) || tactic.pos == Pos::new(7, 8));
    }

    #[test]
    fn test_block_five_before_own_four() {
        let board = board_from(&[
            (3, 3, Stone::White),
            (3, 4, Stone::White),
            (3, 5, Stone::White),
            (3, 6, Stone::White),
            (3, 2, Stone::Black),
            (9, 6, Stone::Black),
            (9, 7, Stone::Black),
            (9, 8, Stone::Black),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic, Tactic { kind: TacticKind::BlockFive, pos: Pos::new(3, 7) });
    }

    #[test]
    fn test_split_four_gap_is_five() {
        let board = board_from(&[
            (5, 5, Stone::White),
            (5, 6, Stone::White),
            (5, 8, Stone::White),
            (5, 9, Stone::White),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic, Tactic { kind: TacticKind::BlockFive, pos: Pos::new(5, 7) });
    }

    #[test]
    fn test_make_open_four_beats_block_three() {
        let board = board_from(&[
            (7, 6, Stone::Black),
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (10, 6, Stone::White),
            (10, 7, Stone::White),
            (10, 8, Stone::White),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::MakeFour);
        assert!(tactic.pos == Pos::new(7, 5) || tactic.pos == Pos::new(7, 9));
    }

    #[test]
    fn test_block_open_three_extension() {
        let board = board_from(&[
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (2, 2, Stone::Black),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::BlockFour);
        assert!(tactic.kind.is_defense());
        assert!(tactic.pos == Pos::new(7, 5) || tactic.pos == Pos::new(7, 9));
    }

    #[test]
    fn test_block_closed_four_creation() {
        // White three capped on the left can still become a four at (7,9)
        let board = board_from(&[
            (7, 5, Stone::Black),
            (1, 1, Stone::Black),
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic, Tactic { kind: TacticKind::BlockFour, pos: Pos::new(7, 9) });
    }

    #[test]
    fn test_block_open_four_cell_before_closed_one() {
        // Open three on row 7 and a capped three on column 3
        let board = board_from(&[
            (7, 6, Stone::White),
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (1, 3, Stone::White),
            (2, 3, Stone::White),
            (3, 3, Stone::White),
            (0, 3, Stone::Black),
            (12, 12, Stone::Black),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::BlockFour);
        assert!(tactic.pos == Pos::new(7, 5) || tactic.pos == Pos::new(7, 9));
    }

    #[test]
    fn test_make_open_three_before_blocking_one() {
        let board = board_from(&[
            (7, 7, Stone::Black),
            (7, 8, Stone::Black),
            (10, 3, Stone::White),
            (10, 4, Stone::White),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::MakeOpenThree);
        assert!(tactic.pos == Pos::new(7, 6) || tactic.pos == Pos::new(7, 9));

        let tactic = detect(&board, Stone::White).unwrap();
        assert_eq!(tactic.kind, TacticKind::MakeOpenThree);
        assert_eq!(tactic.pos.row, 10);
    }

    #[test]
    fn test_block_open_three_creation() {
        let board = board_from(&[
            (7, 7, Stone::White),
            (7, 8, Stone::White),
            (1, 1, Stone::Black),
        ]);
        let tactic = detect(&board, Stone::Black).unwrap();
        assert_eq!(tactic.kind, TacticKind::BlockOpenThree);
        assert!(tactic.pos == Pos::new(7, 6) || tactic.pos == Pos::new(7, 9));
    }
}
