//! # Position — grid coordinates and random generators
//!
//! ## Responsibility
//! Provide the immutable 2D coordinate value type and the two random
//! generators the simulation needs: a free starting cell and a
//! straight-line move target.
//!
//! ## Guarantees
//! - Value semantics: `Position` is `Copy`, has no identity
//! - Straight-line: a generated target differs from the current position
//!   in exactly one coordinate
//!
//! ## NOT Responsible For
//! - Occupancy bookkeeping (see: board.rs)
//! - Deciding whether a move is possible (see: board.rs)

use crate::board::Board;
use rand::Rng;

/// A cell coordinate on the board. Row and column are both in
/// `[0, board_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Row index, top to bottom.
    pub row: usize,
    /// Column index, left to right.
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl Position {
    /// Sample a uniformly random unoccupied cell by rejection sampling.
    ///
    /// The loop is intentionally uncapped: capping it would skew the
    /// uniform-over-free-cells distribution. Expected iterations are
    /// bounded because the coordinator enforces `agent_count <= size²`
    /// before any placement happens, so at least one free cell exists
    /// and density never exceeds 1.
    ///
    /// # Panics
    ///
    /// This function never panics (it loops forever on a full board,
    /// which the capacity precondition rules out).
    pub fn random_start(board: &Board) -> Self {
        let mut rng = rand::rng();
        loop {
            let candidate = Self {
                row: rng.random_range(0..board.size()),
                column: rng.random_range(0..board.size()),
            };
            if !board.is_occupied(candidate) {
                return candidate;
            }
        }
    }

    /// Sample a random straight-line move target from `current`.
    ///
    /// Chooses an axis (row or column) uniformly, then samples a value on
    /// that axis uniformly from `[0, size)` excluding the current value,
    /// holding the other axis fixed. The result always differs from
    /// `current` in exactly one coordinate.
    ///
    /// # Panics
    ///
    /// This function never panics (it loops forever when `size < 2`,
    /// which config validation rules out).
    pub fn random_move_target(current: Position, size: usize) -> Self {
        let mut rng = rand::rng();
        let vertical = rng.random_bool(0.5);
        // Uniform over [0, size) conditioned on != except. Uncapped by the
        // same reasoning as random_start: size >= 2 is validated up front.
        let mut random_except = |except: usize| loop {
            let value = rng.random_range(0..size);
            if value != except {
                return value;
            }
        };

        if vertical {
            Self {
                row: random_except(current.row),
                column: current.column,
            }
        } else {
            Self {
                row: current.row,
                column: random_except(current.column),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let pos = Position { row: 3, column: 7 };
        assert_eq!(pos.to_string(), "(3, 7)");
    }

    #[test]
    fn test_random_move_target_changes_exactly_one_axis() {
        let current = Position { row: 2, column: 5 };
        for _ in 0..500 {
            let target = Position::random_move_target(current, 8);
            let row_changed = target.row != current.row;
            let col_changed = target.column != current.column;
            assert!(
                row_changed ^ col_changed,
                "move from {current} to {target} must change exactly one axis"
            );
        }
    }

    #[test]
    fn test_random_move_target_stays_in_range() {
        let current = Position { row: 0, column: 0 };
        for _ in 0..500 {
            let target = Position::random_move_target(current, 4);
            assert!(target.row < 4);
            assert!(target.column < 4);
        }
    }

    #[test]
    fn test_random_move_target_covers_both_axes() {
        let current = Position { row: 1, column: 1 };
        let mut row_moves = 0;
        let mut col_moves = 0;
        for _ in 0..500 {
            let target = Position::random_move_target(current, 4);
            if target.row != current.row {
                row_moves += 1;
            } else {
                col_moves += 1;
            }
        }
        assert!(row_moves > 0, "vertical moves never sampled");
        assert!(col_moves > 0, "horizontal moves never sampled");
    }

    #[test]
    fn test_random_move_target_on_minimal_board() {
        // On a 2x2 board the only legal values are forced.
        let current = Position { row: 0, column: 1 };
        for _ in 0..100 {
            let target = Position::random_move_target(current, 2);
            assert!(
                target == Position { row: 1, column: 1 }
                    || target == Position { row: 0, column: 0 }
            );
        }
    }

    #[test]
    fn test_random_start_lands_on_free_cell() {
        let mut board = Board::new(3);
        for row in 0..3 {
            for column in 0..3 {
                if !(row == 1 && column == 2) {
                    board.set_occupied(Position { row, column }, true);
                }
            }
        }
        // Only one free cell remains; rejection sampling must find it.
        let start = Position::random_start(&board);
        assert_eq!(start, Position { row: 1, column: 2 });
    }

    #[test]
    fn test_random_start_on_empty_board_is_in_range() {
        let board = Board::new(5);
        for _ in 0..200 {
            let start = Position::random_start(&board);
            assert!(start.row < 5);
            assert!(start.column < 5);
        }
    }
}
