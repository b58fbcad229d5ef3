//! Board death detection.

use super::patterns::{Geometry, geometry};
use crate::types::Board;

/// Checks whether a board contains a fully marked line.
///
/// Cells missing from a short board read as unmarked, so a malformed
/// board is judged on the cells it has rather than panicking.
pub fn is_board_dead(board: &Board, board_size: usize) -> bool {
    is_dead_with(board, &geometry(board_size))
}

/// Same as [`is_board_dead`] with geometry the caller already holds.
pub fn is_dead_with(board: &Board, geometry: &Geometry) -> bool {
    geometry
        .patterns()
        .iter()
        .any(|pattern| !pattern.is_empty() && pattern.iter().all(|&i| board.is_marked(i)))
}

/// Number of marked cells in one pattern.
pub fn count_marks(board: &Board, pattern: &[usize]) -> usize {
    pattern.iter().filter(|&&i| board.is_marked(i)).count()
}

/// Returns true when every board is dead (vacuously true for no boards).
pub fn all_dead(boards: &[Board], geometry: &Geometry) -> bool {
    boards.iter().all(|board| is_dead_with(board, geometry))
}
