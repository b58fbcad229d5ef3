//! Static evaluation of a multi-board position.
//!
//! Lower is worse for the side to move: boards close to dying bring
//! the game closer to someone being forced to kill the last one.

use crate::rules::{Geometry, count_marks, geometry, is_dead_with};
use crate::types::Board;

/// Penalty for a board one mark away from dying.
pub const NEAR_DEATH_PENALTY: i32 = 10;

/// Penalty for each line two marks away from completion.
pub const THREAT_PENALTY: i32 = 1;

/// Scores a position without searching.
pub fn heuristic(boards: &[Board], board_size: usize) -> i32 {
    heuristic_with(boards, &geometry(board_size))
}

/// Same as [`heuristic`] with geometry the caller already holds.
pub fn heuristic_with(boards: &[Board], geometry: &Geometry) -> i32 {
    boards
        .iter()
        .filter(|board| !is_dead_with(board, geometry))
        .map(|board| board_score(board, geometry))
        .sum()
}

/// Score of one live board.
///
/// The first line found one mark short of complete ends the scan for
/// that board; lines two short all count.
fn board_score(board: &Board, geometry: &Geometry) -> i32 {
    let size = geometry.board_size();
    let mut score = 0;
    for pattern in geometry.patterns() {
        let marks = count_marks(board, pattern);
        if Some(marks) == size.checked_sub(1) {
            score -= NEAR_DEATH_PENALTY;
            break;
        } else if Some(marks) == size.checked_sub(2) {
            score -= THREAT_PENALTY;
        }
    }
    score
}
