//! Depth-limited minimax with alpha-beta pruning.
//!
//! Scores are from the computer's point of view. A position where
//! every board is dead is scored against whichever side would have to
//! move next: that side has just been handed the loss.
//!
//! # Example
//!
//! ```
//! use notakto::{Searcher, empty_boards, search::INFINITY};
//!
//! let boards = empty_boards(1, 3);
//! let mut searcher = Searcher::new(3);
//! let score = searcher.minimax(&boards, 2, true, -INFINITY, INFINITY);
//! assert!(score > -INFINITY);
//! assert!(searcher.stats().nodes > 1);
//! ```

use crate::heuristic::heuristic_with;
use crate::moves::valid_moves_with;
use crate::rules::{Geometry, all_dead, geometry};
use crate::state::update_boards;
use crate::types::Board;
use std::sync::Arc;
use tracing::trace;

/// Search score. Higher is better for the maximizing side.
pub type Score = i32;

/// Score of a forced win; its negation is a forced loss.
pub const INFINITY: Score = Score::MAX;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root children included.
    pub nodes: u64,
    /// Positions scored by the heuristic at depth zero.
    pub leaf_evaluations: u64,
    /// Positions where every board was already dead.
    pub terminal_positions: u64,
    /// Times the remaining siblings were pruned.
    pub cutoffs: u64,
}

/// Minimax searcher bound to one board size.
#[derive(Debug, Clone)]
pub struct Searcher {
    geometry: Arc<Geometry>,
    stats: SearchStats,
}

impl Searcher {
    /// Creates a searcher using the shared geometry for `board_size`.
    pub fn new(board_size: usize) -> Self {
        Self::with_geometry(geometry(board_size))
    }

    /// Creates a searcher over geometry the caller already holds.
    pub fn with_geometry(geometry: Arc<Geometry>) -> Self {
        Self {
            geometry,
            stats: SearchStats::default(),
        }
    }

    /// Counters accumulated since this searcher was created.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Scores `boards` searching `depth` plies ahead.
    ///
    /// `maximizing` is true when the computer is the side to move.
    pub fn minimax(
        &mut self,
        boards: &[Board],
        depth: u32,
        maximizing: bool,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        self.stats.nodes += 1;

        if all_dead(boards, &self.geometry) {
            self.stats.terminal_positions += 1;
            return terminal_score(maximizing);
        }

        if depth == 0 {
            self.stats.leaf_evaluations += 1;
            return heuristic_with(boards, &self.geometry);
        }

        let moves = valid_moves_with(boards, &self.geometry);
        if moves.is_empty() {
            self.stats.terminal_positions += 1;
            return terminal_score(maximizing);
        }

        let mut best = terminal_score(maximizing);
        for mv in moves {
            let next = update_boards(boards, mv);
            let value = self.minimax(&next, depth - 1, !maximizing, alpha, beta);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                trace!(depth, alpha, beta, "Pruned remaining siblings");
                break;
            }
        }
        best
    }
}

/// Score of a position where the side to move has nothing left.
fn terminal_score(maximizing: bool) -> Score {
    if maximizing { -INFINITY } else { INFINITY }
}

/// Scores `boards` with a fresh [`Searcher`].
pub fn minimax(
    boards: &[Board],
    depth: u32,
    maximizing: bool,
    board_size: usize,
    alpha: Score,
    beta: Score,
) -> Score {
    Searcher::new(board_size).minimax(boards, depth, maximizing, alpha, beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, empty_boards};

    fn board(marks: &str) -> Board {
        Board::from_cells(
            marks
                .chars()
                .map(|c| if c == 'X' { Cell::Marked } else { Cell::Empty })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_all_dead_is_loss_for_side_to_move() {
        let boards = vec![board("XXX......")];
        assert_eq!(minimax(&boards, 3, true, 3, -INFINITY, INFINITY), -INFINITY);
        assert_eq!(minimax(&boards, 3, false, 3, -INFINITY, INFINITY), INFINITY);
    }

    #[test]
    fn test_terminal_check_precedes_depth_check() {
        let boards = vec![board("X...X...X")];
        assert_eq!(minimax(&boards, 0, true, 3, -INFINITY, INFINITY), -INFINITY);
    }

    #[test]
    fn test_depth_zero_uses_heuristic() {
        let boards = vec![board("XX.......")];
        assert_eq!(minimax(&boards, 0, true, 3, -INFINITY, INFINITY), -10);
    }

    #[test]
    fn test_replies_that_end_the_game_score_for_side_left_to_move() {
        // Any second mark on a 2x2 board completes a line
        let boards = vec![board("X...")];
        assert_eq!(minimax(&boards, 2, false, 2, -INFINITY, INFINITY), -INFINITY);
        assert_eq!(minimax(&boards, 2, true, 2, -INFINITY, INFINITY), INFINITY);
    }

    #[test]
    fn test_pruning_does_not_change_root_value() {
        let boards = vec![board("X...X...."), board("....X....")];
        let mut pruned = Searcher::new(3);
        let with_pruning = pruned.minimax(&boards, 3, true, -INFINITY, INFINITY);
        let reference = full_minimax(&boards, 3, true);
        assert_eq!(with_pruning, reference);
    }

    #[test]
    fn test_stats_count_nodes_and_leaves() {
        let boards = empty_boards(1, 2);
        let mut searcher = Searcher::new(2);
        searcher.minimax(&boards, 1, true, -INFINITY, INFINITY);
        let stats = searcher.stats();
        // Root plus four children, all at depth zero
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.leaf_evaluations, 4);
        assert_eq!(stats.terminal_positions, 0);
    }

    /// Plain minimax without pruning, for cross-checking.
    fn full_minimax(boards: &[Board], depth: u32, maximizing: bool) -> Score {
        let g = geometry(3);
        if all_dead(boards, &g) {
            return terminal_score(maximizing);
        }
        if depth == 0 {
            return heuristic_with(boards, &g);
        }
        let scores = valid_moves_with(boards, &g)
            .into_iter()
            .map(|mv| full_minimax(&update_boards(boards, mv), depth - 1, !maximizing));
        if maximizing {
            scores.max().unwrap_or(-INFINITY)
        } else {
            scores.min().unwrap_or(INFINITY)
        }
    }
}
