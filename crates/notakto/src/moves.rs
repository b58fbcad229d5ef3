//! Legal move generation with center-first ordering.

use crate::action::Move;
use crate::rules::{Geometry, geometry, is_dead_with};
use crate::types::{Board, Cell};

/// Lists every legal move across all boards, center cells first.
///
/// Dead boards are skipped entirely. Moves with equal center
/// distance keep board-then-cell order. Returns an empty list once
/// every board is dead.
pub fn valid_moves(boards: &[Board], board_size: usize) -> Vec<Move> {
    valid_moves_with(boards, &geometry(board_size))
}

/// Same as [`valid_moves`] with geometry the caller already holds.
pub fn valid_moves_with(boards: &[Board], geometry: &Geometry) -> Vec<Move> {
    let mut moves: Vec<Move> = boards
        .iter()
        .enumerate()
        .filter(|(_, board)| !is_dead_with(board, geometry))
        .flat_map(|(board_index, board)| {
            board
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Empty)
                .map(move |(cell_index, _)| Move::new(board_index, cell_index))
        })
        .collect();

    // sort_by_key is stable, so ties stay in encounter order
    moves.sort_by_key(|mv| std::cmp::Reverse(geometry.cell_value(mv.cell_index)));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::is_board_dead;
    use crate::types::empty_boards;

    fn board(marks: &str) -> Board {
        Board::from_cells(
            marks
                .chars()
                .map(|c| if c == 'X' { Cell::Marked } else { Cell::Empty })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_center_first_on_empty_boards() {
        assert_eq!(valid_moves(&empty_boards(1, 3), 3)[0], Move::new(0, 4));
        assert_eq!(valid_moves(&empty_boards(1, 5), 5)[0], Move::new(0, 12));
    }

    #[test]
    fn test_ties_keep_board_then_cell_order() {
        let moves = valid_moves(&empty_boards(2, 3), 3);
        assert_eq!(moves.len(), 18);
        assert_eq!(moves[0], Move::new(0, 4));
        assert_eq!(moves[1], Move::new(1, 4));
        // Edge midpoints come next, board 0 before board 1
        assert_eq!(&moves[2..6], &[
            Move::new(0, 1),
            Move::new(0, 3),
            Move::new(0, 5),
            Move::new(0, 7),
        ]);
        assert_eq!(moves[6], Move::new(1, 1));
        // Corners last
        assert_eq!(moves[17], Move::new(1, 8));
    }

    #[test]
    fn test_dead_boards_are_skipped() {
        let boards = vec![board("X........"), board("XXX......"), board(".X.......")];
        let moves = valid_moves(&boards, 3);
        assert_eq!(moves.len(), 16);
        assert!(moves.iter().all(|m| m.board_index != 1));
    }

    #[test]
    fn test_count_matches_empty_cells_on_alive_boards() {
        let boards = vec![
            board("X.X.X...."),
            board("X...X...X"),
            board("XX.XX...."),
            board("........."),
        ];
        let expected: usize = boards
            .iter()
            .filter(|b| !is_board_dead(b, 3))
            .map(|b| b.cells().iter().filter(|c| **c == Cell::Empty).count())
            .sum();
        assert_eq!(valid_moves(&boards, 3).len(), expected);
    }

    #[test]
    fn test_no_moves_when_all_dead() {
        let boards = vec![board("XXX......"), board("..X.X.X..")];
        assert!(valid_moves(&boards, 3).is_empty());
    }

    #[test]
    fn test_short_boards_only_offer_existing_cells() {
        let boards = vec![board("X.."), board("XXX"), board(".X.")];
        let mut moves = valid_moves(&boards, 3);
        moves.sort_by_key(|m| (m.board_index, m.cell_index));
        assert_eq!(moves, vec![
            Move::new(0, 1),
            Move::new(0, 2),
            Move::new(2, 0),
            Move::new(2, 2),
        ]);
    }
}
