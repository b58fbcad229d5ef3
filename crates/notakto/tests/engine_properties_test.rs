//! Property tests for board evaluation, move generation and search.

use notakto::rules::cell_value;
use notakto::{
    Board, Cell, Difficulty, Move, empty_boards, find_best_move, is_board_dead, update_boards,
    valid_moves, win_patterns,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn board(marks: &str) -> Board {
    Board::from_cells(
        marks
            .chars()
            .map(|c| if c == 'X' { Cell::Marked } else { Cell::Empty })
            .collect::<Vec<_>>(),
    )
}

fn marked(size: usize, indices: &[usize]) -> Board {
    let mut cells = vec![Cell::Empty; size * size];
    for &i in indices {
        cells[i] = Cell::Marked;
    }
    Board::from_cells(cells)
}

#[test]
fn test_any_single_complete_line_kills_the_board() {
    for size in 1..=5 {
        let patterns = win_patterns(size);
        assert_eq!(patterns.len(), 2 * size + 2);
        for pattern in &patterns {
            assert!(
                is_board_dead(&marked(size, pattern), size),
                "pattern {:?} on size {}",
                pattern,
                size
            );
        }
    }
}

#[test]
fn test_board_with_a_gap_in_every_line_is_alive() {
    for size in 1..=5 {
        // Leave both diagonals empty: every row and column crosses one
        let diagonal: Vec<usize> = (0..size)
            .flat_map(|i| [i * (size + 1), (i + 1) * (size - 1)])
            .collect();
        let others: Vec<usize> = (0..size * size).filter(|i| !diagonal.contains(i)).collect();
        assert!(!is_board_dead(&marked(size, &others), size), "size {}", size);
    }
}

#[test]
fn test_valid_moves_match_empty_cells_on_live_boards() {
    let boards = vec![
        board("X...X...."),
        board("..X.X.X.."),
        board("XX.X....."),
        board("XXXXX...."),
        board("........."),
    ];
    let moves = valid_moves(&boards, 3);

    let expected: usize = boards
        .iter()
        .filter(|b| !is_board_dead(b, 3))
        .map(|b| b.cells().iter().filter(|c| **c == Cell::Empty).count())
        .sum();
    assert_eq!(moves.len(), expected);
    for mv in &moves {
        assert!(!is_board_dead(&boards[mv.board_index], 3));
        assert!(boards[mv.board_index].is_empty(mv.cell_index));
    }
}

#[test]
fn test_center_comes_first_on_fresh_boards() {
    assert_eq!(valid_moves(&empty_boards(1, 3), 3)[0], Move::new(0, 4));
    assert_eq!(valid_moves(&empty_boards(1, 5), 5)[0], Move::new(0, 12));
}

#[test]
fn test_moves_are_ordered_by_center_distance() {
    for size in 2..=5 {
        let moves = valid_moves(&empty_boards(2, size), size);
        for pair in moves.windows(2) {
            assert!(
                cell_value(pair[0].cell_index, size) >= cell_value(pair[1].cell_index, size),
                "size {} out of order at {:?}",
                size,
                pair
            );
        }
    }
}

#[test]
fn test_update_boards_leaves_input_untouched() {
    let boards = vec![board("X........"), board("....X....")];
    let before = boards.clone();
    let next = update_boards(&boards, Move::new(0, 8));

    assert_eq!(boards, before);
    assert_eq!(next[1], boards[1]);
    let changed: Vec<usize> = (0..9)
        .filter(|&i| next[0].get(i) != boards[0].get(i))
        .collect();
    assert_eq!(changed, vec![8]);
}

#[test]
fn test_find_best_move_without_moves_is_none() {
    let boards = vec![board("XXX......"), board("X..X..X..")];
    let mut rng = StdRng::seed_from_u64(0);
    for level in 1..=5 {
        let difficulty = Difficulty::new(level).unwrap();
        assert_eq!(find_best_move(&boards, difficulty, 3, 2, &mut rng), None);
    }
}

#[test]
fn test_find_best_move_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(21);
    let cases = [
        (vec![board("X.X.X...."), board("XX......."), board("XXX......")], 3, 3),
        (vec![board("X..."), board("...."), board(".X..")], 2, 3),
    ];
    for (boards, size, count) in cases {
        for level in 1..=5 {
            let difficulty = Difficulty::new(level).unwrap();
            let mv = find_best_move(&boards, difficulty, size, count, &mut rng).unwrap();
            assert!(mv.board_index < count);
            assert!(mv.cell_index < size * size);
            assert!(boards[mv.board_index].is_empty(mv.cell_index));
            assert!(!is_board_dead(&boards[mv.board_index], size));
        }
    }
}

#[test]
fn test_forced_move_when_one_cell_is_left() {
    let boards = vec![board("XX."), board("XXX")];
    let difficulty = Difficulty::new(5).unwrap();
    let mv = find_best_move(&boards, difficulty, 3, 2, &mut StdRng::seed_from_u64(3));
    assert_eq!(mv, Some(Move::new(0, 2)));
}
