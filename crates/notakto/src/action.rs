//! Move type and move validation errors.

use serde::{Deserialize, Serialize};

/// Placing the shared mark on one cell of one board.
///
/// Serialized as `{"boardIndex": .., "cellIndex": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Index of the target board.
    pub board_index: usize,
    /// Index of the target cell within the board, row-major.
    pub cell_index: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(board_index: usize, cell_index: usize) -> Self {
        Self {
            board_index,
            cell_index,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "board {} cell {}", self.board_index, self.cell_index)
    }
}

/// Reasons a move is rejected before it reaches the boards.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// No board exists at the index.
    #[display("Board {} does not exist", _0)]
    BoardOutOfRange(#[error(not(source))] usize),

    /// The cell index is past the end of the board.
    #[display("Cell {} is outside the board", _0)]
    CellOutOfRange(#[error(not(source))] usize),

    /// The board does not have `board_size²` cells.
    #[display("Board {} has {} cells, expected {}", board, actual, expected)]
    MalformedBoard {
        /// Index of the offending board.
        board: usize,
        /// Cells found.
        actual: usize,
        /// Cells required by the board size.
        expected: usize,
    },

    /// The cell already carries the mark.
    #[display("Cannot play {}: cell is already marked", _0)]
    CellOccupied(#[error(not(source))] Move),

    /// The board already contains a complete line.
    #[display("Board {} is already dead", _0)]
    BoardDead(#[error(not(source))] usize),

    /// Every board is dead.
    #[display("Game is already over")]
    GameOver,

    /// The move was submitted while the other player is to move.
    #[display("It is not your turn")]
    NotYourTurn,
}
