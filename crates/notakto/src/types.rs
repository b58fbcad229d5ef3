//! Core domain types for Notakto.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// A single cell on a board.
///
/// Notakto uses one shared mark, so a cell is either empty or marked.
/// Serialized as `""` and `"X"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    #[serde(rename = "")]
    Empty,
    /// Cell carrying the shared mark.
    #[serde(rename = "X")]
    Marked,
}

impl Cell {
    /// Returns true if the cell carries the mark.
    pub fn is_marked(self) -> bool {
        self == Cell::Marked
    }
}

/// One n×n board in row-major order.
///
/// Boards are immutable. Cloning shares the underlying cells; a move
/// builds a fresh board through [`Board::with_mark`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: Arc<[Cell]>,
}

impl Board {
    /// Creates an empty board with `board_size * board_size` cells.
    pub fn empty(board_size: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; board_size * board_size].into(),
        }
    }

    /// Builds a board from explicit cells.
    pub fn from_cells(cells: impl Into<Vec<Cell>>) -> Self {
        Self {
            cells: cells.into().into(),
        }
    }

    /// Gets the cell at the given index, `None` past the end.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Returns true if the cell exists and carries the mark.
    ///
    /// Indices past the end read as unmarked, so boards shorter than
    /// `board_size²` never panic the evaluator.
    pub fn is_marked(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Marked))
    }

    /// Returns true if the cell exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Number of cells on the board.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns a copy of this board with one more cell marked.
    pub fn with_mark(&self, index: usize) -> Self {
        let mut cells = self.cells.to_vec();
        if let Some(cell) = cells.get_mut(index) {
            *cell = Cell::Marked;
        }
        Self {
            cells: cells.into(),
        }
    }

    /// Returns true if both values point at the same cell storage.
    pub fn shares_cells_with(&self, other: &Board) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Formats the board as rows of `X` and cell numbers.
    pub fn display(&self, board_size: usize) -> String {
        let width = self.len().saturating_sub(1).to_string().len();
        let mut rows = Vec::with_capacity(board_size);
        for row in self.cells.chunks(board_size.max(1)) {
            let start = rows.len() * board_size;
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(offset, cell)| match cell {
                    Cell::Marked => format!("{:>width$}", "X"),
                    Cell::Empty => format!("{:>width$}", start + offset),
                })
                .collect();
            rows.push(cells.join("|"));
        }
        rows.join("\n")
    }
}

/// All boards of one game.
pub type BoardSet = Vec<Board>;

/// Builds `number_of_boards` empty boards.
pub fn empty_boards(number_of_boards: usize, board_size: usize) -> BoardSet {
    (0..number_of_boards)
        .map(|_| Board::empty(board_size))
        .collect()
}

/// One of the two seats in a game against the computer.
///
/// Serialized as `1` (human) and `2` (computer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    /// The human player, always seat 1 and always first to move.
    Human,
    /// The automated opponent, seat 2.
    Computer,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Human => Player::Computer,
            Player::Computer => Player::Human,
        }
    }

    /// Label shown to the human for this player winning.
    pub fn label(self) -> &'static str {
        match self {
            Player::Human => "You",
            Player::Computer => "Computer",
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        match player {
            Player::Human => 1,
            Player::Computer => 2,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = ConfigError;

    fn try_from(seat: u8) -> Result<Self, Self::Error> {
        match seat {
            1 => Ok(Player::Human),
            2 => Ok(Player::Computer),
            other => Err(ConfigError::new(format!("Player must be 1 or 2, got {}", other))),
        }
    }
}

/// Computer difficulty level, 1 (easiest) to 5 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[display("{}", _0)]
pub struct Difficulty(u8);

impl Difficulty {
    /// Lowest difficulty.
    pub const MIN: u8 = 1;
    /// Highest difficulty.
    pub const MAX: u8 = 5;

    /// Creates a difficulty, rejecting values outside 1..=5.
    #[instrument]
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::new(format!(
                "Difficulty must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                level
            )))
        }
    }

    /// Returns the numeric level.
    pub fn level(self) -> u8 {
        self.0
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

/// Parameters fixed for the lifetime of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGameConfig")]
pub struct GameConfig {
    /// Number of boards in play.
    number_of_boards: usize,
    /// Side length of every board.
    board_size: usize,
    /// Computer difficulty.
    difficulty: Difficulty,
}

impl GameConfig {
    /// Fewest boards a game may have.
    pub const MIN_BOARDS: usize = 1;
    /// Most boards a game may have.
    pub const MAX_BOARDS: usize = 5;
    /// Smallest board side length.
    pub const MIN_BOARD_SIZE: usize = 2;
    /// Largest board side length.
    pub const MAX_BOARD_SIZE: usize = 5;

    /// Creates a validated game configuration.
    #[instrument]
    pub fn new(
        number_of_boards: usize,
        board_size: usize,
        difficulty: u8,
    ) -> Result<Self, ConfigError> {
        if !(Self::MIN_BOARDS..=Self::MAX_BOARDS).contains(&number_of_boards) {
            return Err(ConfigError::new(format!(
                "Number of boards must be between {} and {}, got {}",
                Self::MIN_BOARDS,
                Self::MAX_BOARDS,
                number_of_boards
            )));
        }
        if !(Self::MIN_BOARD_SIZE..=Self::MAX_BOARD_SIZE).contains(&board_size) {
            return Err(ConfigError::new(format!(
                "Board size must be between {} and {}, got {}",
                Self::MIN_BOARD_SIZE,
                Self::MAX_BOARD_SIZE,
                board_size
            )));
        }
        Ok(Self {
            number_of_boards,
            board_size,
            difficulty: Difficulty::new(difficulty)?,
        })
    }

    /// Number of boards in play.
    pub fn number_of_boards(&self) -> usize {
        self.number_of_boards
    }

    /// Side length of every board.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Computer difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Number of cells on each board.
    pub fn cells_per_board(&self) -> usize {
        self.board_size * self.board_size
    }
}

/// Unvalidated wire form of [`GameConfig`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameConfig {
    number_of_boards: usize,
    board_size: usize,
    difficulty: u8,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        Self::new(raw.number_of_boards, raw.board_size, raw.difficulty)
    }
}

/// Invalid game parameters.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid game configuration: {}", message)]
pub struct ConfigError {
    /// What was wrong.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
