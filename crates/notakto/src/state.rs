//! Move application and game lifecycle.
//!
//! [`update_boards`] is the pure transition used everywhere, search
//! included. [`GameState`] layers validation, turn tracking and history
//! on top of it for a single game against the computer.

use crate::action::{Move, MoveError};
use crate::policy::find_best_move;
use crate::rewards::{Rewards, calculate_rewards};
use crate::rules::{all_dead, geometry, is_dead_with};
use crate::types::{Board, BoardSet, GameConfig, Player, empty_boards};
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Returns a new board set with `mv` applied.
///
/// Only the target board is rebuilt; every other board shares its cells
/// with the input. The move is not checked.
pub fn update_boards(boards: &[Board], mv: Move) -> BoardSet {
    boards
        .iter()
        .enumerate()
        .map(|(index, board)| {
            if index == mv.board_index {
                board.with_mark(mv.cell_index)
            } else {
                board.clone()
            }
        })
        .collect()
}

/// Checks that `mv` targets an existing empty cell on a live board.
pub fn validate_move(boards: &[Board], board_size: usize, mv: Move) -> Result<(), MoveError> {
    let geometry = geometry(board_size);
    if all_dead(boards, &geometry) {
        return Err(MoveError::GameOver);
    }

    let board = boards
        .get(mv.board_index)
        .ok_or(MoveError::BoardOutOfRange(mv.board_index))?;

    let expected = board_size * board_size;
    if board.len() != expected {
        return Err(MoveError::MalformedBoard {
            board: mv.board_index,
            actual: board.len(),
            expected,
        });
    }

    if mv.cell_index >= expected {
        return Err(MoveError::CellOutOfRange(mv.cell_index));
    }

    if board.is_marked(mv.cell_index) {
        return Err(MoveError::CellOccupied(mv));
    }

    if is_dead_with(board, &geometry) {
        return Err(MoveError::BoardDead(mv.board_index));
    }

    Ok(())
}

/// Undo was requested without a full human/computer exchange to revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum UndoError {
    /// Fewer than two moves have been played.
    #[display("Nothing to undo")]
    NothingToUndo,
}

/// Full state of one game against the computer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    boards: BoardSet,
    current_player: Player,
    winner: Option<Player>,
    config: GameConfig,
    history: Vec<BoardSet>,
    game_over: bool,
    rewards: Option<Rewards>,
}

// ─────────────────────────────────────────────────────────────
//  Construction and accessors
// ─────────────────────────────────────────────────────────────

impl GameState {
    /// Starts a fresh game with the human to move.
    #[instrument]
    pub fn new(config: GameConfig) -> Self {
        let boards = empty_boards(config.number_of_boards(), config.board_size());
        Self {
            history: vec![boards.clone()],
            boards,
            current_player: Player::Human,
            winner: None,
            config,
            game_over: false,
            rewards: None,
        }
    }

    /// Current boards.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Winner once the game has finished.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Parameters of this game.
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Every position reached so far, oldest first.
    pub fn history(&self) -> &[BoardSet] {
        &self.history
    }

    /// True once [`GameState::finish`] has run.
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Rewards granted when the game finished.
    pub fn rewards(&self) -> Option<Rewards> {
        self.rewards
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions
// ─────────────────────────────────────────────────────────────

impl GameState {
    /// Validates and applies a move for whoever is to move.
    ///
    /// The turn is not switched; see [`GameState::switch_player`].
    #[instrument(skip(self), fields(player = ?self.current_player))]
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        validate_move(&self.boards, self.config.board_size(), mv).inspect_err(|e| {
            warn!(error = %e, "Rejected move");
        })?;
        self.push(mv);
        Ok(())
    }

    /// Returns true if every board is dead.
    pub fn is_game_over(&self) -> bool {
        all_dead(&self.boards, &geometry(self.config.board_size()))
    }

    /// Hands the turn to the other player.
    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Lets the computer choose and play a move.
    ///
    /// Returns `None` when no legal move exists, leaving the state as is.
    #[instrument(skip(self, rng))]
    pub fn play_computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Move> {
        let mv = find_best_move(
            &self.boards,
            self.config.difficulty(),
            self.config.board_size(),
            self.config.number_of_boards(),
            rng,
        )?;
        self.push(mv);
        debug!(%mv, "Computer played");
        Some(mv)
    }

    /// Ends the game, blaming the player who made the last move.
    ///
    /// `current_player` must still be the mover. Rewards are computed
    /// from the human's point of view and stored on the state.
    #[instrument(skip(self, rng))]
    pub fn finish<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Rewards {
        let winner = self.current_player.opponent();
        let rewards = calculate_rewards(
            winner == Player::Human,
            self.config.difficulty(),
            self.config.number_of_boards(),
            self.config.board_size(),
            rng,
        );
        self.winner = Some(winner);
        self.game_over = true;
        self.rewards = Some(rewards);
        info!(
            winner = winner.label(),
            coins = rewards.coins,
            xp = rewards.xp,
            moves = self.history.len().saturating_sub(1),
            "Game finished"
        );
        rewards
    }

    /// Clears the boards and history, keeping the configuration.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Starts over with new parameters.
    #[instrument(skip(self))]
    pub fn reconfigure(&mut self, config: GameConfig) {
        *self = Self::new(config);
    }

    /// Returns true if a human/computer exchange can be reverted.
    pub fn can_undo(&self) -> bool {
        self.history.len() >= 3
    }

    /// Reverts the last human move and the computer's reply.
    #[instrument(skip(self), fields(history = self.history.len()))]
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if !self.can_undo() {
            return Err(UndoError::NothingToUndo);
        }
        let keep = self.history.len() - 2;
        self.history.truncate(keep);
        if let Some(previous) = self.history.last() {
            self.boards = previous.clone();
        }
        self.current_player = Player::Human;
        self.winner = None;
        self.game_over = false;
        self.rewards = None;
        Ok(())
    }

    fn push(&mut self, mv: Move) {
        self.boards = update_boards(&self.boards, mv);
        self.history.push(self.boards.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
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

    fn config(boards: usize, size: usize, difficulty: u8) -> GameConfig {
        GameConfig::new(boards, size, difficulty).unwrap()
    }

    #[test]
    fn test_update_boards_shares_untouched_boards() {
        let boards = vec![board("........."), board("X........"), board("....X....")];
        let next = update_boards(&boards, Move::new(1, 4));

        assert_eq!(boards[1], board("X........"));
        assert_eq!(next[1], board("X...X...."));
        assert!(next[0].shares_cells_with(&boards[0]));
        assert!(next[2].shares_cells_with(&boards[2]));
        assert!(!next[1].shares_cells_with(&boards[1]));
    }

    #[test]
    fn test_validate_move_errors() {
        let boards = vec![board("XXX......"), board("X........"), board("X..")];
        assert_eq!(
            validate_move(&boards, 3, Move::new(5, 0)),
            Err(MoveError::BoardOutOfRange(5))
        );
        assert_eq!(
            validate_move(&boards, 3, Move::new(1, 9)),
            Err(MoveError::CellOutOfRange(9))
        );
        assert_eq!(
            validate_move(&boards, 3, Move::new(1, 0)),
            Err(MoveError::CellOccupied(Move::new(1, 0)))
        );
        assert_eq!(
            validate_move(&boards, 3, Move::new(0, 5)),
            Err(MoveError::BoardDead(0))
        );
        assert_eq!(
            validate_move(&boards, 3, Move::new(2, 1)),
            Err(MoveError::MalformedBoard {
                board: 2,
                actual: 3,
                expected: 9
            })
        );
        assert_eq!(validate_move(&boards, 3, Move::new(1, 8)), Ok(()));
    }

    #[test]
    fn test_validate_move_when_everything_is_dead() {
        let boards = vec![board("XXX......")];
        assert_eq!(
            validate_move(&boards, 3, Move::new(0, 5)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_new_state_starts_with_one_history_entry() {
        let state = GameState::new(config(3, 3, 2));
        assert_eq!(state.boards().len(), 3);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.current_player(), Player::Human);
        assert!(!state.game_over());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_apply_move_pushes_history() {
        let mut state = GameState::new(config(2, 3, 1));
        state.apply_move(Move::new(0, 4)).unwrap();
        assert_eq!(state.history().len(), 2);
        assert!(state.boards()[0].is_marked(4));
        assert!(!state.history()[0][0].is_marked(4));
        assert_eq!(
            state.apply_move(Move::new(0, 4)),
            Err(MoveError::CellOccupied(Move::new(0, 4)))
        );
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_computer_move_is_applied() {
        let mut state = GameState::new(config(1, 3, 3));
        state.apply_move(Move::new(0, 0)).unwrap();
        state.switch_player();
        let mut rng = StdRng::seed_from_u64(8);
        let mv = state.play_computer_move(&mut rng).unwrap();
        assert!(state.boards()[0].is_marked(mv.cell_index));
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_human_killing_last_board_loses() {
        let mut state = GameState::new(config(1, 2, 2));
        state.apply_move(Move::new(0, 0)).unwrap();
        state.switch_player();
        state.apply_move(Move::new(0, 1)).unwrap();
        assert!(state.is_game_over());

        let mut rng = StdRng::seed_from_u64(1);
        // Computer made the last move
        let rewards = state.finish(&mut rng);
        assert_eq!(state.winner(), Some(Player::Human));
        assert!(state.game_over());
        // base = 2 * 1 * 2
        assert!((4..=20).contains(&rewards.coins));
        assert!((24..=40).contains(&rewards.xp));
        assert_eq!(state.rewards(), Some(rewards));
        assert_eq!(
            state.apply_move(Move::new(0, 2)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_loss_pays_base_xp() {
        let mut state = GameState::new(config(1, 2, 3));
        state.apply_move(Move::new(0, 0)).unwrap();
        state.apply_move(Move::new(0, 3)).unwrap();
        assert!(state.is_game_over());
        let rewards = state.finish(&mut StdRng::seed_from_u64(2));
        assert_eq!(state.winner(), Some(Player::Computer));
        assert_eq!(rewards, Rewards { coins: 0, xp: 6 });
    }

    #[test]
    fn test_undo_reverts_one_exchange() {
        let mut state = GameState::new(config(2, 3, 1));
        state.apply_move(Move::new(0, 4)).unwrap();
        state.switch_player();
        state.apply_move(Move::new(1, 4)).unwrap();
        state.switch_player();
        state.apply_move(Move::new(0, 0)).unwrap();
        state.switch_player();
        state.apply_move(Move::new(1, 0)).unwrap();
        state.switch_player();
        assert_eq!(state.history().len(), 5);

        state.undo().unwrap();
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.boards(), state.history()[2].as_slice());
        assert!(state.boards()[0].is_marked(4));
        assert!(state.boards()[1].is_marked(4));
        assert!(!state.boards()[0].is_marked(0));
        assert_eq!(state.current_player(), Player::Human);

        state.undo().unwrap();
        assert_eq!(state.history().len(), 1);
        assert!(state.boards().iter().all(|b| b.cells().iter().all(|c| *c == Cell::Empty)));
        assert_eq!(state.undo(), Err(UndoError::NothingToUndo));
    }

    #[test]
    fn test_undo_clears_finished_game() {
        let mut state = GameState::new(config(1, 2, 1));
        state.apply_move(Move::new(0, 0)).unwrap();
        state.apply_move(Move::new(0, 1)).unwrap();
        state.finish(&mut StdRng::seed_from_u64(3));
        state.undo().unwrap();
        assert!(!state.game_over());
        assert_eq!(state.winner(), None);
        assert_eq!(state.rewards(), None);
    }

    #[test]
    fn test_reset_and_reconfigure() {
        let mut state = GameState::new(config(2, 3, 1));
        state.apply_move(Move::new(0, 4)).unwrap();
        state.switch_player();
        state.reset();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.current_player(), Player::Human);
        assert!(state.boards().iter().all(|b| !b.is_marked(4)));

        state.reconfigure(config(4, 5, 5));
        assert_eq!(state.boards().len(), 4);
        assert_eq!(state.boards()[0].len(), 25);
        assert_eq!(state.config().difficulty().level(), 5);
    }

    #[test]
    fn test_serializes_camel_case() {
        let state = GameState::new(config(1, 2, 1));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentPlayer"], 1);
        assert_eq!(json["gameOver"], false);
        assert_eq!(json["boards"][0][0], "");
        assert_eq!(json["config"]["boardSize"], 2);
        assert!(json["winner"].is_null());
    }

    #[test]
    fn test_finish_tolerates_empty_history() {
        let mut json = serde_json::to_value(GameState::new(config(1, 2, 1))).unwrap();
        json["history"] = serde_json::json!([]);
        let mut state: GameState = serde_json::from_value(json).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let rewards = state.finish(&mut rng);
        assert!(state.game_over());
        assert_eq!(state.rewards(), Some(rewards));
    }
}
