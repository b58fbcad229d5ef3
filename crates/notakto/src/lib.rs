//! Notakto game engine.
//!
//! Notakto is tic-tac-toe played on several boards at once with a single
//! shared mark. A board dies once any row, column or diagonal is fully
//! marked, and whoever kills the last live board loses.
//!
//! # Architecture
//!
//! - **Rules**: win patterns, board death, memoized per-size geometry
//! - **Moves**: legal move generation, center cells first
//! - **Search**: heuristic scoring and alpha-beta minimax
//! - **Policy**: difficulty-dependent depth and random play
//! - **State**: move application, turn tracking, undo
//! - **Rewards**: coins and XP for a finished game
//!
//! All randomness is injected as a [`rand::Rng`].
//!
//! # Example
//!
//! ```
//! use notakto::{GameConfig, GameState, Move, Player};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut state = GameState::new(GameConfig::new(2, 3, 2)?);
//!
//! state.apply_move(Move::new(0, 4))?;
//! state.switch_player();
//! let reply = state.play_computer_move(&mut rng);
//! assert!(reply.is_some());
//! state.switch_player();
//! assert_eq!(state.current_player(), Player::Human);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod heuristic;
mod moves;
mod state;
mod types;

pub mod policy;
pub mod rewards;
pub mod rules;
pub mod search;

// Crate-level exports - Domain types
pub use action::{Move, MoveError};
pub use types::{Board, BoardSet, Cell, ConfigError, Difficulty, GameConfig, Player, empty_boards};

// Crate-level exports - Rules and evaluation
pub use heuristic::heuristic;
pub use moves::valid_moves;
pub use rules::{WinPattern, is_board_dead, win_patterns};

// Crate-level exports - Search and move selection
pub use policy::{find_best_move, max_depth};
pub use search::{SearchStats, Searcher, minimax};

// Crate-level exports - State and rewards
pub use rewards::{Rewards, calculate_rewards};
pub use state::{GameState, UndoError, update_boards, validate_move};
