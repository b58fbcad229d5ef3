//! Move selection for the computer opponent.
//!
//! Early positions have too many moves to search and are played at
//! random. As the move count falls the computer searches more often,
//! and always searches once nine or fewer moves remain. Search depth
//! shrinks as the total board area grows.

use crate::action::Move;
use crate::moves::valid_moves_with;
use crate::rules::geometry;
use crate::search::{INFINITY, Score, Searcher};
use crate::state::update_boards;
use crate::types::{Board, Difficulty};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Above this many legal moves the computer always plays at random.
pub const RANDOM_PLAY_THRESHOLD: usize = 20;

/// At or below this many legal moves the computer always searches.
pub const ALWAYS_SEARCH_THRESHOLD: usize = 9;

/// How the computer will pick its next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Pick uniformly among legal moves.
    Random,
    /// Run minimax over every legal move.
    Search,
}

/// Chance of searching for a given move count.
///
/// Linear between the two thresholds; the jump to certainty at
/// [`ALWAYS_SEARCH_THRESHOLD`] is deliberate.
pub fn search_probability(move_count: usize) -> f64 {
    if move_count > RANDOM_PLAY_THRESHOLD {
        0.0
    } else if move_count <= ALWAYS_SEARCH_THRESHOLD {
        1.0
    } else {
        (RANDOM_PLAY_THRESHOLD - move_count) as f64 / 14.0
    }
}

/// Decides between searching and random play.
pub fn decide<R: Rng + ?Sized>(move_count: usize, rng: &mut R) -> Decision {
    if move_count > RANDOM_PLAY_THRESHOLD {
        return Decision::Random;
    }
    if move_count <= ALWAYS_SEARCH_THRESHOLD {
        return Decision::Search;
    }
    if rng.gen_bool(search_probability(move_count)) {
        Decision::Search
    } else {
        Decision::Random
    }
}

/// Search depth for the game's size and difficulty.
///
/// Bigger total board area means a shallower search.
pub fn max_depth(board_size: usize, number_of_boards: usize, difficulty: Difficulty) -> u32 {
    let complexity = board_size * number_of_boards;
    let level = u32::from(difficulty.level());
    if complexity <= 9 {
        (level + 2).min(5)
    } else if complexity <= 16 {
        (level + 1).min(4)
    } else {
        level.min(3)
    }
}

/// Picks the computer's move, or `None` when no legal move exists.
#[instrument(skip(boards, rng), fields(boards = boards.len()))]
pub fn find_best_move<R: Rng + ?Sized>(
    boards: &[Board],
    difficulty: Difficulty,
    board_size: usize,
    number_of_boards: usize,
    rng: &mut R,
) -> Option<Move> {
    let geometry = geometry(board_size);
    let moves = valid_moves_with(boards, &geometry);
    if moves.is_empty() {
        debug!("No legal moves available");
        return None;
    }

    if decide(moves.len(), rng) == Decision::Random {
        let chosen = moves.choose(rng).copied();
        debug!(move_count = moves.len(), chosen = ?chosen, "Playing a random move");
        return chosen;
    }

    let depth = max_depth(board_size, number_of_boards, difficulty);
    let mut searcher = Searcher::with_geometry(geometry);
    let mut best_score: Score = -INFINITY;
    let mut best_moves: Vec<Move> = Vec::new();

    for mv in moves.iter().copied() {
        let next = update_boards(boards, mv);
        let score = searcher.minimax(&next, depth, false, -INFINITY, INFINITY);

        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push(mv);
        } else if score == best_score {
            best_moves.push(mv);
        }

        if score == INFINITY {
            break;
        }
    }

    let chosen = best_moves.choose(rng).copied();
    let stats = searcher.stats();
    debug!(
        move_count = moves.len(),
        depth,
        best_score,
        tied = best_moves.len(),
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        chosen = ?chosen,
        "Searched for best move"
    );
    chosen
}
