//! Coin and XP rewards for a finished game.

use crate::types::Difficulty;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::instrument;

/// Range of the coin multiplier drawn on a win.
pub const COIN_MULTIPLIERS: RangeInclusive<i64> = 1..=5;

/// Range of the XP multiplier drawn on a win.
pub const XP_MULTIPLIERS: RangeInclusive<i64> = 6..=10;

/// Coins and experience earned by the human.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Coins earned.
    pub coins: i64,
    /// Experience earned.
    pub xp: i64,
}

/// `difficulty × boards × board size`, the unit every reward scales by.
pub fn base_reward(difficulty: Difficulty, number_of_boards: usize, board_size: usize) -> i64 {
    i64::from(difficulty.level()) * number_of_boards as i64 * board_size as i64
}

/// Rewards for the given multipliers.
///
/// A loss pays the base XP only and ignores both multipliers.
pub fn rewards_with_multipliers(
    is_win: bool,
    difficulty: Difficulty,
    number_of_boards: usize,
    board_size: usize,
    coin_multiplier: i64,
    xp_multiplier: i64,
) -> Rewards {
    let base = base_reward(difficulty, number_of_boards, board_size);
    if is_win {
        Rewards {
            coins: base * coin_multiplier,
            xp: base * xp_multiplier,
        }
    } else {
        Rewards { coins: 0, xp: base }
    }
}

/// Rewards with multipliers drawn from `rng`.
#[instrument(skip(rng))]
pub fn calculate_rewards<R: Rng + ?Sized>(
    is_win: bool,
    difficulty: Difficulty,
    number_of_boards: usize,
    board_size: usize,
    rng: &mut R,
) -> Rewards {
    let coin_multiplier = rng.gen_range(COIN_MULTIPLIERS);
    let xp_multiplier = rng.gen_range(XP_MULTIPLIERS);
    rewards_with_multipliers(
        is_win,
        difficulty,
        number_of_boards,
        board_size,
        coin_multiplier,
        xp_multiplier,
    )
}
