//! Playing against the computer in a terminal.
//!
//! Input is one command per line: `<board> <cell>` to move, or one of
//! `skip`, `undo`, `reset`, `quit`.

use crate::session::{GameSession, TurnOutcome};
use notakto::{GameConfig, Move, Player, is_board_dead};
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::{debug, instrument};

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Mark a cell.
    Play(Move),
    /// Let the computer move.
    Skip,
    /// Revert the last exchange.
    Undo,
    /// Clear the boards.
    Reset,
    /// Leave the game.
    Quit,
}

/// Parses one line of input.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let command = match first.to_ascii_lowercase().as_str() {
        "skip" => Command::Skip,
        "undo" => Command::Undo,
        "reset" => Command::Reset,
        "quit" | "exit" | "q" => Command::Quit,
        _ => {
            let board = first.parse().ok()?;
            let cell = parts.next()?.parse().ok()?;
            Command::Play(Move::new(board, cell))
        }
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// Renders every board, marking dead ones.
pub fn render(session: &GameSession) -> String {
    let size = session.state.config().board_size();
    session
        .state
        .boards()
        .iter()
        .enumerate()
        .map(|(index, board)| {
            let status = if is_board_dead(board, size) { " (dead)" } else { "" };
            format!("Board {}{}\n{}", index, status, board.display(size))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs a game until it ends or the player quits.
///
/// Returns the winner, or `None` if the player quit first.
#[instrument(skip(rng, input, output))]
pub fn play<R, I, O>(
    config: GameConfig,
    rng: &mut R,
    input: I,
    mut output: O,
) -> io::Result<Option<Player>>
where
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    let mut session = GameSession::new("terminal".to_string(), config);
    let mut lines = input.lines();

    writeln!(output, "{}\n", render(&session))?;
    loop {
        write!(output, "Your move (board cell, skip, undo, reset, quit): ")?;
        output.flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };

        let result = match parse_command(&line) {
            Some(Command::Quit) => return Ok(None),
            Some(Command::Play(mv)) => session.submit_move(mv, rng),
            Some(Command::Skip) => session.skip(rng),
            Some(Command::Undo) => session.undo().map(|_| TurnOutcome::default()),
            Some(Command::Reset) => {
                session.reset();
                Ok(TurnOutcome::default())
            }
            None => {
                writeln!(output, "\nCould not read {:?}", line.trim())?;
                continue;
            }
        };

        match result {
            Ok(outcome) => {
                debug!(?outcome, "Turn played");
                if let Some(mv) = outcome.computer_move {
                    writeln!(output, "\nComputer plays {}", mv)?;
                }
                writeln!(output, "\n{}\n", render(&session))?;
                if outcome.game_over {
                    return report(&session, &mut output);
                }
            }
            Err(e) => writeln!(output, "\n{}", e)?,
        }
    }
}

fn report<O: Write>(session: &GameSession, output: &mut O) -> io::Result<Option<Player>> {
    let winner = session.state.winner();
    match winner {
        Some(Player::Human) => writeln!(output, "Game over. You win!")?,
        Some(Player::Computer) => writeln!(output, "Game over. The computer wins.")?,
        None => writeln!(output, "Game over.")?,
    }
    if let Some(rewards) = session.state.rewards() {
        writeln!(output, "Rewards: {} coins, {} XP", rewards.coins, rewards.xp)?;
    }
    Ok(winner)
}
