//! Game sessions against the computer.

use crate::error::SessionError;
use notakto::{GameConfig, GameState, Move, MoveError, Player, Rewards};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Characters session ids are drawn from.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a generated session id.
pub const SESSION_ID_LEN: usize = 11;

/// Generates a random lowercase alphanumeric session id.
pub fn generate_session_id<R: Rng + ?Sized>(rng: &mut R) -> SessionId {
    (0..SESSION_ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// What happened after the human's move or a skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    /// The computer's reply, if it moved.
    pub computer_move: Option<Move>,
    /// True if the game ended during the turn.
    pub game_over: bool,
    /// Rewards granted if the game ended.
    pub rewards: Option<Rewards>,
}

impl TurnOutcome {
    fn ongoing(computer_move: Option<Move>) -> Self {
        Self {
            computer_move,
            game_over: false,
            rewards: None,
        }
    }

    fn finished(computer_move: Option<Move>, rewards: Rewards) -> Self {
        Self {
            computer_move,
            game_over: true,
            rewards: Some(rewards),
        }
    }
}

/// One human-versus-computer game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// The game state.
    pub state: GameState,
}

impl GameSession {
    /// Creates a session with a fresh game.
    #[instrument]
    pub fn new(id: SessionId, config: GameConfig) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            state: GameState::new(config),
        }
    }

    /// Plays the human's move and, unless that ended the game, the
    /// computer's reply.
    #[instrument(skip(self, rng), fields(session_id = %self.id))]
    pub fn submit_move<R: Rng + ?Sized>(
        &mut self,
        mv: Move,
        rng: &mut R,
    ) -> Result<TurnOutcome, SessionError> {
        if self.state.game_over() {
            warn!("Move submitted after game over");
            return Err(MoveError::GameOver.into());
        }
        if self.state.current_player() != Player::Human {
            warn!(current = ?self.state.current_player(), "Move submitted out of turn");
            return Err(MoveError::NotYourTurn.into());
        }

        self.state.apply_move(mv)?;
        if self.state.is_game_over() {
            let rewards = self.state.finish(rng);
            return Ok(TurnOutcome::finished(None, rewards));
        }
        self.state.switch_player();

        Ok(self.computer_turn(rng))
    }

    /// Gives up the human's turn and lets the computer move.
    #[instrument(skip(self, rng), fields(session_id = %self.id))]
    pub fn skip<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TurnOutcome, SessionError> {
        if self.state.game_over() {
            return Err(MoveError::GameOver.into());
        }
        if self.state.current_player() == Player::Human {
            self.state.switch_player();
        }
        Ok(self.computer_turn(rng))
    }

    /// Starts the game over with the same parameters.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Starts the game over with new parameters.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reconfigure(&mut self, config: GameConfig) {
        self.state.reconfigure(config);
    }

    /// Reverts the last human move and the computer's reply.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.state.undo()?;
        Ok(())
    }

    /// Computer moves, then the turn goes back to the human.
    fn computer_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TurnOutcome {
        let computer_move = self.state.play_computer_move(rng);
        if computer_move.is_some() && self.state.is_game_over() {
            let rewards = self.state.finish(rng);
            return TurnOutcome::finished(computer_move, rewards);
        }
        self.state.switch_player();
        debug!(computer_move = ?computer_move, "Turn handed back to human");
        TurnOutcome::ongoing(computer_move)
    }
}

/// A stored session behind its own lock.
type SessionSlot = Arc<Mutex<GameSession>>;

fn lock_slot(slot: &SessionSlot) -> MutexGuard<'_, GameSession> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manages all game sessions.
///
/// The map lock is only held to look up or insert a slot. Each session
/// has its own lock, so turns in different games never wait on each
/// other while turns in the same game run one at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SessionSlot>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionSlot>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, id: &str) -> Option<SessionSlot> {
        self.lock().get(id).cloned()
    }

    /// Creates a session with a fresh id and returns a copy of it.
    #[instrument(skip(self, rng))]
    pub fn create_session<R: Rng + ?Sized>(&self, config: GameConfig, rng: &mut R) -> GameSession {
        let mut sessions = self.lock();
        let mut id = generate_session_id(rng);
        while sessions.contains_key(&id) {
            id = generate_session_id(rng);
        }
        let session = GameSession::new(id.clone(), config);
        sessions.insert(id, Arc::new(Mutex::new(session.clone())));
        info!(session_id = %session.id, total = sessions.len(), "Session created");
        session
    }

    /// Gets a copy of a session.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<GameSession> {
        let Some(slot) = self.slot(id) else {
            debug!(session_id = %id, "Session not found");
            return None;
        };
        let session = lock_slot(&slot).clone();
        Some(session)
    }

    /// Stores a session, replacing any with the same id.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub fn update_session(&self, session: GameSession) {
        match self.slot(&session.id) {
            Some(slot) => *lock_slot(&slot) = session,
            None => {
                self.lock()
                    .insert(session.id.clone(), Arc::new(Mutex::new(session)));
            }
        }
    }

    /// Lists all session ids.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        self.lock().keys().cloned().collect()
    }

    /// Removes a session.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Option<GameSession> {
        let slot = self.lock().remove(id)?;
        info!(session_id = %id, "Session removed");
        let session = lock_slot(&slot).clone();
        Some(session)
    }

    /// Runs `f` on a stored session while holding that session's lock.
    ///
    /// Other sessions stay available while `f` runs. Changes are kept
    /// even when `f` returns an error.
    pub fn with_session<T, F>(&self, id: &str, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, SessionError>,
    {
        let slot = self
            .slot(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let mut session = lock_slot(&slot);
        f(&mut session)
    }
}
