//! REST API for playing Notakto against the computer.
//!
//! Endpoints:
//! - POST /api/game/create    - Start a game
//! - GET  /api/game/{id}      - Read a game
//! - POST /api/game/move      - Human move plus computer reply
//! - POST /api/game/reset     - Clear the boards
//! - POST /api/game/config    - Start over with new parameters
//! - POST /api/game/undo      - Revert the last exchange
//! - POST /api/game/skip      - Let the computer move, for a fee
//! - GET  /api/ledger/{account} - Coin and XP balance
//! - GET  /health             - Health check
//!
//! Requests carrying an `x-user-uid` header have rewards and charges
//! booked to that account.

use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::ledger::{Balance, RewardLedger};
use crate::session::{GameSession, SessionId, SessionManager, TurnOutcome};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request};
use axum::routing::{get, post};
use axum::{Json, Router};
use notakto::{GameConfig, GameState, Move, Rewards};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// Header naming the account rewards are booked to.
pub const ACCOUNT_HEADER: &str = "x-user-uid";

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Live game sessions.
    pub sessions: SessionManager,
    /// Where rewards and charges are booked.
    pub ledger: Arc<dyn RewardLedger>,
    /// Server settings.
    pub config: ServerConfig,
    rng: Mutex<StdRng>,
}

impl AppState {
    /// Creates state with an entropy-seeded random source.
    pub fn new(config: ServerConfig, ledger: Arc<dyn RewardLedger>) -> Self {
        Self::with_rng(config, ledger, StdRng::from_entropy())
    }

    /// Creates state with a fixed seed, for reproducible games.
    pub fn with_seed(config: ServerConfig, ledger: Arc<dyn RewardLedger>, seed: u64) -> Self {
        Self::with_rng(config, ledger, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ServerConfig, ledger: Arc<dyn RewardLedger>, rng: StdRng) -> Self {
        Self {
            sessions: SessionManager::new(),
            ledger,
            config,
            rng: Mutex::new(rng),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A random source for one request, seeded from the shared one.
    fn request_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.rng().next_u64())
    }

    /// Runs a turn on a session off the async workers.
    ///
    /// The turn may search, so it runs on the blocking pool under the
    /// session's own lock only.
    async fn run_turn<F>(
        &self,
        id: SessionId,
        turn: F,
    ) -> Result<(GameSession, TurnOutcome), SessionError>
    where
        F: FnOnce(&mut GameSession, &mut StdRng) -> Result<TurnOutcome, SessionError>
            + Send
            + 'static,
    {
        let sessions = self.sessions.clone();
        let mut rng = self.request_rng();
        tokio::task::spawn_blocking(move || {
            sessions.with_session(&id, |session| {
                let outcome = turn(session, &mut rng)?;
                Ok((session.clone(), outcome))
            })
        })
        .await?
    }
}

/// Body for starting a game.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Number of boards.
    pub number_of_boards: usize,
    /// Board side length.
    pub board_size: usize,
    /// Difficulty 1 to 5.
    pub difficulty: u8,
}

/// Body for changing a game's parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    /// Target session.
    pub session_id: SessionId,
    /// Number of boards.
    pub number_of_boards: usize,
    /// Board side length.
    pub board_size: usize,
    /// Difficulty 1 to 5.
    pub difficulty: u8,
}

/// Body for a human move.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Target session.
    pub session_id: SessionId,
    /// Board to mark.
    pub board_index: usize,
    /// Cell to mark.
    pub cell_index: usize,
}

/// Body naming only a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Target session.
    pub session_id: SessionId,
}

/// A session's current state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    /// Always true.
    pub success: bool,
    /// Session the state belongs to.
    pub session_id: SessionId,
    /// Full game state.
    pub game_state: GameState,
}

impl From<GameSession> for GameResponse {
    fn from(session: GameSession) -> Self {
        Self {
            success: true,
            session_id: session.id,
            game_state: session.state,
        }
    }
}

/// State after a move or a skip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// Always true.
    pub success: bool,
    /// Session the state belongs to.
    pub session_id: SessionId,
    /// Full game state.
    pub game_state: GameState,
    /// True if the game ended during the turn.
    pub game_over: bool,
    /// The computer's reply.
    pub computer_move: Option<Move>,
    /// Rewards if the game ended.
    pub rewards: Option<Rewards>,
}

impl TurnResponse {
    fn new(session: GameSession, outcome: TurnOutcome) -> Self {
        Self {
            success: true,
            session_id: session.id,
            game_state: session.state,
            game_over: outcome.game_over,
            computer_move: outcome.computer_move,
            rewards: outcome.rewards,
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/game/create", post(create_game))
        .route("/api/game/move", post(make_move))
        .route("/api/game/reset", post(reset_game))
        .route("/api/game/config", post(configure_game))
        .route("/api/game/undo", post(undo_move))
        .route("/api/game/skip", post(skip_turn))
        .route("/api/game/{id}", get(get_game))
        .route("/api/ledger/{account}", get(get_balance))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(state)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

fn account(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Health check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Starts a game.
#[instrument(skip(state))]
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<GameResponse>, SessionError> {
    let config = GameConfig::new(req.number_of_boards, req.board_size, req.difficulty)?;
    let mut rng = state.request_rng();
    let session = state.sessions.create_session(config, &mut rng);
    Ok(Json(session.into()))
}

/// Reads a game.
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<GameResponse>, SessionError> {
    let session = state
        .sessions
        .get_session(&id)
        .ok_or(SessionError::NotFound(id))?;
    Ok(Json(session.into()))
}

/// Plays the human's move and the computer's reply.
#[instrument(skip(state, headers))]
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<MoveRequest>,
) -> Result<Json<TurnResponse>, SessionError> {
    let mv = Move::new(req.board_index, req.cell_index);
    let (session, outcome) = state
        .run_turn(req.session_id, move |session, rng| session.submit_move(mv, rng))
        .await?;

    if let (Some(rewards), Some(account)) = (outcome.rewards, account(&headers)) {
        state.ledger.credit(account, rewards.coins, rewards.xp).await?;
    }

    Ok(Json(TurnResponse::new(session, outcome)))
}

/// Clears the boards.
#[instrument(skip(state))]
pub async fn reset_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<GameResponse>, SessionError> {
    let session = state.sessions.with_session(&req.session_id, |session| {
        session.reset();
        Ok(session.clone())
    })?;
    Ok(Json(session.into()))
}

/// Starts over with new parameters.
#[instrument(skip(state))]
pub async fn configure_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfigRequest>,
) -> Result<Json<GameResponse>, SessionError> {
    let config = GameConfig::new(req.number_of_boards, req.board_size, req.difficulty)?;
    let session = state.sessions.with_session(&req.session_id, |session| {
        session.reconfigure(config);
        Ok(session.clone())
    })?;
    Ok(Json(session.into()))
}

/// Reverts the last human move and computer reply.
#[instrument(skip(state))]
pub async fn undo_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<GameResponse>, SessionError> {
    let session = state.sessions.with_session(&req.session_id, |session| {
        session.undo()?;
        Ok(session.clone())
    })?;
    Ok(Json(session.into()))
}

/// Lets the computer take the human's turn.
///
/// The named account is charged the skip cost, netted with any reward
/// from a game the skip ended.
#[instrument(skip(state, headers))]
pub async fn skip_turn(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SessionRequest>,
) -> Result<Json<TurnResponse>, SessionError> {
    let (session, outcome) = state
        .run_turn(req.session_id, |session, rng| session.skip(rng))
        .await?;

    if let Some(account) = account(&headers) {
        let rewards = outcome.rewards.unwrap_or_default();
        let coins = rewards.coins - state.config.skip_cost();
        debug!(account, coins, xp = rewards.xp, "Charging for skip");
        state.ledger.credit(account, coins, rewards.xp).await?;
    }

    Ok(Json(TurnResponse::new(session, outcome)))
}

/// Reads an account balance.
#[instrument(skip(state))]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<Balance>, SessionError> {
    if account.trim().is_empty() {
        return Err(SessionError::InvalidAccount(account));
    }
    Ok(Json(state.ledger.balance(&account).await?))
}
