//! Error types for the game server.

use crate::ledger::LedgerError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use notakto::{ConfigError, MoveError, UndoError};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, warn};

/// Failure of a session operation.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// No session is stored under the id.
    #[display("Session not found: {}", _0)]
    #[from(ignore)]
    NotFound(#[error(not(source))] String),

    /// The move was rejected.
    #[display("{}", _0)]
    InvalidMove(MoveError),

    /// The requested game parameters are out of range.
    #[display("{}", _0)]
    InvalidConfig(ConfigError),

    /// There is no exchange to revert.
    #[display("{}", _0)]
    Undo(UndoError),

    /// The account id is blank.
    #[display("Account id must not be empty, got {:?}", _0)]
    #[from(ignore)]
    InvalidAccount(#[error(not(source))] String),

    /// The reward ledger failed.
    #[display("{}", _0)]
    Ledger(LedgerError),

    /// A turn's background task did not finish.
    #[display("Turn task failed: {}", _0)]
    Task(JoinError),
}

impl SessionError {
    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::InvalidMove(_)
            | SessionError::InvalidConfig(_)
            | SessionError::Undo(_)
            | SessionError::InvalidAccount(_) => StatusCode::BAD_REQUEST,
            SessionError::Ledger(_) | SessionError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned with every error status.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Human-readable reason.
    pub error: String,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "Request failed");
        } else {
            warn!(error = %self, %status, "Request rejected");
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
