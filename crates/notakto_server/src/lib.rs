//! Notakto game server.
//!
//! Hosts games of Notakto against the computer over a JSON REST API and
//! in the terminal.
//!
//! # Architecture
//!
//! - **Session**: in-memory game sessions and the human/computer turn flow
//! - **Ledger**: coin and XP balances booked after each game
//! - **API**: axum routes over the session store
//! - **Config**: TOML file, environment, and flag settings
//! - **Terminal**: line-based play for the `play` command
//!
//! # Example
//!
//! ```no_run
//! use notakto_server::{AppState, InMemoryLedger, ServerConfig, router};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let state = Arc::new(AppState::new(config, Arc::new(InMemoryLedger::new())));
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", 3000)).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod session;
pub mod terminal;

// Crate-level exports - Server
pub use api::{ACCOUNT_HEADER, AppState, router};
pub use config::{ServerConfig, ServerConfigError};
pub use error::{ErrorResponse, SessionError};

// Crate-level exports - Sessions and ledger
pub use ledger::{Balance, InMemoryLedger, LedgerError, RewardLedger};
pub use session::{GameSession, SessionId, SessionManager, TurnOutcome};
