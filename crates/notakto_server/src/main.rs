//! Notakto - unified CLI
//!
//! Runs the REST game server or a terminal game against the computer.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use notakto::GameConfig;
use notakto_server::cli::{Cli, Command};
use notakto_server::{AppState, InMemoryLedger, ServerConfig, router, terminal};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Play {
            boards,
            size,
            difficulty,
            seed,
        } => run_play(boards, size, difficulty, seed),
    }
}

/// Run the HTTP game server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?
        .with_env(|key| std::env::var(key).ok())?
        .with_overrides(host, port);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let addr = (config.host().clone(), *config.port());
    let state = Arc::new(AppState::new(config, Arc::new(InMemoryLedger::new())));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((addr.0.as_str(), addr.1)).await?;
    info!(host = %addr.0, port = addr.1, "Server ready at http://{}:{}/", addr.0, addr.1);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Completes on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

/// Run a terminal game
fn run_play(boards: usize, size: usize, difficulty: u8, seed: Option<u64>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::new(boards, size, difficulty)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    terminal::play(config, &mut rng, stdin.lock(), stdout.lock())?;
    Ok(())
}
