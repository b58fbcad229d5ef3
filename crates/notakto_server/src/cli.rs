//! Command-line interface for the Notakto server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Notakto - misère tic-tac-toe on several boards against the computer
#[derive(Parser, Debug)]
#[command(name = "notakto")]
#[command(about = "Notakto game server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play against the computer in the terminal
    Play {
        /// Number of boards (1-5)
        #[arg(short, long, default_value = "3")]
        boards: usize,

        /// Board side length (2-5)
        #[arg(short, long, default_value = "3")]
        size: usize,

        /// Computer difficulty (1-5)
        #[arg(short, long, default_value = "2")]
        difficulty: u8,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
}
