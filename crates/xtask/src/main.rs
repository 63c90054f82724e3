//! Development tasks for Grimoire
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Simulate, ValidateContent};
use tracing_subscriber::EnvFilter;

/// Development tasks for Grimoire
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for Grimoire", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run one combat with a greedy spell policy
    Simulate(Simulate),

    /// Load content and report every consistency problem
    ValidateContent(ValidateContent),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for GRIMOIRE_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::ValidateContent(cmd) => cmd.execute(),
    }
}
