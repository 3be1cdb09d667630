//! CLI module for the user directory
//!
//! Subcommands:
//! - `serve`: HTTP API server (default)
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// User Directory - user management over HTTP
#[derive(Parser)]
#[command(name = "user-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default mode)
    Serve,

    /// Apply pending PostgreSQL migrations and exit
    Migrate(migrate::MigrateArgs),
}

/// Shared startup for every subcommand: `.env`, configuration, logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
