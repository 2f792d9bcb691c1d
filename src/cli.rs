//! Command-line interface for teamquest.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TeamQuest - mini-games with XP for your team
#[derive(Parser, Debug)]
#[command(name = "teamquest")]
#[command(about = "Play team mini-games and earn XP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $TEAMQUEST_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the profile ledger (JSON, created if it doesn't exist)
    #[arg(long, global = true, default_value = "teamquest_profile.json")]
    pub ledger: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the playable games
    Catalog,

    /// Play a game in the terminal
    Play {
        /// Catalog id of the game
        game_id: String,

        /// Teammate ids to invite (multiplayer when given)
        #[arg(short, long)]
        invite: Vec<String>,

        /// RNG seed for a reproducible puzzle grid
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show XP, level and recent achievements
    Profile,
}
