//! Command-line interface for spy_party.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spy Party - pass-and-play social deduction for the terminal
#[derive(Parser, Debug)]
#[command(name = "spy_party")]
#[command(about = "Pass one device around and find the spy", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "spy_party.toml")]
    pub config: PathBuf,

    /// Override the directory holding the saved session
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play, resuming the saved session if there is one
    Play {
        /// Keep previous cards on screen instead of clearing between players
        #[arg(long)]
        no_clear: bool,
    },

    /// Print the scoreboard and round history, then exit
    Show {
        /// Print the raw saved session as JSON
        #[arg(long)]
        json: bool,
    },

    /// Erase players, scores and history
    Reset,
}

impl Default for Command {
    fn default() -> Self {
        Self::Play { no_clear: false }
    }
}
