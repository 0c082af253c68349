//! Spy Party - terminal entry point
//!
//! Plays, inspects or resets the persisted session.

#![warn(missing_docs)]

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use spy_core::{Dealer, Entropy, Event, RngEntropy};
use spy_party::{Console, FileStore, Party, PartyConfig, scoreboard};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = PartyConfig::load_or_default(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    // Logs go to stderr so they never interleave with the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let words = config.word_bank()?;
    let dealer = Dealer::new(words, RngEntropy::thread());
    let store = FileStore::new(config.data_dir());
    let mut party = Party::open(store, config.storage_key(), dealer);

    match cli.command.unwrap_or_default() {
        Command::Play { no_clear } => {
            let config = if no_clear {
                config.with_clear_screen(false)
            } else {
                config
            };
            run_play(&config, &mut party)
        }
        Command::Show { json } => run_show(&party, json),
        Command::Reset => run_reset(&mut party),
    }
}

/// Run the interactive console on stdin/stdout
#[instrument(skip_all)]
fn run_play<E: Entropy>(config: &PartyConfig, party: &mut Party<FileStore, E>) -> Result<()> {
    info!(clear_screen = *config.clear_screen(), "Starting Spy Party");
    let stdin = io::stdin();
    let mut console =
        Console::new(stdin.lock(), io::stdout()).with_clear_screen(*config.clear_screen());
    console.run(party)?;
    Ok(())
}

/// Print the saved scoreboard and history
fn run_show<E: Entropy>(party: &Party<FileStore, E>, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(party.state())?)?;
    } else {
        write!(out, "{}", scoreboard(party.state()))?;
    }
    Ok(())
}

/// Replace the saved session with an empty one
#[instrument(skip_all)]
fn run_reset<E: Entropy>(party: &mut Party<FileStore, E>) -> Result<()> {
    party.dispatch(Event::FullReset)?;
    info!(path = %party.store().path_for(party.key()).display(), "Session reset");
    println!("Session reset.");
    Ok(())
}
