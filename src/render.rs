//! Plain-text rendering of each view.

use std::fmt::Write;

use chrono::Local;
use spy_core::{Player, RevealCard, RoundHistoryEntry, SessionState, View, WordBank};

/// Typed anywhere to leave the game.
pub const QUIT_COMMAND: &str = "/quit";

/// Renders the screen for the session's current view.
pub fn render(state: &SessionState, words: &WordBank) -> String {
    let mut out = String::new();
    match state.view() {
        View::Setup => setup(&mut out, state),
        View::PlayerPreview => preview(&mut out, state),
        View::WordSelect => word_select(&mut out, words),
        View::Reveal => reveal(&mut out, state),
        View::InProgress => in_progress(&mut out),
        View::Results => results(&mut out, state.players()),
        View::Leaderboard => leaderboard(&mut out, state),
    }
    out
}

fn title(out: &mut String, text: &str) {
    let _ = writeln!(out, "\n== {} ==", text);
}

fn setup(out: &mut String, state: &SessionState) {
    title(out, "Game setup");
    let _ = writeln!(out, "Enter player names separated by commas. Minimum 3.");
    if !state.players().is_empty() {
        let _ = writeln!(out, "Current players: {}", state.roster_input());
    }
    let _ = writeln!(out, "(type {} to leave)", QUIT_COMMAND);
}

fn preview(out: &mut String, state: &SessionState) {
    title(out, "Is everyone here?");
    let _ = writeln!(out, "{} players detected:", state.players().len());
    for player in state.players() {
        let _ = writeln!(out, "  - {}", player.name());
    }
    let _ = writeln!(out, "[y] start game   [e] edit");
}

fn word_select(out: &mut String, words: &WordBank) {
    title(out, "Choose the word");
    let _ = writeln!(
        out,
        "Type a secret word, or press Enter to draw one of {} words.",
        words.len()
    );
}

fn reveal(out: &mut String, state: &SessionState) {
    title(out, "Role assignment");
    match state.reveal_card() {
        Some(RevealCard::FaceDown { player }) => {
            let _ = writeln!(out, "Turn of\n\n    {}\n", player);
            let _ = writeln!(out, "Press Enter to see your role.");
        }
        Some(RevealCard::Spy) => {
            let _ = writeln!(out, "Your secret role:\n\n    YOU ARE THE SPY!\n");
            let _ = writeln!(out, "You don't know the word. Blend in and try to guess the topic.");
            let _ = writeln!(out, "Press Enter to hide and pass.");
        }
        Some(RevealCard::Word(word)) => {
            let _ = writeln!(out, "The word is:\n\n    {}\n", word);
            let _ = writeln!(out, "Find the spy.");
            let _ = writeln!(out, "Press Enter to hide and pass.");
        }
        None => {}
    }
    if let Some((seen, total)) = state.reveal_progress() {
        let dots: String = (0..total)
            .map(|i| match i.cmp(&seen) {
                std::cmp::Ordering::Less => '·',
                std::cmp::Ordering::Equal => '●',
                std::cmp::Ordering::Greater => '○',
            })
            .collect();
        let _ = writeln!(out, "\n{}", dots);
    }
}

fn in_progress(out: &mut String) {
    title(out, "Round in progress");
    let _ = writeln!(out, "Take turns asking questions. The goal is to find the spy.");
    let _ = writeln!(out, "Press Enter to end the round.");
}

fn results(out: &mut String, players: &[Player]) {
    title(out, "Round results");
    let _ = writeln!(out, "1. Who was accused?");
    for (i, player) in players.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i + 1, player.name());
    }
    let _ = writeln!(out, "  [0] Nobody / undecided");
}

/// Renders the standings and recent history, independent of the current view.
pub fn scoreboard(state: &SessionState) -> String {
    let mut out = String::new();
    standings(&mut out, state);
    out
}

fn leaderboard(out: &mut String, state: &SessionState) {
    standings(out, state);
    let _ = writeln!(
        out,
        "\n[n] new round   [e] edit players   [r] reset everything   [q] quit"
    );
}

fn standings(out: &mut String, state: &SessionState) {
    title(out, "Scoreboard");
    if state.players().is_empty() {
        let _ = writeln!(out, "  No players yet.");
    }
    for (rank, player) in state.standings().iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<20} {}", rank + 1, player.name(), player.score());
    }

    if !state.history().is_empty() {
        let _ = writeln!(out, "\nRecent history");
        for entry in state.history().entries() {
            history_entry(out, entry);
        }
    }
}

fn history_entry(out: &mut String, entry: &RoundHistoryEntry) {
    let time = entry.timestamp().with_timezone(&Local).format("%H:%M");
    let accused = entry.accused_name().as_deref().unwrap_or("Nobody");
    let mark = if entry.spy_caught() { "caught" } else { "escaped" };
    let _ = writeln!(out, "  Word: {} ({})", entry.word(), time);
    let _ = writeln!(
        out,
        "    Spy: {}   Accused: {} ({})",
        entry.spy_name(),
        accused,
        mark
    );
    if *entry.spy_guessed() {
        let _ = writeln!(out, "    The spy guessed the word (+4 pts)");
    } else {
        let _ = writeln!(out, "    The spy did not guess the word");
    }
}
