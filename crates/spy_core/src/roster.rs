//! Roster construction from free-form name input.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::Player;

/// Separator between names in the roster input.
pub const NAME_SEPARATOR: char = ',';

/// Parses comma-separated names into a fresh roster.
///
/// Fragments are trimmed and blanks dropped. A name seen before within the
/// same call gets its 1-based occurrence count appended, so
/// `"Ana, Ana, Ana"` yields `Ana`, `Ana (2)`, `Ana (3)`. A suffixed name
/// that someone typed literally is skipped, so every display name is unique.
/// Every player gets a new identifier and a zero score.
///
/// The minimum roster size is enforced by the session, not here.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn build_roster(raw: &str) -> Vec<Player> {
    let names: Vec<&str> = raw
        .split(NAME_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    let mut taken: HashSet<String> = names.iter().map(|name| name.to_string()).collect();
    let mut first_seen: HashSet<&str> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    let players: Vec<Player> = names
        .iter()
        .map(|&name| {
            if first_seen.insert(name) {
                return Player::new(name);
            }
            let suffix = next_suffix.entry(name).or_insert(2);
            let mut candidate = format!("{} ({})", name, suffix);
            while taken.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{} ({})", name, suffix);
            }
            *suffix += 1;
            taken.insert(candidate.clone());
            Player::new(candidate)
        })
        .collect();

    debug!(count = players.len(), "Roster built");
    players
}

/// Joins player names back into editable roster input.
pub fn roster_input(players: &[Player]) -> String {
    players
        .iter()
        .map(|p| p.name().as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
