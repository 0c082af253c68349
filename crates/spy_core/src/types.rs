//! Core domain types for the spy party game.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Stable identifier of a player within a session.
///
/// Identity survives across rounds so scores accumulate on the right
/// player, and is regenerated wholesale whenever the roster is rebuilt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A participant in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Unique identifier.
    id: PlayerId,
    /// Display name, already disambiguated.
    name: String,
    /// Cumulative score across settled rounds.
    score: f64,
}

impl Player {
    /// Creates a player with a fresh identifier and a zero score.
    #[instrument(skip(name), fields(name = %name.as_ref()))]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            id: PlayerId::generate(),
            name: name.as_ref().to_string(),
            score: 0.0,
        }
    }

    /// Returns a copy of this player with `delta` added to the score.
    pub(crate) fn with_score_delta(&self, delta: f64) -> Self {
        Self {
            score: self.score + delta,
            ..self.clone()
        }
    }

    /// Returns a copy of this player with the score reset to zero.
    pub(crate) fn with_zero_score(&self) -> Self {
        Self {
            score: 0.0,
            ..self.clone()
        }
    }
}

/// The screen the session is currently showing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    /// Entering player names.
    #[default]
    Setup,
    /// Confirming the parsed roster.
    PlayerPreview,
    /// Choosing the secret word.
    WordSelect,
    /// Passing the device around so each player sees their card.
    Reveal,
    /// Free discussion.
    InProgress,
    /// Collecting the group's verdict.
    Results,
    /// Scores and history.
    Leaderboard,
}

impl View {
    /// Returns true if a current round must exist in this view.
    pub fn has_round(self) -> bool {
        matches!(self, View::Reveal | View::InProgress | View::Results)
    }
}

/// The round being played right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CurrentRound {
    /// Secret word shown to every citizen.
    word: String,
    /// The spy for this round.
    spy_id: PlayerId,
    /// Roster position of the player whose card is up next.
    ///
    /// Equals the player count once every card has been seen.
    reveal_index: usize,
    /// Whether the current player's card is face-up.
    is_revealed: bool,
}

impl CurrentRound {
    /// Starts a round with every card face-down at the first player.
    pub fn new(word: impl Into<String>, spy_id: PlayerId) -> Self {
        Self {
            word: word.into(),
            spy_id,
            reveal_index: 0,
            is_revealed: false,
        }
    }

    pub(crate) fn set_revealed(&mut self, revealed: bool) {
        self.is_revealed = revealed;
    }

    pub(crate) fn advance_index(&mut self) {
        self.reveal_index += 1;
    }
}

/// Snapshot of one settled round.
///
/// Names are copied at settlement so the entry stays readable after the
/// roster is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoundHistoryEntry {
    /// Unique identifier of the entry.
    id: Uuid,
    /// The secret word of the round.
    word: String,
    /// Name of the spy at settlement time.
    spy_name: String,
    /// Name of the accused player, absent if nobody was accused.
    accused_name: Option<String>,
    /// Whether the accused player was the spy, decided by identifier.
    spy_found: bool,
    /// Whether the spy guessed the word.
    spy_guessed: bool,
    /// When the round was settled.
    timestamp: DateTime<Utc>,
}

impl RoundHistoryEntry {
    /// Creates a new history entry with a fresh identifier.
    pub fn new(
        word: impl Into<String>,
        spy_name: impl Into<String>,
        accused_name: Option<String>,
        spy_found: bool,
        spy_guessed: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word: word.into(),
            spy_name: spy_name.into(),
            accused_name,
            spy_found,
            spy_guessed,
            timestamp,
        }
    }

    /// Returns true if the group accused the spy.
    ///
    /// Decided when the round was settled, so players who share a display
    /// name cannot be confused.
    pub fn spy_caught(&self) -> bool {
        self.spy_found
    }
}
