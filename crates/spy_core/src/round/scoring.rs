//! Settlement: score deltas and the history snapshot for a finished round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{CurrentRound, Player, PlayerId, RoundHistoryEntry, SpyError};

/// Points each citizen earns when the group accuses the spy.
pub const SPY_FOUND_BONUS: f64 = 0.5;

/// Points the spy earns for guessing the secret word.
pub const SPY_GUESS_BONUS: f64 = 4.0;

/// The group's accusation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The group accused this player.
    Accused(PlayerId),
    /// The group could not agree on anyone.
    Nobody,
}

impl Verdict {
    /// Returns the accused player, if any.
    pub fn accused(&self) -> Option<PlayerId> {
        match self {
            Verdict::Accused(id) => Some(*id),
            Verdict::Nobody => None,
        }
    }
}

/// Score change for one player.
///
/// The two bonuses are independent and add up; in practice a single
/// player never receives both since only citizens earn the first.
pub fn score_delta(player: PlayerId, spy: PlayerId, verdict: Verdict, spy_guessed: bool) -> f64 {
    let is_spy = player == spy;
    let spy_found = verdict.accused() == Some(spy);

    let mut delta = 0.0;
    if spy_found && !is_spy {
        delta += SPY_FOUND_BONUS;
    }
    if spy_guessed && is_spy {
        delta += SPY_GUESS_BONUS;
    }
    delta
}

/// Outcome of settling a round.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Roster with scores updated.
    pub players: Vec<Player>,
    /// Snapshot to prepend to the history.
    pub entry: RoundHistoryEntry,
}

/// Applies the verdict to the roster and snapshots the round.
///
/// # Errors
///
/// - [`SpyError::MissingVerdict`] if no accusation was selected.
/// - [`SpyError::UnknownPlayer`] if the accused or the spy is not on the roster.
#[instrument(skip(players, round), fields(player_count = players.len()))]
pub fn settle(
    players: &[Player],
    round: &CurrentRound,
    verdict: Option<Verdict>,
    spy_guessed: bool,
    timestamp: DateTime<Utc>,
) -> Result<Settlement, SpyError> {
    let verdict = verdict.ok_or_else(|| {
        warn!("Settlement attempted without a verdict");
        SpyError::MissingVerdict
    })?;

    let spy_id = *round.spy_id();
    let name_of = |id: PlayerId| {
        players
            .iter()
            .find(|p| *p.id() == id)
            .map(|p| p.name().clone())
            .ok_or(SpyError::UnknownPlayer(id))
    };

    let spy_name = name_of(spy_id)?;
    let accused_name = verdict.accused().map(name_of).transpose()?;
    let spy_found = verdict.accused() == Some(spy_id);

    let players: Vec<Player> = players
        .iter()
        .map(|p| p.with_score_delta(score_delta(*p.id(), spy_id, verdict, spy_guessed)))
        .collect();

    info!(
        spy = %spy_name,
        accused = ?accused_name,
        spy_found,
        spy_guessed,
        "Round settled"
    );

    Ok(Settlement {
        players,
        entry: RoundHistoryEntry::new(
            round.word().clone(),
            spy_name,
            accused_name,
            spy_found,
            spy_guessed,
            timestamp,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_roster;

    fn deltas(before: &[Player], after: &[Player]) -> Vec<f64> {
        before
            .iter()
            .zip(after)
            .map(|(b, a)| a.score() - b.score())
            .collect()
    }

    #[test]
    fn test_spy_found_no_guess() {
        let players = build_roster("a, b, c, d");
        let round = CurrentRound::new("Faro", *players[3].id());
        let verdict = Some(Verdict::Accused(*players[3].id()));

        let settled = settle(&players, &round, verdict, false, Utc::now()).unwrap();
        assert_eq!(deltas(&players, &settled.players), vec![0.5, 0.5, 0.5, 0.0]);
        assert!(settled.entry.spy_caught());
    }

    #[test]
    fn test_nobody_accused_spy_guessed() {
        let players = build_roster("a, b, c, d");
        let round = CurrentRound::new("Faro", *players[0].id());

        let settled = settle(&players, &round, Some(Verdict::Nobody), true, Utc::now()).unwrap();
        assert_eq!(deltas(&players, &settled.players), vec![4.0, 0.0, 0.0, 0.0]);
        assert_eq!(*settled.entry.accused_name(), None);
        assert!(*settled.entry.spy_guessed());
    }

    #[test]
    fn test_spy_found_and_guessed() {
        let players = build_roster("a, b, c");
        let round = CurrentRound::new("Faro", *players[1].id());
        let verdict = Some(Verdict::Accused(*players[1].id()));

        let settled = settle(&players, &round, verdict, true, Utc::now()).unwrap();
        assert_eq!(deltas(&players, &settled.players), vec![0.5, 4.0, 0.5]);
    }

    #[test]
    fn test_wrong_accusation_scores_nothing() {
        let players = build_roster("a, b, c");
        let round = CurrentRound::new("Faro", *players[1].id());
        let verdict = Some(Verdict::Accused(*players[2].id()));

        let settled = settle(&players, &round, verdict, false, Utc::now()).unwrap();
        assert_eq!(deltas(&players, &settled.players), vec![0.0, 0.0, 0.0]);
        assert_eq!(settled.entry.accused_name().as_deref(), Some("c"));
        assert_eq!(settled.entry.spy_name(), "b");
    }

    #[test]
    fn test_same_display_name_is_not_caught() {
        let players = vec![Player::new("Ana"), Player::new("Ana (2)"), Player::new("Ana (2)")];
        let round = CurrentRound::new("Faro", *players[2].id());
        let verdict = Some(Verdict::Accused(*players[1].id()));

        let settled = settle(&players, &round, verdict, false, Utc::now()).unwrap();
        assert_eq!(deltas(&players, &settled.players), vec![0.0, 0.0, 0.0]);
        assert_eq!(
            settled.entry.accused_name().as_deref(),
            Some(settled.entry.spy_name().as_str())
        );
        assert!(!settled.entry.spy_caught());
    }

    #[test]
    fn test_accusing_the_spy_is_caught() {
        let players = build_roster("a, b, c");
        let round = CurrentRound::new("Faro", *players[0].id());
        let verdict = Some(Verdict::Accused(*players[0].id()));

        let settled = settle(&players, &round, verdict, false, Utc::now()).unwrap();
        assert!(settled.entry.spy_caught());
    }

    #[test]
    fn test_missing_verdict_rejected() {
        let players = build_roster("a, b, c");
        let round = CurrentRound::new("Faro", *players[0].id());
        assert_eq!(
            settle(&players, &round, None, true, Utc::now()),
            Err(SpyError::MissingVerdict)
        );
    }

    #[test]
    fn test_unknown_accused_rejected() {
        let players = build_roster("a, b, c");
        let stranger = PlayerId::generate();
        let round = CurrentRound::new("Faro", *players[0].id());
        assert_eq!(
            settle(&players, &round, Some(Verdict::Accused(stranger)), false, Utc::now()),
            Err(SpyError::UnknownPlayer(stranger))
        );
    }
}
