//! First-class invariants for the session state.
//!
//! Invariants are logical properties that hold after every accepted
//! transition. They are checked in debug builds and when loading a
//! persisted snapshot.

use std::collections::HashSet;

use crate::{HISTORY_CAP, SessionState, View};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
            (I4::holds(state), I4::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: no two players share an identifier.
pub struct UniquePlayerIds;

impl Invariant<SessionState> for UniquePlayerIds {
    fn holds(state: &SessionState) -> bool {
        let ids: HashSet<_> = state.players().iter().map(|p| *p.id()).collect();
        ids.len() == state.players().len()
    }

    fn description() -> &'static str {
        "Player identifiers are unique"
    }
}

/// Invariant: a round exists exactly in the views that play one.
pub struct RoundMatchesView;

impl Invariant<SessionState> for RoundMatchesView {
    fn holds(state: &SessionState) -> bool {
        state.current_round().is_some() == state.view().has_round()
    }

    fn description() -> &'static str {
        "Current round is present only from reveal through results"
    }
}

/// Invariant: the reveal index and the spy both point into the roster.
///
/// During the reveal the index names a player; afterwards it equals the
/// player count.
pub struct RevealWithinRoster;

impl Invariant<SessionState> for RevealWithinRoster {
    fn holds(state: &SessionState) -> bool {
        let Some(round) = state.current_round() else {
            return true;
        };
        let count = state.players().len();
        let index_ok = match state.view() {
            View::Reveal => *round.reveal_index() < count,
            _ => *round.reveal_index() == count && !*round.is_revealed(),
        };
        index_ok && state.player(*round.spy_id()).is_some()
    }

    fn description() -> &'static str {
        "Reveal index and spy are within the roster"
    }
}

/// Invariant: history never exceeds its cap.
pub struct HistoryCapped;

impl Invariant<SessionState> for HistoryCapped {
    fn holds(state: &SessionState) -> bool {
        state.history().len() <= HISTORY_CAP
    }

    fn description() -> &'static str {
        "History holds at most the most recent rounds"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (UniquePlayerIds, RoundMatchesView, RevealWithinRoster, HistoryCapped);
