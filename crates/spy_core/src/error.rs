//! Errors raised by rejected transitions.
//!
//! None of these are fatal: a rejected transition leaves the prior
//! session state intact so the caller can surface a message and retry.

use crate::{PlayerId, View};

/// Source list that a random pick was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Pool {
    /// The word bank.
    #[strum(serialize = "word bank")]
    Words,
    /// The player roster.
    #[strum(serialize = "roster")]
    Players,
}

/// Error that can occur when applying an event to the session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SpyError {
    /// Roster submission parsed to fewer than the minimum number of players.
    #[display("At least {} players are needed, found {}", crate::MIN_PLAYERS, found)]
    InsufficientPlayers {
        /// Number of players the input parsed to.
        found: usize,
    },

    /// A random pick was requested from an empty list.
    #[display("Cannot pick from an empty {}", _0)]
    EmptyPool(#[error(not(source))] Pool),

    /// Settlement attempted without an accusation.
    #[display("Select who was accused before saving the round")]
    MissingVerdict,

    /// Persisted snapshot could not be decoded.
    #[display("Malformed snapshot: {}", _0)]
    MalformedSnapshot(#[error(not(source))] String),

    /// The event is not accepted in the current view.
    #[display("{} is not allowed while in {}", event, view)]
    WrongView {
        /// Name of the rejected event.
        event: &'static str,
        /// View the session was in.
        view: View,
    },

    /// The view requires a round but none exists.
    #[display("No round is being played")]
    NoActiveRound,

    /// The current player's card is already face-up.
    #[display("Card is already revealed")]
    CardAlreadyRevealed,

    /// The current player's card has not been revealed yet.
    #[display("Card has not been revealed yet")]
    CardNotRevealed,

    /// The identifier does not belong to the roster.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(#[error(not(source))] PlayerId),
}
