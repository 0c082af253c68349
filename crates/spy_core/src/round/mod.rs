//! Round engine: reveal sequencing and settlement.
//!
//! Both halves operate on [`CurrentRound`](crate::CurrentRound) values and
//! never mutate their input; the session threads the results forward.

mod reveal;
mod scoring;

pub use reveal::{RevealCard, RevealStep};
pub use scoring::{SPY_FOUND_BONUS, SPY_GUESS_BONUS, Settlement, Verdict, score_delta, settle};
