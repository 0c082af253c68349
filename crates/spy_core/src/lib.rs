//! Spy Core - round and session logic for a pass-and-play spy game
//!
//! One device is passed around a group. Each round every player privately
//! sees a card: citizens see the secret word, the spy sees only that they
//! are the spy. After discussion the group accuses someone and the round
//! is scored.
//!
//! # Architecture
//!
//! - **Roster**: parses comma-separated names into uniquely identified players
//! - **Random**: uniform word and spy picks over injectable entropy
//! - **Round**: reveal sequencing and settlement scoring
//! - **Session**: the view state machine, one fresh state per event
//! - **History**: capped, newest-first log of settled rounds
//! - **Snapshot**: JSON codec for persisting the whole session
//!
//! # Example
//!
//! ```
//! use spy_core::{Dealer, Event, ScriptedEntropy, SessionState, View, WordBank};
//!
//! # fn example() -> Result<(), spy_core::SpyError> {
//! let mut dealer = Dealer::new(WordBank::default(), ScriptedEntropy::new(vec![0]));
//! let state = SessionState::new()
//!     .apply(Event::SubmitRoster { names: "Ana, Luis, Sofía".into() }, &mut dealer)?
//!     .apply(Event::ConfirmRoster, &mut dealer)?
//!     .apply(Event::SelectWord { word: String::new() }, &mut dealer)?;
//! assert_eq!(*state.view(), View::Reveal);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod history;
mod invariants;
mod random;
mod roster;
mod round;
mod session;
mod snapshot;
mod types;
mod words;

pub use error::{Pool, SpyError};
pub use history::{HISTORY_CAP, HistoryLedger};
pub use invariants::{
    HistoryCapped, Invariant, InvariantSet, InvariantViolation, RevealWithinRoster,
    RoundMatchesView, SessionInvariants, UniquePlayerIds,
};
pub use random::{Entropy, RngEntropy, ScriptedEntropy, pick_spy, pick_word};
pub use roster::{NAME_SEPARATOR, build_roster, roster_input};
pub use round::{
    RevealCard, RevealStep, SPY_FOUND_BONUS, SPY_GUESS_BONUS, Settlement, Verdict, score_delta,
    settle,
};
pub use session::{Dealer, Event, MIN_PLAYERS, SessionState};
pub use snapshot::{STORAGE_KEY, decode, encode, load_or_default};
pub use types::{CurrentRound, Player, PlayerId, RoundHistoryEntry, View};
pub use words::{DEFAULT_WORDS, WordBank};
