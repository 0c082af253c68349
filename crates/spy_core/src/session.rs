//! Session state machine.
//!
//! Every transition borrows the current [`SessionState`] and returns a
//! brand-new one, so a rejected event leaves the caller's state exactly
//! as it was and observers never see a half-applied change.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::invariants::{InvariantSet, InvariantViolation, SessionInvariants};
use crate::random::{Entropy, pick_spy, pick_word};
use crate::round::{RevealCard, RevealStep, Verdict, settle};
use crate::{
    CurrentRound, HistoryLedger, Player, PlayerId, SpyError, View, WordBank, build_roster,
    roster_input,
};

/// Fewest players a roster may have.
pub const MIN_PLAYERS: usize = 3;

/// Randomness and word source used when starting a round.
#[derive(Debug, Clone)]
pub struct Dealer<E> {
    words: WordBank,
    entropy: E,
}

impl<E: Entropy> Dealer<E> {
    /// Creates a dealer drawing from `words` with `entropy`.
    pub fn new(words: WordBank, entropy: E) -> Self {
        Self { words, entropy }
    }

    /// Returns the word bank.
    pub fn words(&self) -> &WordBank {
        &self.words
    }
}

/// Inbound user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event", rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Event {
    /// Comma-separated player names from the setup screen.
    SubmitRoster {
        /// Raw input text.
        names: String,
    },
    /// Accept the previewed roster.
    ConfirmRoster,
    /// Go back from the preview to edit names.
    EditRoster,
    /// Start a round with this word; blank means pick one at random.
    SelectWord {
        /// Typed word, possibly blank.
        word: String,
    },
    /// Show the current player's card.
    Reveal,
    /// Hide the current player's card and pass the device on.
    Acknowledge,
    /// Reveal if the card is hidden, acknowledge if it is shown.
    RevealNext,
    /// Stop discussion and collect the verdict.
    EndRound,
    /// Record the verdict and score the round.
    SettleRound {
        /// Who was accused, `None` if nothing was selected.
        verdict: Option<Verdict>,
        /// Whether the spy guessed the word.
        spy_guessed: bool,
    },
    /// Play another round with the same roster.
    NewRound,
    /// Leave the leaderboard to edit the roster, optionally resetting scores.
    EditWithResetChoice {
        /// True if the reset prompt was accepted.
        reset: bool,
    },
    /// Wipe everything back to an empty session.
    FullReset,
}

impl Event {
    /// Kebab-case name of the event.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Complete state of one play session; the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct SessionState {
    /// Roster in play order.
    players: Vec<Player>,
    /// Settled rounds, newest first.
    #[serde(default)]
    history: HistoryLedger,
    /// Screen being shown.
    view: View,
    /// Round in play, present only from reveal through results.
    #[serde(default)]
    current_round: Option<CurrentRound>,
}

impl SessionState {
    /// Creates the empty default session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an event, using the current time for settlement.
    pub fn apply<E: Entropy>(&self, event: Event, dealer: &mut Dealer<E>) -> Result<Self, SpyError> {
        self.apply_at(event, dealer, Utc::now())
    }

    /// Applies an event, stamping any settled round with `now`.
    #[instrument(skip(self, event, dealer), fields(view = %self.view, event = event.name()))]
    pub fn apply_at<E: Entropy>(
        &self,
        event: Event,
        dealer: &mut Dealer<E>,
        now: DateTime<Utc>,
    ) -> Result<Self, SpyError> {
        let next = match event {
            Event::SubmitRoster { names } => self.submit_roster(&names),
            Event::ConfirmRoster => self.confirm_roster(),
            Event::EditRoster => self.edit_roster(),
            Event::SelectWord { word } => self.select_word(&word, dealer),
            Event::Reveal => self.reveal(),
            Event::Acknowledge => self.acknowledge(),
            Event::RevealNext => self.reveal_next(),
            Event::EndRound => self.end_round(),
            Event::SettleRound {
                verdict,
                spy_guessed,
            } => self.settle_round(verdict, spy_guessed, now),
            Event::NewRound => self.new_round(),
            Event::EditWithResetChoice { reset } => self.edit_with_reset_choice(reset),
            Event::FullReset => Ok(self.full_reset()),
        }
        .inspect_err(|e| warn!(error = %e, "Event rejected"))?;

        debug_assert!(
            next.check_invariants().is_ok(),
            "Session invariants violated: {:?}",
            next.check_invariants()
        );
        debug!(view = %next.view, "Event applied");
        Ok(next)
    }

    // ─────────────────────────────────────────────────────────────
    //  Roster
    // ─────────────────────────────────────────────────────────────

    /// Replaces the roster from comma-separated names and moves to the preview.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::InsufficientPlayers`] if fewer than
    /// [`MIN_PLAYERS`] names parse; the roster is not replaced.
    #[instrument(skip(self, names))]
    pub fn submit_roster(&self, names: &str) -> Result<Self, SpyError> {
        self.expect_view(View::Setup, "submit-roster")?;

        let players = build_roster(names);
        if players.len() < MIN_PLAYERS {
            warn!(found = players.len(), "Not enough players");
            return Err(SpyError::InsufficientPlayers {
                found: players.len(),
            });
        }

        info!(count = players.len(), "Roster submitted");
        Ok(Self {
            players,
            view: View::PlayerPreview,
            ..self.clone()
        })
    }

    /// Accepts the previewed roster.
    #[instrument(skip(self))]
    pub fn confirm_roster(&self) -> Result<Self, SpyError> {
        self.expect_view(View::PlayerPreview, "confirm-roster")?;
        Ok(self.with_view(View::WordSelect))
    }

    /// Returns to setup with the roster kept for editing.
    #[instrument(skip(self))]
    pub fn edit_roster(&self) -> Result<Self, SpyError> {
        self.expect_view(View::PlayerPreview, "edit-roster")?;
        Ok(self.with_view(View::Setup))
    }

    // ─────────────────────────────────────────────────────────────
    //  Round lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Deals a new round: resolves the word, picks the spy, and starts the reveal.
    ///
    /// A blank `word` draws one from the dealer's bank.
    #[instrument(skip(self, word, dealer))]
    pub fn select_word<E: Entropy>(&self, word: &str, dealer: &mut Dealer<E>) -> Result<Self, SpyError> {
        self.expect_view(View::WordSelect, "select-word")?;

        let word = match word.trim() {
            "" => pick_word(&dealer.words, &mut dealer.entropy)?,
            typed => typed.to_string(),
        };
        let spy_id = pick_spy(&self.players, &mut dealer.entropy)?;

        info!(player_count = self.players.len(), "Round dealt");
        Ok(Self {
            view: View::Reveal,
            current_round: Some(CurrentRound::new(word, spy_id)),
            ..self.clone()
        })
    }

    /// Shows the current player's card.
    #[instrument(skip(self))]
    pub fn reveal(&self) -> Result<Self, SpyError> {
        self.expect_view(View::Reveal, "reveal")?;
        let round = self.round()?.reveal()?;
        Ok(self.with_round(round))
    }

    /// Hides the current player's card; the last one ends the reveal.
    #[instrument(skip(self))]
    pub fn acknowledge(&self) -> Result<Self, SpyError> {
        self.expect_view(View::Reveal, "acknowledge")?;
        let step = self.round()?.acknowledge(self.players.len())?;
        Ok(self.after_step(step))
    }

    /// Flips the current player's card.
    #[instrument(skip(self))]
    pub fn reveal_next(&self) -> Result<Self, SpyError> {
        self.expect_view(View::Reveal, "reveal-next")?;
        let step = self.round()?.toggle(self.players.len())?;
        Ok(self.after_step(step))
    }

    /// Ends discussion and moves to verdict collection.
    #[instrument(skip(self))]
    pub fn end_round(&self) -> Result<Self, SpyError> {
        self.expect_view(View::InProgress, "end-round")?;
        Ok(self.with_view(View::Results))
    }

    /// Scores the round, records it in history, and shows the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::MissingVerdict`] if `verdict` is `None`.
    #[instrument(skip(self))]
    pub fn settle_round(
        &self,
        verdict: Option<Verdict>,
        spy_guessed: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, SpyError> {
        self.expect_view(View::Results, "settle-round")?;
        let settlement = settle(&self.players, self.round()?, verdict, spy_guessed, now)?;

        Ok(Self {
            players: settlement.players,
            history: self.history.record(settlement.entry),
            view: View::Leaderboard,
            current_round: None,
        })
    }

    /// Starts another round with the same roster and scores.
    #[instrument(skip(self))]
    pub fn new_round(&self) -> Result<Self, SpyError> {
        self.expect_view(View::Leaderboard, "new-round")?;
        Ok(Self {
            view: View::WordSelect,
            current_round: None,
            ..self.clone()
        })
    }

    /// Leaves the leaderboard to edit the roster.
    ///
    /// Accepting the reset prompt zeroes every score and clears history;
    /// declining only changes the view.
    #[instrument(skip(self))]
    pub fn edit_with_reset_choice(&self, reset: bool) -> Result<Self, SpyError> {
        self.expect_view(View::Leaderboard, "edit-with-reset-choice")?;

        let (players, history) = if reset {
            info!("Scores and history reset for roster edit");
            (
                self.players.iter().map(Player::with_zero_score).collect(),
                HistoryLedger::new(),
            )
        } else {
            (self.players.clone(), self.history.clone())
        };

        Ok(Self {
            players,
            history,
            view: View::Setup,
            current_round: None,
        })
    }

    /// Replaces everything with the empty default session.
    ///
    /// Confirmation is the caller's job.
    #[instrument(skip(self))]
    pub fn full_reset(&self) -> Self {
        info!("Session reset");
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries for the front end
    // ─────────────────────────────────────────────────────────────

    /// The card to show during the reveal, if any.
    pub fn reveal_card(&self) -> Option<RevealCard> {
        if self.view != View::Reveal {
            return None;
        }
        self.current_round.as_ref()?.card(&self.players)
    }

    /// Cards already seen and total cards in the current round.
    pub fn reveal_progress(&self) -> Option<(usize, usize)> {
        self.current_round
            .as_ref()
            .map(|round| (*round.reveal_index(), self.players.len()))
    }

    /// Current names joined for the setup editor.
    pub fn roster_input(&self) -> String {
        roster_input(&self.players)
    }

    /// Players ordered by score, highest first; ties keep roster order.
    pub fn standings(&self) -> Vec<Player> {
        let mut standings = self.players.clone();
        standings.sort_by(|a, b| b.score().total_cmp(a.score()));
        standings
    }

    /// Looks up a player by identifier.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| *p.id() == id)
    }

    /// Checks every session invariant.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        SessionInvariants::check_all(self)
    }

    // ─────────────────────────────────────────────────────────────
    //  Helpers
    // ─────────────────────────────────────────────────────────────

    fn expect_view(&self, view: View, event: &'static str) -> Result<(), SpyError> {
        if self.view == view {
            Ok(())
        } else {
            Err(SpyError::WrongView {
                event,
                view: self.view,
            })
        }
    }

    fn round(&self) -> Result<&CurrentRound, SpyError> {
        self.current_round.as_ref().ok_or(SpyError::NoActiveRound)
    }

    fn with_view(&self, view: View) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    fn with_round(&self, round: CurrentRound) -> Self {
        Self {
            current_round: Some(round),
            ..self.clone()
        }
    }

    fn after_step(&self, step: RevealStep) -> Self {
        match step {
            RevealStep::Continue(round) => self.with_round(round),
            RevealStep::Complete(round) => {
                info!("Reveal complete, discussion starts");
                Self {
                    view: View::InProgress,
                    ..self.with_round(round)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RngEntropy, ScriptedEntropy};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dealer(picks: Vec<usize>) -> Dealer<ScriptedEntropy> {
        Dealer::new(WordBank::default(), ScriptedEntropy::new(picks))
    }

    fn at_word_select(names: &str) -> SessionState {
        SessionState::new()
            .submit_roster(names)
            .and_then(|s| s.confirm_roster())
            .unwrap()
    }

    #[test]
    fn test_submit_roster_moves_to_preview() {
        let state = SessionState::new().submit_roster("Ana, Luis, Sofía").unwrap();
        assert_eq!(*state.view(), View::PlayerPreview);
        assert_eq!(state.players().len(), 3);
    }

    #[test]
    fn test_submit_roster_rejects_two_players() {
        let state = SessionState::new();
        assert_eq!(
            state.submit_roster("Ana, , Luis"),
            Err(SpyError::InsufficientPlayers { found: 2 })
        );
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn test_edit_roster_keeps_players() {
        let preview = SessionState::new().submit_roster("Ana, Luis, Sofía").unwrap();
        let setup = preview.edit_roster().unwrap();
        assert_eq!(*setup.view(), View::Setup);
        assert_eq!(setup.players(), preview.players());
        assert_eq!(setup.roster_input(), "Ana, Luis, Sofía");
    }

    #[test]
    fn test_select_word_typed() {
        let state = at_word_select("a, b, c");
        let state = state.select_word("  Faro ", &mut dealer(vec![1])).unwrap();
        let round = state.current_round().as_ref().unwrap();
        assert_eq!(round.word(), "Faro");
        assert_eq!(round.spy_id(), state.players()[1].id());
        assert_eq!(*state.view(), View::Reveal);
    }

    #[test]
    fn test_select_word_blank_draws_from_bank() {
        let state = at_word_select("a, b, c");
        let mut dealer = Dealer::new(
            WordBank::new(vec!["Mina".to_string(), "Faro".to_string()]).unwrap(),
            ScriptedEntropy::new(vec![1, 0]),
        );
        let state = state.select_word("", &mut dealer).unwrap();
        let round = state.current_round().as_ref().unwrap();
        assert_eq!(round.word(), "Faro");
        assert_eq!(round.spy_id(), state.players()[0].id());
    }

    #[test]
    fn test_wrong_view_rejected() {
        let state = SessionState::new();
        assert_eq!(
            state.end_round(),
            Err(SpyError::WrongView {
                event: "end-round",
                view: View::Setup
            })
        );
    }

    #[test]
    fn test_reveal_card_hidden_outside_reveal() {
        let state = at_word_select("a, b, c");
        assert_eq!(state.reveal_card(), None);
        let state = state.select_word("Faro", &mut dealer(vec![0])).unwrap();
        assert_eq!(
            state.reveal_card(),
            Some(RevealCard::FaceDown {
                player: "a".to_string()
            })
        );
    }

    #[test]
    fn test_reveal_next_walks_every_player() {
        let mut state = at_word_select("a, b, c, d")
            .select_word("Faro", &mut dealer(vec![2]))
            .unwrap();

        for i in 0..4 {
            assert_eq!(*state.view(), View::Reveal);
            assert_eq!(state.reveal_progress(), Some((i, 4)));
            state = state.reveal_next().unwrap();
            let expected = if i == 2 {
                RevealCard::Spy
            } else {
                RevealCard::Word("Faro".to_string())
            };
            assert_eq!(state.reveal_card(), Some(expected));
            state = state.reveal_next().unwrap();
        }
        assert_eq!(*state.view(), View::InProgress);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_standings_sorted_and_stable() {
        let mut state = at_word_select("a, b, c")
            .select_word("Faro", &mut dealer(vec![1]))
            .unwrap();
        for _ in 0..6 {
            state = state.reveal_next().unwrap();
        }
        let spy = *state.players()[1].id();
        let state = state
            .end_round()
            .and_then(|s| s.settle_round(Some(Verdict::Nobody), true, Utc::now()))
            .unwrap();
        let standings = state.standings();
        let names: Vec<&str> = standings.iter().map(|p| p.name().as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(*state.player(spy).unwrap().score(), 4.0);
    }

    #[test]
    fn test_full_reset_is_idempotent() {
        let state = at_word_select("a, b, c");
        let once = state.full_reset();
        assert_eq!(once, SessionState::default());
        assert_eq!(once.full_reset(), once);
    }

    #[test]
    fn test_apply_with_seeded_rng() {
        let mut dealer = Dealer::new(WordBank::default(), RngEntropy::new(StdRng::seed_from_u64(42)));
        let state = SessionState::new()
            .apply(Event::SubmitRoster { names: "a, b, c".to_string() }, &mut dealer)
            .and_then(|s| s.apply(Event::ConfirmRoster, &mut dealer))
            .and_then(|s| s.apply(Event::SelectWord { word: String::new() }, &mut dealer))
            .unwrap();
        let round = state.current_round().as_ref().unwrap();
        assert!(dealer.words().words().contains(round.word()));
        assert!(state.player(*round.spy_id()).is_some());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(Event::RevealNext.name(), "reveal-next");
        assert_eq!(
            Event::EditWithResetChoice { reset: true }.name(),
            "edit-with-reset-choice"
        );
    }
}
