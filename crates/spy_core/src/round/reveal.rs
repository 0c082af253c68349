//! Reveal sequencing: one player at a time sees their card.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{CurrentRound, Player, SpyError};

/// What the device shows to whoever is holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealCard {
    /// Card face-down, waiting for the named player.
    FaceDown {
        /// Name of the player whose turn it is.
        player: String,
    },
    /// The current player is the spy.
    Spy,
    /// The current player is a citizen and sees the secret word.
    Word(String),
}

/// Result of hiding a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep {
    /// More players still have to see their card.
    Continue(CurrentRound),
    /// Every player has seen their card.
    Complete(CurrentRound),
}

impl RevealStep {
    /// Returns the round regardless of the step kind.
    pub fn into_round(self) -> CurrentRound {
        match self {
            RevealStep::Continue(round) | RevealStep::Complete(round) => round,
        }
    }
}

impl CurrentRound {
    /// Turns the current player's card face-up.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::CardAlreadyRevealed`] if it is already face-up.
    #[instrument(skip(self), fields(reveal_index = self.reveal_index()))]
    pub fn reveal(&self) -> Result<CurrentRound, SpyError> {
        if *self.is_revealed() {
            warn!("Reveal requested on a face-up card");
            return Err(SpyError::CardAlreadyRevealed);
        }
        let mut next = self.clone();
        next.set_revealed(true);
        debug!("Card revealed");
        Ok(next)
    }

    /// Hides the current card and passes the device to the next player.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::CardNotRevealed`] if the card was never shown.
    #[instrument(skip(self), fields(reveal_index = self.reveal_index()))]
    pub fn acknowledge(&self, player_count: usize) -> Result<RevealStep, SpyError> {
        if !*self.is_revealed() {
            warn!("Acknowledge requested on a face-down card");
            return Err(SpyError::CardNotRevealed);
        }
        let mut next = self.clone();
        next.set_revealed(false);
        next.advance_index();

        if *next.reveal_index() >= player_count {
            debug!(player_count, "All cards seen");
            Ok(RevealStep::Complete(next))
        } else {
            debug!(next_index = next.reveal_index(), "Passing to next player");
            Ok(RevealStep::Continue(next))
        }
    }

    /// Flips the card: reveals if face-down, acknowledges if face-up.
    pub fn toggle(&self, player_count: usize) -> Result<RevealStep, SpyError> {
        if *self.is_revealed() {
            self.acknowledge(player_count)
        } else {
            self.reveal().map(RevealStep::Continue)
        }
    }

    /// The card for the player currently holding the device.
    ///
    /// Returns `None` once every player has seen their card.
    pub fn card(&self, players: &[Player]) -> Option<RevealCard> {
        let player = players.get(*self.reveal_index())?;
        let card = if !*self.is_revealed() {
            RevealCard::FaceDown {
                player: player.name().clone(),
            }
        } else if player.id() == self.spy_id() {
            RevealCard::Spy
        } else {
            RevealCard::Word(self.word().clone())
        };
        Some(card)
    }
}
