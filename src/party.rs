//! A running session wired to its snapshot store.

use spy_core::{Dealer, Entropy, Event, SessionState, SpyError, WordBank, encode, load_or_default};
use tracing::{debug, info, instrument, warn};

use crate::SnapshotStore;

/// Holds the authoritative session and persists it after every accepted event.
///
/// Storage failures are logged and otherwise ignored; the in-memory state
/// stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct Party<S, E> {
    state: SessionState,
    dealer: Dealer<E>,
    store: S,
    key: String,
}

impl<S: SnapshotStore, E: Entropy> Party<S, E> {
    /// Restores the session stored under `key`, or starts a fresh one.
    #[instrument(skip(store, key, dealer), fields(key = %key.as_ref()))]
    pub fn open(store: S, key: impl AsRef<str>, dealer: Dealer<E>) -> Self {
        let key = key.as_ref().to_string();
        let blob = store.load(&key).unwrap_or_else(|e| {
            warn!(error = %e, "Snapshot unavailable, starting fresh");
            None
        });
        let state = load_or_default(blob.as_deref());
        info!(view = %state.view(), players = state.players().len(), "Session opened");

        Self {
            state,
            dealer,
            store,
            key,
        }
    }

    /// The current session.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The word bank rounds draw from.
    pub fn words(&self) -> &WordBank {
        self.dealer.words()
    }

    /// Key the session is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies an event; on success the new state replaces the old one and is saved.
    ///
    /// # Errors
    ///
    /// Returns the core's [`SpyError`] when the event is rejected; the state
    /// is left unchanged.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub fn dispatch(&mut self, event: Event) -> Result<&SessionState, SpyError> {
        self.state = self.state.apply(event, &mut self.dealer)?;
        self.persist();
        Ok(&self.state)
    }

    fn persist(&mut self) {
        let saved = encode(&self.state)
            .map_err(|e| e.to_string())
            .and_then(|blob| self.store.save(&self.key, &blob).map_err(|e| e.to_string()));

        match saved {
            Ok(()) => debug!(key = %self.key, "Session saved"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to save session"),
        }
    }
}
