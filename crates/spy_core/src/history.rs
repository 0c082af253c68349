//! Append-only, capped log of settled rounds.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::RoundHistoryEntry;

/// Maximum number of rounds kept in the ledger.
pub const HISTORY_CAP: usize = 50;

/// Settled rounds, newest first.
///
/// Recording past the cap silently evicts the oldest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger(Vec<RoundHistoryEntry>);

impl HistoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a ledger with `entry` prepended and trimmed to the cap.
    #[instrument(skip(self, entry), fields(len = self.0.len()))]
    pub fn record(&self, entry: RoundHistoryEntry) -> Self {
        let mut entries = Vec::with_capacity((self.0.len() + 1).min(HISTORY_CAP));
        entries.push(entry);
        entries.extend(self.0.iter().take(HISTORY_CAP - 1).cloned());
        debug!(len = entries.len(), "Round recorded");
        Self(entries)
    }

    /// Returns the entries, newest first.
    pub fn entries(&self) -> &[RoundHistoryEntry] {
        &self.0
    }

    /// Returns the most recent entry.
    pub fn latest(&self) -> Option<&RoundHistoryEntry> {
        self.0.first()
    }

    /// Number of recorded rounds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no round has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
