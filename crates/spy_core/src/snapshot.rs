//! Snapshot codec for the persisted session.
//!
//! The whole [`SessionState`] is stored as one JSON blob under a single
//! key. Storage itself belongs to the caller.

use tracing::{debug, instrument, warn};

use crate::{SessionState, SpyError};

/// Logical key the session blob is stored under.
pub const STORAGE_KEY: &str = "spy_party_state";

/// Serializes the session to a snapshot blob.
#[instrument(skip(state), fields(view = %state.view()))]
pub fn encode(state: &SessionState) -> Result<String, SpyError> {
    serde_json::to_string(state).map_err(|e| SpyError::MalformedSnapshot(e.to_string()))
}

/// Parses a snapshot blob and checks the session invariants.
///
/// # Errors
///
/// Returns [`SpyError::MalformedSnapshot`] if the blob is not valid JSON,
/// does not match the session shape, or describes an impossible session.
#[instrument(skip(blob), fields(len = blob.len()))]
pub fn decode(blob: &str) -> Result<SessionState, SpyError> {
    let state: SessionState =
        serde_json::from_str(blob).map_err(|e| SpyError::MalformedSnapshot(e.to_string()))?;

    state.check_invariants().map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        SpyError::MalformedSnapshot(descriptions)
    })?;

    debug!(view = %state.view(), players = state.players().len(), "Snapshot decoded");
    Ok(state)
}

/// Restores a session, falling back to the empty default.
///
/// A missing blob is a fresh start; a malformed one is logged and
/// discarded.
#[instrument(skip(blob), fields(present = blob.is_some()))]
pub fn load_or_default(blob: Option<&str>) -> SessionState {
    match blob.map(decode) {
        Some(Ok(state)) => state,
        Some(Err(e)) => {
            warn!(error = %e, "Discarding unreadable snapshot");
            SessionState::default()
        }
        None => {
            debug!("No snapshot, starting fresh");
            SessionState::default()
        }
    }
}
