use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scorebook_types::MatchId;

use crate::error::MatchError;
use crate::session::MatchScoringState;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Plain, serializable copy of a match session as handed to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub version: u32,
    pub match_id: MatchId,
    pub saved_at: DateTime<Utc>,
    pub state: MatchScoringState,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchScoringState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            match_id: state.match_id().clone(),
            saved_at: Utc::now(),
            state: state.clone(),
        }
    }

    /// Hand back the session, rejecting layouts this build cannot read.
    pub fn restore(self) -> Result<MatchScoringState, MatchError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(MatchError::UnsupportedSnapshot {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        if self.match_id != *self.state.match_id() {
            return Err(MatchError::InvalidState(format!(
                "snapshot for {} holds match {}",
                self.match_id,
                self.state.match_id()
            )));
        }
        Ok(self.state)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
