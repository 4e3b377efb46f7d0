use thiserror::Error;

use crate::ball::{DismissalKind, ExtraKind};

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid match id: {0}")]
    InvalidMatchId(String),

    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("runs off the bat out of range: got {runs}, max {max}")]
    RunsOutOfRange { runs: u8, max: u8 },

    #[error("extra runs out of range: got {runs}, max {max}")]
    ExtraRunsOutOfRange { runs: u32, max: u32 },

    #[error("runs off the bat must be zero on a {kind} ball")]
    RunsOffBatOnExtra { kind: ExtraKind },

    #[error("a fielder cannot be credited for a {kind} dismissal")]
    FielderNotAllowed { kind: DismissalKind },

    #[error("unknown extra kind: {0}")]
    UnknownExtraKind(String),

    #[error("unknown dismissal kind: {0}")]
    UnknownDismissalKind(String),

    #[error("unknown match format: {0}")]
    UnknownFormat(String),

    #[error("unknown toss decision: {0}")]
    UnknownTossDecision(String),
}
