//! High-level SDK for Scorebook.
//!
//! [`Scorer`] is the consuming layer over a match session: it forwards each
//! operation to the session, runs the match-end check after every ball and
//! persists snapshots when asked. This is the main entry point for
//! applications embedding Scorebook.

pub mod error;
pub mod scorer;
pub mod summary;

pub use error::{SdkError, SdkResult};
pub use scorer::Scorer;
pub use summary::{BallReport, InningsSummary, InningsVerification, MatchSummary};

// Re-export key types
pub use scorebook_ledger::{BallOutcome, InningsEnd, Scorecard};
pub use scorebook_match::{Delivery, MatchCheck, MatchPhase, MatchResult, MatchSetup, Team};
pub use scorebook_types::{
    CoinFace, DismissalKind, ExtraKind, MatchFormat, MatchId, PlayerId, TeamId, TossDecision,
    TossResult, Wicket,
};
