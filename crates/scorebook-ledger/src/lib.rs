//! Append-only innings ledger for Scorebook.
//!
//! This crate is the scoring core. It provides:
//! - `InningsLedger`, the authoritative ball timeline for one batting innings
//! - `InningsReader`, the read boundary shared by replay, projection and validation
//! - Deterministic replay of a timeline into fresh aggregates
//! - Scorecard projection (batting, bowling, fall of wickets, extras)
//! - Timeline validation for snapshots loaded from storage

pub mod error;
pub mod innings;
pub mod projection;
pub mod records;
pub mod replay;
pub mod traits;
pub mod validation;

pub use error::LedgerError;
pub use innings::InningsLedger;
pub use projection::{
    BattingEntry, BowlingEntry, Dismissal, ExtrasBreakdown, FallOfWicket, Scorecard,
    ScorecardBuilder,
};
pub use records::{
    format_overs, BallOutcome, BallRecord, InningsClosure, InningsEnd, InningsRules,
    InningsTotals, BALLS_PER_OVER,
};
pub use replay::{ReplayEngine, ReplayResult};
pub use traits::InningsReader;
pub use validation::{TimelineValidator, ValidationReport, Violation, ViolationKind};
