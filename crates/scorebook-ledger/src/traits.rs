use scorebook_types::TeamId;

use crate::records::{BallRecord, InningsClosure, InningsRules, InningsTotals};

/// Read boundary for an innings timeline.
///
/// Replay, projection and validation only ever go through this trait, so a
/// timeline decoded from storage can be inspected without rebuilding a live
/// ledger first.
pub trait InningsReader {
    fn batting_team(&self) -> &TeamId;

    fn bowling_team(&self) -> &TeamId;

    fn rules(&self) -> InningsRules;

    /// The full timeline, in the order the balls were bowled.
    fn balls(&self) -> &[BallRecord];

    /// Aggregates as maintained by the writer.
    fn totals(&self) -> InningsTotals;

    fn closure(&self) -> Option<InningsClosure>;
}
