use scorebook_types::TeamId;

use crate::records::{InningsTotals, BALLS_PER_OVER};
use crate::traits::InningsReader;

/// Result of timeline validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub batting_team: TeamId,
    pub ball_count: u64,
    pub sequence_monotonic: bool,
    pub positions_consistent: bool,
    pub events_well_formed: bool,
    pub within_limits: bool,
    pub aggregates_consistent: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific problem found on the timeline. `seq` is 0 for innings-wide
/// problems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    PositionMismatch,
    MalformedEvent,
    BallAfterInningsEnd,
    AggregateMismatch,
}

/// Timeline integrity validator, for snapshots decoded from storage.
pub struct TimelineValidator;

impl TimelineValidator {
    pub fn validate<R: InningsReader>(reader: &R) -> ValidationReport {
        let balls = reader.balls();
        let rules = reader.rules();
        let mut violations = Vec::new();
        let mut sequence_monotonic = true;
        let mut positions_consistent = true;
        let mut events_well_formed = true;
        let mut within_limits = true;
        let mut running = InningsTotals::default();

        for (index, record) in balls.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if record.seq != expected_seq {
                sequence_monotonic = false;
                violations.push(Violation {
                    seq: record.seq,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected seq {expected_seq}, got {}", record.seq),
                });
            }

            let legal = record.event.is_legal_delivery();
            let expected_over = running.legal_balls / BALLS_PER_OVER;
            let expected_ball = running.legal_balls % BALLS_PER_OVER + u32::from(legal);
            if record.over != expected_over || record.legal_ball != expected_ball {
                positions_consistent = false;
                violations.push(Violation {
                    seq: record.seq,
                    kind: ViolationKind::PositionMismatch,
                    description: format!(
                        "recorded at {}, expected {expected_over}.{expected_ball}",
                        record.position()
                    ),
                });
            }

            if let Err(e) = record.event.check() {
                events_well_formed = false;
                violations.push(Violation {
                    seq: record.seq,
                    kind: ViolationKind::MalformedEvent,
                    description: e.to_string(),
                });
            }

            let all_out = running.wickets >= rules.max_wickets;
            let overs_done = rules
                .ball_limit()
                .is_some_and(|limit| running.legal_balls >= limit);
            if all_out || overs_done {
                within_limits = false;
                violations.push(Violation {
                    seq: record.seq,
                    kind: ViolationKind::BallAfterInningsEnd,
                    description: if all_out {
                        format!("ball bowled after {} wickets fell", running.wickets)
                    } else {
                        format!("ball bowled after {} overs", running.completed_overs())
                    },
                });
            }

            running.runs = running.runs.saturating_add(record.event.total_runs());
            if record.event.is_wicket() {
                running.wickets += 1;
            }
            if legal {
                running.legal_balls += 1;
            }
        }

        let maintained = reader.totals();
        let aggregates_consistent = maintained == running;
        if !aggregates_consistent {
            violations.push(Violation {
                seq: 0,
                kind: ViolationKind::AggregateMismatch,
                description: format!(
                    "stored {}/{} in {} overs, timeline gives {}/{} in {} overs",
                    maintained.runs,
                    maintained.wickets,
                    maintained.overs(),
                    running.runs,
                    running.wickets,
                    running.overs()
                ),
            });
        }

        ValidationReport {
            batting_team: reader.batting_team().clone(),
            ball_count: balls.len() as u64,
            sequence_monotonic,
            positions_consistent,
            events_well_formed,
            within_limits,
            aggregates_consistent,
            violations,
        }
    }
}
