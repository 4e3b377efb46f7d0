use scorebook_types::{BallEvent, TeamId};

use crate::error::LedgerError;
use crate::innings::InningsLedger;
use crate::records::{InningsClosure, InningsRules, InningsTotals};
use crate::traits::InningsReader;

/// Result of replaying a timeline into a fresh ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub ledger: InningsLedger,
    pub balls_applied: u64,
    /// Net strike swaps across the replay; odd means the batsmen ended up
    /// at opposite ends from where they started.
    pub strike_swaps: u64,
}

/// Deterministic replay helpers for innings timelines.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Rebuild a ledger by recording `events` in order.
    pub fn replay<I>(
        batting_team: TeamId,
        bowling_team: TeamId,
        rules: InningsRules,
        events: I,
    ) -> Result<ReplayResult, LedgerError>
    where
        I: IntoIterator<Item = BallEvent>,
    {
        let mut ledger = InningsLedger::new(batting_team, bowling_team, rules);
        let mut balls_applied = 0u64;
        let mut strike_swaps = 0u64;

        for event in events {
            let seq = balls_applied + 1;
            let outcome = ledger
                .record_ball(event)
                .map_err(|e| LedgerError::IntegrityViolation {
                    seq,
                    reason: e.to_string(),
                })?;
            balls_applied += 1;
            if outcome.swap_strike {
                strike_swaps += 1;
            }
        }

        Ok(ReplayResult {
            ledger,
            balls_applied,
            strike_swaps,
        })
    }

    /// Rebuild a ledger from an existing timeline, including its closure.
    pub fn replay_ledger<R: InningsReader>(reader: &R) -> Result<ReplayResult, LedgerError> {
        let events = reader.balls().iter().map(|record| record.event.clone());
        let mut result = Self::replay(
            reader.batting_team().clone(),
            reader.bowling_team().clone(),
            reader.rules(),
            events,
        )?;

        let seq = result.balls_applied;
        let closed = match reader.closure() {
            Some(InningsClosure::Declared) => result.ledger.declare(),
            Some(InningsClosure::Forfeited) => result.ledger.forfeit(),
            None => Ok(()),
        };
        closed.map_err(|e| LedgerError::IntegrityViolation {
            seq,
            reason: e.to_string(),
        })?;

        Ok(result)
    }

    /// Whether the maintained aggregates match a recomputation from the
    /// timeline.
    pub fn verify_convergence<R: InningsReader>(reader: &R) -> Result<bool, LedgerError> {
        let replayed = Self::replay_ledger(reader)?;
        let recomputed = InningsTotals::from_balls(reader.balls());
        Ok(replayed.ledger.totals() == reader.totals() && recomputed == reader.totals())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use scorebook_types::{DismissalKind, ExtraKind, PlayerId, Wicket};

    use super::*;

    fn teams() -> (TeamId, TeamId) {
        (TeamId::new("lions"), TeamId::new("tigers"))
    }

    fn event(runs: u8, extra: Option<(ExtraKind, u32)>, wicket: bool) -> BallEvent {
        let mut event = BallEvent::new(PlayerId::new("bat"), PlayerId::new("bowl"));
        match extra {
            Some((kind, extra_runs)) => event = event.with_extra(kind, extra_runs),
            None => event = event.with_runs(runs),
        }
        if wicket {
            event = event.with_wicket(Wicket::new(DismissalKind::RunOut, PlayerId::new("bat")));
        }
        event
    }

    fn arb_event() -> impl Strategy<Value = BallEvent> {
        let extra = prop_oneof![
            3 => Just(None::<(ExtraKind, u32)>),
            1 => (
                prop_oneof![
                    Just(ExtraKind::Wide),
                    Just(ExtraKind::NoBall),
                    Just(ExtraKind::Bye),
                    Just(ExtraKind::LegBye),
                ],
                0u32..6,
            )
                .prop_map(Some),
        ];
        (0u8..=6, extra, proptest::bool::weighted(0.05))
            .prop_map(|(runs, extra, wicket)| event(runs, extra, wicket))
    }

    /// Events that fit inside an unlimited innings (at most nine wickets).
    fn arb_timeline() -> impl Strategy<Value = Vec<BallEvent>> {
        proptest::collection::vec(arb_event(), 0..120).prop_map(|events| {
            let mut wickets = 0;
            events
                .into_iter()
                .filter(|e| {
                    if e.is_wicket() {
                        wickets += 1;
                    }
                    !e.is_wicket() || wickets <= 9
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn total_runs_is_sum_of_timeline(events in arb_timeline()) {
            let (bat, bowl) = teams();
            let expected: u32 = events.iter().map(BallEvent::total_runs).sum();
            let result = ReplayEngine::replay(bat, bowl, InningsRules::default(), events).unwrap();
            prop_assert_eq!(result.ledger.total_runs(), expected);
        }

        #[test]
        fn legal_balls_skip_wides_and_no_balls(events in arb_timeline()) {
            let (bat, bowl) = teams();
            let expected = events
                .iter()
                .filter(|e| !matches!(e.extra_kind(), Some(ExtraKind::Wide | ExtraKind::NoBall)))
                .count() as u32;
            let result = ReplayEngine::replay(bat, bowl, InningsRules::default(), events).unwrap();
            prop_assert_eq!(result.ledger.legal_balls(), expected);
        }

        #[test]
        fn replaying_a_timeline_reproduces_aggregates(events in arb_timeline()) {
            let (bat, bowl) = teams();
            let live = ReplayEngine::replay(bat, bowl, InningsRules::default(), events).unwrap();
            let again = ReplayEngine::replay_ledger(&live.ledger).unwrap();

            prop_assert_eq!(&again.ledger, &live.ledger);
            prop_assert_eq!(again.strike_swaps, live.strike_swaps);
            prop_assert!(ReplayEngine::verify_convergence(&live.ledger).unwrap());
        }
    }

    #[test]
    fn replay_empty_timeline() {
        let (bat, bowl) = teams();
        let result =
            ReplayEngine::replay(bat, bowl, InningsRules::default(), Vec::new()).unwrap();
        assert_eq!(result.balls_applied, 0);
        assert_eq!(result.ledger.totals(), InningsTotals::default());
    }

    #[test]
    fn replay_reports_the_offending_ball() {
        let (bat, bowl) = teams();
        let events = vec![event(1, None, false), event(7, None, false)];
        let err = ReplayEngine::replay(bat, bowl, InningsRules::default(), events).unwrap_err();
        assert!(matches!(err, LedgerError::IntegrityViolation { seq: 2, .. }));
    }

    #[test]
    fn replay_preserves_declaration() {
        let (bat, bowl) = teams();
        let mut ledger = InningsLedger::new(bat, bowl, InningsRules::default());
        ledger.record_ball(event(4, None, false)).unwrap();
        ledger.declare().unwrap();

        let again = ReplayEngine::replay_ledger(&ledger).unwrap();
        assert_eq!(again.ledger, ledger);
    }

    #[test]
    fn tampered_totals_do_not_converge() {
        let (bat, bowl) = teams();
        let mut ledger = InningsLedger::new(bat, bowl, InningsRules::default());
        ledger.record_ball(event(4, None, false)).unwrap();

        let mut json = serde_json::to_value(&ledger).unwrap();
        json["totals"]["runs"] = serde_json::Value::from(40);
        let tampered: InningsLedger = serde_json::from_value(json).unwrap();

        assert!(!ReplayEngine::verify_convergence(&tampered).unwrap());
        assert!(ReplayEngine::verify_convergence(&ledger).unwrap());
    }
}
