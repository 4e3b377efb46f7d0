use serde::{Deserialize, Serialize};
use tracing::debug;

use scorebook_types::{BallEvent, TeamId};

use crate::error::LedgerError;
use crate::records::{
    BallOutcome, BallRecord, InningsClosure, InningsEnd, InningsRules, InningsTotals,
    BALLS_PER_OVER,
};
use crate::traits::InningsReader;

/// Ball-by-ball ledger for one team's batting innings.
///
/// The timeline is append-only. Aggregates are maintained incrementally by
/// [`InningsLedger::record_ball`] and always equal a recomputation from the
/// timeline (see [`crate::ReplayEngine::verify_convergence`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsLedger {
    batting_team: TeamId,
    bowling_team: TeamId,
    rules: InningsRules,
    totals: InningsTotals,
    balls: Vec<BallRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    closure: Option<InningsClosure>,
}

impl InningsLedger {
    pub fn new(batting_team: TeamId, bowling_team: TeamId, rules: InningsRules) -> Self {
        Self {
            batting_team,
            bowling_team,
            rules,
            totals: InningsTotals::default(),
            balls: Vec::new(),
            closure: None,
        }
    }

    pub fn total_runs(&self) -> u32 {
        self.totals.runs
    }

    pub fn total_wickets(&self) -> u32 {
        self.totals.wickets
    }

    pub fn legal_balls(&self) -> u32 {
        self.totals.legal_balls
    }

    pub fn completed_overs(&self) -> u32 {
        self.totals.completed_overs()
    }

    pub fn balls_into_current_over(&self) -> u32 {
        self.totals.balls_into_current_over()
    }

    pub fn last_ball(&self) -> Option<&BallRecord> {
        self.balls.last()
    }

    pub fn is_all_out(&self) -> bool {
        self.totals.wickets >= self.rules.max_wickets
    }

    pub fn overs_exhausted(&self) -> bool {
        self.rules
            .ball_limit()
            .is_some_and(|limit| self.totals.legal_balls >= limit)
    }

    /// Legal balls left in a limited-overs innings.
    pub fn balls_remaining(&self) -> Option<u32> {
        self.rules
            .ball_limit()
            .map(|limit| limit.saturating_sub(self.totals.legal_balls))
    }

    /// Why the innings is over, or `None` while it is still live.
    pub fn end_reason(&self) -> Option<InningsEnd> {
        if self.is_all_out() {
            Some(InningsEnd::AllOut)
        } else if self.overs_exhausted() {
            Some(InningsEnd::OversExhausted)
        } else {
            self.closure.map(InningsEnd::from)
        }
    }

    pub fn is_closed(&self) -> bool {
        self.end_reason().is_some()
    }

    /// Append a ball to the timeline and update the aggregates.
    ///
    /// Strike rotation is reported, not applied: the ledger does not own the
    /// role holders. An odd number of runs off the bat on a legal, non-wicket
    /// ball swaps strike, and a ball completing an over swaps it again.
    /// Runs scored from byes and leg-byes do not rotate strike.
    pub fn record_ball(&mut self, event: BallEvent) -> Result<BallOutcome, LedgerError> {
        if let Some(reason) = self.end_reason() {
            return Err(LedgerError::InvalidState(format!(
                "innings of {} is over ({reason})",
                self.batting_team
            )));
        }
        if event.striker.is_empty() {
            return Err(LedgerError::InvalidState("no striker set".into()));
        }
        if event.bowler.is_empty() {
            return Err(LedgerError::InvalidState("no bowler set".into()));
        }
        event.check()?;

        let legal = event.is_legal_delivery();
        let wicket = event.is_wicket();
        let odd_runs = legal && !wicket && event.runs_off_bat % 2 == 1;

        let over = self.totals.legal_balls / BALLS_PER_OVER;
        let legal_ball = self.totals.legal_balls % BALLS_PER_OVER + u32::from(legal);
        let seq = self.balls.len() as u64 + 1;

        self.totals.runs += event.total_runs();
        if wicket {
            self.totals.wickets += 1;
        }
        if legal {
            self.totals.legal_balls += 1;
        }
        let over_completed = legal && self.totals.legal_balls % BALLS_PER_OVER == 0;

        let dismissed = event.wicket.as_ref().map(|w| w.batsman_out.clone());
        debug!(
            team = %self.batting_team,
            seq,
            position = %format!("{over}.{legal_ball}"),
            runs = event.total_runs(),
            wicket,
            "ball recorded"
        );

        self.balls.push(BallRecord {
            seq,
            over,
            legal_ball,
            event,
        });

        Ok(BallOutcome {
            seq,
            swap_strike: odd_runs != over_completed,
            over_completed,
            dismissed,
            innings_end: self.end_reason(),
        })
    }

    /// Record a declaration. No further balls may be appended.
    pub fn declare(&mut self) -> Result<(), LedgerError> {
        if let Some(reason) = self.end_reason() {
            return Err(LedgerError::InvalidState(format!(
                "cannot declare: innings is over ({reason})"
            )));
        }
        self.closure = Some(InningsClosure::Declared);
        Ok(())
    }

    /// Record a forfeit. Only an innings with no balls bowled can be forfeited.
    pub fn forfeit(&mut self) -> Result<(), LedgerError> {
        if let Some(reason) = self.end_reason() {
            return Err(LedgerError::InvalidState(format!(
                "cannot forfeit: innings is over ({reason})"
            )));
        }
        if !self.balls.is_empty() {
            return Err(LedgerError::InvalidState(
                "cannot forfeit an innings that has started".into(),
            ));
        }
        self.closure = Some(InningsClosure::Forfeited);
        Ok(())
    }
}

impl InningsReader for InningsLedger {
    fn batting_team(&self) -> &TeamId {
        &self.batting_team
    }

    fn bowling_team(&self) -> &TeamId {
        &self.bowling_team
    }

    fn rules(&self) -> InningsRules {
        self.rules
    }

    fn balls(&self) -> &[BallRecord] {
        &self.balls
    }

    fn totals(&self) -> InningsTotals {
        self.totals
    }

    fn closure(&self) -> Option<InningsClosure> {
        self.closure
    }
}
