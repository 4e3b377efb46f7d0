use serde::{Deserialize, Serialize};

use scorebook_ledger::{
    BallOutcome, InningsEnd, InningsLedger, InningsReader, ReplayEngine, TimelineValidator,
};
use scorebook_match::{MatchCheck, MatchPhase, MatchResult, MatchScoringState};
use scorebook_types::{MatchFormat, MatchId, PlayerId, TeamId};

/// What recording one ball did to the match.
#[derive(Clone, Debug, PartialEq)]
pub struct BallReport {
    pub outcome: BallOutcome,
    /// Match-end check as evaluated straight after the ball.
    pub check: MatchCheck,
    /// Set when the ball ended the first innings and the chase was opened.
    pub target: Option<u32>,
}

/// Headline figures for one innings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub number: u8,
    pub batting_team: TeamId,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub run_rate: Option<f64>,
    pub end: Option<InningsEnd>,
}

impl InningsSummary {
    pub fn from_ledger(number: u8, ledger: &InningsLedger) -> Self {
        let totals = ledger.totals();
        Self {
            number,
            batting_team: ledger.batting_team().clone(),
            runs: totals.runs,
            wickets: totals.wickets,
            overs: totals.overs(),
            run_rate: totals.run_rate(),
            end: ledger.end_reason(),
        }
    }

    /// `"154/6"`, or `"154"` when all out.
    pub fn score(&self) -> String {
        if self.end == Some(InningsEnd::AllOut) {
            self.runs.to_string()
        } else {
            format!("{}/{}", self.runs, self.wickets)
        }
    }
}

/// Snapshot of a match for display and listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub home: String,
    pub away: String,
    pub format: MatchFormat,
    pub overs_limit: Option<u32>,
    pub phase: MatchPhase,
    pub innings: Vec<InningsSummary>,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub required_run_rate: Option<f64>,
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    pub result: Option<MatchResult>,
}

impl MatchSummary {
    pub fn from_state(state: &MatchScoringState) -> Self {
        let setup = state.setup();
        let innings = [state.innings1(), state.innings2()]
            .into_iter()
            .zip(1u8..)
            .filter_map(|(ledger, number)| ledger.map(|l| InningsSummary::from_ledger(number, l)))
            .collect();
        Self {
            match_id: state.match_id().clone(),
            home: setup.home.name.clone(),
            away: setup.away.name.clone(),
            format: setup.format,
            overs_limit: setup.overs_limit,
            phase: state.phase(),
            innings,
            target: state.target(),
            runs_required: state.runs_required().filter(|_| state.result().is_none()),
            required_run_rate: state.required_run_rate().filter(|_| state.result().is_none()),
            striker: state.striker().cloned(),
            non_striker: state.non_striker().cloned(),
            bowler: state.bowler().cloned(),
            result: state.result().cloned(),
        }
    }

    /// One-line description, e.g. `"Mumbai v Chennai: 154/6 (20.0)"`.
    pub fn headline(&self) -> String {
        let mut line = format!("{} v {}", self.home, self.away);
        if let Some(current) = self.innings.last() {
            line.push_str(&format!(
                ": {} {} ({})",
                current.batting_team,
                current.score(),
                current.overs
            ));
        }
        match (&self.result, self.runs_required) {
            (Some(result), _) => line.push_str(&format!(", {result}")),
            (None, Some(required)) => line.push_str(&format!(", need {required}")),
            (None, None) => {}
        }
        line
    }
}

/// Integrity check of one stored innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsVerification {
    pub number: u8,
    pub batting_team: TeamId,
    pub ball_count: u64,
    /// Replaying the timeline reproduces the stored totals.
    pub converges: bool,
    pub violations: Vec<String>,
}

impl InningsVerification {
    pub fn check(number: u8, ledger: &InningsLedger) -> Self {
        let report = TimelineValidator::validate(ledger);
        let mut violations: Vec<String> = report
            .violations
            .iter()
            .map(|v| format!("ball {}: {:?}: {}", v.seq, v.kind, v.description))
            .collect();
        let converges = match ReplayEngine::verify_convergence(ledger) {
            Ok(converges) => converges,
            Err(e) => {
                violations.push(format!("replay failed: {e}"));
                false
            }
        };
        Self {
            number,
            batting_team: report.batting_team,
            ball_count: report.ball_count,
            converges,
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.converges && self.violations.is_empty()
    }
}
