use std::fmt;

use serde::{Deserialize, Serialize};

use scorebook_ledger::{InningsEnd, InningsReader};
use scorebook_types::TeamId;

use crate::session::MatchScoringState;

/// Margin of victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinMargin {
    Runs(u32),
    Wickets(u32),
}

impl fmt::Display for WinMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, unit) = match self {
            Self::Runs(n) => (*n, "run"),
            Self::Wickets(n) => (*n, "wicket"),
        };
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{count} {unit}{plural}")
    }
}

/// Final result of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MatchResult {
    Won { winner: TeamId, margin: WinMargin },
    Tied,
}

impl MatchResult {
    pub fn winner(&self) -> Option<&TeamId> {
        match self {
            Self::Won { winner, .. } => Some(winner),
            Self::Tied => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won { winner, margin } => write!(f, "{winner} won by {margin}"),
            Self::Tied => f.write_str("match tied"),
        }
    }
}

/// Outcome of the end-of-ball check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchCheck {
    InProgress,
    /// The first innings is over; the consuming layer should switch innings.
    InningsOver { innings: u8, reason: InningsEnd },
    Finished(MatchResult),
}

/// Evaluate the match-end conditions, in order: chase complete, then the
/// second innings ending (all out, overs exhausted, declared or forfeited),
/// then the first innings ending.
///
/// This is a pure function of the state. It never mutates the session; the
/// caller decides whether to switch innings or conclude.
pub fn evaluate(state: &MatchScoringState) -> MatchCheck {
    if let Some(result) = state.result() {
        return MatchCheck::Finished(result.clone());
    }

    match (state.current_innings_number(), state.innings2(), state.target()) {
        (2, Some(chase), Some(target)) => {
            let runs = chase.total_runs();
            if runs >= target {
                let rules = chase.rules();
                return MatchCheck::Finished(MatchResult::Won {
                    winner: chase.batting_team().clone(),
                    margin: WinMargin::Wickets(
                        rules.max_wickets.saturating_sub(chase.total_wickets()),
                    ),
                });
            }
            if chase.end_reason().is_some() {
                let defended = target - 1;
                if runs == defended {
                    return MatchCheck::Finished(MatchResult::Tied);
                }
                return MatchCheck::Finished(MatchResult::Won {
                    winner: chase.bowling_team().clone(),
                    margin: WinMargin::Runs(defended - runs),
                });
            }
            MatchCheck::InProgress
        }
        _ => match state.innings1().and_then(|first| first.end_reason()) {
            Some(reason) if state.current_innings_number() == 1 => {
                MatchCheck::InningsOver { innings: 1, reason }
            }
            _ => MatchCheck::InProgress,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_pluralise() {
        assert_eq!(WinMargin::Runs(1).to_string(), "1 run");
        assert_eq!(WinMargin::Wickets(7).to_string(), "7 wickets");
    }

    #[test]
    fn result_display_and_winner() {
        let won = MatchResult::Won {
            winner: TeamId::new("mi"),
            margin: WinMargin::Runs(12),
        };
        assert_eq!(won.to_string(), "mi won by 12 runs");
        assert_eq!(won.winner(), Some(&TeamId::new("mi")));
        assert_eq!(MatchResult::Tied.winner(), None);
    }

    #[test]
    fn result_serializes_with_outcome_tag() {
        let json = serde_json::to_value(MatchResult::Won {
            winner: TeamId::new("csk"),
            margin: WinMargin::Wickets(3),
        })
        .unwrap();
        assert_eq!(json["outcome"], "won");
        assert_eq!(json["winner"], "csk");
        assert_eq!(json["margin"]["wickets"], 3);
    }
}
