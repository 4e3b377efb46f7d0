use std::fmt;

use serde::{Deserialize, Serialize};

use scorebook_types::{BallEvent, PlayerId};

/// Legal deliveries in an over.
pub const BALLS_PER_OVER: u32 = 6;

/// Limits that end an innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsRules {
    pub max_wickets: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overs_limit: Option<u32>,
}

impl InningsRules {
    pub const DEFAULT_MAX_WICKETS: u32 = 10;

    pub fn new(max_wickets: u32, overs_limit: Option<u32>) -> Self {
        Self {
            max_wickets,
            overs_limit,
        }
    }

    /// Ten wickets, or one fewer than the squad size for short-handed sides.
    pub fn for_squad(squad_size: usize, overs_limit: Option<u32>) -> Self {
        let short_handed = u32::try_from(squad_size.saturating_sub(1)).unwrap_or(u32::MAX);
        Self::new(short_handed.min(Self::DEFAULT_MAX_WICKETS), overs_limit)
    }

    /// Legal balls available to the innings, if limited. Saturates for
    /// limits too large to count in balls.
    pub fn ball_limit(&self) -> Option<u32> {
        self.overs_limit
            .map(|overs| overs.saturating_mul(BALLS_PER_OVER))
    }
}

impl Default for InningsRules {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_WICKETS, None)
    }
}

/// Explicit, caller-recorded end of an innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InningsClosure {
    Declared,
    Forfeited,
}

/// Why an innings is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InningsEnd {
    AllOut,
    OversExhausted,
    Declared,
    Forfeited,
}

impl From<InningsClosure> for InningsEnd {
    fn from(closure: InningsClosure) -> Self {
        match closure {
            InningsClosure::Declared => Self::Declared,
            InningsClosure::Forfeited => Self::Forfeited,
        }
    }
}

impl fmt::Display for InningsEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllOut => f.write_str("all out"),
            Self::OversExhausted => f.write_str("overs exhausted"),
            Self::Declared => f.write_str("declared"),
            Self::Forfeited => f.write_str("forfeited"),
        }
    }
}

/// A ball as stored on the timeline, with its position in the innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallRecord {
    /// 1-based position on the timeline, counting every delivery.
    pub seq: u64,
    /// 0-based over the ball was bowled in.
    pub over: u32,
    /// Legal balls completed in `over` once this ball is counted (0 for a
    /// wide or no-ball bowled first up).
    pub legal_ball: u32,
    pub event: BallEvent,
}

impl BallRecord {
    /// Scorecard notation, e.g. `"13.4"`.
    pub fn position(&self) -> String {
        format!("{}.{}", self.over, self.legal_ball)
    }
}

/// Aggregates of an innings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsTotals {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
}

impl InningsTotals {
    /// Recompute aggregates from a timeline.
    pub fn from_balls(balls: &[BallRecord]) -> Self {
        balls.iter().fold(Self::default(), |mut totals, record| {
            totals.runs = totals.runs.saturating_add(record.event.total_runs());
            if record.event.is_wicket() {
                totals.wickets += 1;
            }
            if record.event.is_legal_delivery() {
                totals.legal_balls += 1;
            }
            totals
        })
    }

    pub fn completed_overs(&self) -> u32 {
        self.legal_balls / BALLS_PER_OVER
    }

    pub fn balls_into_current_over(&self) -> u32 {
        self.legal_balls % BALLS_PER_OVER
    }

    /// Overs in scorecard notation, e.g. `"13.4"`.
    pub fn overs(&self) -> String {
        format_overs(self.legal_balls)
    }

    /// Runs per six legal balls.
    pub fn run_rate(&self) -> Option<f64> {
        if self.legal_balls == 0 {
            return None;
        }
        Some(f64::from(self.runs) * f64::from(BALLS_PER_OVER) / f64::from(self.legal_balls))
    }
}

/// Overs notation for a count of legal balls.
pub fn format_overs(legal_balls: u32) -> String {
    format!(
        "{}.{}",
        legal_balls / BALLS_PER_OVER,
        legal_balls % BALLS_PER_OVER
    )
}

/// What recording a ball did to the innings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BallOutcome {
    pub seq: u64,
    /// Net strike change after both rotation rules have been applied.
    pub swap_strike: bool,
    pub over_completed: bool,
    /// Batsman who must be replaced before the next ball.
    pub dismissed: Option<PlayerId>,
    /// Set when this ball ended the innings.
    pub innings_end: Option<InningsEnd>,
}

impl BallOutcome {
    pub fn awaiting_batsman(&self) -> bool {
        self.dismissed.is_some() && self.innings_end.is_none()
    }
}
