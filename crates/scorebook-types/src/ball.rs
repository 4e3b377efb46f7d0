use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::PlayerId;

/// Kind of extra conceded on a ball.
///
/// A ball with no extra is represented by `Option::<Extra>::None` on
/// [`BallEvent`], so there is no `None` variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Byes and leg-byes come off a legal delivery; wides and no-balls do not.
    pub fn is_legal_delivery(self) -> bool {
        matches!(self, Self::Bye | Self::LegBye)
    }

    /// Whether the runs count against the bowler's figures.
    pub fn charged_to_bowler(self) -> bool {
        matches!(self, Self::Wide | Self::NoBall)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::NoBall => "no-ball",
            Self::Bye => "bye",
            Self::LegBye => "leg-bye",
        }
    }
}

impl fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtraKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" | "wd" | "w" => Ok(Self::Wide),
            "no-ball" | "noball" | "nb" => Ok(Self::NoBall),
            "bye" | "b" => Ok(Self::Bye),
            "leg-bye" | "legbye" | "lb" => Ok(Self::LegBye),
            other => Err(TypeError::UnknownExtraKind(other.to_string())),
        }
    }
}

/// An extra and the runs it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub kind: ExtraKind,
    pub runs: u32,
}

impl Extra {
    pub fn new(kind: ExtraKind, runs: u32) -> Self {
        Self { kind, runs }
    }
}

/// How a batsman was dismissed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    RetiredOut,
    ObstructingTheField,
    TimedOut,
    HandledTheBall,
}

impl DismissalKind {
    /// Dismissals where a fielder may be named on the scorecard.
    pub fn involves_fielder(self) -> bool {
        matches!(self, Self::Caught | Self::RunOut | Self::Stumped)
    }

    /// Dismissals counted in the bowler's wicket column.
    pub fn credited_to_bowler(self) -> bool {
        matches!(
            self,
            Self::Bowled | Self::Caught | Self::Lbw | Self::Stumped | Self::HitWicket
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught => "caught",
            Self::Lbw => "lbw",
            Self::RunOut => "run-out",
            Self::Stumped => "stumped",
            Self::HitWicket => "hit-wicket",
            Self::RetiredOut => "retired-out",
            Self::ObstructingTheField => "obstructing-the-field",
            Self::TimedOut => "timed-out",
            Self::HandledTheBall => "handled-the-ball",
        }
    }
}

impl fmt::Display for DismissalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DismissalKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bowled" | "b" => Ok(Self::Bowled),
            "caught" | "c" => Ok(Self::Caught),
            "lbw" => Ok(Self::Lbw),
            "run-out" | "runout" | "ro" => Ok(Self::RunOut),
            "stumped" | "st" => Ok(Self::Stumped),
            "hit-wicket" | "hitwicket" | "hw" => Ok(Self::HitWicket),
            "retired-out" | "retired" => Ok(Self::RetiredOut),
            "obstructing-the-field" | "obstructing" => Ok(Self::ObstructingTheField),
            "timed-out" | "timed" => Ok(Self::TimedOut),
            "handled-the-ball" | "handled" => Ok(Self::HandledTheBall),
            other => Err(TypeError::UnknownDismissalKind(other.to_string())),
        }
    }
}

/// Dismissal details attached to a wicket ball.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wicket {
    pub kind: DismissalKind,
    pub batsman_out: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder: Option<PlayerId>,
}

impl Wicket {
    pub fn new(kind: DismissalKind, batsman_out: PlayerId) -> Self {
        Self {
            kind,
            batsman_out,
            fielder: None,
        }
    }

    pub fn with_fielder(mut self, fielder: PlayerId) -> Self {
        self.fielder = Some(fielder);
        self
    }
}

/// One ball bowled. Immutable once appended to an innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub striker: PlayerId,
    pub bowler: PlayerId,
    pub runs_off_bat: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket: Option<Wicket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

impl BallEvent {
    pub const MAX_RUNS_OFF_BAT: u8 = 6;
    /// A no-ball hit for six, plus a boundary of overthrows.
    pub const MAX_EXTRA_RUNS: u32 = 11;

    /// A dot ball faced by `striker` from `bowler`.
    pub fn new(striker: PlayerId, bowler: PlayerId) -> Self {
        Self {
            striker,
            bowler,
            runs_off_bat: 0,
            extra: None,
            wicket: None,
            commentary: None,
        }
    }

    pub fn with_runs(mut self, runs: u8) -> Self {
        self.runs_off_bat = runs;
        self
    }

    pub fn with_extra(mut self, kind: ExtraKind, runs: u32) -> Self {
        self.extra = Some(Extra::new(kind, runs));
        self
    }

    pub fn with_wicket(mut self, wicket: Wicket) -> Self {
        self.wicket = Some(wicket);
        self
    }

    pub fn with_commentary(mut self, text: impl Into<String>) -> Self {
        self.commentary = Some(text.into());
        self
    }

    pub fn extra_kind(&self) -> Option<ExtraKind> {
        self.extra.map(|e| e.kind)
    }

    pub fn extra_runs(&self) -> u32 {
        self.extra.map_or(0, |e| e.runs)
    }

    /// Runs credited to the batting side from this ball.
    pub fn total_runs(&self) -> u32 {
        u32::from(self.runs_off_bat).saturating_add(self.extra_runs())
    }

    /// Whether the ball counts toward the six of an over.
    pub fn is_legal_delivery(&self) -> bool {
        self.extra.map_or(true, |e| e.kind.is_legal_delivery())
    }

    pub fn is_wicket(&self) -> bool {
        self.wicket.is_some()
    }

    pub fn is_four(&self) -> bool {
        self.runs_off_bat == 4
    }

    pub fn is_six(&self) -> bool {
        self.runs_off_bat == 6
    }

    /// Check the structural constraints of a single ball.
    pub fn check(&self) -> Result<(), TypeError> {
        if self.runs_off_bat > Self::MAX_RUNS_OFF_BAT {
            return Err(TypeError::RunsOutOfRange {
                runs: self.runs_off_bat,
                max: Self::MAX_RUNS_OFF_BAT,
            });
        }
        if let Some(extra) = self.extra {
            if self.runs_off_bat != 0 {
                return Err(TypeError::RunsOffBatOnExtra { kind: extra.kind });
            }
            if extra.runs > Self::MAX_EXTRA_RUNS {
                return Err(TypeError::ExtraRunsOutOfRange {
                    runs: extra.runs,
                    max: Self::MAX_EXTRA_RUNS,
                });
            }
        }
        if let Some(wicket) = &self.wicket {
            if wicket.fielder.is_some() && !wicket.kind.involves_fielder() {
                return Err(TypeError::FielderNotAllowed { kind: wicket.kind });
            }
            if wicket.batsman_out.is_empty() {
                return Err(TypeError::EmptyIdentifier);
            }
        }
        Ok(())
    }
}
