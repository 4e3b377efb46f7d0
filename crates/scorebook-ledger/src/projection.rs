use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use scorebook_types::{DismissalKind, ExtraKind, PlayerId, TeamId};

use crate::records::{format_overs, InningsTotals, BALLS_PER_OVER};
use crate::traits::InningsReader;

/// How a batsman got out, as printed on the card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    /// Set only when the bowler is credited with the wicket.
    pub bowler: Option<PlayerId>,
    pub fielder: Option<PlayerId>,
}

/// One row of the batting card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub player: PlayerId,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: Option<Dismissal>,
}

impl BattingEntry {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            dismissal: None,
        }
    }

    /// Runs per hundred balls faced.
    pub fn strike_rate(&self) -> Option<f64> {
        if self.balls_faced == 0 {
            return None;
        }
        Some(f64::from(self.runs) * 100.0 / f64::from(self.balls_faced))
    }

    pub fn is_out(&self) -> bool {
        self.dismissal.is_some()
    }
}

/// One row of the bowling card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingEntry {
    pub player: PlayerId,
    pub legal_balls: u32,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingEntry {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            legal_balls: 0,
            maidens: 0,
            runs_conceded: 0,
            wickets: 0,
            wides: 0,
            no_balls: 0,
        }
    }

    pub fn overs(&self) -> String {
        format_overs(self.legal_balls)
    }

    /// Runs conceded per six legal balls.
    pub fn economy(&self) -> Option<f64> {
        if self.legal_balls == 0 {
            return None;
        }
        Some(
            f64::from(self.runs_conceded) * f64::from(BALLS_PER_OVER)
                / f64::from(self.legal_balls),
        )
    }
}

/// Team score at the moment a wicket fell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket: u32,
    pub runs: u32,
    pub player_out: PlayerId,
    pub position: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasBreakdown {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl ExtrasBreakdown {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// Full scorecard of one innings, derived only from its timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub batting_team: TeamId,
    pub bowling_team: TeamId,
    pub totals: InningsTotals,
    pub overs: String,
    pub run_rate: Option<f64>,
    /// Batsmen in order of first appearance on the timeline.
    pub batting: Vec<BattingEntry>,
    /// Bowlers in order of first over bowled.
    pub bowling: Vec<BowlingEntry>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub extras: ExtrasBreakdown,
}

/// Deterministic scorecard projection.
pub struct ScorecardBuilder;

impl ScorecardBuilder {
    pub fn build<R: InningsReader>(reader: &R) -> Scorecard {
        let mut batting: Vec<BattingEntry> = Vec::new();
        let mut batting_index: HashMap<PlayerId, usize> = HashMap::new();
        let mut bowling: Vec<BowlingEntry> = Vec::new();
        let mut bowling_index: HashMap<PlayerId, usize> = HashMap::new();
        let mut fall_of_wickets = Vec::new();
        let mut extras = ExtrasBreakdown::default();
        let mut running = InningsTotals::default();

        // Over being tallied: its number, its bowler while only one has
        // bowled in it, and the runs conceded so far.
        let mut over_in_progress: Option<(u32, Option<usize>, u32)> = None;

        for record in reader.balls() {
            let event = &record.event;
            let legal = event.is_legal_delivery();

            let striker = *batting_index
                .entry(event.striker.clone())
                .or_insert_with(|| {
                    batting.push(BattingEntry::new(event.striker.clone()));
                    batting.len() - 1
                });
            let bowler = *bowling_index
                .entry(event.bowler.clone())
                .or_insert_with(|| {
                    bowling.push(BowlingEntry::new(event.bowler.clone()));
                    bowling.len() - 1
                });

            let entry = &mut batting[striker];
            entry.runs += u32::from(event.runs_off_bat);
            if event.extra_kind() != Some(ExtraKind::Wide) {
                entry.balls_faced += 1;
            }
            if event.is_four() {
                entry.fours += 1;
            }
            if event.is_six() {
                entry.sixes += 1;
            }

            let mut conceded = u32::from(event.runs_off_bat);
            if let Some(extra) = event.extra {
                match extra.kind {
                    ExtraKind::Wide => {
                        extras.wides += extra.runs;
                        bowling[bowler].wides += 1;
                    }
                    ExtraKind::NoBall => {
                        extras.no_balls += extra.runs;
                        bowling[bowler].no_balls += 1;
                    }
                    ExtraKind::Bye => extras.byes += extra.runs,
                    ExtraKind::LegBye => extras.leg_byes += extra.runs,
                }
                if extra.kind.charged_to_bowler() {
                    conceded += extra.runs;
                }
            }

            let figures = &mut bowling[bowler];
            figures.runs_conceded += conceded;
            if legal {
                figures.legal_balls += 1;
            }

            let (over_bowler, over_runs) = match over_in_progress {
                Some((over, sole, runs)) if over == record.over => {
                    (sole.filter(|&b| b == bowler), runs + conceded)
                }
                _ => (Some(bowler), conceded),
            };
            over_in_progress = Some((record.over, over_bowler, over_runs));
            if legal
                && record.legal_ball == BALLS_PER_OVER
                && over_runs == 0
                && over_bowler.is_some()
            {
                figures.maidens += 1;
            }

            running.runs += event.total_runs();
            if legal {
                running.legal_balls += 1;
            }

            if let Some(wicket) = &event.wicket {
                running.wickets += 1;
                if wicket.kind.credited_to_bowler() {
                    figures.wickets += 1;
                }

                let out = *batting_index
                    .entry(wicket.batsman_out.clone())
                    .or_insert_with(|| {
                        batting.push(BattingEntry::new(wicket.batsman_out.clone()));
                        batting.len() - 1
                    });
                batting[out].dismissal = Some(Dismissal {
                    kind: wicket.kind,
                    bowler: wicket
                        .kind
                        .credited_to_bowler()
                        .then(|| event.bowler.clone()),
                    fielder: wicket.fielder.clone(),
                });

                fall_of_wickets.push(FallOfWicket {
                    wicket: running.wickets,
                    runs: running.runs,
                    player_out: wicket.batsman_out.clone(),
                    position: record.position(),
                });
            }
        }

        let totals = reader.totals();
        Scorecard {
            batting_team: reader.batting_team().clone(),
            bowling_team: reader.bowling_team().clone(),
            totals,
            overs: totals.overs(),
            run_rate: totals.run_rate(),
            batting,
            bowling,
            fall_of_wickets,
            extras,
        }
    }
}
