use std::fmt::Write;

use colored::Colorize;
use serde::Serialize;

use scorebook_ledger::{BattingEntry, Dismissal};
use scorebook_sdk::{InningsVerification, MatchSummary, Scorecard};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2}"))
}

/// Multi-line match status.
pub fn summary(s: &MatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} v {}  ({}, {})",
        s.match_id.short_id().yellow(),
        s.home.bold(),
        s.away.bold(),
        s.format,
        s.overs_limit
            .map_or_else(|| "unlimited overs".to_string(), |o| format!("{o} overs"))
    );
    let _ = writeln!(out, "  Phase: {}", s.phase.to_string().cyan());

    for innings in &s.innings {
        let _ = writeln!(
            out,
            "  Innings {}: {} {} ({} ov, RR {}){}",
            innings.number,
            innings.batting_team.to_string().bold(),
            innings.score().bold(),
            innings.overs,
            rate(innings.run_rate),
            innings
                .end
                .map(|end| format!(" [{end}]"))
                .unwrap_or_default()
        );
    }

    if let Some(target) = s.target {
        let _ = write!(out, "  Target: {}", target.to_string().bold());
        if let Some(required) = s.runs_required {
            let _ = write!(out, ", need {required}");
            if let Some(rrr) = s.required_run_rate {
                let _ = write!(out, " (RRR {rrr:.2})");
            }
        }
        out.push('\n');
    }

    let role = |p: &Option<scorebook_sdk::PlayerId>| {
        p.as_ref()
            .map_or_else(|| "-".dimmed().to_string(), |p| p.to_string())
    };
    if s.result.is_none() && !s.innings.is_empty() {
        let _ = writeln!(
            out,
            "  Striker: {}*  Non-striker: {}  Bowler: {}",
            role(&s.striker),
            role(&s.non_striker),
            role(&s.bowler)
        );
    }

    if let Some(result) = &s.result {
        let _ = writeln!(out, "  {}", result.to_string().green().bold());
    }
    out
}

fn how_out(dismissal: &Option<Dismissal>) -> String {
    let Some(d) = dismissal else {
        return "not out".into();
    };
    let mut text = d.kind.to_string();
    if let Some(fielder) = &d.fielder {
        let _ = write!(text, " ({fielder})");
    }
    if let Some(bowler) = &d.bowler {
        let _ = write!(text, " b {bowler}");
    }
    text
}

fn batting_row(entry: &BattingEntry) -> String {
    format!(
        "    {:<20} {:<28} {:>4} {:>4} {:>3} {:>3} {:>7}",
        entry.player.as_str(),
        how_out(&entry.dismissal),
        entry.runs,
        entry.balls_faced,
        entry.fours,
        entry.sixes,
        rate(entry.strike_rate())
    )
}

/// Batting and bowling cards for one innings.
pub fn scorecard(card: &Scorecard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}/{} ({} ov)",
        card.batting_team.to_string().bold(),
        card.totals.runs,
        card.totals.wickets,
        card.overs
    );
    let _ = writeln!(
        out,
        "    {:<20} {:<28} {:>4} {:>4} {:>3} {:>3} {:>7}",
        "Batter", "", "R", "B", "4s", "6s", "SR"
    );
    for entry in &card.batting {
        let _ = writeln!(out, "{}", batting_row(entry));
    }

    let extras = &card.extras;
    let _ = writeln!(
        out,
        "    Extras {} (wd {}, nb {}, b {}, lb {})",
        extras.total(),
        extras.wides,
        extras.no_balls,
        extras.byes,
        extras.leg_byes
    );

    if !card.fall_of_wickets.is_empty() {
        let fow: Vec<String> = card
            .fall_of_wickets
            .iter()
            .map(|f| format!("{}-{} ({}, {})", f.wicket, f.runs, f.player_out, f.position))
            .collect();
        let _ = writeln!(out, "    Fall of wickets: {}", fow.join(", "));
    }

    let _ = writeln!(
        out,
        "    {:<20} {:>5} {:>3} {:>4} {:>3} {:>6}",
        "Bowler", "O", "M", "R", "W", "Econ"
    );
    for b in &card.bowling {
        let _ = writeln!(
            out,
            "    {:<20} {:>5} {:>3} {:>4} {:>3} {:>6}",
            b.player.as_str(),
            b.overs(),
            b.maidens,
            b.runs_conceded,
            b.wickets,
            rate(b.economy())
        );
    }
    out
}

pub fn verification(check: &InningsVerification) -> String {
    let mut out = String::new();
    let mark = if check.is_valid() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    let _ = writeln!(
        out,
        "{mark} Innings {} ({}): {} balls, replay {}",
        check.number,
        check.batting_team,
        check.ball_count,
        if check.converges {
            "converges".green()
        } else {
            "diverges".red()
        }
    );
    for violation in &check.violations {
        let _ = writeln!(out, "    {}", violation.red());
    }
    out
}

#[cfg(test)]
mod tests {
    use scorebook_ledger::{InningsLedger, InningsRules, ScorecardBuilder};
    use scorebook_sdk::{DismissalKind, PlayerId, TeamId, Wicket};
    use scorebook_types::BallEvent;

    use super::*;

    fn ledger() -> InningsLedger {
        let mut ledger = InningsLedger::new(
            TeamId::new("mi"),
            TeamId::new("csk"),
            InningsRules::new(10, Some(20)),
        );
        let ball = |runs| BallEvent::new(PlayerId::new("rohit"), PlayerId::new("pathirana")).with_runs(runs);
        ledger.record_ball(ball(4)).unwrap();
        ledger.record_ball(ball(6)).unwrap();
        ledger
            .record_ball(ball(0).with_wicket(
                Wicket::new(DismissalKind::Caught, PlayerId::new("rohit"))
                    .with_fielder(PlayerId::new("dube")),
            ))
            .unwrap();
        ledger
    }

    #[test]
    fn scorecard_lists_dismissal_and_bowler() {
        colored::control::set_override(false);
        let text = scorecard(&ScorecardBuilder::build(&ledger()));
        assert!(text.starts_with("mi 10/1 (0.3 ov)"));
        assert!(text.contains("caught (dube) b pathirana"));
        assert!(text.contains("Fall of wickets: 1-10 (rohit, 0.3)"));
        assert!(text.contains("pathirana"));
    }

    #[test]
    fn not_out_batter() {
        assert_eq!(how_out(&None), "not out");
    }

    #[test]
    fn rate_formatting() {
        assert_eq!(rate(None), "-");
        assert_eq!(rate(Some(7.456)), "7.46");
    }
}
