use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use scorebook_sdk::{
    CoinFace, Delivery, MatchCheck, MatchId, MatchSetup, Scorer, Team, Wicket,
};
use scorebook_store::{FileSnapshotStore, SnapshotStore};
use scorebook_types::Extra;

use crate::cli::*;
use crate::config::ScorebookConfig;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ScorebookConfig::load(cli.config.as_deref())?;
    if !config.color {
        colored::control::set_override(false);
    }
    let dir = cli.store.clone().unwrap_or_else(|| config.store_dir.clone());
    let store = FileSnapshotStore::open(&dir)
        .with_context(|| format!("opening snapshot store {}", dir.display()))?;
    let json = cli.format == OutputFormat::Json;

    match cli.command {
        Command::New(args) => cmd_new(&store, &config, args, json),
        Command::Toss(args) => cmd_toss(&store, args, json),
        Command::Squad(args) => cmd_squad(&store, args, json),
        Command::Roles(args) => {
            let mut scorer = open(&store, &args.target)?;
            scorer.set_roles(args.striker, args.non_striker, args.bowler)?;
            finish(&scorer, json)
        }
        Command::Batsman(args) => {
            let mut scorer = open(&store, &args.target)?;
            scorer.bring_in_batsman(args.player)?;
            finish(&scorer, json)
        }
        Command::Bowler(args) => {
            let mut scorer = open(&store, &args.target)?;
            scorer.change_bowler(args.player)?;
            finish(&scorer, json)
        }
        Command::Ball(args) => cmd_ball(&store, args, json),
        Command::Declare(args) => cmd_declare(&store, args, json),
        Command::Switch(target) => {
            let mut scorer = open(&store, &target)?;
            let target_runs = scorer.switch_innings()?;
            scorer.save()?;
            if json {
                return render::print_json(&json!({
                    "target": target_runs,
                    "summary": scorer.summary(),
                }));
            }
            println!("{} Innings switched. Target {}", "✓".green().bold(), target_runs.to_string().bold());
            print!("{}", render::summary(&scorer.summary()));
            Ok(())
        }
        Command::Show(args) => cmd_show(&store, args, json),
        Command::Verify(target) => cmd_verify(&store, &target, json),
        Command::List => cmd_list(&store, json),
        Command::Delete(target) => {
            let id = resolve(&store, &target.id)?;
            let removed = Scorer::delete(&store, &id)?;
            if json {
                return render::print_json(&json!({ "match_id": id, "deleted": removed }));
            }
            println!("Deleted match {}", id.to_string().yellow());
            Ok(())
        }
    }
}

/// Accept a full match id or a unique prefix of one.
fn resolve(store: &FileSnapshotStore, given: &str) -> anyhow::Result<MatchId> {
    if let Ok(id) = given.parse::<MatchId>() {
        return Ok(id);
    }
    let mut candidates = store
        .list()?
        .into_iter()
        .filter(|id| id.to_string().starts_with(given));
    match (candidates.next(), candidates.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => anyhow::bail!("no match with id {given}"),
        (Some(_), Some(_)) => anyhow::bail!("match id {given} is ambiguous"),
    }
}

fn open<'s>(
    store: &'s FileSnapshotStore,
    target: &MatchArg,
) -> anyhow::Result<Scorer<'s, FileSnapshotStore>> {
    let id = resolve(store, &target.id)?;
    Ok(Scorer::open(store, &id)?)
}

/// Save and print the resulting state.
fn finish(scorer: &Scorer<'_, FileSnapshotStore>, json: bool) -> anyhow::Result<()> {
    scorer.save()?;
    let summary = scorer.summary();
    if json {
        return render::print_json(&summary);
    }
    print!("{}", render::summary(&summary));
    Ok(())
}

fn cmd_new(
    store: &FileSnapshotStore,
    config: &ScorebookConfig,
    args: NewArgs,
    json: bool,
) -> anyhow::Result<()> {
    let format = args.match_format.unwrap_or(config.default_format);
    let overs = if args.unlimited {
        None
    } else {
        args.overs.or_else(|| config.overs_for(format))
    };
    let home_name = args.home_name.unwrap_or_else(|| args.home.to_string());
    let away_name = args.away_name.unwrap_or_else(|| args.away.to_string());
    let setup = MatchSetup::new(Team::new(args.home, home_name), Team::new(args.away, away_name), format)
        .with_overs_limit(overs);

    let scorer = Scorer::create(store, setup)?;
    if json {
        return render::print_json(&scorer.summary());
    }
    println!("{} Created match {}", "✓".green().bold(), scorer.match_id().to_string().yellow());
    print!("{}", render::summary(&scorer.summary()));
    Ok(())
}

fn cmd_toss(store: &FileSnapshotStore, args: TossArgs, json: bool) -> anyhow::Result<()> {
    let mut scorer = open(store, &args.target)?;
    match (args.winner, args.call, args.caller) {
        (Some(winner), _, _) => scorer.record_toss(winner, args.decision)?,
        (None, Some(call), Some(caller)) => {
            let call = match call {
                CoinCall::Heads => CoinFace::Heads,
                CoinCall::Tails => CoinFace::Tails,
            };
            let (face, toss) = scorer.call_toss(caller, call, args.decision)?;
            if !json {
                println!(
                    "Coin landed {}: {} won the toss and chose to {}",
                    face.to_string().bold(),
                    toss.winner.to_string().yellow(),
                    toss.decision
                );
            }
        }
        _ => anyhow::bail!("give --winner, or --call with --caller"),
    }
    finish(&scorer, json)
}

fn cmd_squad(store: &FileSnapshotStore, args: SquadArgs, json: bool) -> anyhow::Result<()> {
    let mut scorer = open(store, &args.target)?;
    if args.skip {
        scorer.skip_squads()?;
    } else {
        scorer.set_squads(args.home, args.away)?;
    }
    finish(&scorer, json)
}

fn cmd_ball(store: &FileSnapshotStore, args: BallArgs, json: bool) -> anyhow::Result<()> {
    let mut delivery = Delivery::runs(args.runs);
    if let (Some(kind), Some(runs)) = (args.extra, args.extra_runs) {
        delivery.extra = Some(Extra::new(kind, runs));
    }
    if let Some(kind) = args.out {
        let batsman = args.batsman.context("--batsman is required with --out")?;
        let mut wicket = Wicket::new(kind, batsman);
        if let Some(fielder) = args.fielder {
            wicket = wicket.with_fielder(fielder);
        }
        delivery = delivery.with_wicket(wicket);
    }
    if let Some(note) = args.note {
        delivery = delivery.with_commentary(note);
    }

    let mut scorer = open(store, &args.target)?;
    let report = scorer.record_ball(delivery)?;
    scorer.save()?;
    let summary = scorer.summary();

    if json {
        return render::print_json(&json!({
            "seq": report.outcome.seq,
            "swap_strike": report.outcome.swap_strike,
            "over_completed": report.outcome.over_completed,
            "dismissed": report.outcome.dismissed,
            "innings_end": report.outcome.innings_end,
            "target": report.target,
            "summary": summary,
        }));
    }

    println!("{} Ball {} recorded", "✓".green().bold(), report.outcome.seq);
    if let Some(out) = &report.outcome.dismissed {
        println!("  {} {}", "Wicket!".red().bold(), out);
    }
    if let Some(end) = report.outcome.innings_end {
        println!("  Innings over: {end}");
    }
    if let Some(target) = report.target {
        println!("  Target set: {}", target.to_string().bold());
    } else if report.outcome.over_completed && summary.result.is_none() {
        println!("  End of over; change the bowler with `scorebook bowler`");
    }
    if report.outcome.awaiting_batsman() && matches!(report.check, MatchCheck::InProgress) {
        println!("  Send in the next batsman with `scorebook batsman`");
    }
    print!("{}", render::summary(&summary));
    Ok(())
}

fn cmd_declare(store: &FileSnapshotStore, args: DeclareArgs, json: bool) -> anyhow::Result<()> {
    let mut scorer = open(store, &args.target)?;
    let check = if args.forfeit {
        scorer.forfeit()?
    } else {
        scorer.declare()?
    };
    if !json {
        let word = if args.forfeit { "forfeited" } else { "declared" };
        println!("{} Innings {word}", "✓".green().bold());
        if let MatchCheck::InningsOver { .. } = check {
            if let Some(target) = scorer.state().target() {
                println!("  Target set: {}", target.to_string().bold());
            }
        }
    }
    finish(&scorer, json)
}

fn cmd_show(store: &FileSnapshotStore, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let scorer = open(store, &args.target)?;
    let summary = scorer.summary();
    if json {
        if args.scorecard {
            return render::print_json(&json!({
                "summary": summary,
                "scorecards": scorer.scorecards(),
            }));
        }
        return render::print_json(&summary);
    }
    print!("{}", render::summary(&summary));
    if args.scorecard {
        for card in scorer.scorecards() {
            println!();
            print!("{}", render::scorecard(&card));
        }
    }
    Ok(())
}

fn cmd_verify(store: &FileSnapshotStore, target: &MatchArg, json: bool) -> anyhow::Result<()> {
    let scorer = open(store, target)?;
    let checks = scorer.verify();
    if json {
        render::print_json(&checks)?;
    } else if checks.is_empty() {
        println!("No innings recorded yet.");
    } else {
        for check in &checks {
            print!("{}", render::verification(check));
        }
    }
    if checks.iter().all(|c| c.is_valid()) {
        Ok(())
    } else {
        anyhow::bail!("match {} failed integrity checks", scorer.match_id())
    }
}

fn cmd_list(store: &FileSnapshotStore, json: bool) -> anyhow::Result<()> {
    let summaries = Scorer::list(store)?;
    if json {
        return render::print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("No matches stored.");
        return Ok(());
    }
    for s in &summaries {
        let phase = s.phase.to_string();
        println!(
            "{}  {}  {}",
            s.match_id.short_id().yellow(),
            phase.cyan(),
            s.headline()
        );
    }
    Ok(())
}
