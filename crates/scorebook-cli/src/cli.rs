use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scorebook_types::{DismissalKind, ExtraKind, MatchFormat, PlayerId, TeamId, TossDecision};

#[derive(Parser)]
#[command(
    name = "scorebook",
    about = "Scorebook: ball-by-ball cricket scoring",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./scorebook.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot directory, overriding the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CoinCall {
    Heads,
    Tails,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new match
    New(NewArgs),
    /// Record the toss, or flip a coin for it
    Toss(TossArgs),
    /// Register both squads, or skip them
    Squad(SquadArgs),
    /// Set striker, non-striker and bowler
    Roles(RolesArgs),
    /// Send in a new batsman after a wicket
    Batsman(BatsmanArgs),
    /// Hand the ball to another bowler
    Bowler(BowlerArgs),
    /// Record one ball
    Ball(BallArgs),
    /// Declare (or forfeit) the current innings
    Declare(DeclareArgs),
    /// End the first innings and start the chase
    Switch(MatchArg),
    /// Show score, roles and result
    Show(ShowArgs),
    /// Check stored innings timelines for integrity
    Verify(MatchArg),
    /// List stored matches
    List,
    /// Delete a stored match
    Delete(MatchArg),
}

/// Match id, or a unique prefix of one.
#[derive(Args)]
pub struct MatchArg {
    #[arg(value_name = "MATCH")]
    pub id: String,
}

#[derive(Args)]
pub struct NewArgs {
    /// Home team id
    #[arg(long)]
    pub home: TeamId,
    /// Home team display name (defaults to the id)
    #[arg(long)]
    pub home_name: Option<String>,
    #[arg(long)]
    pub away: TeamId,
    #[arg(long)]
    pub away_name: Option<String>,
    /// t10, t20, odi or custom (defaults to the configured format)
    #[arg(long = "match-format")]
    pub match_format: Option<MatchFormat>,
    /// Overs per innings, overriding the format
    #[arg(long, conflicts_with = "unlimited")]
    pub overs: Option<u32>,
    /// No overs limit
    #[arg(long)]
    pub unlimited: bool,
}

#[derive(Args)]
pub struct TossArgs {
    #[command(flatten)]
    pub target: MatchArg,
    /// Team that won the toss
    #[arg(long, required_unless_present = "call", conflicts_with = "call")]
    pub winner: Option<TeamId>,
    /// Flip a coin with this call
    #[arg(long, requires = "caller")]
    pub call: Option<CoinCall>,
    /// Team making the call
    #[arg(long)]
    pub caller: Option<TeamId>,
    /// What the winner chose: bat or bowl
    #[arg(long)]
    pub decision: TossDecision,
}

#[derive(Args)]
pub struct SquadArgs {
    #[command(flatten)]
    pub target: MatchArg,
    /// Home squad, comma separated
    #[arg(long, value_delimiter = ',', required_unless_present = "skip")]
    pub home: Vec<PlayerId>,
    /// Away squad, comma separated
    #[arg(long, value_delimiter = ',', required_unless_present = "skip")]
    pub away: Vec<PlayerId>,
    /// Play without squads (ten wickets per side)
    #[arg(long, conflicts_with_all = ["home", "away"])]
    pub skip: bool,
}

#[derive(Args)]
pub struct RolesArgs {
    #[command(flatten)]
    pub target: MatchArg,
    #[arg(long)]
    pub striker: PlayerId,
    #[arg(long)]
    pub non_striker: PlayerId,
    #[arg(long)]
    pub bowler: PlayerId,
}

#[derive(Args)]
pub struct BatsmanArgs {
    #[command(flatten)]
    pub target: MatchArg,
    pub player: PlayerId,
}

#[derive(Args)]
pub struct BowlerArgs {
    #[command(flatten)]
    pub target: MatchArg,
    pub player: PlayerId,
}

#[derive(Args)]
pub struct BallArgs {
    #[command(flatten)]
    pub target: MatchArg,
    /// Runs off the bat
    #[arg(default_value_t = 0)]
    pub runs: u8,
    /// Extra kind: wd, nb, b or lb
    #[arg(long, requires = "extra_runs")]
    pub extra: Option<ExtraKind>,
    /// Runs credited as extras
    #[arg(long, requires = "extra")]
    pub extra_runs: Option<u32>,
    /// Dismissal: bowled, caught, lbw, run-out, stumped, ...
    #[arg(long, requires = "batsman")]
    pub out: Option<DismissalKind>,
    /// Batsman dismissed
    #[arg(long)]
    pub batsman: Option<PlayerId>,
    #[arg(long, requires = "out")]
    pub fielder: Option<PlayerId>,
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args)]
pub struct DeclareArgs {
    #[command(flatten)]
    pub target: MatchArg,
    /// Forfeit an innings that has not started
    #[arg(long)]
    pub forfeit: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: MatchArg,
    /// Print full batting and bowling cards
    #[arg(long)]
    pub scorecard: bool,
}
