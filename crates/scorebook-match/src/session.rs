use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use scorebook_ledger::{BallOutcome, InningsLedger, InningsReader, InningsRules};
use scorebook_types::{MatchId, PlayerId, TeamId, TossResult};

use crate::delivery::Delivery;
use crate::error::MatchError;
use crate::phase::MatchPhase;
use crate::result::MatchResult;
use crate::setup::MatchSetup;

/// Live scoring session for one match.
///
/// Owned by the caller and mutated only through its methods. Every method
/// either succeeds or returns an error with the state left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScoringState {
    match_id: MatchId,
    setup: MatchSetup,
    phase: MatchPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toss: Option<TossResult>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    squads: BTreeMap<TeamId, Vec<PlayerId>>,
    current_innings: u8,
    innings1: Option<InningsLedger>,
    innings2: Option<InningsLedger>,
    striker: Option<PlayerId>,
    non_striker: Option<PlayerId>,
    bowler: Option<PlayerId>,
    target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<MatchResult>,
}

impl MatchScoringState {
    pub fn new(match_id: MatchId, setup: MatchSetup) -> Result<Self, MatchError> {
        setup.validate()?;
        Ok(Self {
            match_id,
            setup,
            phase: MatchPhase::AwaitingToss,
            toss: None,
            squads: BTreeMap::new(),
            current_innings: 1,
            innings1: None,
            innings2: None,
            striker: None,
            non_striker: None,
            bowler: None,
            target: None,
            result: None,
        })
    }

    // ---- Accessors ----

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn toss(&self) -> Option<&TossResult> {
        self.toss.as_ref()
    }

    /// Squad of `team`; empty when squads were skipped.
    pub fn squad(&self, team: &TeamId) -> &[PlayerId] {
        self.squads.get(team).map_or(&[], Vec::as_slice)
    }

    pub fn current_innings_number(&self) -> u8 {
        self.current_innings
    }

    pub fn innings1(&self) -> Option<&InningsLedger> {
        self.innings1.as_ref()
    }

    pub fn innings2(&self) -> Option<&InningsLedger> {
        self.innings2.as_ref()
    }

    pub fn current_innings(&self) -> Option<&InningsLedger> {
        match self.current_innings {
            1 => self.innings1.as_ref(),
            _ => self.innings2.as_ref(),
        }
    }

    fn current_innings_mut(&mut self) -> Option<&mut InningsLedger> {
        match self.current_innings {
            1 => self.innings1.as_mut(),
            _ => self.innings2.as_mut(),
        }
    }

    pub fn batting_team(&self) -> Option<&TeamId> {
        self.current_innings().map(InningsReader::batting_team)
    }

    pub fn bowling_team(&self) -> Option<&TeamId> {
        self.current_innings().map(InningsReader::bowling_team)
    }

    pub fn striker(&self) -> Option<&PlayerId> {
        self.striker.as_ref()
    }

    pub fn non_striker(&self) -> Option<&PlayerId> {
        self.non_striker.as_ref()
    }

    pub fn bowler(&self) -> Option<&PlayerId> {
        self.bowler.as_ref()
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// A wicket has fallen and one batting slot is waiting to be filled.
    pub fn awaiting_batsman(&self) -> bool {
        self.phase == MatchPhase::AwaitingRoles
            && self.striker.is_none() != self.non_striker.is_none()
    }

    /// Runs the chasing side still needs, during the second innings.
    pub fn runs_required(&self) -> Option<u32> {
        let chase = self.innings2.as_ref()?;
        self.target
            .map(|target| target.saturating_sub(chase.total_runs()))
    }

    /// Runs required per six balls for the rest of a limited-overs chase.
    pub fn required_run_rate(&self) -> Option<f64> {
        let required = self.runs_required()?;
        let balls = self.innings2.as_ref()?.balls_remaining()?;
        if balls == 0 {
            return None;
        }
        Some(f64::from(required) * 6.0 / f64::from(balls))
    }

    // ---- Setup ----

    pub fn record_toss(&mut self, toss: TossResult) -> Result<(), MatchError> {
        self.require_phase(&[MatchPhase::AwaitingToss], "record the toss")?;
        if self.setup.team(&toss.winner).is_none() {
            return Err(MatchError::InvalidArgument(format!(
                "{} is not playing in this match",
                toss.winner
            )));
        }

        info!(
            match_id = %self.match_id,
            winner = %toss.winner,
            decision = %toss.decision,
            "toss recorded"
        );
        self.toss = Some(toss);
        self.phase = MatchPhase::AwaitingSquads;
        Ok(())
    }

    /// Register both playing squads and open the first innings.
    pub fn set_squads(
        &mut self,
        home: Vec<PlayerId>,
        away: Vec<PlayerId>,
    ) -> Result<(), MatchError> {
        self.require_phase(&[MatchPhase::AwaitingSquads], "set squads")?;
        check_squad(&self.setup.home.id, &home)?;
        check_squad(&self.setup.away.id, &away)?;
        let home_players: HashSet<_> = home.iter().collect();
        if let Some(both) = away.iter().find(|p| home_players.contains(p)) {
            return Err(MatchError::InvalidArgument(format!(
                "{both} cannot play for both sides"
            )));
        }

        let mut squads = BTreeMap::new();
        squads.insert(self.setup.home.id.clone(), home);
        squads.insert(self.setup.away.id.clone(), away);
        let first = self.first_innings(&squads)?;

        self.squads = squads;
        self.open_first_innings(first);
        Ok(())
    }

    /// Open the first innings without squads; ten wickets per side.
    pub fn skip_squads(&mut self) -> Result<(), MatchError> {
        self.require_phase(&[MatchPhase::AwaitingSquads], "skip squads")?;
        let first = self.first_innings(&BTreeMap::new())?;
        self.open_first_innings(first);
        Ok(())
    }

    fn first_innings(
        &self,
        squads: &BTreeMap<TeamId, Vec<PlayerId>>,
    ) -> Result<InningsLedger, MatchError> {
        let toss = self
            .toss
            .as_ref()
            .ok_or_else(|| MatchError::InvalidState("the toss has not been recorded".into()))?;
        let loser = self
            .setup
            .opponent(&toss.winner)
            .ok_or_else(|| MatchError::InvalidState("toss winner is not in this match".into()))?;
        let batting = toss.batting_first(&loser.id);
        let bowling = if batting == loser.id {
            toss.winner.clone()
        } else {
            loser.id.clone()
        };
        let rules = rules_for(squads, &batting, self.setup.overs_limit);
        Ok(InningsLedger::new(batting, bowling, rules))
    }

    fn open_first_innings(&mut self, first: InningsLedger) {
        info!(
            match_id = %self.match_id,
            batting = %first.batting_team(),
            max_wickets = first.rules().max_wickets,
            "first innings opened"
        );
        self.innings1 = Some(first);
        self.current_innings = 1;
        self.phase = MatchPhase::AwaitingRoles;
    }

    // ---- Roles ----

    /// Assign all three role holders. Used at the start of each innings and
    /// to resume after a wicket.
    pub fn set_player_roles(
        &mut self,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> Result<(), MatchError> {
        self.require_phase(
            &[MatchPhase::AwaitingRoles, MatchPhase::Scoring],
            "set player roles",
        )?;
        if striker == non_striker {
            return Err(MatchError::InvalidArgument(format!(
                "striker and non-striker are both {striker}"
            )));
        }
        let ledger = self.live_innings()?;
        self.check_batter(ledger, &striker)?;
        self.check_batter(ledger, &non_striker)?;
        self.check_bowler(ledger, &bowler, [&striker, &non_striker])?;

        debug!(%striker, %non_striker, %bowler, "roles set");
        self.striker = Some(striker);
        self.non_striker = Some(non_striker);
        self.bowler = Some(bowler);
        self.phase = MatchPhase::Scoring;
        Ok(())
    }

    /// Fill the single vacant batting slot after a wicket.
    pub fn bring_in_batsman(&mut self, player: PlayerId) -> Result<(), MatchError> {
        self.require_phase(&[MatchPhase::AwaitingRoles], "bring in a batsman")?;
        let partner = match (&self.striker, &self.non_striker) {
            (None, Some(partner)) | (Some(partner), None) => partner,
            (None, None) => {
                return Err(MatchError::InvalidState(
                    "both batting slots are vacant; set all player roles".into(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(MatchError::InvalidState("no batting slot is vacant".into()))
            }
        };
        if *partner == player {
            return Err(MatchError::InvalidArgument(format!(
                "{player} is already batting"
            )));
        }
        if self.bowler.as_ref() == Some(&player) {
            return Err(MatchError::InvalidArgument(format!(
                "{player} is the current bowler"
            )));
        }
        let ledger = self.live_innings()?;
        self.check_batter(ledger, &player)?;

        debug!(%player, "new batsman");
        if self.striker.is_none() {
            self.striker = Some(player);
        } else {
            self.non_striker = Some(player);
        }
        if self.bowler.is_some() {
            self.phase = MatchPhase::Scoring;
        }
        Ok(())
    }

    /// Hand the ball to another bowler, typically at the end of an over.
    pub fn change_bowler(&mut self, bowler: PlayerId) -> Result<(), MatchError> {
        self.require_phase(
            &[MatchPhase::AwaitingRoles, MatchPhase::Scoring],
            "change the bowler",
        )?;
        let ledger = self.live_innings()?;
        let batters = [&self.striker, &self.non_striker];
        let batting: Vec<&PlayerId> = batters.into_iter().flatten().collect();
        self.check_bowler(ledger, &bowler, batting)?;

        debug!(%bowler, "bowler changed");
        self.bowler = Some(bowler);
        if self.striker.is_some() && self.non_striker.is_some() {
            self.phase = MatchPhase::Scoring;
        }
        Ok(())
    }

    // ---- Scoring ----

    /// Record one ball bowled by the current bowler to the current striker.
    pub fn record_ball(&mut self, delivery: Delivery) -> Result<BallOutcome, MatchError> {
        if self.phase != MatchPhase::Scoring {
            if self.awaiting_batsman() {
                return Err(MatchError::InvalidState("awaiting new batsman".into()));
            }
            return Err(MatchError::InvalidState(format!(
                "cannot record a ball while {}",
                self.phase
            )));
        }
        let striker = self
            .striker
            .clone()
            .ok_or_else(|| MatchError::InvalidState("no striker set".into()))?;
        let non_striker = self
            .non_striker
            .as_ref()
            .ok_or_else(|| MatchError::InvalidState("no non-striker set".into()))?;
        let bowler = self
            .bowler
            .clone()
            .ok_or_else(|| MatchError::InvalidState("no bowler set".into()))?;

        let ledger = self.live_innings()?;
        if let Some(wicket) = &delivery.wicket {
            if wicket.batsman_out != striker && wicket.batsman_out != *non_striker {
                return Err(MatchError::InvalidArgument(format!(
                    "{} is not at the crease",
                    wicket.batsman_out
                )));
            }
            if let Some(fielder) = &wicket.fielder {
                let fielding = self.squad(ledger.bowling_team());
                if !fielding.is_empty() && !fielding.contains(fielder) {
                    return Err(MatchError::InvalidArgument(format!(
                        "{fielder} is not in the {} squad",
                        ledger.bowling_team()
                    )));
                }
            }
        }

        let event = delivery.into_event(striker, bowler);
        let outcome = self
            .current_innings_mut()
            .ok_or_else(|| MatchError::InvalidState("no innings in progress".into()))?
            .record_ball(event)?;

        if outcome.swap_strike {
            std::mem::swap(&mut self.striker, &mut self.non_striker);
        }
        if let Some(out) = &outcome.dismissed {
            if self.striker.as_ref() == Some(out) {
                self.striker = None;
            } else if self.non_striker.as_ref() == Some(out) {
                self.non_striker = None;
            }
        }

        self.phase = match outcome.innings_end {
            Some(reason) if self.current_innings == 1 => {
                info!(match_id = %self.match_id, %reason, "first innings over");
                MatchPhase::InningsBreak
            }
            Some(reason) => {
                info!(match_id = %self.match_id, %reason, "second innings over");
                MatchPhase::Scoring
            }
            None if self.chase_complete() => MatchPhase::Scoring,
            None if outcome.dismissed.is_some() => MatchPhase::AwaitingRoles,
            None => MatchPhase::Scoring,
        };
        Ok(outcome)
    }

    /// Close the first innings and start the chase.
    ///
    /// Returns the target: first-innings runs plus one.
    pub fn switch_innings(&mut self) -> Result<u32, MatchError> {
        if self.phase.is_terminal() {
            return Err(MatchError::InvalidState("the match is complete".into()));
        }
        if self.current_innings != 1 {
            return Err(MatchError::InvalidState("innings already switched".into()));
        }
        let first = self
            .innings1
            .as_ref()
            .ok_or_else(|| MatchError::InvalidState("first innings has not started".into()))?;
        self.check_transition(MatchPhase::AwaitingRoles)?;

        let target = first.total_runs() + 1;
        let batting = first.bowling_team().clone();
        let bowling = first.batting_team().clone();
        let rules = rules_for(&self.squads, &batting, self.setup.overs_limit);

        info!(match_id = %self.match_id, %batting, target, "innings switched");
        self.innings2 = Some(InningsLedger::new(batting, bowling, rules));
        self.target = Some(target);
        self.current_innings = 2;
        self.striker = None;
        self.non_striker = None;
        self.bowler = None;
        self.phase = MatchPhase::AwaitingRoles;
        Ok(target)
    }

    /// Declare the current innings closed.
    pub fn declare(&mut self) -> Result<(), MatchError> {
        self.close_innings(InningsLedger::declare, "declare")
    }

    /// Forfeit the current innings before a ball has been bowled.
    pub fn forfeit(&mut self) -> Result<(), MatchError> {
        self.close_innings(InningsLedger::forfeit, "forfeit")
    }

    fn close_innings(
        &mut self,
        close: fn(&mut InningsLedger) -> Result<(), scorebook_ledger::LedgerError>,
        action: &str,
    ) -> Result<(), MatchError> {
        self.require_phase(&[MatchPhase::AwaitingRoles, MatchPhase::Scoring], action)?;
        self.live_innings()?;
        let ledger = self
            .current_innings_mut()
            .ok_or_else(|| MatchError::InvalidState("no innings in progress".into()))?;
        close(ledger)?;

        info!(match_id = %self.match_id, innings = self.current_innings, action, "innings closed");
        if self.current_innings == 1 {
            self.phase = MatchPhase::InningsBreak;
        }
        Ok(())
    }

    /// Record the final result and finish the match.
    pub fn conclude(&mut self, result: MatchResult) -> Result<(), MatchError> {
        self.check_transition(MatchPhase::Complete)?;
        info!(match_id = %self.match_id, %result, "match complete");
        self.result = Some(result);
        self.phase = MatchPhase::Complete;
        Ok(())
    }

    // ---- Checks ----

    fn require_phase(&self, allowed: &[MatchPhase], action: &str) -> Result<(), MatchError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(MatchError::InvalidState(format!(
                "cannot {action} while {}",
                self.phase
            )))
        }
    }

    fn check_transition(&self, next: MatchPhase) -> Result<(), MatchError> {
        if self.phase.can_transition_to(next) {
            Ok(())
        } else {
            Err(MatchError::InvalidState(format!(
                "cannot move from {} to {next}",
                self.phase
            )))
        }
    }

    fn chase_complete(&self) -> bool {
        match (&self.innings2, self.target) {
            (Some(chase), Some(target)) => chase.total_runs() >= target,
            _ => false,
        }
    }

    /// The current innings, if it can still take balls.
    fn live_innings(&self) -> Result<&InningsLedger, MatchError> {
        let ledger = self
            .current_innings()
            .ok_or_else(|| MatchError::InvalidState("no innings in progress".into()))?;
        if let Some(reason) = ledger.end_reason() {
            return Err(MatchError::InvalidState(format!(
                "innings of {} is over ({reason})",
                ledger.batting_team()
            )));
        }
        if self.current_innings == 2 && self.chase_complete() {
            return Err(MatchError::InvalidState("the target has been reached".into()));
        }
        Ok(ledger)
    }

    fn check_batter(&self, ledger: &InningsLedger, player: &PlayerId) -> Result<(), MatchError> {
        if player.is_empty() {
            return Err(MatchError::InvalidArgument("batsman id must not be empty".into()));
        }
        let squad = self.squad(ledger.batting_team());
        if !squad.is_empty() && !squad.contains(player) {
            return Err(MatchError::InvalidArgument(format!(
                "{player} is not in the {} squad",
                ledger.batting_team()
            )));
        }
        let dismissed = ledger.balls().iter().any(|record| {
            record
                .event
                .wicket
                .as_ref()
                .is_some_and(|w| w.batsman_out == *player)
        });
        if dismissed {
            return Err(MatchError::InvalidArgument(format!("{player} is already out")));
        }
        Ok(())
    }

    fn check_bowler<'a>(
        &self,
        ledger: &InningsLedger,
        bowler: &PlayerId,
        batters: impl IntoIterator<Item = &'a PlayerId>,
    ) -> Result<(), MatchError> {
        if bowler.is_empty() {
            return Err(MatchError::InvalidArgument("bowler id must not be empty".into()));
        }
        let squad = self.squad(ledger.bowling_team());
        if !squad.is_empty() && !squad.contains(bowler) {
            return Err(MatchError::InvalidArgument(format!(
                "{bowler} is not in the {} squad",
                ledger.bowling_team()
            )));
        }
        if batters.into_iter().any(|batter| batter == bowler) {
            return Err(MatchError::InvalidArgument(format!(
                "{bowler} cannot bowl and bat at once"
            )));
        }
        Ok(())
    }
}

fn check_squad(team: &TeamId, players: &[PlayerId]) -> Result<(), MatchError> {
    if players.len() < 2 {
        return Err(MatchError::InvalidArgument(format!(
            "the {team} squad needs at least two players"
        )));
    }
    let mut seen = HashSet::new();
    for player in players {
        if player.is_empty() {
            return Err(MatchError::InvalidArgument(format!(
                "the {team} squad has a blank player id"
            )));
        }
        if !seen.insert(player) {
            return Err(MatchError::InvalidArgument(format!(
                "{player} is listed twice in the {team} squad"
            )));
        }
    }
    Ok(())
}

fn rules_for(
    squads: &BTreeMap<TeamId, Vec<PlayerId>>,
    batting: &TeamId,
    overs_limit: Option<u32>,
) -> InningsRules {
    match squads.get(batting) {
        Some(squad) if !squad.is_empty() => InningsRules::for_squad(squad.len(), overs_limit),
        _ => InningsRules::new(InningsRules::DEFAULT_MAX_WICKETS, overs_limit),
    }
}

#[cfg(test)]
mod tests {
    use scorebook_ledger::InningsEnd;
    use scorebook_types::{DismissalKind, MatchFormat, TossDecision, Wicket};

    use super::*;
    use crate::result::{evaluate, MatchCheck, WinMargin};
    use crate::setup::Team;

    fn p(name: &str) -> PlayerId {
        PlayerId::new(name)
    }

    fn squad(team: &str, size: usize) -> Vec<PlayerId> {
        (1..=size).map(|n| p(&format!("{team}-{n}"))).collect()
    }

    fn new_state(overs: Option<u32>) -> MatchScoringState {
        let setup = MatchSetup::new(
            Team::new(TeamId::new("mi"), "Mumbai"),
            Team::new(TeamId::new("csk"), "Chennai"),
            MatchFormat::Custom,
        )
        .with_overs_limit(overs);
        MatchScoringState::new(MatchId::new(), setup).unwrap()
    }

    /// Mumbai bat first with full squads and openers mi-1 / mi-2 facing csk-11.
    fn scoring_state(overs: Option<u32>) -> MatchScoringState {
        let mut state = new_state(overs);
        state
            .record_toss(TossResult::new(TeamId::new("mi"), TossDecision::Bat))
            .unwrap();
        state.set_squads(squad("mi", 11), squad("csk", 11)).unwrap();
        state
            .set_player_roles(p("mi-1"), p("mi-2"), p("csk-11"))
            .unwrap();
        state
    }

    fn start_chase(state: &mut MatchScoringState) {
        state.switch_innings().unwrap();
        state
            .set_player_roles(p("csk-1"), p("csk-2"), p("mi-11"))
            .unwrap();
    }

    fn bowl_out_striker(state: &mut MatchScoringState) {
        let striker = state.striker().cloned().unwrap();
        state
            .record_ball(Delivery::out(DismissalKind::Bowled, striker))
            .unwrap();
    }

    #[test]
    fn setup_phases_run_in_order() {
        let mut state = new_state(Some(20));
        assert_eq!(state.phase(), MatchPhase::AwaitingToss);
        assert!(state.skip_squads().unwrap_err().is_invalid_state());

        state
            .record_toss(TossResult::new(TeamId::new("csk"), TossDecision::Bowl))
            .unwrap();
        assert_eq!(state.phase(), MatchPhase::AwaitingSquads);
        assert!(state
            .record_toss(TossResult::new(TeamId::new("csk"), TossDecision::Bat))
            .is_err());

        state.skip_squads().unwrap();
        assert_eq!(state.phase(), MatchPhase::AwaitingRoles);
        assert_eq!(state.batting_team(), Some(&TeamId::new("mi")));
        assert_eq!(state.innings1().unwrap().rules().max_wickets, 10);
    }

    #[test]
    fn toss_winner_must_be_playing() {
        let mut state = new_state(None);
        let err = state
            .record_toss(TossResult::new(TeamId::new("rcb"), TossDecision::Bat))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(state.phase(), MatchPhase::AwaitingToss);
    }

    #[test]
    fn squads_must_be_disjoint_and_distinct() {
        let mut state = new_state(None);
        state
            .record_toss(TossResult::new(TeamId::new("mi"), TossDecision::Bat))
            .unwrap();

        let err = state
            .set_squads(vec![p("a"), p("a")], vec![p("b"), p("c")])
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = state
            .set_squads(vec![p("a"), p("b")], vec![p("b"), p("c")])
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(state.phase(), MatchPhase::AwaitingSquads);

        state
            .set_squads(squad("mi", 7), squad("csk", 11))
            .unwrap();
        assert_eq!(state.innings1().unwrap().rules().max_wickets, 6);
    }

    #[test]
    fn striker_equal_to_non_striker_is_rejected() {
        let mut state = scoring_state(Some(20));
        let err = state
            .set_player_roles(p("mi-3"), p("mi-3"), p("csk-10"))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(state.striker(), Some(&p("mi-1")));
    }

    #[test]
    fn roles_must_come_from_the_right_squads() {
        let mut state = scoring_state(Some(20));
        assert!(state
            .set_player_roles(p("csk-1"), p("mi-2"), p("csk-11"))
            .unwrap_err()
            .is_invalid_argument());
        assert!(state
            .set_player_roles(p("mi-1"), p("mi-2"), p("mi-3"))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn ball_before_roles_is_invalid_state() {
        let mut state = new_state(Some(20));
        state
            .record_toss(TossResult::new(TeamId::new("mi"), TossDecision::Bat))
            .unwrap();
        state.skip_squads().unwrap();

        let err = state.record_ball(Delivery::runs(1)).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(state.innings1().unwrap().balls().len(), 0);
    }

    #[test]
    fn strike_rotation_tracks_batsmen() {
        let mut state = scoring_state(Some(20));
        for runs in [1, 2, 1, 4, 0, 2] {
            state.record_ball(Delivery::runs(runs)).unwrap();
        }
        assert_eq!(state.striker(), Some(&p("mi-2")));
        assert_eq!(state.non_striker(), Some(&p("mi-1")));
        assert_eq!(state.current_innings().unwrap().completed_overs(), 1);
    }

    #[test]
    fn wicket_waits_for_new_batsman() {
        let mut state = scoring_state(Some(20));
        state.record_ball(Delivery::runs(1)).unwrap();
        bowl_out_striker(&mut state);

        assert_eq!(state.phase(), MatchPhase::AwaitingRoles);
        assert!(state.awaiting_batsman());
        assert_eq!(state.striker(), None);
        assert_eq!(state.non_striker(), Some(&p("mi-1")));

        let err = state.record_ball(Delivery::dot()).unwrap_err();
        assert_eq!(err, MatchError::InvalidState("awaiting new batsman".into()));

        assert!(state
            .bring_in_batsman(p("mi-2"))
            .unwrap_err()
            .is_invalid_argument());
        assert!(state
            .bring_in_batsman(p("mi-1"))
            .unwrap_err()
            .is_invalid_argument());

        state.bring_in_batsman(p("mi-3")).unwrap();
        assert_eq!(state.phase(), MatchPhase::Scoring);
        assert_eq!(state.striker(), Some(&p("mi-3")));
    }

    #[test]
    fn run_out_of_non_striker_vacates_their_end() {
        let mut state = scoring_state(Some(20));
        state
            .record_ball(Delivery::dot().with_wicket(
                Wicket::new(DismissalKind::RunOut, p("mi-2")).with_fielder(p("csk-4")),
            ))
            .unwrap();
        assert_eq!(state.striker(), Some(&p("mi-1")));
        assert_eq!(state.non_striker(), None);
    }

    #[test]
    fn dismissed_batsman_must_be_at_the_crease() {
        let mut state = scoring_state(Some(20));
        let before = state.clone();
        let err = state
            .record_ball(Delivery::out(DismissalKind::Bowled, p("mi-7")))
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(state, before);
    }

    #[test]
    fn switch_innings_sets_target_151() {
        let mut state = scoring_state(Some(20));
        for _ in 0..25 {
            state.record_ball(Delivery::runs(6)).unwrap();
        }
        assert_eq!(state.innings1().unwrap().total_runs(), 150);

        let target = state.switch_innings().unwrap();
        assert_eq!(target, 151);
        assert_eq!(state.target(), Some(151));
        assert_eq!(state.current_innings_number(), 2);
        assert_eq!(state.batting_team(), Some(&TeamId::new("csk")));
        assert_eq!(state.bowling_team(), Some(&TeamId::new("mi")));
        assert_eq!(state.striker(), None);
        assert_eq!(state.bowler(), None);
        assert_eq!(state.phase(), MatchPhase::AwaitingRoles);
        assert_eq!(state.innings2().unwrap().balls().len(), 0);
    }

    #[test]
    fn switch_innings_twice_is_rejected() {
        let mut state = scoring_state(Some(20));
        state.switch_innings().unwrap();
        let before = state.clone();
        assert!(state.switch_innings().unwrap_err().is_invalid_state());
        assert_eq!(state, before);
    }

    #[test]
    fn switch_innings_before_first_innings_is_rejected() {
        let mut state = new_state(Some(20));
        assert!(state.switch_innings().unwrap_err().is_invalid_state());
    }

    #[test]
    fn all_out_in_fourteenth_over() {
        let mut state = scoring_state(Some(20));
        let mut next = 3;
        for _ in 0..9 {
            bowl_out_striker(&mut state);
            state.bring_in_batsman(p(&format!("mi-{next}"))).unwrap();
            next += 1;
        }
        while state.innings1().unwrap().legal_balls() < 80 {
            state.record_ball(Delivery::runs(2)).unwrap();
        }
        bowl_out_striker(&mut state);

        let innings = state.innings1().unwrap();
        assert_eq!(innings.total_wickets(), 10);
        assert_eq!(innings.completed_overs(), 13);
        assert_eq!(innings.end_reason(), Some(InningsEnd::AllOut));
        assert_eq!(state.phase(), MatchPhase::InningsBreak);
        assert_eq!(
            evaluate(&state),
            MatchCheck::InningsOver {
                innings: 1,
                reason: InningsEnd::AllOut
            }
        );

        let runs = innings.total_runs();
        assert_eq!(state.switch_innings().unwrap(), runs + 1);
        assert_eq!(state.innings2().unwrap().rules().overs_limit, Some(20));
    }

    #[test]
    fn successful_chase_ends_match_immediately() {
        let mut state = scoring_state(Some(20));
        for _ in 0..25 {
            state.record_ball(Delivery::runs(6)).unwrap();
        }
        start_chase(&mut state);
        for _ in 0..24 {
            state.record_ball(Delivery::runs(6)).unwrap();
        }
        state.record_ball(Delivery::runs(4)).unwrap();
        state.record_ball(Delivery::runs(1)).unwrap();
        assert_eq!(state.innings2().unwrap().total_runs(), 149);
        assert_eq!(evaluate(&state), MatchCheck::InProgress);
        assert_eq!(state.runs_required(), Some(2));

        state.record_ball(Delivery::runs(4)).unwrap();
        assert_eq!(state.innings2().unwrap().total_runs(), 153);
        assert_eq!(
            evaluate(&state),
            MatchCheck::Finished(MatchResult::Won {
                winner: TeamId::new("csk"),
                margin: WinMargin::Wickets(10),
            })
        );

        let err = state.record_ball(Delivery::dot()).unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn defending_side_wins_when_overs_run_out() {
        let mut state = scoring_state(Some(1));
        for _ in 0..6 {
            state.record_ball(Delivery::runs(2)).unwrap();
        }
        assert_eq!(state.phase(), MatchPhase::InningsBreak);
        start_chase(&mut state);
        for _ in 0..6 {
            state.record_ball(Delivery::runs(1)).unwrap();
        }

        assert_eq!(
            evaluate(&state),
            MatchCheck::Finished(MatchResult::Won {
                winner: TeamId::new("mi"),
                margin: WinMargin::Runs(6),
            })
        );
        assert_eq!(state.required_run_rate(), None);
    }

    #[test]
    fn level_scores_are_a_tie() {
        let mut state = scoring_state(Some(1));
        for _ in 0..6 {
            state.record_ball(Delivery::runs(2)).unwrap();
        }
        start_chase(&mut state);
        for _ in 0..5 {
            state.record_ball(Delivery::runs(2)).unwrap();
        }
        state
            .record_ball(Delivery::runs(2).with_commentary("scores level"))
            .unwrap();
        assert_eq!(state.target(), Some(13));
        assert_eq!(state.innings2().unwrap().total_runs(), 12);
        assert_eq!(evaluate(&state), MatchCheck::Finished(MatchResult::Tied));
    }

    #[test]
    fn declaration_moves_to_innings_break() {
        let mut state = scoring_state(None);
        state.record_ball(Delivery::runs(4)).unwrap();
        state.declare().unwrap();
        assert_eq!(state.phase(), MatchPhase::InningsBreak);
        assert_eq!(
            evaluate(&state),
            MatchCheck::InningsOver {
                innings: 1,
                reason: InningsEnd::Declared
            }
        );
        assert!(state.record_ball(Delivery::dot()).is_err());
    }

    #[test]
    fn conclude_is_final() {
        let mut state = scoring_state(Some(20));
        state.conclude(MatchResult::Tied).unwrap();
        assert_eq!(state.phase(), MatchPhase::Complete);
        assert!(state.conclude(MatchResult::Tied).unwrap_err().is_invalid_state());
        assert!(state.switch_innings().unwrap_err().is_invalid_state());
        assert_eq!(evaluate(&state), MatchCheck::Finished(MatchResult::Tied));
    }

    #[test]
    fn change_bowler_rejects_batting_players() {
        let mut state = scoring_state(Some(20));
        assert!(state
            .change_bowler(p("mi-1"))
            .unwrap_err()
            .is_invalid_argument());
        state.change_bowler(p("csk-9")).unwrap();
        assert_eq!(state.bowler(), Some(&p("csk-9")));
    }

    #[test]
    fn required_run_rate_during_chase() {
        let mut state = scoring_state(Some(2));
        for _ in 0..12 {
            state.record_ball(Delivery::runs(1)).unwrap();
        }
        start_chase(&mut state);
        for _ in 0..6 {
            state.record_ball(Delivery::dot()).unwrap();
        }
        assert_eq!(state.runs_required(), Some(13));
        assert_eq!(state.required_run_rate(), Some(13.0));
    }
}
