use rand::Rng;
use tracing::{info, warn};

use scorebook_ledger::{BallOutcome, Scorecard, ScorecardBuilder};
use scorebook_match::{
    evaluate, Delivery, MatchCheck, MatchError, MatchPhase, MatchScoringState, MatchSetup,
    MatchSnapshot,
};
use scorebook_store::SnapshotStore;
use scorebook_types::{CoinFace, MatchId, PlayerId, TeamId, TossDecision, TossResult};

use crate::error::{SdkError, SdkResult};
use crate::summary::{BallReport, InningsVerification, MatchSummary};

/// High-level scoring API over one match and a snapshot store.
///
/// After every ball (and every declaration or forfeit) the match-end check
/// runs: a finished first innings opens the chase, a decided match is
/// concluded. Nothing is written to the store until [`Scorer::save`].
pub struct Scorer<'s, S: SnapshotStore + ?Sized> {
    store: &'s S,
    state: MatchScoringState,
}

impl<'s, S: SnapshotStore + ?Sized> Scorer<'s, S> {
    /// Start a new match and store its first snapshot.
    pub fn create(store: &'s S, setup: MatchSetup) -> SdkResult<Self> {
        let state = MatchScoringState::new(MatchId::new(), setup)?;
        info!(
            match_id = %state.match_id(),
            home = %state.setup().home.name,
            away = %state.setup().away.name,
            "match created"
        );
        let scorer = Self { store, state };
        scorer.save()?;
        Ok(scorer)
    }

    /// Resume a stored match.
    pub fn open(store: &'s S, id: &MatchId) -> SdkResult<Self> {
        let snapshot = store
            .load(id)?
            .ok_or_else(|| SdkError::MatchNotFound(id.clone()))?;
        let state = snapshot.restore()?;
        Ok(Self { store, state })
    }

    /// Summaries of every stored match, oldest first.
    pub fn list(store: &S) -> SdkResult<Vec<MatchSummary>> {
        let mut summaries = Vec::new();
        for id in store.list()? {
            if let Some(snapshot) = store.load(&id)? {
                summaries.push(MatchSummary::from_state(&snapshot.state));
            }
        }
        Ok(summaries)
    }

    pub fn delete(store: &S, id: &MatchId) -> SdkResult<bool> {
        Ok(store.delete(id)?)
    }

    /// Persist the current state. A failed save leaves the session as it was.
    pub fn save(&self) -> SdkResult<()> {
        let snapshot = MatchSnapshot::capture(&self.state);
        self.store.save(&snapshot).map_err(|e| {
            warn!(match_id = %self.state.match_id(), error = %e, "snapshot save failed");
            SdkError::from(e)
        })
    }

    // ---- Setup ----

    pub fn record_toss(&mut self, winner: TeamId, decision: TossDecision) -> SdkResult<()> {
        let result = self.state.record_toss(TossResult::new(winner, decision));
        guard(self.state.match_id(), "record toss", result)
    }

    /// Flip a coin for `caller`, who called `call`. The winner of the toss
    /// takes `decision`.
    pub fn call_toss(
        &mut self,
        caller: TeamId,
        call: CoinFace,
        decision: TossDecision,
    ) -> SdkResult<(CoinFace, TossResult)> {
        self.settle_toss(caller, call, CoinFace::flip(), decision)
    }

    pub fn call_toss_with<R: Rng + ?Sized>(
        &mut self,
        caller: TeamId,
        call: CoinFace,
        decision: TossDecision,
        rng: &mut R,
    ) -> SdkResult<(CoinFace, TossResult)> {
        self.settle_toss(caller, call, CoinFace::flip_with(rng), decision)
    }

    fn settle_toss(
        &mut self,
        caller: TeamId,
        call: CoinFace,
        face: CoinFace,
        decision: TossDecision,
    ) -> SdkResult<(CoinFace, TossResult)> {
        let winner = if face == call {
            caller
        } else {
            match self.state.setup().opponent(&caller) {
                Some(team) => team.id.clone(),
                None => {
                    let err = MatchError::InvalidArgument(format!(
                        "{caller} is not playing in this match"
                    ));
                    return guard(self.state.match_id(), "call toss", Err(err));
                }
            }
        };
        let toss = TossResult::new(winner, decision);
        let result = self.state.record_toss(toss.clone());
        guard(self.state.match_id(), "call toss", result)?;
        Ok((face, toss))
    }

    pub fn set_squads(&mut self, home: Vec<PlayerId>, away: Vec<PlayerId>) -> SdkResult<()> {
        let result = self.state.set_squads(home, away);
        guard(self.state.match_id(), "set squads", result)
    }

    pub fn skip_squads(&mut self) -> SdkResult<()> {
        let result = self.state.skip_squads();
        guard(self.state.match_id(), "skip squads", result)
    }

    // ---- Roles ----

    pub fn set_roles(
        &mut self,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> SdkResult<()> {
        let result = self.state.set_player_roles(striker, non_striker, bowler);
        guard(self.state.match_id(), "set roles", result)
    }

    pub fn bring_in_batsman(&mut self, player: PlayerId) -> SdkResult<()> {
        let result = self.state.bring_in_batsman(player);
        guard(self.state.match_id(), "bring in batsman", result)
    }

    pub fn change_bowler(&mut self, bowler: PlayerId) -> SdkResult<()> {
        let result = self.state.change_bowler(bowler);
        guard(self.state.match_id(), "change bowler", result)
    }

    // ---- Scoring ----

    pub fn record_ball(&mut self, delivery: Delivery) -> SdkResult<BallReport> {
        let result = self.state.record_ball(delivery);
        let outcome: BallOutcome = guard(self.state.match_id(), "record ball", result)?;
        let (check, target) = self.settle()?;
        Ok(BallReport {
            outcome,
            check,
            target,
        })
    }

    pub fn declare(&mut self) -> SdkResult<MatchCheck> {
        let result = self.state.declare();
        guard(self.state.match_id(), "declare", result)?;
        Ok(self.settle()?.0)
    }

    pub fn forfeit(&mut self) -> SdkResult<MatchCheck> {
        let result = self.state.forfeit();
        guard(self.state.match_id(), "forfeit", result)?;
        Ok(self.settle()?.0)
    }

    /// End the first innings early and open the chase. Returns the target.
    pub fn switch_innings(&mut self) -> SdkResult<u32> {
        let result = self.state.switch_innings();
        guard(self.state.match_id(), "switch innings", result)
    }

    /// Apply the end-of-ball policy.
    fn settle(&mut self) -> SdkResult<(MatchCheck, Option<u32>)> {
        let check = evaluate(&self.state);
        let target = match &check {
            MatchCheck::InningsOver { innings: 1, .. } => Some(self.state.switch_innings()?),
            MatchCheck::Finished(result) if self.state.phase() != MatchPhase::Complete => {
                self.state.conclude(result.clone())?;
                None
            }
            _ => None,
        };
        Ok((check, target))
    }

    // ---- Queries ----

    pub fn match_id(&self) -> &MatchId {
        self.state.match_id()
    }

    pub fn state(&self) -> &MatchScoringState {
        &self.state
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary::from_state(&self.state)
    }

    pub fn scorecards(&self) -> Vec<Scorecard> {
        [self.state.innings1(), self.state.innings2()]
            .into_iter()
            .flatten()
            .map(ScorecardBuilder::build)
            .collect()
    }

    /// Validate both innings timelines and replay them against the stored
    /// totals.
    pub fn verify(&self) -> Vec<InningsVerification> {
        [self.state.innings1(), self.state.innings2()]
            .into_iter()
            .zip(1u8..)
            .filter_map(|(ledger, number)| ledger.map(|l| InningsVerification::check(number, l)))
            .collect()
    }
}

fn guard<T>(match_id: &MatchId, op: &str, result: Result<T, MatchError>) -> SdkResult<T> {
    result.map_err(|e| {
        warn!(%match_id, op, error = %e, "operation rejected");
        SdkError::from(e)
    })
}
