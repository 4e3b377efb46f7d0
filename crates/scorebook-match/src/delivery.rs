use serde::{Deserialize, Serialize};

use scorebook_types::{BallEvent, DismissalKind, Extra, ExtraKind, PlayerId, Wicket};

/// What happened on one ball, as entered by the scorer.
///
/// The striker and bowler are filled in from the current role holders when
/// the delivery is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub runs_off_bat: u8,
    pub extra: Option<Extra>,
    pub wicket: Option<Wicket>,
    pub commentary: Option<String>,
}

impl Delivery {
    pub fn dot() -> Self {
        Self::default()
    }

    pub fn runs(runs: u8) -> Self {
        Self {
            runs_off_bat: runs,
            ..Self::default()
        }
    }

    pub fn extra(kind: ExtraKind, runs: u32) -> Self {
        Self {
            extra: Some(Extra::new(kind, runs)),
            ..Self::default()
        }
    }

    pub fn wide(runs: u32) -> Self {
        Self::extra(ExtraKind::Wide, runs)
    }

    pub fn no_ball(runs: u32) -> Self {
        Self::extra(ExtraKind::NoBall, runs)
    }

    pub fn out(kind: DismissalKind, batsman: PlayerId) -> Self {
        Self::dot().with_wicket(Wicket::new(kind, batsman))
    }

    pub fn with_wicket(mut self, wicket: Wicket) -> Self {
        self.wicket = Some(wicket);
        self
    }

    pub fn with_commentary(mut self, text: impl Into<String>) -> Self {
        self.commentary = Some(text.into());
        self
    }

    pub(crate) fn into_event(self, striker: PlayerId, bowler: PlayerId) -> BallEvent {
        BallEvent {
            striker,
            bowler,
            runs_off_bat: self.runs_off_bat,
            extra: self.extra,
            wicket: self.wicket,
            commentary: self.commentary,
        }
    }
}
