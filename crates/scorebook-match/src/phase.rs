use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a match is in its lifecycle.
///
/// ```text
/// AwaitingToss -> AwaitingSquads -> AwaitingRoles <-> Scoring
/// Scoring / AwaitingRoles -> InningsBreak -> AwaitingRoles
/// AwaitingRoles / Scoring / InningsBreak -> Complete
/// ```
///
/// `Scoring -> AwaitingRoles` happens after a wicket (a batting slot is
/// vacant) and on an innings switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPhase {
    AwaitingToss,
    AwaitingSquads,
    AwaitingRoles,
    Scoring,
    InningsBreak,
    Complete,
}

impl MatchPhase {
    pub fn can_transition_to(self, next: Self) -> bool {
        use MatchPhase::*;

        (self == next && next != Complete)
            || matches!(
                (self, next),
                (AwaitingToss, AwaitingSquads)
                    | (AwaitingSquads, AwaitingRoles)
                    | (AwaitingRoles, Scoring)
                    | (Scoring, AwaitingRoles)
                    | (Scoring, InningsBreak)
                    | (AwaitingRoles, InningsBreak)
                    | (InningsBreak, AwaitingRoles)
                    | (AwaitingRoles | Scoring | InningsBreak, Complete)
            )
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingToss => "awaiting toss",
            Self::AwaitingSquads => "awaiting squads",
            Self::AwaitingRoles => "awaiting roles",
            Self::Scoring => "scoring",
            Self::InningsBreak => "innings break",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::MatchPhase::*;

    #[test]
    fn setup_runs_forward_only() {
        assert!(AwaitingToss.can_transition_to(AwaitingSquads));
        assert!(AwaitingSquads.can_transition_to(AwaitingRoles));
        assert!(!AwaitingSquads.can_transition_to(AwaitingToss));
        assert!(!AwaitingToss.can_transition_to(Scoring));
    }

    #[test]
    fn scoring_loops_through_roles_and_breaks() {
        assert!(Scoring.can_transition_to(AwaitingRoles));
        assert!(AwaitingRoles.can_transition_to(Scoring));
        assert!(Scoring.can_transition_to(InningsBreak));
        assert!(InningsBreak.can_transition_to(AwaitingRoles));
        assert!(!InningsBreak.can_transition_to(Scoring));
    }

    #[test]
    fn complete_is_terminal() {
        assert!(Scoring.can_transition_to(Complete));
        assert!(!Complete.can_transition_to(Complete));
        assert!(!Complete.can_transition_to(Scoring));
        assert!(Complete.is_terminal());
        assert!(!AwaitingToss.can_transition_to(Complete));
    }
}
