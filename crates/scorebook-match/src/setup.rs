use serde::{Deserialize, Serialize};

use scorebook_types::{MatchFormat, TeamId};

use crate::error::MatchError;

/// A side in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Fixed parameters of a match, chosen before the toss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub home: Team,
    pub away: Team,
    pub format: MatchFormat,
    /// `None` for an unlimited-overs innings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overs_limit: Option<u32>,
}

impl MatchSetup {
    /// Setup with the overs limit implied by `format`.
    pub fn new(home: Team, away: Team, format: MatchFormat) -> Self {
        Self {
            home,
            away,
            format,
            overs_limit: format.default_overs(),
        }
    }

    pub fn with_overs_limit(mut self, overs_limit: Option<u32>) -> Self {
        self.overs_limit = overs_limit;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.home.id.is_empty() || self.away.id.is_empty() {
            return Err(MatchError::InvalidArgument("team id must not be empty".into()));
        }
        if self.home.id == self.away.id {
            return Err(MatchError::InvalidArgument(format!(
                "a team cannot play itself ({})",
                self.home.id
            )));
        }
        if self.overs_limit == Some(0) {
            return Err(MatchError::InvalidArgument(
                "overs limit must be at least one over".into(),
            ));
        }
        Ok(())
    }

    /// The team opposing `team`, if `team` is in this match.
    pub fn opponent(&self, team: &TeamId) -> Option<&Team> {
        if *team == self.home.id {
            Some(&self.away)
        } else if *team == self.away.id {
            Some(&self.home)
        } else {
            None
        }
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        [&self.home, &self.away].into_iter().find(|t| t.id == *id)
    }

    /// Display name for a team id, falling back to the id itself.
    pub fn team_name<'a>(&'a self, id: &'a TeamId) -> &'a str {
        self.team(id).map_or(id.as_str(), |t| t.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> MatchSetup {
        MatchSetup::new(
            Team::new(TeamId::new("mi"), "Mumbai"),
            Team::new(TeamId::new("csk"), "Chennai"),
            MatchFormat::T20,
        )
    }

    #[test]
    fn overs_limit_defaults_from_format() {
        assert_eq!(setup().overs_limit, Some(20));
        assert_eq!(setup().with_overs_limit(None).overs_limit, None);
    }

    #[test]
    fn validate_rejects_same_team_and_zero_overs() {
        let mut same = setup();
        same.away.id = TeamId::new("mi");
        assert!(same.validate().unwrap_err().is_invalid_argument());

        let zero = setup().with_overs_limit(Some(0));
        assert!(zero.validate().is_err());
        assert!(setup().validate().is_ok());
    }

    #[test]
    fn opponent_and_names() {
        let setup = setup();
        assert_eq!(setup.opponent(&TeamId::new("mi")).unwrap().name, "Chennai");
        assert!(setup.opponent(&TeamId::new("rcb")).is_none());
        assert_eq!(setup.team_name(&TeamId::new("csk")), "Chennai");
        let unknown = TeamId::new("rcb");
        assert_eq!(setup.team_name(&unknown), "rcb");
    }
}
