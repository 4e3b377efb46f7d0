use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Unique identifier for a match (UUID v7 for time-ordering).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(uuid::Uuid);

impl MatchId {
    /// Generate a new time-ordered match ID (UUID v7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for MatchId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| TypeError::InvalidMatchId(e.to_string()))
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.short_id())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a team, as supplied by the caller (e.g. a document key).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a non-blank identifier, trimming surrounding whitespace.
    pub fn parse(id: &str) -> Result<Self, TypeError> {
        non_blank(id).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identity of a player.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a non-blank identifier, trimming surrounding whitespace.
    pub fn parse(id: &str) -> Result<Self, TypeError> {
        non_blank(id).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn non_blank(id: &str) -> Result<String, TypeError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(TypeError::EmptyIdentifier);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_ids_are_unique_and_time_ordered() {
        let first = MatchId::new();
        let second = MatchId::new();
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn match_id_parses_its_display_form() {
        let id = MatchId::new();
        let parsed: MatchId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short_id().len(), 8);
    }

    #[test]
    fn match_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<MatchId>().unwrap_err();
        assert!(matches!(err, TypeError::InvalidMatchId(_)));
    }

    #[test]
    fn player_id_parse_trims_and_rejects_blank() {
        assert_eq!(PlayerId::parse("  kohli ").unwrap().as_str(), "kohli");
        assert_eq!(PlayerId::parse("   ").unwrap_err(), TypeError::EmptyIdentifier);
        assert!(PlayerId::new("").is_empty());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&TeamId::new("lions")).unwrap();
        assert_eq!(json, "\"lions\"");
        let player: PlayerId = serde_json::from_str("\"root\"").unwrap();
        assert_eq!(player, PlayerId::new("root"));
    }
}
