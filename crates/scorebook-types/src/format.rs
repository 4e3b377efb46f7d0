use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Playing format of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchFormat {
    T10,
    T20,
    OneDay,
    /// Overs limit chosen by the organiser, or none at all.
    Custom,
}

impl MatchFormat {
    /// Overs per innings implied by the format.
    pub fn default_overs(self) -> Option<u32> {
        match self {
            Self::T10 => Some(10),
            Self::T20 => Some(20),
            Self::OneDay => Some(50),
            Self::Custom => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::T10 => "t10",
            Self::T20 => "t20",
            Self::OneDay => "one-day",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t10" => Ok(Self::T10),
            "t20" => Ok(Self::T20),
            "odi" | "one-day" | "oneday" | "50-over" => Ok(Self::OneDay),
            "custom" => Ok(Self::Custom),
            other => Err(TypeError::UnknownFormat(other.to_string())),
        }
    }
}
