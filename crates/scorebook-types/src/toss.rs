use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::TeamId;

/// What the toss winner chose to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

impl fmt::Display for TossDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bat => f.write_str("bat"),
            Self::Bowl => f.write_str("bowl"),
        }
    }
}

impl FromStr for TossDecision {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bat" | "batting" => Ok(Self::Bat),
            "bowl" | "bowling" | "field" | "fielding" => Ok(Self::Bowl),
            other => Err(TypeError::UnknownTossDecision(other.to_string())),
        }
    }
}

/// Outcome of the toss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossResult {
    pub winner: TeamId,
    pub decision: TossDecision,
}

impl TossResult {
    pub fn new(winner: TeamId, decision: TossDecision) -> Self {
        Self { winner, decision }
    }

    /// The team batting first, given the toss loser.
    pub fn batting_first(&self, loser: &TeamId) -> TeamId {
        match self.decision {
            TossDecision::Bat => self.winner.clone(),
            TossDecision::Bowl => loser.clone(),
        }
    }
}

/// Face of the coin used for the toss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl CoinFace {
    /// Flip a coin with the thread-local RNG.
    pub fn flip() -> Self {
        Self::flip_with(&mut rand::thread_rng())
    }

    pub fn flip_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Heads
        } else {
            Self::Tails
        }
    }
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heads => f.write_str("heads"),
            Self::Tails => f.write_str("tails"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn batting_first_follows_decision() {
        let home = TeamId::new("home");
        let away = TeamId::new("away");

        let bat = TossResult::new(home.clone(), TossDecision::Bat);
        assert_eq!(bat.batting_first(&away), home);

        let bowl = TossResult::new(home, TossDecision::Bowl);
        assert_eq!(bowl.batting_first(&away), away);
    }

    #[test]
    fn seeded_flips_are_reproducible() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let left: Vec<_> = (0..16).map(|_| CoinFace::flip_with(&mut a)).collect();
        let right: Vec<_> = (0..16).map(|_| CoinFace::flip_with(&mut b)).collect();
        assert_eq!(left, right);
        assert!(left.contains(&CoinFace::Heads) || left.contains(&CoinFace::Tails));
    }

    #[test]
    fn decision_parses_fielding_as_bowl() {
        assert_eq!("field".parse::<TossDecision>().unwrap(), TossDecision::Bowl);
        assert!("pass".parse::<TossDecision>().is_err());
    }
}
