//! Live match scoring for Scorebook.
//!
//! [`MatchScoringState`] wraps up to two innings ledgers, the three active
//! role holders (striker, non-striker, bowler), the chase target and an
//! explicit [`MatchPhase`]. [`evaluate`] is the pure match-end check a
//! consuming layer runs after every ball, and [`MatchSnapshot`] is the plain
//! structure handed to storage.

pub mod delivery;
pub mod error;
pub mod phase;
pub mod result;
pub mod session;
pub mod setup;
pub mod snapshot;

pub use delivery::Delivery;
pub use error::MatchError;
pub use phase::MatchPhase;
pub use result::{evaluate, MatchCheck, MatchResult, WinMargin};
pub use session::MatchScoringState;
pub use setup::{MatchSetup, Team};
pub use snapshot::{MatchSnapshot, SNAPSHOT_VERSION};
