//! Foundation types for Scorebook.
//!
//! This crate provides the identity, ball-event and match-setup types shared
//! by every other Scorebook crate.
//!
//! # Key Types
//!
//! - [`MatchId`]: UUID v7 match identifier
//! - [`TeamId`] / [`PlayerId`]: caller-supplied string identities
//! - [`BallEvent`]: one ball bowled, with optional [`Extra`] and [`Wicket`]
//! - [`MatchFormat`]: limited-overs format with its default overs limit
//! - [`TossResult`]: toss winner and their decision

pub mod ball;
pub mod error;
pub mod format;
pub mod identity;
pub mod toss;

pub use ball::{BallEvent, DismissalKind, Extra, ExtraKind, Wicket};
pub use error::TypeError;
pub use format::MatchFormat;
pub use identity::{MatchId, PlayerId, TeamId};
pub use toss::{CoinFace, TossDecision, TossResult};
