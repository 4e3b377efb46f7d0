//! Snapshot storage for Scorebook.
//!
//! A match session is persisted as a [`MatchSnapshot`](scorebook_match::MatchSnapshot),
//! one per match, keyed by [`MatchId`](scorebook_types::MatchId). Saving is
//! always caller-triggered; nothing here reaches back into a live session.
//!
//! # Storage Backends
//!
//! All backends implement the [`SnapshotStore`] trait:
//!
//! - [`InMemorySnapshotStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileSnapshotStore`] -- one checksummed JSON file per match
//!
//! # Design Rules
//!
//! 1. A save replaces the whole snapshot; there are no partial updates.
//! 2. A failed save never leaves a half-written file behind.
//! 3. A snapshot whose checksum does not match is reported, never returned.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotStore;
