use scorebook_match::MatchSnapshot;
use scorebook_types::MatchId;

use crate::error::StoreResult;

/// Load/save boundary for match snapshots.
///
/// Implementations must satisfy these invariants:
/// - `save` replaces any earlier snapshot for the same match in full.
/// - A failed `save` leaves the previously stored snapshot readable.
/// - `load` performs shape checks only; it does not replay the innings.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for `id`.
    ///
    /// Returns `Ok(None)` if no snapshot is stored.
    /// Returns `Err` on I/O failure or data corruption.
    fn load(&self, id: &MatchId) -> StoreResult<Option<MatchSnapshot>>;

    /// Store `snapshot` under its own match id.
    fn save(&self, snapshot: &MatchSnapshot) -> StoreResult<()>;

    /// Ids of all stored matches, oldest first.
    fn list(&self) -> StoreResult<Vec<MatchId>>;

    /// Delete the snapshot for `id`. Returns `true` if one existed.
    fn delete(&self, id: &MatchId) -> StoreResult<bool>;

    fn exists(&self, id: &MatchId) -> StoreResult<bool> {
        Ok(self.load(id)?.is_some())
    }
}
