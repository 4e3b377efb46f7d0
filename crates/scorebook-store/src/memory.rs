use std::collections::HashMap;
use std::sync::RwLock;

use scorebook_match::MatchSnapshot;
use scorebook_types::MatchId;

use crate::error::StoreResult;
use crate::traits::SnapshotStore;

/// In-memory, HashMap-based snapshot store.
///
/// Intended for tests and embedding. Snapshots are cloned on read and write.
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<MatchId, MatchSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of matches currently stored.
    pub fn len(&self) -> usize {
        self.snapshots.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().expect("lock poisoned").is_empty()
    }

    pub fn clear(&self) {
        self.snapshots.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self, id: &MatchId) -> StoreResult<Option<MatchSnapshot>> {
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn save(&self, snapshot: &MatchSnapshot) -> StoreResult<()> {
        let mut map = self.snapshots.write().expect("lock poisoned");
        map.insert(snapshot.match_id.clone(), snapshot.clone());
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<MatchId>> {
        let map = self.snapshots.read().expect("lock poisoned");
        let mut ids: Vec<MatchId> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: &MatchId) -> StoreResult<bool> {
        let mut map = self.snapshots.write().expect("lock poisoned");
        Ok(map.remove(id).is_some())
    }

    fn exists(&self, id: &MatchId) -> StoreResult<bool> {
        let map = self.snapshots.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemorySnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySnapshotStore")
            .field("match_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use scorebook_match::{Delivery, MatchScoringState, MatchSetup, Team};
    use scorebook_types::{MatchFormat, PlayerId, TeamId, TossDecision, TossResult};

    use super::*;

    fn snapshot_with_runs(runs: u8) -> MatchSnapshot {
        let setup = MatchSetup::new(
            Team::new(TeamId::new("rr"), "Rajasthan"),
            Team::new(TeamId::new("kkr"), "Kolkata"),
            MatchFormat::T20,
        );
        let mut state = MatchScoringState::new(MatchId::new(), setup).unwrap();
        state
            .record_toss(TossResult::new(TeamId::new("kkr"), TossDecision::Bowl))
            .unwrap();
        state.skip_squads().unwrap();
        state
            .set_player_roles(PlayerId::new("jaiswal"), PlayerId::new("buttler"), PlayerId::new("narine"))
            .unwrap();
        state.record_ball(Delivery::runs(runs)).unwrap();
        MatchSnapshot::capture(&state)
    }

    #[test]
    fn save_and_load() {
        let store = InMemorySnapshotStore::new();
        let snapshot = snapshot_with_runs(4);
        store.save(&snapshot).unwrap();

        let loaded = store.load(&snapshot.match_id).unwrap().expect("should exist");
        assert_eq!(loaded, snapshot);
        assert!(store.exists(&snapshot.match_id).unwrap());
    }

    #[test]
    fn load_missing_returns_none() {
        let store = InMemorySnapshotStore::new();
        assert!(store.load(&MatchId::new()).unwrap().is_none());
    }

    #[test]
    fn save_replaces_earlier_snapshot() {
        let store = InMemorySnapshotStore::new();
        let first = snapshot_with_runs(1);
        let mut second = snapshot_with_runs(6);
        second.match_id = first.match_id.clone();
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.len(), 1);
        let loaded = store.load(&first.match_id).unwrap().unwrap();
        assert_eq!(loaded.state.current_innings().unwrap().total_runs(), 6);
    }

    #[test]
    fn list_is_sorted_and_delete_removes() {
        let store = InMemorySnapshotStore::new();
        let a = snapshot_with_runs(0);
        let b = snapshot_with_runs(2);
        store.save(&b).unwrap();
        store.save(&a).unwrap();

        let mut expected = vec![a.match_id.clone(), b.match_id.clone()];
        expected.sort();
        assert_eq!(store.list().unwrap(), expected);
        assert!(store.delete(&a.match_id).unwrap());
        assert!(!store.delete(&a.match_id).unwrap());
        assert_eq!(store.list().unwrap(), vec![b.match_id]);
    }
}
