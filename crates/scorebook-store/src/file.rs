use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use scorebook_match::MatchSnapshot;
use scorebook_types::MatchId;

use crate::error::{StoreError, StoreResult};
use crate::traits::SnapshotStore;

const EXTENSION: &str = "snapshot";

/// Directory-backed snapshot store.
///
/// Each match lives in `<dir>/<match-id>.snapshot`: a first line holding the
/// hex BLAKE3 checksum of the body, followed by the snapshot as pretty JSON.
/// Writes go to a temporary file in the same directory which is then renamed
/// over the old snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &MatchId) -> PathBuf {
        self.dir.join(format!("{id}.{EXTENSION}"))
    }
}

/// Checksum header plus body, as written to disk.
fn encode(snapshot: &MatchSnapshot) -> StoreResult<Vec<u8>> {
    let body = snapshot.to_json()?;
    let checksum = hex::encode(blake3::hash(&body).as_bytes());
    let mut out = Vec::with_capacity(checksum.len() + 1 + body.len());
    out.extend_from_slice(checksum.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(&body);
    Ok(out)
}

fn decode(id: &MatchId, data: &[u8]) -> StoreResult<MatchSnapshot> {
    let split = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| StoreError::Corrupt {
            id: id.clone(),
            reason: "missing checksum header".into(),
        })?;
    let (header, body) = (&data[..split], &data[split + 1..]);

    let expected = std::str::from_utf8(header)
        .map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: format!("checksum header is not UTF-8: {e}"),
        })?
        .trim()
        .to_string();
    let computed = hex::encode(blake3::hash(body).as_bytes());
    if expected != computed {
        return Err(StoreError::HashMismatch {
            id: id.clone(),
            expected,
            computed,
        });
    }

    let snapshot = MatchSnapshot::from_json(body)?;
    if snapshot.match_id != *id {
        return Err(StoreError::IdMismatch {
            stored: id.clone(),
            found: snapshot.match_id,
        });
    }
    Ok(snapshot)
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self, id: &MatchId) -> StoreResult<Option<MatchSnapshot>> {
        let path = self.path_for(id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), bytes = data.len(), "loading snapshot");
        decode(id, &data).map(Some)
    }

    fn save(&self, snapshot: &MatchSnapshot) -> StoreResult<()> {
        let data = encode(snapshot)?;
        let path = self.path_for(&snapshot.match_id);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %path.display(), bytes = data.len(), "snapshot saved");
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<MatchId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.parse::<MatchId>() {
                Ok(id) => ids.push(id),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unrecognised snapshot file"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: &MatchId) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, id: &MatchId) -> StoreResult<bool> {
        Ok(self.path_for(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use scorebook_match::{Delivery, MatchScoringState, MatchSetup, Team};
    use scorebook_types::{MatchFormat, PlayerId, TeamId, TossDecision, TossResult};
    use tempfile::TempDir;

    use super::*;

    fn snapshot() -> MatchSnapshot {
        let setup = MatchSetup::new(
            Team::new(TeamId::new("srh"), "Hyderabad"),
            Team::new(TeamId::new("dc"), "Delhi"),
            MatchFormat::OneDay,
        );
        let mut state = MatchScoringState::new(MatchId::new(), setup).unwrap();
        state
            .record_toss(TossResult::new(TeamId::new("srh"), TossDecision::Bat))
            .unwrap();
        state.skip_squads().unwrap();
        state
            .set_player_roles(PlayerId::new("head"), PlayerId::new("abhishek"), PlayerId::new("kuldeep"))
            .unwrap();
        state.record_ball(Delivery::runs(6)).unwrap();
        state.record_ball(Delivery::no_ball(1)).unwrap();
        MatchSnapshot::capture(&state)
    }

    fn open_store() -> (TempDir, FileSnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::open(dir.path().join("matches")).unwrap();
        (dir, store)
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_dir, store) = open_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();

        assert!(store.path_for(&snapshot.match_id).is_file());
        let loaded = store.load(&snapshot.match_id).unwrap().expect("should exist");
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.state.current_innings().unwrap().total_runs(), 7);
    }

    #[test]
    fn load_missing_returns_none() {
        let (_dir, store) = open_store();
        assert!(store.load(&MatchId::new()).unwrap().is_none());
        assert!(!store.exists(&MatchId::new()).unwrap());
    }

    #[test]
    fn tampered_body_fails_checksum() {
        let (_dir, store) = open_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();

        let path = store.path_for(&snapshot.match_id);
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replacen("\"runs_off_bat\": 6", "\"runs_off_bat\": 4", 1)).unwrap();

        let err = store.load(&snapshot.match_id).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
    }

    #[test]
    fn missing_header_is_corrupt() {
        let (_dir, store) = open_store();
        let id = MatchId::new();
        fs::write(store.path_for(&id), b"no newline here").unwrap();
        assert!(matches!(
            store.load(&id).unwrap_err(),
            StoreError::Corrupt { .. }
        ));
    }

    #[test]
    fn snapshot_under_wrong_name_is_rejected() {
        let (_dir, store) = open_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();

        let other = MatchId::new();
        fs::copy(store.path_for(&snapshot.match_id), store.path_for(&other)).unwrap();
        assert!(matches!(
            store.load(&other).unwrap_err(),
            StoreError::IdMismatch { .. }
        ));
    }

    #[test]
    fn list_skips_foreign_files() {
        let (_dir, store) = open_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();
        fs::write(store.dir().join("notes.txt"), b"ignore me").unwrap();
        fs::write(store.dir().join("garbage.snapshot"), b"x").unwrap();

        assert_eq!(store.list().unwrap(), vec![snapshot.match_id.clone()]);
    }

    #[test]
    fn delete_removes_file() {
        let (_dir, store) = open_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();

        assert!(store.delete(&snapshot.match_id).unwrap());
        assert!(!store.delete(&snapshot.match_id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn save_overwrites_in_place() {
        let (_dir, store) = open_store();
        let mut snapshot = snapshot();
        store.save(&snapshot).unwrap();

        let mut state = snapshot.state.clone();
        state.record_ball(Delivery::runs(2)).unwrap();
        snapshot = MatchSnapshot::capture(&state);
        store.save(&snapshot).unwrap();

        let loaded = store.load(&snapshot.match_id).unwrap().unwrap();
        assert_eq!(loaded.state.current_innings().unwrap().total_runs(), 9);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
