//! File-backed store

use std::fs;
use std::path::{Path, PathBuf};

use ps_engine::SessionSnapshot;

use crate::error::StoreError;
use crate::history::HistoryRecord;

/// Number of most recent history records retained on disk
pub const HISTORY_KEEP: u64 = 500;

const SESSION_FILE: &str = "session.json";
const HISTORY_FILE: &str = "history.json";

/// JSON persistence rooted at a data directory
#[derive(Debug)]
pub struct SlotStore {
    data_dir: PathBuf,
}

impl SlotStore {
    /// Open a store, creating the data directory if needed
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Load the last saved session snapshot, if any.
    ///
    /// A corrupt file is treated as absent so a damaged save can never
    /// brick startup.
    pub fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StoreError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                log::warn!("discarding corrupt session file {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.session_path(), json)?;
        Ok(())
    }

    /// Append (or update) one history record and prune old ones.
    ///
    /// Records are keyed by game number: a second record for the same
    /// game replaces the first. After insertion everything older than the
    /// latest game number minus [`HISTORY_KEEP`] is dropped.
    pub fn append_history(&self, record: HistoryRecord) -> Result<(), StoreError> {
        let mut records = self.load_history()?;

        match records.iter().position(|r| r.game_number == record.game_number) {
            Some(i) => records[i] = record,
            None => records.push(record),
        }
        records.sort_by_key(|r| r.game_number);

        if let Some(latest) = records.last().map(|r| r.game_number) {
            let cutoff = latest.saturating_sub(HISTORY_KEEP);
            let before = records.len();
            records.retain(|r| r.game_number > cutoff);
            if records.len() < before {
                log::debug!("pruned {} history records", before - records.len());
            }
        }

        let json = serde_json::to_string(&records)?;
        fs::write(self.history_path(), json)?;
        Ok(())
    }

    /// All retained history records, oldest first
    pub fn load_history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                log::warn!("discarding corrupt history file {}: {e}", path.display());
                Ok(Vec::new())
            }
        }
    }

    /// History thinned to at most `limit` points for the slump graph
    pub fn query_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let records = self.load_history()?;
        Ok(crate::history::downsample(&records, limit))
    }

    /// Delete every persisted file
    pub fn reset_all(&self) -> Result<(), StoreError> {
        for path in [self.session_path(), self.history_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        log::info!("store reset: {}", self.data_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_engine::{GameEngine, now_millis};

    fn record(game_number: u64) -> HistoryRecord {
        HistoryRecord {
            game_number,
            credit: 1000,
            coin_difference: 0,
            big_count: 0,
            reg_count: 0,
            setting: 1,
            timestamp: now_millis(),
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();

        assert!(store.load_snapshot().unwrap().is_none());

        let engine = GameEngine::new();
        let snap = engine.snapshot();
        store.save_snapshot(&snap).unwrap();

        let loaded = store.load_snapshot().unwrap().unwrap();
        assert_eq!(loaded.credit, snap.credit);
        assert_eq!(loaded.total_games, snap.total_games);
    }

    #[test]
    fn test_corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        fs::write(store.data_dir().join("session.json"), "{not json").unwrap();
        assert!(store.load_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_append_upserts_by_game_number() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();

        store.append_history(record(30)).unwrap();
        let mut updated = record(30);
        updated.coin_difference = -90;
        store.append_history(updated).unwrap();

        let records = store.load_history().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].coin_difference, -90);
    }

    #[test]
    fn test_prune_keeps_trailing_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();

        for game in 1..=600 {
            store.append_history(record(game)).unwrap();
        }

        let records = store.load_history().unwrap();
        assert_eq!(records.first().map(|r| r.game_number), Some(101));
        assert_eq!(records.last().map(|r| r.game_number), Some(600));
        assert_eq!(records.len(), 500);
    }

    #[test]
    fn test_query_history_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        for game in 1..=300 {
            store.append_history(record(game)).unwrap();
        }
        let thinned = store.query_history(50).unwrap();
        assert!(thinned.len() <= 50);
        assert_eq!(thinned.first().map(|r| r.game_number), Some(1));
        assert_eq!(thinned.last().map(|r| r.game_number), Some(300));
    }

    #[test]
    fn test_reset_all_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::open(dir.path()).unwrap();
        store.append_history(record(1)).unwrap();
        store.save_snapshot(&GameEngine::new().snapshot()).unwrap();

        store.reset_all().unwrap();
        assert!(store.load_snapshot().unwrap().is_none());
        assert!(store.load_history().unwrap().is_empty());
    }
}
