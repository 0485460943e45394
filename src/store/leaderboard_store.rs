use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::file::JsonFile;
use super::sort::{SortKey, SortOrder};
use crate::domain::{RankedUser, UserRecord};
use crate::errors::StoreError;

/// Store key for a username: trimmed and lowercased
pub fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    insertion_seq: u64,
    #[serde(flatten)]
    record: UserRecord,
}

/// In-memory leaderboard backed by a single JSON file.
///
/// Not synchronized: `LeaderboardService` holds it behind a lock for
/// concurrent callers.
pub struct LeaderboardStore {
    file: JsonFile,
    entries: BTreeMap<String, StoredEntry>,
    next_seq: u64,
}

impl LeaderboardStore {
    /// Open the store, loading whatever the backing file holds.
    /// A missing or unreadable file yields an empty leaderboard.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut store = Self {
            file: JsonFile::new(path),
            entries: BTreeMap::new(),
            next_seq: 0,
        };
        store.reload();
        store
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace in-memory state with the file contents
    pub fn reload(&mut self) {
        let loaded: BTreeMap<String, StoredEntry> = match self.file.load() {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                info!("No existing data file at {}, starting fresh", self.path().display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Error reading data file, starting fresh: {:#}", e);
                BTreeMap::new()
            }
        };

        self.entries.clear();
        for (key, mut entry) in loaded {
            if entry.record.reconcile_derived_fields() {
                warn!("Recomputed stale totals for {} while loading", key);
            }
            let key = username_key(&key);
            if self.entries.contains_key(&key) {
                warn!("Duplicate entry for {} in data file, keeping the first", key);
                continue;
            }
            self.entries.insert(key, entry);
        }

        self.next_seq = self
            .entries
            .values()
            .map(|entry| entry.insertion_seq + 1)
            .max()
            .unwrap_or(0);
        info!("Loaded data for {} users", self.entries.len());
    }

    /// Write the whole mapping to disk. In-memory state stays authoritative on failure.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.file.save(&self.entries).inspect_err(|e| {
            warn!("{}", e);
        })
    }

    /// Insert or wholesale-replace a record. Returns true when a record was replaced.
    /// A replaced user keeps its original insertion position.
    pub fn upsert(&mut self, username: &str, record: UserRecord) -> bool {
        let key = username_key(username);
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.record = record;
                true
            }
            None => {
                let insertion_seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(key, StoredEntry { insertion_seq, record });
                false
            }
        }
    }

    /// Replace the record of a user already on the board. Returns false, storing
    /// nothing, when the user is not tracked.
    pub fn replace_existing(&mut self, username: &str, record: UserRecord) -> bool {
        match self.entries.get_mut(&username_key(username)) {
            Some(entry) => {
                entry.record = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, username: &str) -> Option<UserRecord> {
        self.entries
            .remove(&username_key(username))
            .map(|entry| entry.record)
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.entries.get(&username_key(username)).map(|entry| &entry.record)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(&username_key(username))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ordered(&self) -> Vec<(&String, &StoredEntry)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.insertion_seq);
        entries
    }

    /// Records in the order they were first added
    pub fn records(&self) -> Vec<&UserRecord> {
        self.ordered().into_iter().map(|(_, entry)| &entry.record).collect()
    }

    /// (store key, display username) pairs in insertion order
    pub fn tracked(&self) -> Vec<(String, String)> {
        self.ordered()
            .into_iter()
            .map(|(key, entry)| (key.clone(), entry.record.username.clone()))
            .collect()
    }

    /// Display usernames in insertion order
    pub fn usernames(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|record| record.username.clone())
            .collect()
    }

    /// Every record ordered by `key`, annotated with its 1-based position.
    /// Equal values keep insertion order.
    pub fn list(&self, key: SortKey, order: Option<SortOrder>) -> Vec<RankedUser> {
        let order = order.unwrap_or_else(|| key.default_order());

        let mut records = self.records();
        records.sort_by(|a, b| key.compare(a, b, order));

        records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| RankedUser {
                position: idx + 1,
                record: record.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scoring::{ActivitySummary, BreakdownSource, DifficultyCounts, score_counts};
    use chrono::{TimeZone, Utc};
    use std::fs;

    pub(crate) fn record(username: &str, lifetime: (u32, u32, u32), weekly: (u32, u32, u32), ranking: u64) -> UserRecord {
        let lifetime = DifficultyCounts::new(lifetime.0, lifetime.1, lifetime.2);
        let weekly = DifficultyCounts::new(weekly.0, weekly.1, weekly.2);
        UserRecord {
            username: username.to_string(),
            real_name: None,
            easy: lifetime.easy,
            medium: lifetime.medium,
            hard: lifetime.hard,
            total_solved: lifetime.total(),
            base_score: score_counts(&lifetime),
            weekly_easy: weekly.easy,
            weekly_medium: weekly.medium,
            weekly_hard: weekly.hard,
            weekly_total: weekly.total(),
            weekly_base_score: score_counts(&weekly),
            weekly_breakdown: BreakdownSource::Estimated,
            current_week: "2026-10-12 to 2026-10-18".to_string(),
            ranking,
            last_updated: Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap(),
            performance_score: None,
            activity: ActivitySummary::default(),
            languages: BTreeMap::new(),
            topics: BTreeMap::new(),
            recent_submissions: Vec::new(),
        }
    }

    fn usernames(list: &[RankedUser]) -> Vec<&str> {
        list.iter().map(|user| user.record.username.as_str()).collect()
    }

    fn store() -> (tempfile::TempDir, LeaderboardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::open(dir.path().join("leaderboard.json"));
        (dir, store)
    }

    #[test]
    fn test_keys_are_case_insensitive_and_display_casing_is_kept() {
        let (_dir, mut store) = store();
        store.upsert("Alice", record("Alice", (1, 0, 0), (0, 0, 0), 0));

        assert!(store.contains("ALICE"));
        assert_eq!(store.get("alice").unwrap().username, "Alice");
        assert!(store.upsert("aLiCe", record("Alice", (2, 0, 0), (0, 0, 0), 0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_descending_with_stable_ties() {
        let (_dir, mut store) = store();
        store.upsert("a", record("a", (5, 0, 0), (0, 0, 0), 0));
        store.upsert("b", record("b", (9, 0, 0), (0, 0, 0), 0));
        store.upsert("c", record("c", (5, 0, 0), (0, 0, 0), 0));
        store.upsert("d", record("d", (5, 0, 0), (0, 0, 0), 0));

        let list = store.list(SortKey::BaseScore, None);

        assert_eq!(usernames(&list), vec!["b", "a", "c", "d"]);
        assert_eq!(list.iter().map(|u| u.position).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ties_keep_insertion_order_when_ascending() {
        let (_dir, mut store) = store();
        store.upsert("x", record("x", (1, 0, 0), (0, 0, 0), 0));
        store.upsert("y", record("y", (1, 0, 0), (0, 0, 0), 0));

        let list = store.list(SortKey::BaseScore, Some(SortOrder::Asc));
        assert_eq!(usernames(&list), vec!["x", "y"]);
    }

    #[test]
    fn test_ranking_ascending_with_unranked_last() {
        let (_dir, mut store) = store();
        store.upsert("unranked1", record("unranked1", (1, 0, 0), (0, 0, 0), 0));
        store.upsert("mid", record("mid", (1, 0, 0), (0, 0, 0), 50_000));
        store.upsert("top", record("top", (1, 0, 0), (0, 0, 0), 10));
        store.upsert("unranked2", record("unranked2", (1, 0, 0), (0, 0, 0), 0));

        let list = store.list(SortKey::Ranking, None);
        assert_eq!(usernames(&list), vec!["top", "mid", "unranked1", "unranked2"]);

        let reversed = store.list(SortKey::Ranking, Some(SortOrder::Desc));
        assert_eq!(usernames(&reversed), vec!["mid", "top", "unranked1", "unranked2"]);
    }

    #[test]
    fn test_refresh_keeps_position_and_readd_moves_to_end() {
        let (_dir, mut store) = store();
        store.upsert("a", record("a", (1, 0, 0), (0, 0, 0), 0));
        store.upsert("b", record("b", (1, 0, 0), (0, 0, 0), 0));
        store.upsert("a", record("a", (1, 0, 0), (0, 0, 0), 0));
        assert_eq!(store.usernames(), vec!["a", "b"]);

        store.remove("a");
        store.upsert("a", record("a", (1, 0, 0), (0, 0, 0), 0));
        assert_eq!(store.usernames(), vec!["b", "a"]);
    }

    #[test]
    fn test_persist_and_reopen_round_trip_keeps_order() {
        let (dir, mut store) = store();
        store.upsert("Zed", record("Zed", (1, 2, 3), (1, 0, 0), 7));
        store.upsert("amy", record("amy", (4, 5, 6), (0, 1, 0), 0));
        store.persist().unwrap();

        let reopened = LeaderboardStore::open(dir.path().join("leaderboard.json"));
        assert_eq!(reopened.usernames(), vec!["Zed", "amy"]);
        assert_eq!(reopened.get("zed"), store.get("zed"));
    }

    #[test]
    fn test_reload_recomputes_hand_edited_totals() {
        let (dir, mut store) = store();
        let mut edited = record("bob", (10, 5, 2), (0, 0, 0), 0);
        edited.total_solved = 999;
        edited.base_score = 1;
        store.upsert("bob", edited);
        store.persist().unwrap();

        let reopened = LeaderboardStore::open(dir.path().join("leaderboard.json"));
        let bob = reopened.get("bob").unwrap();
        assert_eq!(bob.total_solved, 17);
        assert_eq!(bob.base_score, 39);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        fs::write(&path, "[[[").unwrap();

        let store = LeaderboardStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_failure_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("leaderboard.json");
        fs::create_dir_all(path.join("blocker")).unwrap();

        let mut store = LeaderboardStore::open(&path);
        store.upsert("a", record("a", (1, 0, 0), (0, 0, 0), 0));

        assert!(matches!(store.persist(), Err(StoreError::Persistence { .. })));
        assert!(store.contains("a"));
    }

    #[test]
    fn test_replace_existing_skips_untracked_users() {
        let (_dir, mut store) = store();
        store.upsert("a", record("a", (1, 0, 0), (0, 0, 0), 0));

        assert!(store.replace_existing("A", record("a", (2, 0, 0), (0, 0, 0), 0)));
        assert_eq!(store.get("a").unwrap().easy, 2);
        assert!(!store.replace_existing("b", record("b", (1, 0, 0), (0, 0, 0), 0)));
        assert!(!store.contains("b"));
    }

    #[test]
    fn test_remove_missing_user() {
        let (_dir, mut store) = store();
        assert!(store.remove("ghost").is_none());
    }
}
