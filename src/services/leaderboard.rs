use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local};
use log::{info, warn};
use tokio::sync::Mutex;

use super::normalizer::StatsNormalizer;
use crate::api::ProfileSource;
use crate::config::AppConfig;
use crate::domain::{RankedUser, UserRecord};
use crate::errors::{LeaderboardError, SourceError, StoreError};
use crate::scoring::WeekBounds;
use crate::store::{LeaderboardStore, LeaderboardSummary, SortKey, SortOrder};

pub type Clock = fn() -> DateTime<Local>;

/// One user the bulk refresh could not update
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshFailure {
    pub username: String,
    pub error: SourceError,
}

/// Per-user outcome of `refresh_all`
#[derive(Debug, Default)]
pub struct BulkRefreshReport {
    pub refreshed: Vec<String>,
    pub failed: Vec<RefreshFailure>,
    pub persistence_error: Option<StoreError>,
}

impl BulkRefreshReport {
    pub fn attempted(&self) -> usize {
        self.refreshed.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.persistence_error.is_none()
    }
}

/// Leaderboard operations: fetch, normalize, store and persist.
///
/// Fetches are serialized on the source lock and never hold the store.
/// The store lock covers each mutation together with its file write, so
/// readers only wait for those.
pub struct LeaderboardService<S> {
    store: RwLock<LeaderboardStore>,
    source: Mutex<S>,
    normalizer: StatsNormalizer,
    clock: Clock,
}

impl<S: ProfileSource> LeaderboardService<S> {
    pub fn new(store: LeaderboardStore, source: S, normalizer: StatsNormalizer) -> Self {
        Self {
            store: RwLock::new(store),
            source: Mutex::new(source),
            normalizer,
            clock: Local::now,
        }
    }

    /// Load the configured data file and wire up the normalizer
    pub fn open(config: &AppConfig, source: S) -> Self {
        let store = LeaderboardStore::open(&config.store.data_file);
        let normalizer = StatsNormalizer::new(config.scoring.clone());
        Self::new(store, source, normalizer)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch `username` and replace whatever was stored for them.
    /// A failed fetch leaves the store untouched.
    pub async fn add_or_refresh(&self, username: &str) -> Result<UserRecord, LeaderboardError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LeaderboardError::InvalidUsername);
        }

        let record = self.fetch_record(username).await?;
        self.commit(username, record.clone(), false)?;
        Ok(record)
    }

    /// Like `add_or_refresh`, for users already on the board.
    /// A user removed while their fetch was in flight stays removed.
    pub async fn refresh_user(&self, username: &str) -> Result<UserRecord, LeaderboardError> {
        let not_found = || LeaderboardError::RecordNotFound(username.trim().to_string());
        let tracked = self.read_store().contains(username);
        if !tracked {
            return Err(not_found());
        }

        let record = self.fetch_record(username.trim()).await?;
        if !self.commit(username, record.clone(), true)? {
            return Err(not_found());
        }
        Ok(record)
    }

    /// Refresh every tracked user in insertion order and persist once.
    /// Failures are collected; they never stop the batch.
    pub async fn refresh_all(&self) -> BulkRefreshReport {
        let mut report = BulkRefreshReport::default();
        let tracked = self.read_store().tracked();

        for (key, display) in tracked {
            match self.fetch_record(&display).await {
                Ok(record) => {
                    let replaced = self.write_store().replace_existing(&key, record);
                    if replaced {
                        report.refreshed.push(display);
                    } else {
                        info!("{} was removed during the refresh, skipping", display);
                    }
                }
                Err(error) => {
                    warn!("Failed to refresh {}: {}", display, error);
                    report.failed.push(RefreshFailure {
                        username: display,
                        error,
                    });
                }
            }
        }

        if !report.refreshed.is_empty() {
            report.persistence_error = self.write_store().persist().err();
        }

        info!(
            "Refreshed {}/{} users",
            report.refreshed.len(),
            report.attempted()
        );
        report
    }

    /// Returns false when the user was not on the board; the file is then left alone
    pub fn remove(&self, username: &str) -> Result<bool, LeaderboardError> {
        let mut store = self.write_store();
        let Some(record) = store.remove(username) else {
            return Ok(false);
        };

        info!("Removed {}", record.username);
        store.persist()?;
        Ok(true)
    }

    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.read_store().get(username).cloned()
    }

    pub fn list(&self, sort_key: &str, order: Option<SortOrder>) -> Result<Vec<RankedUser>, LeaderboardError> {
        let key: SortKey = sort_key.parse()?;
        Ok(self.read_store().list(key, order))
    }

    pub fn summary(&self) -> LeaderboardSummary {
        let ranked = self.read_store().list(SortKey::default(), None);
        LeaderboardSummary::from_records(ranked.iter().map(|user| &user.record))
    }

    /// Display usernames in insertion order
    pub fn usernames(&self) -> Vec<String> {
        self.read_store().usernames()
    }

    async fn fetch_record(&self, username: &str) -> Result<UserRecord, SourceError> {
        let now = (self.clock)();
        let week = WeekBounds::containing(&now);
        let payload = self.source.lock().await.fetch_profile(username, week).await?;
        self.normalizer.normalize(payload, &now)
    }

    /// Store `record` and write the file in one step. With `existing_only`, an
    /// untracked user is left out and false is returned.
    fn commit(&self, username: &str, record: UserRecord, existing_only: bool) -> Result<bool, StoreError> {
        let mut store = self.write_store();
        let replaced = if existing_only {
            if !store.replace_existing(username, record.clone()) {
                return Ok(false);
            }
            true
        } else {
            store.upsert(username, record.clone())
        };
        info!(
            "{} {} (score {}, weekly {})",
            if replaced { "Refreshed" } else { "Added" },
            record.username,
            record.base_score,
            record.weekly_base_score
        );

        store.persist()?;
        Ok(true)
    }

    // Poisoning is ignored; every store mutation leaves the map consistent
    fn read_store(&self) -> RwLockReadGuard<'_, LeaderboardStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, LeaderboardStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}
