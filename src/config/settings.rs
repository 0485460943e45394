use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};

use crate::scoring::BreakdownStrategy;

#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    pub weekly_breakdown: BreakdownStrategy,
    /// Opt-in legacy score scaled by ranking tier and activity
    pub legacy_performance_multiplier: bool,
}

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub graphql_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_request_interval_ms: u64,
    pub recent_submission_limit: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            graphql_url: "https://leetcode.com/graphql".to_string(),
            user_agent: "LeetCode-Leaderboard/1.0".to_string(),
            timeout_secs: 10,
            min_request_interval_ms: 1000, // 1 req/sec
            recent_submission_limit: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub data_file: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("leaderboard_data.json"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub fetcher: FetcherSettings,
    pub store: StoreSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `LEADERBOARD_*` / `LEETCODE_*` environment variables.
    /// Bad values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(path) = var("LEADERBOARD_DATA_FILE") {
            config.store.data_file = PathBuf::from(path);
        }
        if let Some(value) = var("LEADERBOARD_WEEKLY_BREAKDOWN") {
            match BreakdownStrategy::parse(&value) {
                Some(strategy) => config.scoring.weekly_breakdown = strategy,
                None => warn!("Invalid LEADERBOARD_WEEKLY_BREAKDOWN value: {value}"),
            }
        }
        config.scoring.legacy_performance_multiplier = try_load(
            "LEADERBOARD_PERFORMANCE_MULTIPLIER",
            config.scoring.legacy_performance_multiplier,
        );
        if let Some(url) = var("LEETCODE_GRAPHQL_URL") {
            config.fetcher.graphql_url = url;
        }
        config.fetcher.timeout_secs = try_load("LEETCODE_TIMEOUT_SECS", config.fetcher.timeout_secs);

        config
    }

    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(path) = data_file {
            self.store.data_file = path;
        }
        self
    }

    pub fn with_weekly_breakdown(mut self, strategy: Option<BreakdownStrategy>) -> Self {
        if let Some(strategy) = strategy {
            self.scoring.weekly_breakdown = strategy;
        }
        self
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => {
            info!("{key} set to {value}");
            value
        }
        Err(e) => {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }
    }
}
