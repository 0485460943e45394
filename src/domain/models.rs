use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{ActivitySummary, BreakdownSource, Difficulty, DifficultyCounts, score_counts};

pub const ACCEPTED_STATUS: &str = "Accepted";

/// Number of recent submissions kept on a record
pub const KEPT_RECENT_SUBMISSIONS: usize = 10;

/// A recent submission after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSubmission {
    pub title: String,
    #[serde(default)]
    pub title_slug: Option<String>,
    pub timestamp: i64,
    pub status: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl RecentSubmission {
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED_STATUS
    }

    /// Slug when known, else the title
    pub fn problem_id(&self) -> &str {
        self.title_slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .unwrap_or(&self.title)
    }
}

/// Normalized leaderboard entry for one tracked user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub real_name: Option<String>,

    // Lifetime
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub total_solved: u32,
    pub base_score: u64,

    // Current week
    pub weekly_easy: u32,
    pub weekly_medium: u32,
    pub weekly_hard: u32,
    pub weekly_total: u32,
    pub weekly_base_score: u64,
    #[serde(default)]
    pub weekly_breakdown: BreakdownSource,
    #[serde(default)]
    pub current_week: String,

    /// Platform ranking; 0 means unranked
    #[serde(default)]
    pub ranking: u64,
    pub last_updated: DateTime<Utc>,

    /// Legacy multiplier score, present only when explicitly enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<f64>,

    #[serde(default)]
    pub activity: ActivitySummary,
    #[serde(default)]
    pub languages: BTreeMap<String, u32>,
    #[serde(default)]
    pub topics: BTreeMap<String, u32>,
    #[serde(default)]
    pub recent_submissions: Vec<RecentSubmission>,
}

impl UserRecord {
    pub fn lifetime_counts(&self) -> DifficultyCounts {
        DifficultyCounts::new(self.easy, self.medium, self.hard)
    }

    pub fn weekly_counts(&self) -> DifficultyCounts {
        DifficultyCounts::new(self.weekly_easy, self.weekly_medium, self.weekly_hard)
    }

    pub fn is_ranked(&self) -> bool {
        self.ranking > 0
    }

    /// Recompute totals and scores from the difficulty counts.
    /// Returns true if any stored value was out of date.
    pub fn reconcile_derived_fields(&mut self) -> bool {
        let lifetime = self.lifetime_counts();
        let weekly = self.weekly_counts();
        let before = (self.total_solved, self.base_score, self.weekly_total, self.weekly_base_score);

        self.total_solved = lifetime.total();
        self.base_score = score_counts(&lifetime);
        self.weekly_total = self.weekly_total.max(weekly.total());
        self.weekly_base_score = score_counts(&weekly);

        before != (self.total_solved, self.base_score, self.weekly_total, self.weekly_base_score)
    }
}

/// A record annotated with its place in one particular ordering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUser {
    pub position: usize,
    #[serde(flatten)]
    pub record: UserRecord,
}
