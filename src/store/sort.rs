use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::UserRecord;
use crate::errors::LeaderboardError;

/// Record fields the leaderboard can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    WeeklyBaseScore,
    WeeklyTotal,
    WeeklyEasy,
    WeeklyMedium,
    WeeklyHard,
    BaseScore,
    TotalSolved,
    Easy,
    Medium,
    Hard,
    Ranking,
    Username,
    RealName,
    LastUpdated,
    PerformanceScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl SortKey {
    pub const ALL: [SortKey; 15] = [
        SortKey::WeeklyBaseScore,
        SortKey::WeeklyTotal,
        SortKey::WeeklyEasy,
        SortKey::WeeklyMedium,
        SortKey::WeeklyHard,
        SortKey::BaseScore,
        SortKey::TotalSolved,
        SortKey::Easy,
        SortKey::Medium,
        SortKey::Hard,
        SortKey::Ranking,
        SortKey::Username,
        SortKey::RealName,
        SortKey::LastUpdated,
        SortKey::PerformanceScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::WeeklyBaseScore => "weekly_base_score",
            SortKey::WeeklyTotal => "weekly_total",
            SortKey::WeeklyEasy => "weekly_easy",
            SortKey::WeeklyMedium => "weekly_medium",
            SortKey::WeeklyHard => "weekly_hard",
            SortKey::BaseScore => "base_score",
            SortKey::TotalSolved => "total_solved",
            SortKey::Easy => "easy",
            SortKey::Medium => "medium",
            SortKey::Hard => "hard",
            SortKey::Ranking => "ranking",
            SortKey::Username => "username",
            SortKey::RealName => "real_name",
            SortKey::LastUpdated => "last_updated",
            SortKey::PerformanceScore => "performance_score",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::WeeklyBaseScore => "Weekly Score",
            SortKey::WeeklyTotal => "Weekly Problems Solved",
            SortKey::WeeklyEasy => "Weekly Easy Problems",
            SortKey::WeeklyMedium => "Weekly Medium Problems",
            SortKey::WeeklyHard => "Weekly Hard Problems",
            SortKey::BaseScore => "Total Score",
            SortKey::TotalSolved => "Total Problems Solved",
            SortKey::Easy => "Total Easy Problems",
            SortKey::Medium => "Total Medium Problems",
            SortKey::Hard => "Total Hard Problems",
            SortKey::Ranking => "LeetCode Ranking",
            SortKey::Username => "Username",
            SortKey::RealName => "Real Name",
            SortKey::LastUpdated => "Last Updated",
            SortKey::PerformanceScore => "Performance Score (legacy)",
        }
    }

    /// Ranking reads best-first when ascending; everything else when descending
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortKey::Ranking => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Compare two records in the requested direction.
    /// Unranked users trail ranked ones regardless of direction.
    pub fn compare(&self, a: &UserRecord, b: &UserRecord, order: SortOrder) -> Ordering {
        if *self == SortKey::Ranking {
            match (a.is_ranked(), b.is_ranked()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                (false, false) => return Ordering::Equal,
                (true, true) => {}
            }
        }

        let ordering = self.compare_ascending(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    fn compare_ascending(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        match self {
            SortKey::WeeklyBaseScore => a.weekly_base_score.cmp(&b.weekly_base_score),
            SortKey::WeeklyTotal => a.weekly_total.cmp(&b.weekly_total),
            SortKey::WeeklyEasy => a.weekly_easy.cmp(&b.weekly_easy),
            SortKey::WeeklyMedium => a.weekly_medium.cmp(&b.weekly_medium),
            SortKey::WeeklyHard => a.weekly_hard.cmp(&b.weekly_hard),
            SortKey::BaseScore => a.base_score.cmp(&b.base_score),
            SortKey::TotalSolved => a.total_solved.cmp(&b.total_solved),
            SortKey::Easy => a.easy.cmp(&b.easy),
            SortKey::Medium => a.medium.cmp(&b.medium),
            SortKey::Hard => a.hard.cmp(&b.hard),
            SortKey::Ranking => a.ranking.cmp(&b.ranking),
            SortKey::Username => compare_text(&a.username, &b.username),
            SortKey::RealName => compare_text(
                a.real_name.as_deref().unwrap_or_default(),
                b.real_name.as_deref().unwrap_or_default(),
            ),
            SortKey::LastUpdated => a.last_updated.cmp(&b.last_updated),
            SortKey::PerformanceScore => a
                .performance_score
                .unwrap_or(0.0)
                .total_cmp(&b.performance_score.unwrap_or(0.0)),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl FromStr for SortKey {
    type Err = LeaderboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let key = match normalized.as_str() {
            "weekly" | "weekly_base" => SortKey::WeeklyBaseScore,
            "score" | "base" => SortKey::BaseScore,
            "total" => SortKey::TotalSolved,
            other => SortKey::ALL
                .into_iter()
                .find(|key| key.as_str() == other)
                .ok_or_else(|| LeaderboardError::UnknownSortKey(value.to_string()))?,
        };
        Ok(key)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
