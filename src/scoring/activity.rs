use serde::{Deserialize, Serialize};

use super::types::SubmissionCalendar;
use super::week::SECONDS_PER_DAY;

/// Weekly activity level shown next to each user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    VeryActive,
    Active,
    Some,
    #[default]
    Quiet,
}

impl ActivityLevel {
    pub fn from_weekly_total(weekly_total: u32) -> Self {
        if weekly_total >= 10 {
            ActivityLevel::VeryActive
        } else if weekly_total >= 5 {
            ActivityLevel::Active
        } else if weekly_total >= 1 {
            ActivityLevel::Some
        } else {
            ActivityLevel::Quiet
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::Active => "Active",
            ActivityLevel::Some => "Some",
            ActivityLevel::Quiet => "Quiet",
        }
    }
}

/// Submission volume over trailing windows ending now
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub last_7_days: u32,
    pub last_30_days: u32,
    pub last_365_days: u32,
    pub recent_submission_count: u32,
    pub level: ActivityLevel,
}

impl ActivitySummary {
    pub fn from_calendar(
        calendar: &SubmissionCalendar,
        now_ts: i64,
        recent_submission_count: usize,
        weekly_total: u32,
    ) -> Self {
        Self {
            last_7_days: trailing_sum(calendar, now_ts, 7),
            last_30_days: trailing_sum(calendar, now_ts, 30),
            last_365_days: trailing_sum(calendar, now_ts, 365),
            recent_submission_count: recent_submission_count as u32,
            level: ActivityLevel::from_weekly_total(weekly_total),
        }
    }
}

/// Calendar keys are day starts, so a window of N days reaches back to the
/// start of the day N-1 days before today.
fn trailing_sum(calendar: &SubmissionCalendar, now_ts: i64, days: i64) -> u32 {
    let today_start = now_ts - now_ts.rem_euclid(SECONDS_PER_DAY);
    let from = today_start - (days - 1) * SECONDS_PER_DAY;

    calendar
        .range(from..=now_ts)
        .fold(0u32, |sum, (_, count)| sum.saturating_add(*count))
}
