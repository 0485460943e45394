use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{Difficulty, DifficultyCounts, SubmissionCalendar};
use super::week::{SECONDS_PER_DAY, WeekBounds};
use crate::domain::RecentSubmission;

/// How the weekly total is split across difficulties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStrategy {
    /// Apply lifetime difficulty shares to the weekly total
    #[default]
    Proportional,
    /// Tally accepted recent submissions whose difficulty is known
    DirectTally,
}

impl BreakdownStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "proportional" | "estimate" | "estimated" => Some(Self::Proportional),
            "direct" | "direct_tally" | "tally" | "exact" => Some(Self::DirectTally),
            _ => None,
        }
    }
}

/// Which computation produced a record's weekly breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownSource {
    #[default]
    Estimated,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyActivity {
    pub total: u32,
    pub counts: DifficultyCounts,
    pub source: BreakdownSource,
}

pub fn compute_weekly(
    lifetime: &DifficultyCounts,
    calendar: &SubmissionCalendar,
    recent: &[RecentSubmission],
    week: &WeekBounds,
    strategy: BreakdownStrategy,
) -> WeeklyActivity {
    let total = weekly_total(calendar, recent, week);

    let tally = match strategy {
        BreakdownStrategy::DirectTally => direct_tally(recent, week),
        BreakdownStrategy::Proportional => None,
    };

    match tally {
        Some(tally) => WeeklyActivity {
            total,
            counts: absorb_shortfall(tally, total),
            source: BreakdownSource::Exact,
        },
        None => WeeklyActivity {
            total,
            counts: proportional_breakdown(lifetime, total),
            source: BreakdownSource::Estimated,
        },
    }
}

/// Larger of the calendar and recent-submission signals
pub fn weekly_total(calendar: &SubmissionCalendar, recent: &[RecentSubmission], week: &WeekBounds) -> u32 {
    calendar_signal(calendar, week).max(recent_signal(recent, week))
}

pub fn calendar_signal(calendar: &SubmissionCalendar, week: &WeekBounds) -> u32 {
    week.day_starts()
        .flat_map(|day_start| calendar.range(day_start..day_start + SECONDS_PER_DAY))
        .fold(0u32, |sum, (_, count)| sum.saturating_add(*count))
}

pub fn recent_signal(recent: &[RecentSubmission], week: &WeekBounds) -> u32 {
    accepted_this_week(recent, week).count() as u32
}

/// Split `weekly_total` by lifetime shares; Hard absorbs the rounding remainder
pub fn proportional_breakdown(lifetime: &DifficultyCounts, weekly_total: u32) -> DifficultyCounts {
    let solved = lifetime.total() as u64;
    if solved == 0 {
        return DifficultyCounts::default();
    }

    let share = |count: u32| (weekly_total as u64 * count as u64 / solved) as u32;
    let easy = share(lifetime.easy);
    let medium = share(lifetime.medium);

    DifficultyCounts::new(easy, medium, weekly_total - easy - medium)
}

/// Exact weekly counts from this week's accepted submissions, counting each problem once.
/// `None` unless there is at least one and every one has a known difficulty.
pub fn direct_tally(recent: &[RecentSubmission], week: &WeekBounds) -> Option<DifficultyCounts> {
    let mut seen = HashSet::new();
    let mut tally = DifficultyCounts::default();

    for submission in accepted_this_week(recent, week) {
        let difficulty = submission.difficulty?;
        if seen.insert(submission.problem_id()) {
            tally.add(difficulty, 1);
        }
    }

    (tally.total() > 0).then_some(tally)
}

/// Assign any gap between the tally and the weekly total to the best-represented bucket
pub fn absorb_shortfall(mut counts: DifficultyCounts, weekly_total: u32) -> DifficultyCounts {
    let shortfall = weekly_total.saturating_sub(counts.total());
    if shortfall > 0 {
        let bucket: Difficulty = counts.best_represented();
        counts.add(bucket, shortfall);
    }
    counts
}

fn accepted_this_week<'a>(
    recent: &'a [RecentSubmission],
    week: &'a WeekBounds,
) -> impl Iterator<Item = &'a RecentSubmission> + 'a {
    recent
        .iter()
        .filter(move |submission| submission.is_accepted() && week.contains(submission.timestamp))
}
