use std::collections::BTreeMap;

use log::{debug, warn};

use super::models::RecentSubmission;
use super::payload::{MatchedUser, ProfilePayload, RecentSubmissionPayload, TagProblemCounts};
use crate::errors::SourceError;
use crate::scoring::{Difficulty, DifficultyCounts, SubmissionCalendar};

/// Profile data checked once at the normalizer boundary.
/// Everything downstream relies on these fields without re-validating.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    pub username: String,
    pub real_name: Option<String>,
    pub ranking: u64,
    pub solved: DifficultyCounts,
    pub calendar: SubmissionCalendar,
    pub recent: Vec<RecentSubmission>,
    pub languages: BTreeMap<String, u32>,
    pub topics: BTreeMap<String, u32>,
}

impl TryFrom<ProfilePayload> for ValidatedProfile {
    type Error = SourceError;

    fn try_from(payload: ProfilePayload) -> Result<Self, Self::Error> {
        let user = payload.matched_user;

        let username = user.username.trim().to_string();
        if username.is_empty() {
            return Err(SourceError::malformed("profile has no username"));
        }

        let solved = parse_solved_counts(&user, &username)?;
        let profile = user.profile.clone().unwrap_or_default();

        Ok(Self {
            real_name: profile
                .real_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            ranking: profile.ranking.filter(|rank| *rank > 0).unwrap_or(0) as u64,
            solved,
            calendar: parse_calendar(user.submission_calendar.as_deref(), &username),
            recent: parse_recent(payload.recent_submissions),
            languages: collect_languages(&user),
            topics: user.tag_problem_counts.as_ref().map(collect_topics).unwrap_or_default(),
            username,
        })
    }
}

fn parse_solved_counts(user: &MatchedUser, username: &str) -> Result<DifficultyCounts, SourceError> {
    let rows = user
        .submit_stats
        .as_ref()
        .and_then(|stats| stats.ac_submission_num.as_ref())
        .ok_or_else(|| SourceError::malformed(format!("no accepted submission counts for {}", username)))?;

    let mut solved = DifficultyCounts::default();
    for row in rows {
        let Some(difficulty) = Difficulty::from_label(&row.difficulty) else {
            continue;
        };
        let count = u32::try_from(row.count).map_err(|_| {
            SourceError::malformed(format!(
                "invalid {} count {} for {}",
                difficulty.as_str(),
                row.count,
                username
            ))
        })?;
        solved = solved.checked_add(difficulty, count).ok_or_else(|| {
            SourceError::malformed(format!("solved counts for {} overflow", username))
        })?;
    }

    Ok(solved)
}

/// An unreadable calendar counts as empty; only the week signal degrades
fn parse_calendar(raw: Option<&str>, username: &str) -> SubmissionCalendar {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return SubmissionCalendar::new();
    };

    let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring unreadable submission calendar for {}: {}", username, e);
            return SubmissionCalendar::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(day, count)| {
            let day = day.trim().parse::<i64>().ok()?;
            let count = u32::try_from(count.as_u64()?).ok()?;
            Some((day, count))
        })
        .collect()
}

fn parse_recent(submissions: Vec<RecentSubmissionPayload>) -> Vec<RecentSubmission> {
    submissions
        .into_iter()
        .filter_map(|submission| {
            let Some(timestamp) = submission.timestamp_secs() else {
                debug!("Skipping submission '{}' without a usable timestamp", submission.title);
                return None;
            };
            Some(RecentSubmission {
                difficulty: submission.difficulty.as_deref().and_then(Difficulty::from_label),
                title: submission.title,
                title_slug: submission.title_slug,
                timestamp,
                status: submission.status_display,
                lang: submission.lang,
            })
        })
        .collect()
}

fn collect_languages(user: &MatchedUser) -> BTreeMap<String, u32> {
    user.language_problem_count
        .iter()
        .flatten()
        .filter_map(|row| Some((row.language_name.clone(), u32::try_from(row.problems_solved).ok()?)))
        .collect()
}

fn collect_topics(tags: &TagProblemCounts) -> BTreeMap<String, u32> {
    let mut topics = BTreeMap::new();
    let tiers = [&tags.fundamental, &tags.intermediate, &tags.advanced];

    for row in tiers.into_iter().flatten().flatten() {
        if let Ok(solved) = u32::try_from(row.problems_solved) {
            *topics.entry(row.tag_name.clone()).or_insert(0) += solved;
        }
    }

    topics
}
