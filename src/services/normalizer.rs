use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::config::ScoringSettings;
use crate::domain::models::KEPT_RECENT_SUBMISSIONS;
use crate::domain::{ProfilePayload, UserRecord, ValidatedProfile};
use crate::errors::SourceError;
use crate::scoring::{ActivitySummary, WeekBounds, compute_weekly, legacy_performance_score, score_counts};

/// Turns raw profiles into leaderboard records
#[derive(Debug, Clone, Default)]
pub struct StatsNormalizer {
    settings: ScoringSettings,
}

impl StatsNormalizer {
    pub fn new(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Validate `payload` and derive a complete record as of `now`.
    /// The week is the one containing `now` in `now`'s timezone.
    pub fn normalize<Tz: TimeZone>(
        &self,
        payload: ProfilePayload,
        now: &DateTime<Tz>,
    ) -> Result<UserRecord, SourceError> {
        let profile = ValidatedProfile::try_from(payload)?;
        Ok(self.build_record(profile, now))
    }

    fn build_record<Tz: TimeZone>(&self, profile: ValidatedProfile, now: &DateTime<Tz>) -> UserRecord {
        let week = WeekBounds::containing(now);
        let weekly = compute_weekly(
            &profile.solved,
            &profile.calendar,
            &profile.recent,
            &week,
            self.settings.weekly_breakdown,
        );
        debug!(
            "{}: weekly total {} split {:?} ({:?})",
            profile.username, weekly.total, weekly.counts, weekly.source
        );

        let base_score = score_counts(&profile.solved);
        let activity = ActivitySummary::from_calendar(
            &profile.calendar,
            now.timestamp(),
            profile.recent.len(),
            weekly.total,
        );
        let performance_score = self
            .settings
            .legacy_performance_multiplier
            .then(|| legacy_performance_score(base_score, profile.ranking, weekly.total));

        let mut recent_submissions = profile.recent;
        recent_submissions.truncate(KEPT_RECENT_SUBMISSIONS);

        UserRecord {
            username: profile.username,
            real_name: profile.real_name,
            easy: profile.solved.easy,
            medium: profile.solved.medium,
            hard: profile.solved.hard,
            total_solved: profile.solved.total(),
            base_score,
            weekly_easy: weekly.counts.easy,
            weekly_medium: weekly.counts.medium,
            weekly_hard: weekly.counts.hard,
            weekly_total: weekly.total,
            weekly_base_score: score_counts(&weekly.counts),
            weekly_breakdown: weekly.source,
            current_week: week.label(),
            ranking: profile.ranking,
            last_updated: now.with_timezone(&Utc),
            performance_score,
            activity,
            languages: profile.languages,
            topics: profile.topics,
            recent_submissions,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scoring::{ActivityLevel, BreakdownSource, BreakdownStrategy};
    use serde_json::{Value, json};

    // Wednesday 2026-10-14 12:00 UTC; its week starts Monday 1791763200
    const MONDAY: i64 = 1_791_763_200;
    const DAY: i64 = 86_400;

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    pub(crate) fn payload(username: &str, solved: (i64, i64, i64), calendar: Value, recent: Value) -> ProfilePayload {
        serde_json::from_value(json!({
            "matched_user": {
                "username": username,
                "submitStatsGlobal": {"acSubmissionNum": [
                    {"difficulty": "All", "count": solved.0 + solved.1 + solved.2},
                    {"difficulty": "Easy", "count": solved.0},
                    {"difficulty": "Medium", "count": solved.1},
                    {"difficulty": "Hard", "count": solved.2}
                ]},
                "profile": {"realName": "", "ranking": 42_000},
                "submissionCalendar": calendar.to_string(),
                "languageProblemCount": [{"languageName": "Rust", "problemsSolved": 12}],
                "tagProblemCounts": {
                    "fundamental": [{"tagName": "Array", "problemsSolved": 4}],
                    "advanced": [{"tagName": "Array", "problemsSolved": 1}]
                }
            },
            "recent_submissions": recent
        }))
        .unwrap()
    }

    fn accepted(slug: &str, timestamp: i64, difficulty: Option<&str>) -> Value {
        json!({
            "title": slug,
            "titleSlug": slug,
            "timestamp": timestamp.to_string(),
            "statusDisplay": "Accepted",
            "lang": "rust",
            "difficulty": difficulty
        })
    }

    fn alice() -> ProfilePayload {
        payload(
            "alice",
            (10, 5, 2),
            json!({
                (MONDAY - DAY).to_string(): 4,
                MONDAY.to_string(): 3,
                (MONDAY + DAY).to_string(): 5
            }),
            json!([
                accepted("two-sum", MONDAY + 100, Some("Easy")),
                accepted("lru-cache", MONDAY + DAY + 100, Some("Medium")),
                accepted("lru-cache", MONDAY + 2 * DAY, Some("Medium")),
            ]),
        )
    }

    #[test]
    fn test_alice_scores() {
        let record = StatsNormalizer::default().normalize(alice(), &now()).unwrap();

        assert_eq!(record.total_solved, 17);
        assert_eq!(record.base_score, 39);
        assert_eq!(record.ranking, 42_000);
        assert_eq!(record.real_name, None);
        assert_eq!(record.current_week, "2026-10-12 to 2026-10-18");
        assert_eq!(record.last_updated, now());
        assert!(record.performance_score.is_none());
    }

    #[test]
    fn test_weekly_total_takes_larger_signal() {
        // calendar says 8 this week, recent list 3
        let record = StatsNormalizer::default().normalize(alice(), &now()).unwrap();

        assert_eq!(record.weekly_total, 8);
        assert_eq!(
            (record.weekly_easy, record.weekly_medium, record.weekly_hard),
            (4, 2, 2)
        );
        assert_eq!(record.weekly_base_score, 4 + 6 + 14);
        assert_eq!(record.weekly_breakdown, BreakdownSource::Estimated);
    }

    #[test]
    fn test_zero_lifetime_solves_yield_zero_weekly_buckets() {
        let payload = payload("newbie", (0, 0, 0), json!({ MONDAY.to_string(): 5 }), json!([]));
        let record = StatsNormalizer::default().normalize(payload, &now()).unwrap();

        assert_eq!(record.weekly_total, 5);
        assert_eq!(
            (record.weekly_easy, record.weekly_medium, record.weekly_hard),
            (0, 0, 0)
        );
        assert_eq!(record.weekly_base_score, 0);
    }

    #[test]
    fn test_direct_tally_dedups_and_fills_shortfall() {
        let normalizer = StatsNormalizer::new(ScoringSettings {
            weekly_breakdown: BreakdownStrategy::DirectTally,
            legacy_performance_multiplier: false,
        });
        let record = normalizer.normalize(alice(), &now()).unwrap();

        // two-sum (Easy) and lru-cache (Medium) once each; 6 left over go to Easy on the tie
        assert_eq!(
            (record.weekly_easy, record.weekly_medium, record.weekly_hard),
            (7, 1, 0)
        );
        assert_eq!(record.weekly_total, 8);
        assert_eq!(record.weekly_breakdown, BreakdownSource::Exact);
    }

    #[test]
    fn test_direct_tally_without_difficulties_falls_back() {
        let normalizer = StatsNormalizer::new(ScoringSettings {
            weekly_breakdown: BreakdownStrategy::DirectTally,
            legacy_performance_multiplier: false,
        });
        let payload = payload(
            "bob",
            (10, 5, 2),
            json!({}),
            json!([accepted("two-sum", MONDAY + 100, None)]),
        );
        let record = normalizer.normalize(payload, &now()).unwrap();

        assert_eq!(record.weekly_breakdown, BreakdownSource::Estimated);
        assert_eq!(record.weekly_total, 1);
        assert_eq!(record.weekly_hard, 1);
    }

    #[test]
    fn test_legacy_multiplier_is_opt_in_and_separate() {
        let normalizer = StatsNormalizer::new(ScoringSettings {
            weekly_breakdown: BreakdownStrategy::Proportional,
            legacy_performance_multiplier: true,
        });
        let record = normalizer.normalize(alice(), &now()).unwrap();

        // ranking 42k → 1.3, weekly 8 → +0.1
        assert_eq!(record.performance_score, Some(54.6));
        assert_eq!(record.base_score, 39);
    }

    #[test]
    fn test_supplemental_fields() {
        let record = StatsNormalizer::default().normalize(alice(), &now()).unwrap();

        assert_eq!(record.activity.last_7_days, 12);
        assert_eq!(record.activity.recent_submission_count, 3);
        assert_eq!(record.activity.level, ActivityLevel::Active);
        assert_eq!(record.languages.get("Rust"), Some(&12));
        assert_eq!(record.topics.get("Array"), Some(&5));
        assert_eq!(record.recent_submissions.len(), 3);
    }

    #[test]
    fn test_second_payload_replaces_everything() {
        let normalizer = StatsNormalizer::default();
        let first = normalizer.normalize(alice(), &now()).unwrap();
        let second_payload = payload("alice", (1, 0, 0), json!({}), json!([]));
        let second = normalizer.normalize(second_payload.clone(), &now()).unwrap();

        assert_ne!(first, second);
        assert_eq!(second, normalizer.normalize(second_payload, &now()).unwrap());
        assert_eq!(second.weekly_total, 0);
        assert!(second.languages.contains_key("Rust"));
        assert!(second.recent_submissions.is_empty());
    }

    #[test]
    fn test_overflowing_lifetime_counts_are_rejected() {
        let payload = payload("huge", (u32::MAX as i64, 1, 0), json!({}), json!([]));

        let result = StatsNormalizer::default().normalize(payload, &now());
        assert!(matches!(result, Err(SourceError::MalformedPayload(_))));
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        let mut payload = alice();
        payload.matched_user.submit_stats = None;

        let result = StatsNormalizer::default().normalize(payload, &now());
        assert!(matches!(result, Err(SourceError::MalformedPayload(_))));
    }
}
