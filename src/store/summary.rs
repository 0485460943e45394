use serde::Serialize;

use crate::domain::UserRecord;

/// Aggregate figures shown above the leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaderboardSummary {
    pub total_users: usize,
    pub total_problems: u64,
    pub weekly_problems: u64,
    pub weekly_score: u64,
    pub avg_weekly_score: f64,
    pub total_base_score: u64,
    pub avg_score: f64,
    pub leader: Option<String>,
    pub easy_champion: Option<Champion>,
    pub medium_champion: Option<Champion>,
    pub hard_champion: Option<Champion>,
    pub weekly_easy_champion: Option<Champion>,
    pub weekly_medium_champion: Option<Champion>,
    pub weekly_hard_champion: Option<Champion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Champion {
    pub username: String,
    pub count: u32,
}

impl LeaderboardSummary {
    /// `ranked` is expected in display order; its first entry is the leader
    pub fn from_records<'a, I>(ranked: I) -> Self
    where
        I: IntoIterator<Item = &'a UserRecord>,
    {
        let records: Vec<&UserRecord> = ranked.into_iter().collect();
        if records.is_empty() {
            return Self::default();
        }

        let total_users = records.len();
        let weekly_score: u64 = records.iter().map(|r| r.weekly_base_score).sum();
        let total_base_score: u64 = records.iter().map(|r| r.base_score).sum();

        Self {
            total_users,
            total_problems: records.iter().map(|r| r.total_solved as u64).sum(),
            weekly_problems: records.iter().map(|r| r.weekly_total as u64).sum(),
            weekly_score,
            avg_weekly_score: weekly_score as f64 / total_users as f64,
            total_base_score,
            avg_score: total_base_score as f64 / total_users as f64,
            leader: records.first().map(|r| r.username.clone()),
            easy_champion: champion(&records, |r| r.easy),
            medium_champion: champion(&records, |r| r.medium),
            hard_champion: champion(&records, |r| r.hard),
            weekly_easy_champion: champion(&records, |r| r.weekly_easy),
            weekly_medium_champion: champion(&records, |r| r.weekly_medium),
            weekly_hard_champion: champion(&records, |r| r.weekly_hard),
        }
    }
}

/// First record holding the highest non-zero count
fn champion(records: &[&UserRecord], count: impl Fn(&UserRecord) -> u32) -> Option<Champion> {
    records
        .iter()
        .fold(None::<Champion>, |best, record| {
            let value = count(record);
            match best {
                Some(best) if best.count >= value => Some(best),
                _ if value == 0 => None,
                _ => Some(Champion {
                    username: record.username.clone(),
                    count: value,
                }),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::leaderboard_store::tests::record;

    #[test]
    fn test_empty_summary() {
        let summary = LeaderboardSummary::from_records(Vec::<&UserRecord>::new());
        assert_eq!(summary, LeaderboardSummary::default());
    }

    #[test]
    fn test_totals_and_champions() {
        let alice = record("alice", (10, 5, 2), (2, 1, 0), 0);
        let bob = record("bob", (3, 8, 0), (0, 1, 0), 0);

        let summary = LeaderboardSummary::from_records([&alice, &bob]);

        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.total_problems, 28);
        assert_eq!(summary.weekly_problems, 4);
        assert_eq!(summary.weekly_score, 5 + 3);
        assert_eq!(summary.avg_weekly_score, 4.0);
        assert_eq!(summary.total_base_score, 39 + 27);
        assert_eq!(summary.leader.as_deref(), Some("alice"));
        assert_eq!(summary.easy_champion.unwrap().username, "alice");
        assert_eq!(summary.medium_champion.unwrap().username, "bob");
        // tie on weekly medium goes to the first listed
        assert_eq!(summary.weekly_medium_champion.unwrap().username, "alice");
        assert!(summary.weekly_hard_champion.is_none());
    }
}
