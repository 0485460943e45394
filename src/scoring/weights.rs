use super::types::{Difficulty, DifficultyCounts};

/// Points per solved problem: Easy=1, Medium=3, Hard=7
pub fn base_score(easy: u32, medium: u32, hard: u32) -> u64 {
    Difficulty::Easy.weight() * easy as u64
        + Difficulty::Medium.weight() * medium as u64
        + Difficulty::Hard.weight() * hard as u64
}

pub fn score_counts(counts: &DifficultyCounts) -> u64 {
    base_score(counts.easy, counts.medium, counts.hard)
}

/// Legacy "advanced" score: base score scaled by ranking tier and weekly activity.
///
/// Kept only for leaderboards that explicitly opt in via
/// `ScoringSettings::legacy_performance_multiplier`. It is stored apart from
/// `base_score` and never replaces it.
pub fn legacy_performance_score(base_score: u64, ranking: u64, weekly_total: u32) -> f64 {
    let multiplier = ranking_tier_multiplier(ranking) + activity_bonus(weekly_total);
    round_to_tenth(base_score as f64 * multiplier)
}

fn ranking_tier_multiplier(ranking: u64) -> f64 {
    match ranking {
        0 => 1.0,
        1..=10_000 => 1.5,
        10_001..=50_000 => 1.3,
        50_001..=100_000 => 1.2,
        100_001..=500_000 => 1.1,
        _ => 1.0,
    }
}

fn activity_bonus(weekly_total: u32) -> f64 {
    if weekly_total >= 10 {
        0.2
    } else if weekly_total >= 5 {
        0.1
    } else {
        0.0
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
