use colored::*;
use std::collections::BTreeMap;

use crate::domain::{RankedUser, UserRecord};
use crate::scoring::BreakdownSource;
use crate::services::leaderboard::BulkRefreshReport;
use crate::store::{LeaderboardSummary, SortKey};

const RULE_WIDTH: usize = 92;

pub fn print_leaderboard(ranked: &[RankedUser], key: SortKey, summary: &LeaderboardSummary) {
    if ranked.is_empty() {
        println!("{}", "No users on the leaderboard yet. Add one with `add <username>`.".yellow());
        return;
    }

    println!("{}", format!("LeetCode Leaderboard (sorted by {})", key.label()).cyan().bold());
    if let Some(first) = ranked.first() {
        println!("Week: {}", first.record.current_week);
    }
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", header().bold());
    println!("{}", "-".repeat(RULE_WIDTH));
    for user in ranked {
        let row = format_row(user);
        match user.position {
            1 => println!("{}", row.yellow().bold()),
            2 | 3 => println!("{}", row.green()),
            _ => println!("{row}"),
        }
    }
    println!("{}", "=".repeat(RULE_WIDTH));
    print_summary(summary);
}

fn header() -> String {
    format!(
        "{:>4}  {:<20} {:>7} {:>5} {:>12}  {:>6} {:>6} {:>14}  {:>9}",
        "#", "User", "Weekly", "Wk#", "Wk E/M/H", "Score", "Solved", "E/M/H", "Rank"
    )
}

pub fn format_row(user: &RankedUser) -> String {
    let record = &user.record;
    format!(
        "{:>4}  {:<20} {:>7} {:>5} {:>12}  {:>6} {:>6} {:>14}  {:>9}",
        user.position,
        truncate(&record.username, 20),
        record.weekly_base_score,
        record.weekly_total,
        format!("{}/{}/{}", record.weekly_easy, record.weekly_medium, record.weekly_hard),
        record.base_score,
        record.total_solved,
        format!("{}/{}/{}", record.easy, record.medium, record.hard),
        format_ranking(record.ranking),
    )
}

fn format_ranking(ranking: u64) -> String {
    if ranking == 0 {
        "-".to_string()
    } else {
        ranking.to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 1).collect();
    format!("{kept}~")
}

fn print_summary(summary: &LeaderboardSummary) {
    println!(
        "{} users, {} problems this week ({} pts, avg {:.1}), {} lifetime ({} pts, avg {:.1})",
        summary.total_users,
        summary.weekly_problems,
        summary.weekly_score,
        summary.avg_weekly_score,
        summary.total_problems,
        summary.total_base_score,
        summary.avg_score,
    );
    if let Some(leader) = &summary.leader {
        println!("Leader: {}", leader.bold());
    }
}

pub fn print_details(record: &UserRecord) {
    println!("{}", format!("Details for {}", record.username).cyan().bold());
    println!("{}", "=".repeat(50));
    if let Some(name) = &record.real_name {
        println!("Real name:       {name}");
    }
    println!("Ranking:         {}", format_ranking(record.ranking));
    println!("Last updated:    {}", record.last_updated.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();
    println!("{}", "Lifetime".bold());
    println!("  Easy {}  Medium {}  Hard {}  Total {}", record.easy, record.medium, record.hard, record.total_solved);
    println!("  Score {}", record.base_score.to_string().green());
    if let Some(performance) = record.performance_score {
        println!("  Performance score (legacy) {performance:.1}");
    }
    println!();
    println!("{} ({})", "This week".bold(), record.current_week);
    println!(
        "  Easy {}  Medium {}  Hard {}  Total {}",
        record.weekly_easy, record.weekly_medium, record.weekly_hard, record.weekly_total
    );
    println!(
        "  Score {}  breakdown {}",
        record.weekly_base_score.to_string().green(),
        match record.weekly_breakdown {
            BreakdownSource::Estimated => "estimated",
            BreakdownSource::Exact => "exact",
        }
    );
    println!(
        "  Activity: {} ({} in 7d, {} in 30d, {} in 365d)",
        record.activity.level.as_str(),
        record.activity.last_7_days,
        record.activity.last_30_days,
        record.activity.last_365_days
    );

    if !record.languages.is_empty() {
        println!();
        println!("{}", "Languages".bold());
        for (language, solved) in top_entries(&record.languages, 5) {
            println!("  {language:<20} {solved}");
        }
    }
    if !record.topics.is_empty() {
        println!();
        println!("{}", "Top topics".bold());
        for (topic, solved) in top_entries(&record.topics, 8) {
            println!("  {topic:<28} {solved}");
        }
    }
    if !record.recent_submissions.is_empty() {
        println!();
        println!("{}", "Recent submissions".bold());
        for submission in &record.recent_submissions {
            let status = if submission.is_accepted() {
                submission.status.green()
            } else {
                submission.status.red()
            };
            println!("  {:<40} {}", truncate(&submission.title, 40), status);
        }
    }
}

fn top_entries(counts: &BTreeMap<String, u32>, limit: usize) -> Vec<(&String, &u32)> {
    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries.truncate(limit);
    entries
}

pub fn print_usernames(usernames: &[String]) {
    if usernames.is_empty() {
        println!("{}", "No users tracked.".yellow());
        return;
    }
    println!("{}", format!("Tracked users ({})", usernames.len()).bold());
    for username in usernames {
        println!("  {username}");
    }
}

pub fn print_refresh_report(report: &BulkRefreshReport) {
    println!(
        "Updated {}/{} users",
        report.refreshed.len().to_string().green(),
        report.attempted()
    );
    for failure in &report.failed {
        println!("  {} {}: {}", "failed".red(), failure.username, failure.error);
    }
    if let Some(error) = &report.persistence_error {
        println!("  {} {}", "not saved:".red().bold(), error);
    }
}
