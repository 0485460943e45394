use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::scoring::BreakdownStrategy;

#[derive(Parser, Debug)]
#[command(author, version, about = "LeetCode friends leaderboard")]
pub struct Cli {
    /// Leaderboard data file (defaults to LEADERBOARD_DATA_FILE or leaderboard_data.json)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Weekly difficulty breakdown: proportional or direct
    #[arg(long, global = true, value_parser = parse_breakdown)]
    pub weekly_breakdown: Option<BreakdownStrategy>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the JSON API server
    Serve {
        /// Port number (optional, defaults to 5000)
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Fetch a user and add them to the leaderboard
    Add { username: String },
    /// Remove a user from the leaderboard
    Remove { username: String },
    /// Refresh one user, or everyone when no username is given
    Update { username: Option<String> },
    /// Print the ranked leaderboard
    #[command(group(ArgGroup::new("direction").args(["asc", "desc"])))]
    Show {
        /// Sort key, e.g. weekly_base_score, base_score, ranking, hard
        #[arg(short, long, default_value = "weekly_base_score")]
        sort_by: String,
        #[arg(long)]
        asc: bool,
        #[arg(long)]
        desc: bool,
    },
    /// Print everything stored for one user
    Details { username: String },
    /// List tracked usernames
    List,
    /// Print shell completions
    Completions { shell: Shell },
}

fn parse_breakdown(value: &str) -> Result<BreakdownStrategy, String> {
    BreakdownStrategy::parse(value).ok_or_else(|| format!("unknown breakdown '{value}', expected proportional or direct"))
}
