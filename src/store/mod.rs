pub mod file;
pub mod leaderboard_store;
pub mod sort;
pub mod summary;

pub use file::JsonFile;
pub use leaderboard_store::{LeaderboardStore, username_key};
pub use sort::{SortKey, SortOrder};
pub use summary::{Champion, LeaderboardSummary};
