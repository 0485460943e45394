pub mod leaderboard;
pub mod normalizer;
pub mod server;

pub use leaderboard::{BulkRefreshReport, LeaderboardService, RefreshFailure};
pub use normalizer::StatsNormalizer;
pub use server::ServerService;
