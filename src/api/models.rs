use serde::{Deserialize, Serialize};

use crate::domain::{RankedUser, UserRecord};
use crate::services::leaderboard::{BulkRefreshReport, RefreshFailure};

#[derive(Deserialize)]
pub struct AddUserRequest {
    pub username: String,
}

#[derive(Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub sort_by: String,
    pub data: Vec<RankedUser>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub data: UserRecord,
}

#[derive(Serialize)]
pub struct FailureItem {
    pub username: String,
    pub error: String,
}

impl From<RefreshFailure> for FailureItem {
    fn from(failure: RefreshFailure) -> Self {
        Self {
            username: failure.username,
            error: failure.error.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct RefreshAllResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: usize,
    pub failed_users: Vec<String>,
    pub failures: Vec<FailureItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

impl From<BulkRefreshReport> for RefreshAllResponse {
    fn from(report: BulkRefreshReport) -> Self {
        let message = format!(
            "Updated {}/{} users",
            report.refreshed.len(),
            report.attempted()
        );

        Self {
            success: report.persistence_error.is_none(),
            message,
            updated_count: report.refreshed.len(),
            failed_users: report.failed.iter().map(|f| f.username.clone()).collect(),
            failures: report.failed.into_iter().map(FailureItem::from).collect(),
            persistence_error: report.persistence_error.map(|e| e.to_string()),
        }
    }
}
