use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ApiError, AppState, LeaderboardParams};
use crate::api::ProfileSource;
use crate::api::models::LeaderboardResponse;
use crate::store::{LeaderboardSummary, SortKey, SortOrder};

pub async fn get_leaderboard<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let order = match params.order.as_deref() {
        Some(raw) => Some(
            SortOrder::parse(raw).ok_or_else(|| ApiError::BadRequest(format!("Unknown order: {raw}")))?,
        ),
        None => None,
    };
    let sort_by = params
        .sort_by
        .unwrap_or_else(|| SortKey::default().to_string());

    let data = state.service.list(&sort_by, order)?;

    Ok(Json(LeaderboardResponse {
        success: true,
        sort_by,
        data,
    }))
}

pub async fn get_stats<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<LeaderboardSummary> {
    Json(state.service.summary())
}
