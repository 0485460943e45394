use axum::{
    Json,
    extract::{Path, State},
};
use log::info;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::ProfileSource;
use crate::api::models::{AddUserRequest, ApiMessage, RefreshAllResponse, UserResponse};
use crate::domain::UserRecord;
use crate::errors::LeaderboardError;

pub async fn get_user<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    state
        .service
        .get(&username)
        .map(Json)
        .ok_or_else(|| LeaderboardError::RecordNotFound(username).into())
}

pub async fn add_user<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AddUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let record = state.service.add_or_refresh(&request.username).await?;

    Ok(Json(UserResponse {
        success: true,
        message: format!("Added {}", record.username),
        data: record,
    }))
}

pub async fn refresh_user<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let record = state.service.refresh_user(&username).await?;

    Ok(Json(UserResponse {
        success: true,
        message: format!("Updated {}", record.username),
        data: record,
    }))
}

pub async fn refresh_all<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<RefreshAllResponse> {
    info!("Refreshing all users");
    let report = state.service.refresh_all().await;

    Json(RefreshAllResponse::from(report))
}

pub async fn remove_user<S: ProfileSource + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    if !state.service.remove(&username)? {
        return Err(LeaderboardError::RecordNotFound(username).into());
    }

    Ok(Json(ApiMessage {
        success: true,
        message: format!("Removed {username}"),
    }))
}
