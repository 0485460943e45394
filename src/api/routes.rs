use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::api::ProfileSource;
use crate::api::handlers::{
    AppState,
    leaderboard::{get_leaderboard, get_stats},
    users::{add_user, get_user, refresh_all, refresh_user, remove_user},
};

pub fn create_router<S: ProfileSource + Send + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard::<S>))
        .route("/api/user/:username", get(get_user::<S>))
        .route("/api/stats", get(get_stats::<S>))
        .route("/api/add_user", post(add_user::<S>))
        .route("/api/refresh_user/:username", post(refresh_user::<S>))
        .route("/api/refresh_all", post(refresh_all::<S>))
        .route("/api/remove_user/:username", delete(remove_user::<S>))
        .with_state(state)
}
