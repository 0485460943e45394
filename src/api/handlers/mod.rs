use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use crate::api::models::ApiMessage;
use crate::errors::{LeaderboardError, SourceError};
use crate::services::leaderboard::LeaderboardService;

pub mod leaderboard;
pub mod users;

/// Shared server state. The service does its own locking.
pub struct AppState<S> {
    pub service: LeaderboardService<S>,
}

impl<S> AppState<S> {
    pub fn new(service: LeaderboardService<S>) -> Self {
        Self { service }
    }
}

#[derive(Deserialize)]
pub struct LeaderboardParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Leaderboard(error) => match error {
                LeaderboardError::Source(SourceError::UserNotFound(_)) => StatusCode::NOT_FOUND,
                LeaderboardError::Source(_) => StatusCode::BAD_GATEWAY,
                LeaderboardError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
                LeaderboardError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                LeaderboardError::InvalidUsername | LeaderboardError::UnknownSortKey(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiMessage {
            success: false,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::routes::create_router;
    use crate::services::leaderboard::tests::{FakeSource, service};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) fn app(path: &Path, source: FakeSource) -> Router {
        create_router(Arc::new(AppState::new(service(path, source))))
    }

    pub(crate) async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LeaderboardError::Source(SourceError::UserNotFound("x".into())), StatusCode::NOT_FOUND),
            (LeaderboardError::Source(SourceError::unavailable("down")), StatusCode::BAD_GATEWAY),
            (LeaderboardError::Source(SourceError::malformed("bad")), StatusCode::BAD_GATEWAY),
            (LeaderboardError::RecordNotFound("x".into()), StatusCode::NOT_FOUND),
            (LeaderboardError::InvalidUsername, StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }
}
