//! HTTP endpoints for read access and submissions.
//!
//! The WebSocket carries the session gestures; these routes cover the
//! stateless pieces a UI (or curl) may want without a socket.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::state::AppState;

/// Request body for challenge submissions
#[derive(Debug, Deserialize)]
pub struct SubmitChallengeRequest {
    pub text: String,
}

/// Ranked leaderboard rows, recomputed per request.
///
/// GET /api/leaderboard
pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Response {
    match state.leaderboard().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("Leaderboard read failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// Queue a challenge proposal for review.
///
/// POST /api/challenges
pub async fn submit_challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitChallengeRequest>,
) -> Response {
    match state.submit_challenge(&req.text).await {
        // Empty text is a silent no-op, mirrored as 204
        Ok(true) => (StatusCode::ACCEPTED, "Queued for review").into_response(),
        Ok(false) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Submission write failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
