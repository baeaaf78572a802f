//! Settings API Handlers

use axum::{Json, extract::State};
use shared::models::{ThresholdsUpdate, WaitTimeThresholds};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/settings/wait-time-thresholds
pub async fn get_thresholds(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<WaitTimeThresholds>> {
    Ok(ApiResponse::success(state.wait_policy.thresholds()))
}

/// PUT /api/settings/wait-time-thresholds
///
/// Rejected updates (non-positive, yellow >= red) leave the current values in place.
pub async fn update_thresholds(
    State(state): State<ServerState>,
    Json(payload): Json<ThresholdsUpdate>,
) -> AppResult<ApiResponse<WaitTimeThresholds>> {
    let thresholds = state.wait_policy.update(payload).await?;
    Ok(ApiResponse::success_with_message(
        "Wait time thresholds updated",
        thresholds,
    ))
}
