//! Storage health endpoint.

use crate::{error::HttpError, AppError, AppState};
use axum::{extract::State, Json};
use serde_json::json;

/// Report storage liveness and the stored paste count.
///
/// # Returns
/// `{"status": "ok", "pastes": n}` when the handle answers within the
/// health-check timeout.
///
/// # Errors
/// `503` when the handle is missing, unreachable, or the count query fails.
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, HttpError> {
    let pastes = state
        .db
        .connections
        .health_check()
        .await
        .map_err(AppError::from)?;
    Ok(Json(json!({ "status": "ok", "pastes": pastes })))
}
