use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let stored_records = state
        .store
        .count_records()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let db_ready = state.store.ping().await.is_ok();

    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        stored_records,
        db_ready,
    };

    Ok(Json(ApiResponse::success(status)))
}
