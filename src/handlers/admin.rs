use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    app::AppState,
    services::{ScanRecorder, RECENT_SCANS_LIMIT},
};

/// Aggregate scan statistics for the dashboard
/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let recorder = ScanRecorder::new(state.diesel_pool.clone());

    match recorder.stats().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Most recent scans, newest first
/// GET /api/admin/recent
pub async fn recent(State(state): State<AppState>) -> impl IntoResponse {
    let recorder = ScanRecorder::new(state.diesel_pool.clone());

    match recorder.recent(RECENT_SCANS_LIMIT).await {
        Ok(scans) => (StatusCode::OK, Json(scans)).into_response(),
        Err(e) => e.into_response(),
    }
}
